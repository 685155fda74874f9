//! Test Helper Utilities
//!
//! Shared utilities for testing curator-server

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use curator_common::events::EventBus;
use curator_common::{Artwork, ArtworkId, Exhibition, MemoryStore, Source};
use curator_server::sources::ParallelSearch;
use curator_server::types::{SourceAdapter, SourceError};
use curator_server::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Adapter returning canned records, or failing every call
pub struct StubAdapter {
    pub source: Source,
    pub items: Vec<Artwork>,
    pub fail: bool,
}

impl StubAdapter {
    pub fn with_items(source: Source, count: u64) -> Self {
        Self {
            source,
            items: (1..=count).map(|id| artwork(source, id, &format!("{} {}", source, id))).collect(),
            fail: false,
        }
    }

    pub fn failing(source: Source) -> Self {
        Self {
            source,
            items: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SourceAdapter for StubAdapter {
    fn source(&self) -> Source {
        self.source
    }

    async fn try_search(&self, _term: &str) -> Result<Vec<Artwork>, SourceError> {
        if self.fail {
            return Err(SourceError::UpstreamUnavailable("stub failure".to_string()));
        }
        Ok(self.items.clone())
    }

    async fn try_get(&self, id: &ArtworkId) -> Result<Artwork, SourceError> {
        if self.fail {
            return Err(SourceError::UpstreamUnavailable("stub failure".to_string()));
        }
        self.items
            .iter()
            .find(|a| &a.id == id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

/// Record with a thumbnail and a museum page
pub fn artwork(source: Source, id: u64, title: &str) -> Artwork {
    let mut artwork = Artwork::new(source, id);
    artwork.title = title.to_string();
    artwork.thumbnail_url = Some(format!("https://img.example/{}/{}-400.jpg", source, id));
    artwork.full_image_url = Some(format!("https://img.example/{}/{}-843.jpg", source, id));
    artwork.source_record_url = Some(format!("https://museum.example/{}/{}", source, id));
    artwork
}

/// Test app over the given adapters with an in-memory session store
pub fn create_test_app(adapters: Vec<Arc<dyn SourceAdapter>>) -> (Router, Arc<MemoryStore>, EventBus) {
    let event_bus = EventBus::new(100);
    let store = Arc::new(MemoryStore::new());
    let exhibition = Arc::new(Exhibition::restore(store.clone(), event_bus.clone()));

    let state = AppState::new(ParallelSearch::new(adapters), exhibition, event_bus.clone());
    (curator_server::build_router(state), store, event_bus)
}

/// Default three-museum stub lineup: Met 2 records, Chicago failing, Harvard 3 records
pub fn default_adapters() -> Vec<Arc<dyn SourceAdapter>> {
    vec![
        Arc::new(StubAdapter::with_items(Source::Met, 2)),
        Arc::new(StubAdapter::failing(Source::Aic)),
        Arc::new(StubAdapter::with_items(Source::Harvard, 3)),
    ]
}

/// Send one request; returns status and JSON body (`Null` when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Serve `router` on an ephemeral local port; returns its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
