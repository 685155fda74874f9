//! curator-server library interface
//!
//! Exposes the router and its state so integration tests can drive the
//! service without binding a socket.

pub mod api;
pub mod config;
pub mod error;
pub mod search;
pub mod sources;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use curator_common::events::EventBus;
use curator_common::Exhibition;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::search::SearchBoard;
use crate::sources::ParallelSearch;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Registered source adapters
    pub sources: ParallelSearch,
    /// The session's selection set
    pub exhibition: Arc<Exhibition>,
    /// Search generations and latest result
    pub searches: Arc<SearchBoard>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(sources: ParallelSearch, exhibition: Arc<Exhibition>, event_bus: EventBus) -> Self {
        Self {
            sources,
            exhibition,
            searches: Arc::new(SearchBoard::new(event_bus.clone())),
            event_bus,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::health_routes())
        .merge(api::search_routes())
        .merge(api::artwork_routes())
        .merge(api::exhibition_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
