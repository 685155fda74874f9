//! Museum source adapters
//!
//! One adapter per collection API, each implementing
//! [`SourceAdapter`](crate::types::SourceAdapter):
//! 1. **met** - The Metropolitan Museum of Art (ids-only search + detail fan-out)
//! 2. **aic** - Art Institute of Chicago (IIIF image ids)
//! 3. **harvard** - Harvard Art Museums (API key, viewer URL normalization)
//!
//! # Parallel Search
//! [`ParallelSearch`] fans one term out to every registered adapter at once.
//! A failing source contributes zero records; it never fails the round.

pub mod aic;
pub mod harvard;
pub mod http;
pub mod images;
pub mod met;

use crate::types::SourceAdapter;
use curator_common::config::TomlConfig;
use curator_common::{Artwork, Source};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

pub use aic::AicAdapter;
pub use harvard::HarvardAdapter;
pub use met::MetAdapter;

/// Results contributed by one source to a search round
#[derive(Debug, Clone)]
pub struct SourceResults {
    pub source: Source,
    pub items: Vec<Artwork>,
}

/// Concurrent multi-source search
///
/// Adapters are queried in parallel; results come back grouped per source in
/// registration order, regardless of which source answered first.
#[derive(Clone)]
pub struct ParallelSearch {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl ParallelSearch {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// Register every enabled source from config, sharing one HTTP client
    ///
    /// `harvard_api_key` is the already-resolved key (ENV beats TOML).
    pub fn from_config(config: &TomlConfig, harvard_api_key: Option<String>) -> reqwest::Result<Self> {
        let client = http::build_client(&config.http)?;
        let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();

        if config.sources.met.enabled {
            adapters.push(Arc::new(MetAdapter::new(
                client.clone(),
                config.sources.met.clone(),
            )));
        }
        if config.sources.aic.enabled {
            adapters.push(Arc::new(AicAdapter::new(
                client.clone(),
                config.sources.aic.clone(),
                config.images,
            )));
        }
        if config.sources.harvard.enabled {
            let mut harvard = config.sources.harvard.clone();
            harvard.api_key = harvard_api_key;
            adapters.push(Arc::new(HarvardAdapter::new(client, harvard, config.images)));
        }

        info!(
            sources = ?adapters.iter().map(|a| a.source().slug()).collect::<Vec<_>>(),
            "Source adapters registered"
        );
        Ok(Self::new(adapters))
    }

    /// Registered sources in registration order
    pub fn sources(&self) -> Vec<Source> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    pub fn adapter(&self, source: Source) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.source() == source)
            .map(Arc::clone)
    }

    pub fn count(&self) -> usize {
        self.adapters.len()
    }

    /// Search every registered source (or only `only`, when given)
    ///
    /// Every branch settles before this returns. Failed branches yield an
    /// empty group.
    pub async fn search_all(&self, term: &str, only: Option<&[Source]>) -> Vec<SourceResults> {
        let selected = self
            .adapters
            .iter()
            .filter(|a| only.map_or(true, |sources| sources.contains(&a.source())));

        let futures = selected.map(|adapter| {
            let adapter = Arc::clone(adapter);
            async move {
                let source = adapter.source();
                let items = adapter.search(term).await;
                debug!(source = %source, count = items.len(), "Source search settled");
                SourceResults { source, items }
            }
        });

        join_all(futures).await
    }
}

// ============================================================================
// Mock Adapter for Testing
// ============================================================================
