//! Source adapter trait and error taxonomy
//!
//! Every museum adapter implements [`SourceAdapter`]. The fallible
//! `try_*` operations report a [`SourceError`]; the provided `search` and
//! `get_by_id` collapse any error to an empty or absent result so callers
//! never see an upstream failure.

use async_trait::async_trait;
use curator_common::{Artwork, ArtworkId, Source};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure talking to one upstream collection API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Transport failure, timeout, non-2xx status other than 404, or missing credentials
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Response body did not match the expected envelope
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// 404, or an id the source can never resolve
    #[error("not found: {0}")]
    NotFound(String),
}

/// One museum collection
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    /// Search results; every returned record has a thumbnail
    async fn try_search(&self, term: &str) -> Result<Vec<Artwork>, SourceError>;

    /// Fully resolved detail record
    async fn try_get(&self, id: &ArtworkId) -> Result<Artwork, SourceError>;

    /// Search, collapsing any failure to an empty list
    async fn search(&self, term: &str) -> Vec<Artwork> {
        match self.try_search(term).await {
            Ok(items) => items,
            Err(e) => {
                warn!(source = %self.source(), error = %e, "Search failed, returning no results");
                Vec::new()
            }
        }
    }

    /// Detail lookup, collapsing any failure to `None`
    async fn get_by_id(&self, id: &ArtworkId) -> Option<Artwork> {
        match self.try_get(id).await {
            Ok(artwork) => Some(artwork),
            Err(SourceError::NotFound(msg)) => {
                debug!(source = %self.source(), id = %id, "Artwork not found: {}", msg);
                None
            }
            Err(e) => {
                warn!(source = %self.source(), id = %id, error = %e, "Detail lookup failed");
                None
            }
        }
    }
}
