//! HTTP API handlers for curator-server
//!
//! JSON over HTTP plus one SSE stream. Handlers receive the adapters and the
//! exhibition through [`AppState`](crate::AppState).

pub mod artworks;
pub mod exhibition;
pub mod health;
pub mod search;
pub mod sse;

pub use artworks::artwork_routes;
pub use exhibition::exhibition_routes;
pub use health::health_routes;
pub use search::search_routes;
pub use sse::event_stream;

use curator_common::{ArtworkId, IdentityKey, Source};

use crate::{ApiError, ApiResult};

/// Parse `/:source/:id` path segments
///
/// Source labels are matched leniently (`MET`, `chicago`, `Harvard Art Museums`).
pub(crate) fn parse_key(source: &str, id: &str) -> ApiResult<IdentityKey> {
    let source: Source = source.parse()?;
    let id = ArtworkId::parse(id);
    if id.is_blank() {
        return Err(ApiError::BadRequest("Artwork id is required".to_string()));
    }
    Ok(IdentityKey::new(source, id))
}
