//! Artwork detail endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use curator_common::{Artwork, Source};
use serde::Serialize;
use tracing::debug;

use super::parse_key;
use crate::{ApiError, ApiResult, AppState};

/// Where the artwork can be seen in person and online
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereToSee {
    pub museum: &'static str,
    pub address: &'static str,
    pub view_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WhereToSee {
    fn for_artwork(artwork: &Artwork) -> Self {
        let source: Source = artwork.source;
        Self {
            museum: source.display_name(),
            address: source.address(),
            view_label: source.view_label(),
            url: artwork.source_record_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDetail {
    #[serde(flatten)]
    pub artwork: Artwork,
    /// Image to show in a detail view (full image, else thumbnail)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_image_url: Option<String>,
    pub in_exhibition: bool,
    pub where_to_see: WhereToSee,
}

/// GET /api/artworks/:source/:id
pub async fn get_artwork(
    State(state): State<AppState>,
    Path((source, id)): Path<(String, String)>,
) -> ApiResult<Json<ArtworkDetail>> {
    let key = parse_key(&source, &id)?;
    let not_found = || ApiError::NotFound("Artwork not found".to_string());

    let Some(adapter) = state.sources.adapter(key.source) else {
        debug!(source = %key.source, "Detail requested for unregistered source");
        return Err(not_found());
    };
    let artwork = adapter.get_by_id(&key.id).await.ok_or_else(not_found)?;

    Ok(Json(ArtworkDetail {
        display_image_url: artwork.display_image().map(str::to_string),
        in_exhibition: state.exhibition.contains(&artwork),
        where_to_see: WhereToSee::for_artwork(&artwork),
        artwork,
    }))
}

/// Build artwork routes
pub fn artwork_routes() -> Router<AppState> {
    Router::new().route("/api/artworks/:source/:id", get(get_artwork))
}
