//! Exhibition (selection set) endpoints
//!
//! Adding an unidentifiable record is not an error: the response reports
//! outcome `unidentifiable` and the set is left untouched.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use curator_common::{AddOutcome, ArtworkDraft, ExhibitionSnapshot};
use serde::Serialize;
use tracing::info;

use super::parse_key;
use crate::{ApiResult, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResponse {
    pub outcome: AddOutcome,
    pub count: usize,
    pub revision: u64,
}

#[derive(Debug, Serialize)]
pub struct ContainsResponse {
    pub contains: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub removed: bool,
    pub count: usize,
    pub revision: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub cleared: bool,
    pub count: usize,
    pub revision: u64,
}

/// GET /api/exhibition
pub async fn list_exhibition(State(state): State<AppState>) -> Json<ExhibitionSnapshot> {
    Json(state.exhibition.snapshot())
}

/// POST /api/exhibition
pub async fn add_to_exhibition(
    State(state): State<AppState>,
    payload: Result<Json<ArtworkDraft>, JsonRejection>,
) -> ApiResult<Json<AddResponse>> {
    let Json(draft) = payload?;
    let applied = state.exhibition.add_draft(draft);
    if applied.result.is_mutation() {
        info!(count = applied.count, "Artwork added to exhibition");
    }

    Ok(Json(AddResponse {
        outcome: applied.result,
        count: applied.count,
        revision: applied.revision,
    }))
}

/// GET /api/exhibition/:source/:id
pub async fn exhibition_contains(
    State(state): State<AppState>,
    Path((source, id)): Path<(String, String)>,
) -> ApiResult<Json<ContainsResponse>> {
    let key = parse_key(&source, &id)?;
    Ok(Json(ContainsResponse {
        contains: state.exhibition.contains(&key),
    }))
}

/// DELETE /api/exhibition/:source/:id
pub async fn remove_from_exhibition(
    State(state): State<AppState>,
    Path((source, id)): Path<(String, String)>,
) -> ApiResult<Json<RemoveResponse>> {
    let key = parse_key(&source, &id)?;
    let applied = state.exhibition.remove(&key);
    if applied.result {
        info!(key = %key, "Artwork removed from exhibition");
    }

    Ok(Json(RemoveResponse {
        removed: applied.result,
        count: applied.count,
        revision: applied.revision,
    }))
}

/// DELETE /api/exhibition
pub async fn clear_exhibition(State(state): State<AppState>) -> Json<ClearResponse> {
    let applied = state.exhibition.clear();
    if applied.result {
        info!("Exhibition cleared");
    }

    Json(ClearResponse {
        cleared: applied.result,
        count: applied.count,
        revision: applied.revision,
    })
}

/// Build exhibition routes
pub fn exhibition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/exhibition",
            get(list_exhibition)
                .post(add_to_exhibition)
                .delete(clear_exhibition),
        )
        .route(
            "/api/exhibition/:source/:id",
            get(exhibition_contains).delete(remove_from_exhibition),
        )
}
