//! Search and source listing endpoints
//!
//! - `GET /api/sources` - registered museums with display metadata
//! - `GET /api/search?q=&sources=` - one multi-source search round
//! - `GET /api/search/latest` - newest non-superseded round (204 before the first)

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use curator_common::Source;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::search::SearchResult;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    /// Comma-separated source labels; all registered sources when absent
    #[serde(default)]
    pub sources: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub source: Source,
    pub name: &'static str,
    pub view_label: String,
    pub address: &'static str,
}

impl From<Source> for SourceInfo {
    fn from(source: Source) -> Self {
        Self {
            source,
            name: source.display_name(),
            view_label: source.view_label(),
            address: source.address(),
        }
    }
}

/// GET /api/sources
pub async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceInfo>> {
    Json(state.sources.sources().into_iter().map(SourceInfo::from).collect())
}

fn parse_source_filter(raw: Option<&str>) -> ApiResult<Option<Vec<Source>>> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };

    let sources = raw
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(|label| label.parse::<Source>().map_err(ApiError::from))
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Some(sources))
}

/// GET /api/search?q=&sources=
///
/// Every branch settles before the response is sent. The result is also
/// published as the latest search unless a newer round started meanwhile.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResult>> {
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(ApiError::BadRequest("Search term is required".to_string()));
    }
    let only = parse_source_filter(params.sources.as_deref())?;

    let ticket = state.searches.begin();
    let groups = state.sources.search_all(term, only.as_deref()).await;
    let result = SearchResult::from_groups(ticket.generation(), term, groups);

    info!(
        generation = result.generation,
        query = %result.query,
        total = result.total,
        "Search round complete"
    );
    state.searches.publish(result.clone());

    Ok(Json(result))
}

/// GET /api/search/latest
pub async fn latest_search(State(state): State<AppState>) -> Response {
    match state.searches.latest() {
        Some(result) => Json(result).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Build search routes
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sources", get(list_sources))
        .route("/api/search", get(search))
        .route("/api/search/latest", get(latest_search))
}
