//! Source adapters against in-process stub museum APIs
//!
//! Each test serves canned upstream responses on an ephemeral local port and
//! points an adapter's base URL at it.

mod helpers;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use curator_common::config::{AicConfig, HarvardConfig, HttpClientConfig, ImageConfig, MetConfig};
use curator_common::{ArtworkId, Source};
use curator_server::sources::http::build_client;
use curator_server::sources::{AicAdapter, HarvardAdapter, MetAdapter};
use curator_server::types::{SourceAdapter, SourceError};
use helpers::spawn_upstream;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

fn client(timeout_secs: u64) -> reqwest::Client {
    build_client(&HttpClientConfig {
        timeout_secs,
        ..HttpClientConfig::default()
    })
    .unwrap()
}

// ============================================================================
// The Met
// ============================================================================

fn met_upstream() -> Router {
    Router::new()
        .route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("hasImages").map(String::as_str), Some("true"));
                match params.get("q").map(String::as_str) {
                    Some("nothing") => Json(json!({"total": 0, "objectIDs": null})),
                    _ => Json(json!({"total": 4, "objectIDs": [1, 2, 3, 4]})),
                }
            }),
        )
        .route(
            "/objects/:id",
            get(|Path(id): Path<u64>| async move {
                match id {
                    1 => Json(json!({
                        "objectID": 1,
                        "title": "Bridge over a Pond of Water Lilies",
                        "artistDisplayName": "Claude Monet",
                        "primaryImage": "https://images.example/1-large.jpg",
                        "primaryImageSmall": "https://images.example/1-small.jpg",
                        "objectURL": "https://www.metmuseum.org/art/collection/search/1"
                    }))
                    .into_response(),
                    2 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                    3 => Json(json!({"objectID": 3, "title": "No image", "primaryImage": ""}))
                        .into_response(),
                    4 => Json(json!({
                        "objectID": 4,
                        "title": "",
                        "primaryImage": "https://images.example/4-large.jpg"
                    }))
                    .into_response(),
                    _ => StatusCode::NOT_FOUND.into_response(),
                }
            }),
        )
}

fn met_adapter(base_url: String) -> MetAdapter {
    MetAdapter::new(
        client(5),
        MetConfig {
            base_url,
            ..MetConfig::default()
        },
    )
}

#[tokio::test]
async fn test_met_search_drops_failed_and_imageless_details() {
    let base = spawn_upstream(met_upstream()).await;
    let adapter = met_adapter(base);

    let items = adapter.search("monet").await;
    let ids: Vec<ArtworkId> = items.iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec![ArtworkId::Number(1), ArtworkId::Number(4)]);
    assert!(items.iter().all(|a| a.has_thumbnail()));

    // Only primaryImage present: used for both
    assert_eq!(items[1].thumbnail_url.as_deref(), Some("https://images.example/4-large.jpg"));
    assert_eq!(items[1].title, "Untitled");
}

#[tokio::test]
async fn test_met_null_object_ids_is_empty() {
    let base = spawn_upstream(met_upstream()).await;
    let adapter = met_adapter(base);

    assert!(adapter.try_search("nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_met_detail_limit_caps_fan_out() {
    let base = spawn_upstream(met_upstream()).await;
    let adapter = MetAdapter::new(
        client(5),
        MetConfig {
            base_url: base,
            detail_limit: 1,
            ..MetConfig::default()
        },
    );

    assert_eq!(adapter.search("monet").await.len(), 1);
}

#[tokio::test]
async fn test_met_get_by_id() {
    let base = spawn_upstream(met_upstream()).await;
    let adapter = met_adapter(base);

    let artwork = adapter.get_by_id(&ArtworkId::Number(1)).await.unwrap();
    assert_eq!(artwork.artist_name, "Claude Monet");
    assert_eq!(artwork.full_image_url.as_deref(), Some("https://images.example/1-large.jpg"));

    assert!(matches!(
        adapter.try_get(&ArtworkId::Number(404)).await,
        Err(SourceError::NotFound(_))
    ));
    assert!(matches!(
        adapter.try_get(&ArtworkId::Number(2)).await,
        Err(SourceError::UpstreamUnavailable(_))
    ));
    // Imageless detail records are still returned
    let imageless = adapter.get_by_id(&ArtworkId::Number(3)).await.unwrap();
    assert_eq!(imageless.display_image(), None);
}

// ============================================================================
// Art Institute of Chicago
// ============================================================================

fn aic_upstream() -> Router {
    Router::new()
        .route(
            "/artworks/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("limit").map(String::as_str), Some("12"));
                assert!(params.get("fields").unwrap().contains("image_id"));
                Json(json!({
                    "data": [
                        {"id": 27992, "title": "A Sunday on La Grande Jatte", "artist_title": "Georges Seurat", "image_id": "abc123"},
                        {"id": 111, "title": "No image", "image_id": null}
                    ],
                    "config": {"iiif_url": "https://mirror.example/iiif/2"}
                }))
            }),
        )
        .route(
            "/artworks/:id",
            get(|Path(id): Path<u64>| async move {
                if id == 27992 {
                    Json(json!({
                        "data": {
                            "id": 27992,
                            "title": "A Sunday on La Grande Jatte",
                            "artist_title": null,
                            "image_id": "abc123",
                            "date_display": "1884-86",
                            "medium_display": "Oil on canvas",
                            "department_title": "Painting and Sculpture of Europe"
                        }
                    }))
                    .into_response()
                } else if id == 500 {
                    Json(json!({"unexpected": true})).into_response()
                } else {
                    StatusCode::NOT_FOUND.into_response()
                }
            }),
        )
}

fn aic_adapter(base_url: String) -> AicAdapter {
    AicAdapter::new(
        client(5),
        AicConfig {
            base_url,
            ..AicConfig::default()
        },
        ImageConfig::default(),
    )
}

#[tokio::test]
async fn test_aic_search_uses_envelope_image_base() {
    let base = spawn_upstream(aic_upstream()).await;
    let items = aic_adapter(base).search("jatte").await;

    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].thumbnail_url.as_deref(),
        Some("https://mirror.example/iiif/2/abc123/full/400,/0/default.jpg")
    );
    assert_eq!(
        items[0].full_image_url.as_deref(),
        Some("https://mirror.example/iiif/2/abc123/full/843,/0/default.jpg")
    );
}

#[tokio::test]
async fn test_aic_detail_falls_back_to_configured_image_base() {
    let base = spawn_upstream(aic_upstream()).await;
    let adapter = aic_adapter(base);

    let artwork = adapter.get_by_id(&ArtworkId::Number(27992)).await.unwrap();
    assert_eq!(
        artwork.full_image_url.as_deref(),
        Some("https://www.artic.edu/iiif/2/abc123/full/843,/0/default.jpg")
    );
    assert_eq!(artwork.artist_name, "Unknown artist");
    assert_eq!(artwork.source_record_url.as_deref(), Some("https://www.artic.edu/artworks/27992"));
    assert_eq!(artwork.medium, "Oil on canvas");
}

#[tokio::test]
async fn test_aic_error_taxonomy() {
    let base = spawn_upstream(aic_upstream()).await;
    let adapter = aic_adapter(base);

    assert!(matches!(
        adapter.try_get(&ArtworkId::Number(1)).await,
        Err(SourceError::NotFound(_))
    ));
    assert!(matches!(
        adapter.try_get(&ArtworkId::Number(500)).await,
        Err(SourceError::MalformedResponse(_))
    ));
    assert!(matches!(
        adapter.try_get(&ArtworkId::Text("not-a-number".to_string())).await,
        Err(SourceError::NotFound(_))
    ));
    assert!(adapter.get_by_id(&ArtworkId::Number(1)).await.is_none());
}

// ============================================================================
// Harvard Art Museums
// ============================================================================

fn harvard_upstream() -> Router {
    Router::new()
        .route(
            "/object",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("apikey").map(String::as_str) != Some("test-key") {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                assert_eq!(params.get("size").map(String::as_str), Some("24"));
                Json(json!({
                    "info": {"totalrecords": 3},
                    "records": [
                        {
                            "id": 299843,
                            "title": "Self-Portrait Dedicated to Paul Gauguin",
                            "people": [{"name": "Vincent van Gogh"}],
                            "primaryimageurl": "https://nrs.harvard.edu/urn-3:HUAM:DDC251942/ids/view/17826080"
                        },
                        {
                            "id": 12,
                            "title": "Study",
                            "baseimageurl": "https://nrs.harvard.edu/urn-3:HUAM:12_dynmc"
                        },
                        {"id": 13, "title": "No image"}
                    ]
                }))
                .into_response()
            }),
        )
        .route(
            "/object/:id",
            get(|Path(id): Path<u64>, Query(params): Query<HashMap<String, String>>| async move {
                if params.get("apikey").map(String::as_str) != Some("test-key") {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                if id != 12 {
                    return StatusCode::NOT_FOUND.into_response();
                }
                Json(json!({
                    "id": 12,
                    "title": "Study",
                    "baseimageurl": "https://nrs.harvard.edu/urn-3:HUAM:12_dynmc",
                    "dated": "1890",
                    "url": "https://www.harvardartmuseums.org/collections/object/12"
                }))
                .into_response()
            }),
        )
}

fn harvard_adapter(base_url: String, api_key: Option<&str>) -> HarvardAdapter {
    HarvardAdapter::new(
        client(5),
        HarvardConfig {
            base_url,
            api_key: api_key.map(str::to_string),
            ..HarvardConfig::default()
        },
        ImageConfig::default(),
    )
}

#[tokio::test]
async fn test_harvard_search_resolves_images() {
    let base = spawn_upstream(harvard_upstream()).await;
    let items = harvard_adapter(base, Some("test-key")).search("gogh").await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].source, Source::Harvard);
    assert_eq!(items[0].artist_name, "Vincent van Gogh");
    assert_eq!(
        items[0].thumbnail_url.as_deref(),
        Some("https://ids.lib.harvard.edu/ids/iiif/17826080/full/400,/0/default.jpg")
    );
    assert_eq!(
        items[1].thumbnail_url.as_deref(),
        Some("https://nrs.harvard.edu/urn-3:HUAM:12_dynmc")
    );
}

#[tokio::test]
async fn test_harvard_rejected_key_is_unavailable() {
    let base = spawn_upstream(harvard_upstream()).await;
    let adapter = harvard_adapter(base, Some("wrong-key"));

    assert!(matches!(
        adapter.try_search("gogh").await,
        Err(SourceError::UpstreamUnavailable(_))
    ));
}

#[tokio::test]
async fn test_harvard_detail() {
    let base = spawn_upstream(harvard_upstream()).await;
    let adapter = harvard_adapter(base, Some("test-key"));

    let artwork = adapter.get_by_id(&ArtworkId::Number(12)).await.unwrap();
    assert_eq!(artwork.date, "1890");
    assert_eq!(
        artwork.source_record_url.as_deref(),
        Some("https://www.harvardartmuseums.org/collections/object/12")
    );
    assert!(adapter.get_by_id(&ArtworkId::Number(99)).await.is_none());
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_timeout_is_upstream_unavailable() {
    let slow = Router::new().route(
        "/artworks/search",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"data": []}))
        }),
    );
    let base = spawn_upstream(slow).await;
    let adapter = AicAdapter::new(
        client(1),
        AicConfig {
            base_url: base,
            ..AicConfig::default()
        },
        ImageConfig::default(),
    );

    assert!(matches!(
        adapter.try_search("x").await,
        Err(SourceError::UpstreamUnavailable(_))
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_upstream_unavailable() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let adapter = met_adapter(format!("http://{}", addr));
    assert!(matches!(
        adapter.try_search("x").await,
        Err(SourceError::UpstreamUnavailable(_))
    ));
    assert!(adapter.search("x").await.is_empty());
}
