//! The Metropolitan Museum of Art collection API
//!
//! Search returns ids only, so each search issues one detail request per hit
//! (capped at `detail_limit`). Images are direct JPEG URLs used as-is.

use async_trait::async_trait;
use curator_common::artwork::non_blank;
use curator_common::config::MetConfig;
use curator_common::{Artwork, ArtworkId, Source};
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http::get_json;
use crate::types::{SourceAdapter, SourceError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetSearchResponse {
    #[serde(default)]
    total: u64,
    /// `null` when nothing matched
    #[serde(rename = "objectIDs", default)]
    object_ids: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetObject {
    #[serde(rename = "objectID")]
    object_id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist_display_name: Option<String>,
    #[serde(default)]
    primary_image: Option<String>,
    #[serde(default)]
    primary_image_small: Option<String>,
    #[serde(default)]
    object_date: Option<String>,
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(rename = "objectURL", default)]
    object_url: Option<String>,
}

impl MetObject {
    fn into_artwork(self) -> Artwork {
        let small = non_blank(self.primary_image_small);
        let large = non_blank(self.primary_image);

        Artwork {
            id: ArtworkId::Number(self.object_id),
            source: Source::Met,
            title: self.title.unwrap_or_default(),
            artist_name: self.artist_display_name.unwrap_or_default(),
            thumbnail_url: small.clone().or_else(|| large.clone()),
            full_image_url: large.or(small),
            date: self.object_date.unwrap_or_default(),
            medium: self.medium.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            source_record_url: self.object_url,
        }
        .normalized()
    }
}

pub struct MetAdapter {
    client: Client,
    config: MetConfig,
}

impl MetAdapter {
    pub fn new(client: Client, config: MetConfig) -> Self {
        Self { client, config }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn fetch_object(&self, object_id: u64) -> Result<Artwork, SourceError> {
        let url = format!("{}/objects/{}", self.base(), object_id);
        let object: MetObject = get_json(&self.client, "met object", &url, &[]).await?;
        Ok(object.into_artwork())
    }
}

#[async_trait]
impl SourceAdapter for MetAdapter {
    fn source(&self) -> Source {
        Source::Met
    }

    async fn try_search(&self, term: &str) -> Result<Vec<Artwork>, SourceError> {
        let url = format!("{}/search", self.base());
        let query = [("q", term.to_string()), ("hasImages", "true".to_string())];
        let response: MetSearchResponse = get_json(&self.client, "met search", &url, &query).await?;

        let ids: Vec<u64> = response
            .object_ids
            .unwrap_or_default()
            .into_iter()
            .take(self.config.detail_limit)
            .collect();
        debug!(total = response.total, fetching = ids.len(), "Met search hits");

        let details = join_all(ids.iter().map(|id| self.fetch_object(*id))).await;

        Ok(details
            .into_iter()
            .zip(ids)
            .filter_map(|(result, id)| match result {
                Ok(artwork) => Some(artwork),
                Err(e) => {
                    warn!(object_id = id, error = %e, "Met object lookup failed, dropping record");
                    None
                }
            })
            .filter(Artwork::has_thumbnail)
            .collect())
    }

    async fn try_get(&self, id: &ArtworkId) -> Result<Artwork, SourceError> {
        let object_id = id
            .as_number()
            .ok_or_else(|| SourceError::NotFound(format!("met object {}", id)))?;
        self.fetch_object(object_id).await
    }
}
