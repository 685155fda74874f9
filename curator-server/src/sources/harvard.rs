//! Harvard Art Museums API
//!
//! Requires an API key on every request. Without one the adapter still
//! registers but reports every call as unavailable, so aggregate searches
//! simply get no Harvard records.

use async_trait::async_trait;
use curator_common::artwork::non_blank;
use curator_common::config::{HarvardConfig, ImageConfig};
use curator_common::{Artwork, ArtworkId, Source};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::http::get_json;
use super::images::harvard_image;
use crate::types::{SourceAdapter, SourceError};

#[derive(Debug, Deserialize)]
struct HarvardSearchResponse {
    records: Vec<HarvardRecord>,
}

#[derive(Debug, Deserialize)]
struct HarvardPerson {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HarvardRecord {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    people: Option<Vec<HarvardPerson>>,
    #[serde(default)]
    baseimageurl: Option<String>,
    #[serde(default)]
    primaryimageurl: Option<String>,
    #[serde(default)]
    dated: Option<String>,
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

pub struct HarvardAdapter {
    client: Client,
    config: HarvardConfig,
    images: ImageConfig,
}

impl HarvardAdapter {
    /// `config.api_key` must already hold the resolved key (ENV or TOML)
    pub fn new(client: Client, config: HarvardConfig, images: ImageConfig) -> Self {
        Self {
            client,
            config,
            images,
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn api_key(&self) -> Result<String, SourceError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                SourceError::UpstreamUnavailable("Harvard API key not configured".to_string())
            })
    }

    fn to_artwork(&self, record: HarvardRecord) -> Artwork {
        let image = |width| {
            harvard_image(
                record.baseimageurl.as_deref(),
                record.primaryimageurl.as_deref(),
                &self.config.image_base,
                width,
            )
        };
        let thumbnail_url = image(self.images.thumbnail_width);
        let full_image_url = image(self.images.full_width);

        let artist_name = record
            .people
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|person| person.name)
            .unwrap_or_default();

        let source_record_url = non_blank(record.url).or_else(|| {
            Some(format!(
                "{}/{}",
                self.config.record_base.trim_end_matches('/'),
                record.id
            ))
        });

        Artwork {
            id: ArtworkId::Number(record.id),
            source: Source::Harvard,
            title: record.title.unwrap_or_default(),
            artist_name,
            thumbnail_url,
            full_image_url,
            date: record.dated.unwrap_or_default(),
            medium: record.medium.unwrap_or_default(),
            department: record.department.unwrap_or_default(),
            source_record_url,
        }
        .normalized()
    }
}

#[async_trait]
impl SourceAdapter for HarvardAdapter {
    fn source(&self) -> Source {
        Source::Harvard
    }

    async fn try_search(&self, term: &str) -> Result<Vec<Artwork>, SourceError> {
        let api_key = self.api_key()?;
        let url = format!("{}/object", self.base());
        let query = [
            ("apikey", api_key),
            ("q", term.to_string()),
            ("size", self.config.page_size.to_string()),
        ];
        let response: HarvardSearchResponse =
            get_json(&self.client, "harvard search", &url, &query).await?;

        let hits = response.records.len();
        let items: Vec<Artwork> = response
            .records
            .into_iter()
            .map(|record| self.to_artwork(record))
            .filter(Artwork::has_thumbnail)
            .collect();

        debug!(hits = hits, with_images = items.len(), "Harvard search complete");
        Ok(items)
    }

    async fn try_get(&self, id: &ArtworkId) -> Result<Artwork, SourceError> {
        let object_id = id
            .as_number()
            .ok_or_else(|| SourceError::NotFound(format!("harvard object {}", id)))?;
        let api_key = self.api_key()?;

        let url = format!("{}/object/{}", self.base(), object_id);
        let record: HarvardRecord =
            get_json(&self.client, "harvard object", &url, &[("apikey", api_key)]).await?;
        Ok(self.to_artwork(record))
    }
}
