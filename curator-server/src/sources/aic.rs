//! Art Institute of Chicago API
//!
//! Records carry an opaque `image_id` that is interpolated into the IIIF
//! image service. The response envelope names the service base in
//! `config.iiif_url`; when present it wins over the configured default.

use async_trait::async_trait;
use curator_common::artwork::non_blank;
use curator_common::config::{AicConfig, ImageConfig};
use curator_common::{Artwork, ArtworkId, Source};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::http::get_json;
use super::images::iiif_url;
use crate::types::{SourceAdapter, SourceError};

/// Fields requested from both search and detail endpoints
const FIELDS: &str = "id,title,artist_title,image_id,date_display,medium_display,department_title";

#[derive(Debug, Deserialize)]
struct AicEnvelope<T> {
    data: T,
    #[serde(default)]
    config: Option<AicEnvelopeConfig>,
}

#[derive(Debug, Deserialize)]
struct AicEnvelopeConfig {
    #[serde(default)]
    iiif_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AicArtwork {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist_title: Option<String>,
    #[serde(default)]
    image_id: Option<String>,
    #[serde(default)]
    date_display: Option<String>,
    #[serde(default)]
    medium_display: Option<String>,
    #[serde(default)]
    department_title: Option<String>,
}

pub struct AicAdapter {
    client: Client,
    config: AicConfig,
    images: ImageConfig,
}

impl AicAdapter {
    pub fn new(client: Client, config: AicConfig, images: ImageConfig) -> Self {
        Self {
            client,
            config,
            images,
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn image_base<'a>(&'a self, envelope: Option<&'a AicEnvelopeConfig>) -> &'a str {
        envelope
            .and_then(|c| c.iiif_url.as_deref())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.config.image_base)
    }

    fn to_artwork(&self, record: AicArtwork, image_base: &str) -> Artwork {
        let image_id = non_blank(record.image_id);
        let image = |width| image_id.as_deref().map(|id| iiif_url(image_base, id, width));

        Artwork {
            id: ArtworkId::Number(record.id),
            source: Source::Aic,
            title: record.title.unwrap_or_default(),
            artist_name: record.artist_title.unwrap_or_default(),
            thumbnail_url: image(self.images.thumbnail_width),
            full_image_url: image(self.images.full_width),
            date: record.date_display.unwrap_or_default(),
            medium: record.medium_display.unwrap_or_default(),
            department: record.department_title.unwrap_or_default(),
            source_record_url: Some(format!(
                "{}/{}",
                self.config.record_base.trim_end_matches('/'),
                record.id
            )),
        }
        .normalized()
    }
}

#[async_trait]
impl SourceAdapter for AicAdapter {
    fn source(&self) -> Source {
        Source::Aic
    }

    async fn try_search(&self, term: &str) -> Result<Vec<Artwork>, SourceError> {
        let url = format!("{}/artworks/search", self.base());
        let query = [
            ("q", term.to_string()),
            ("limit", self.config.page_size.to_string()),
            ("fields", FIELDS.to_string()),
        ];
        let envelope: AicEnvelope<Vec<AicArtwork>> =
            get_json(&self.client, "aic search", &url, &query).await?;

        let image_base = self.image_base(envelope.config.as_ref()).to_string();
        let hits = envelope.data.len();
        let items: Vec<Artwork> = envelope
            .data
            .into_iter()
            .map(|record| self.to_artwork(record, &image_base))
            .filter(Artwork::has_thumbnail)
            .collect();

        debug!(hits = hits, with_images = items.len(), "AIC search complete");
        Ok(items)
    }

    async fn try_get(&self, id: &ArtworkId) -> Result<Artwork, SourceError> {
        let artwork_id = id
            .as_number()
            .ok_or_else(|| SourceError::NotFound(format!("aic artwork {}", id)))?;

        let url = format!("{}/artworks/{}", self.base(), artwork_id);
        let query = [("fields", FIELDS.to_string())];
        let envelope: AicEnvelope<AicArtwork> =
            get_json(&self.client, "aic artwork", &url, &query).await?;

        let image_base = self.image_base(envelope.config.as_ref()).to_string();
        Ok(self.to_artwork(envelope.data, &image_base))
    }
}
