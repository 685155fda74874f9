//! Canonical artwork record
//!
//! Every source adapter maps its vendor response into [`Artwork`] once, at the
//! adapter boundary. Downstream code (selection set, HTTP API) never sees
//! vendor-specific optional fields.
//!
//! [`ArtworkDraft`] is the lenient shape accepted from clients and from
//! legacy persisted data. It tolerates both identifier spellings (`objectID`
//! and `id`) and the older precursor field names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Title used when the upstream record has none
pub const UNTITLED: &str = "Untitled";

/// Artist name used when the upstream record has none
pub const UNKNOWN_ARTIST: &str = "Unknown artist";

/// Museum collection an artwork came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The Metropolitan Museum of Art
    Met,
    /// Art Institute of Chicago
    Aic,
    /// Harvard Art Museums
    Harvard,
}

impl Source {
    /// Every known source, in default registration order
    pub const ALL: [Source; 3] = [Source::Met, Source::Aic, Source::Harvard];

    /// Short identifier used in URLs and persisted data
    pub fn slug(self) -> &'static str {
        match self {
            Source::Met => "met",
            Source::Aic => "aic",
            Source::Harvard => "harvard",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Source::Met => "The Metropolitan Museum of Art",
            Source::Aic => "Art Institute of Chicago",
            Source::Harvard => "Harvard Art Museums",
        }
    }

    /// Link label for the "where to see it" section of a detail view
    pub fn view_label(self) -> String {
        format!("view on {}", self.display_name())
    }

    /// Street address of the museum building
    pub fn address(self) -> &'static str {
        match self {
            Source::Met => "1000 5th Ave, New York, NY 10028, United States",
            Source::Aic => "111 S Michigan Ave, Chicago, IL 60603, United States",
            Source::Harvard => "32 Quincy St, Cambridge, MA 02138, United States",
        }
    }

    /// Match a museum label: an exact slug ("MET") or a piece of the display
    /// name at least three characters long ("chicago", "Harvard Art Museum")
    pub fn from_label(label: &str) -> Option<Source> {
        let label = label.trim().to_lowercase();
        if let Some(source) = Source::ALL.iter().find(|s| s.slug() == label) {
            return Some(*source);
        }
        if label.chars().count() < 3 {
            return None;
        }
        Source::ALL
            .into_iter()
            .find(|s| s.display_name().to_lowercase().contains(&label))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::from_label(s).ok_or_else(|| Error::InvalidInput(format!("Unknown source: {}", s)))
    }
}

/// Source-local artwork identifier (unique only within its source)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtworkId {
    Number(u64),
    Text(String),
}

impl ArtworkId {
    /// Parse a path segment or form value; numeric text becomes `Number`
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(n) => ArtworkId::Number(n),
            Err(_) => ArtworkId::Text(raw.to_string()),
        }
    }

    /// Canonical form used for identity comparisons (`"7"` and `7` are one id)
    pub fn normalized(self) -> Self {
        match self {
            ArtworkId::Text(text) => ArtworkId::parse(&text),
            number => number,
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            ArtworkId::Number(n) => Some(*n),
            ArtworkId::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ArtworkId::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkId::Number(n) => write!(f, "{}", n),
            ArtworkId::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for ArtworkId {
    fn from(n: u64) -> Self {
        ArtworkId::Number(n)
    }
}

impl From<&str> for ArtworkId {
    fn from(raw: &str) -> Self {
        ArtworkId::parse(raw)
    }
}

/// Cross-source identity of an artwork: `(source, id)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub source: Source,
    pub id: ArtworkId,
}

impl IdentityKey {
    pub fn new(source: Source, id: impl Into<ArtworkId>) -> Self {
        Self {
            source,
            id: id.into().normalized(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}

/// Anything the selection set can address by identity key
///
/// Returns `None` when the value carries no usable identifier.
pub trait Identify {
    fn identity_key(&self) -> Option<IdentityKey>;
}

impl Identify for IdentityKey {
    fn identity_key(&self) -> Option<IdentityKey> {
        Some(self.clone())
    }
}

/// Canonical artwork record produced by every source adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: ArtworkId,
    pub source: Source,
    pub title: String,
    pub artist_name: String,
    /// Small preview image; search results always carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Large image for detail views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_image_url: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub department: String,
    /// Page for this record on the museum's own website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_record_url: Option<String>,
}

impl Artwork {
    /// Empty record with placeholder title and artist
    pub fn new(source: Source, id: impl Into<ArtworkId>) -> Self {
        Self {
            id: id.into().normalized(),
            source,
            title: UNTITLED.to_string(),
            artist_name: UNKNOWN_ARTIST.to_string(),
            thumbnail_url: None,
            full_image_url: None,
            date: String::new(),
            medium: String::new(),
            department: String::new(),
            source_record_url: None,
        }
    }

    /// Apply placeholder and blank-field rules
    ///
    /// Blank title/artist become placeholders, blank URLs become `None`,
    /// descriptive strings are trimmed.
    pub fn normalized(mut self) -> Self {
        self.id = self.id.normalized();
        self.title = text_or(&self.title, UNTITLED);
        self.artist_name = text_or(&self.artist_name, UNKNOWN_ARTIST);
        self.thumbnail_url = non_blank(self.thumbnail_url);
        self.full_image_url = non_blank(self.full_image_url);
        self.date = self.date.trim().to_string();
        self.medium = self.medium.trim().to_string();
        self.department = self.department.trim().to_string();
        self.source_record_url = non_blank(self.source_record_url);
        self
    }

    pub fn key(&self) -> IdentityKey {
        IdentityKey::new(self.source, self.id.clone())
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail_url.is_some()
    }

    /// Image for detail/modal display: full image, else the thumbnail
    pub fn display_image(&self) -> Option<&str> {
        self.full_image_url
            .as_deref()
            .or(self.thumbnail_url.as_deref())
    }
}

impl Identify for Artwork {
    fn identity_key(&self) -> Option<IdentityKey> {
        Some(self.key())
    }
}

/// Lenient artwork input
///
/// Accepts canonical camelCase names as well as the precursor names
/// (`objectID`, `artistDisplayName`, `primaryImageSmall`, `primaryImage`,
/// `objectDate`, `objectURL`, `museum`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDraft {
    #[serde(default, rename = "objectID")]
    pub object_id: Option<ArtworkId>,
    #[serde(default)]
    pub id: Option<ArtworkId>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub museum: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "artistDisplayName")]
    pub artist_name: Option<String>,
    #[serde(default, alias = "primaryImageSmall")]
    pub thumbnail_url: Option<String>,
    #[serde(default, alias = "primaryImage")]
    pub full_image_url: Option<String>,
    #[serde(default, alias = "objectDate")]
    pub date: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "objectURL")]
    pub source_record_url: Option<String>,
}

impl ArtworkDraft {
    /// Normalize into the canonical record; `None` when unidentifiable
    pub fn into_artwork(self) -> Option<Artwork> {
        let key = self.identity_key()?;
        let artwork = Artwork {
            id: key.id,
            source: key.source,
            title: self.title.unwrap_or_default(),
            artist_name: self.artist_name.unwrap_or_default(),
            thumbnail_url: self.thumbnail_url,
            full_image_url: self.full_image_url,
            date: self.date.unwrap_or_default(),
            medium: self.medium.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            source_record_url: self.source_record_url,
        };
        Some(artwork.normalized())
    }

    // Explicit source wins, then the museum label; `objectID` is a Met-only spelling.
    fn resolve_source(&self, has_object_id: bool) -> Option<Source> {
        // An explicit source that does not parse is not guessed around
        if let Some(source) = self.source.as_deref().filter(|s| !s.trim().is_empty()) {
            return Source::from_label(source);
        }
        self.museum
            .as_deref()
            .and_then(Source::from_label)
            .or(if has_object_id { Some(Source::Met) } else { None })
    }
}

impl Identify for ArtworkDraft {
    fn identity_key(&self) -> Option<IdentityKey> {
        let object_id = self.object_id.as_ref().filter(|id| !id.is_blank());
        let id = object_id.or_else(|| self.id.as_ref().filter(|id| !id.is_blank()))?;
        let source = self.resolve_source(object_id.is_some())?;
        Some(IdentityKey::new(source, id.clone()))
    }
}

impl From<Artwork> for ArtworkDraft {
    fn from(artwork: Artwork) -> Self {
        Self {
            object_id: None,
            id: Some(artwork.id),
            source: Some(artwork.source.slug().to_string()),
            museum: None,
            title: Some(artwork.title),
            artist_name: Some(artwork.artist_name),
            thumbnail_url: artwork.thumbnail_url,
            full_image_url: artwork.full_image_url,
            date: Some(artwork.date),
            medium: Some(artwork.medium),
            department: Some(artwork.department),
            source_record_url: artwork.source_record_url,
        }
    }
}

/// Trimmed value, or `None` when missing or blank
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn text_or(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}
