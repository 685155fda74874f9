//! Image URL resolution
//!
//! Turns whatever a source gives us (direct JPEG URL, opaque image id,
//! viewer page URL) into a raster URL at a requested pixel width.

use regex::Regex;
use std::sync::LazyLock;

/// Numeric asset id in a Harvard IDS viewer URL (`.../ids/view/17826080`)
static IDS_VIEWER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/ids/view/(\d+)").unwrap());

/// Size segment of an IIIF image request (`/full/<size>/0/default.jpg`)
static IIIF_SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/full/[^/]+/0/default\.jpg").unwrap());

/// IIIF image API URL for `image_id` scaled to `width` pixels wide
pub fn iiif_url(base: &str, image_id: &str, width: u32) -> String {
    format!(
        "{}/{}/full/{},/0/default.jpg",
        base.trim_end_matches('/'),
        image_id,
        width
    )
}

/// Normalize a Harvard `primaryimageurl`
///
/// Viewer URLs are rebuilt on the IIIF service, existing IIIF URLs get their
/// size rewritten, anything else is returned unchanged.
pub fn normalize_harvard_url(url: &str, iiif_base: &str, width: u32) -> String {
    if let Some(asset_id) = IDS_VIEWER_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
    {
        return iiif_url(iiif_base, asset_id.as_str(), width);
    }

    if url.contains("/ids/iiif/") && IIIF_SIZE_PATTERN.is_match(url) {
        let sized = format!("/full/{},/0/default.jpg", width);
        return IIIF_SIZE_PATTERN.replace(url, sized.as_str()).into_owned();
    }

    url.to_string()
}

/// Harvard image: `baseimageurl` as-is, else the normalized `primaryimageurl`
pub fn harvard_image(
    base_image_url: Option<&str>,
    primary_image_url: Option<&str>,
    iiif_base: &str,
    width: u32,
) -> Option<String> {
    let non_empty = |s: &&str| !s.trim().is_empty();

    if let Some(url) = base_image_url.filter(non_empty) {
        return Some(url.trim().to_string());
    }
    primary_image_url
        .filter(non_empty)
        .map(|url| normalize_harvard_url(url.trim(), iiif_base, width))
}
