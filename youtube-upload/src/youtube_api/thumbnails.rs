//! YouTube Thumbnails API types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response structure for the `thumbnails.set` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/thumbnails/set>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSetResponse {
    /// The value will be `youtube#thumbnailSetResponse`.
    #[serde(default)]
    pub kind: String,
    /// One entry per uploaded image, keyed by size (`default`, `medium`, `high`, ...).
    #[serde(default)]
    pub items: Vec<BTreeMap<String, Thumbnail>>,
}

/// One rendition of a thumbnail image.
///
/// See: <https://developers.google.com/youtube/v3/docs/thumbnails#resource>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}
