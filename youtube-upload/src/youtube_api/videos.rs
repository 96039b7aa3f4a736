//! YouTube Videos API types.

use crate::youtube_api::categories::Category;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for both the metadata and the audio track of uploaded videos.
pub const DEFAULT_LANGUAGE: &str = "en";

/// The ID that YouTube uses to uniquely identify a video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body for the `videos.insert` API call.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/insert>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInsertRequest {
    pub snippet: VideoSnippet,
    pub status: VideoStatus,
}

/// A `video` resource represents a YouTube video.
///
/// Only the parts requested with `part=snippet,status` are modelled.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<VideoSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VideoStatus>,
}

/// Basic details about a video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// The numeric [`Category`] id, which the API transports as a string.
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_audio_language: Option<String>,
}

impl VideoSnippet {
    pub fn category(&self) -> Option<Category> {
        self.category_id.parse().ok().and_then(Category::from_id)
    }
}

/// Upload, processing and privacy status of a video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#status>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    pub privacy_status: PrivacyStatus,
    /// When a private video is scheduled to become public.
    ///
    /// Can only be set while the privacy status is [`PrivacyStatus::Private`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<Timestamp>,
    /// Set by YouTube in responses, e.g. `uploaded` or `processed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_status: Option<String>,
}

/// The video's privacy status.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#status.privacyStatus>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrivacyStatus {
    /// The video is public and can be viewed by anyone.
    Public,
    /// The video is private and can only be viewed by the owner and explicitly shared users.
    #[default]
    Private,
    /// The video is unlisted and can only be viewed by people with the link.
    Unlisted,
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::Unlisted => write!(f, "unlisted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown privacy status '{0}' (expected public, private or unlisted)")]
pub struct UnknownPrivacyStatus(pub String);

impl FromStr for PrivacyStatus {
    type Err = UnknownPrivacyStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            "unlisted" => Ok(Self::Unlisted),
            _ => Err(UnknownPrivacyStatus(s.to_string())),
        }
    }
}
