//! YouTube Data API v3 client library.
//!
//! Only the slice of the API needed to publish a video is covered:
//!
//! 1. [`YouTubeClient::insert_video`] creates the video resource and uploads its contents.
//! 2. [`YouTubeClient::set_thumbnail`] attaches a custom thumbnail to the video created in (1).
//!
//! The second call needs the [`VideoId`] returned by the first, so the two are inherently
//! sequential.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_upload::youtube_api::{VideoInsertRequest, YouTubeClient};
//! use std::path::Path;
//!
//! # async fn example(client: YouTubeClient, request: VideoInsertRequest) -> eyre::Result<()> {
//! let video = client.insert_video(&request, Path::new("episode-12.mp4")).await?;
//! client.set_thumbnail(&video.id, Path::new("episode-12.png")).await?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod categories;
pub mod client;
pub mod thumbnails;
pub mod videos;

// Re-export main types for convenience
pub use categories::{Category, UnknownCategory};
pub use client::{TimeBoundAccessToken, YouTubeClient};
pub use thumbnails::{Thumbnail, ThumbnailSetResponse};
pub use videos::{
    PrivacyStatus, UnknownPrivacyStatus, Video, VideoId, VideoInsertRequest, VideoSnippet,
    VideoStatus,
};

/// The two platform calls an upload run is made of.
///
/// [`YouTubeClient`] is the real implementation; the upload workflow is written against this
/// trait so it can be exercised without a network.
#[allow(async_fn_in_trait)]
pub trait VideoPlatform {
    /// Creates a video resource from `video` with the contents of the file at `media_path`.
    async fn insert_video(&self, video: &VideoInsertRequest, media_path: &Path)
    -> eyre::Result<Video>;

    /// Sets the image at `image_path` as the custom thumbnail of an existing video.
    async fn set_thumbnail(
        &self,
        video_id: &VideoId,
        image_path: &Path,
    ) -> eyre::Result<ThumbnailSetResponse>;
}
