//! Upload a video, with its metadata and a custom thumbnail, to a YouTube channel.
//!
//! The account is authorized through OAuth2 once; the resulting token is stored next to the app
//! credentials and reused (and refreshed) on later runs.
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), youtube_upload::UploadError> {
//! let outcome = youtube_upload::upload_video(
//!     "episode-12.mp4",
//!     "episode-12.png",
//!     "Episode 12",
//!     "In which we finally fix the build.",
//!     vec!["rust".to_string()],
//! )
//! .await?;
//! println!("https://youtu.be/{}", outcome.video.id);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod authorize;
pub mod config;
pub mod credentials;
mod error;
pub mod oauth;
pub mod token_store;
pub mod upload;
pub mod youtube_api;

#[cfg(test)]
mod test_support;

pub use authorize::{AuthCodeProvider, Authorizer, ConsoleCodeProvider};
pub use config::UploaderConfig;
pub use credentials::AppCredentials;
pub use error::UploadError;
pub use upload::{ThumbnailOutcome, UploadOutcome, UploadRequest, Uploader, publish};
pub use youtube_api::{Category, PrivacyStatus};

/// Uploads a private video in [`Category::ScienceTechnology`] and sets its thumbnail.
///
/// Credentials and the token are read from the current directory (see
/// [`UploaderConfig::default`]), and if the account has not been authorized yet the user is
/// asked to do so on the terminal.
pub async fn upload_video(
    video_path: impl Into<PathBuf>,
    thumbnail_path: impl Into<PathBuf>,
    title: impl Into<String>,
    description: impl Into<String>,
    tags: Vec<String>,
) -> Result<UploadOutcome, UploadError> {
    let request = UploadRequest::new(video_path, thumbnail_path, title, description, tags);
    Uploader::new(UploaderConfig::default(), ConsoleCodeProvider)
        .upload(&request)
        .await
}
