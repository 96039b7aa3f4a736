use std::path::PathBuf;

/// Everything that can stop an upload run.
///
/// Each variant corresponds to the step that failed. Steps are attempted strictly in order, so
/// the variant also tells you how far the run got: a [`UploadError::PlatformApi`] means the local
/// checks, credential loading and authorization all succeeded, but the video was never created.
///
/// A failed thumbnail is _not_ an error; see [`crate::upload::ThumbnailOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The video or thumbnail file does not exist. Nothing was sent over the network.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The request combines options the platform will reject.
    #[error("invalid upload request: {0}")]
    InvalidRequest(String),

    /// The app credential file is missing or malformed.
    #[error("load app credentials: {0:#}")]
    CredentialsLoad(eyre::Report),

    /// No usable OAuth token could be obtained.
    #[error("authorize with YouTube: {0:#}")]
    Authorization(eyre::Report),

    /// The `videos.insert` call failed.
    #[error("YouTube API error: {0:#}")]
    PlatformApi(eyre::Report),
}
