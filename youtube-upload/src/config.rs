//! Run configuration: where credentials live and which endpoints to talk to.

use std::path::PathBuf;

/// OAuth scope that grants permission to upload videos and set their thumbnails.
pub const UPLOAD_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

/// Redirect URI registered for the app. The user copies the code off the page this lands on.
pub const DEFAULT_REDIRECT_URI: &str = "http://www.example.com/oauth2callback";

/// Root of both the Data API and the media upload API.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

/// Paths and endpoints used by a single upload run.
///
/// The [`Default`] values match the conventional layout of a working directory prepared for
/// this tool: `client_secret.json` downloaded from the Google Cloud console, and a
/// `client_oauth_token.json` that is created on first authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    /// Google client-secret JSON file.
    pub client_secret_path: PathBuf,
    /// Where the OAuth token is persisted between runs.
    ///
    /// If you change [`Self::scope`], delete this file so a token with the new scope is requested.
    pub token_path: PathBuf,
    pub redirect_uri: String,
    pub scope: String,
    /// Base URL for YouTube API calls, without a trailing slash.
    pub api_base: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            client_secret_path: PathBuf::from("./client_secret.json"),
            token_path: PathBuf::from("./client_oauth_token.json"),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: UPLOAD_SCOPE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}
