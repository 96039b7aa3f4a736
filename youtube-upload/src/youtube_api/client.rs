//! Core YouTube API client functionality and authentication management.

use crate::oauth::OAuthManager;
use crate::token_store::TokenStore;
use crate::youtube_api::VideoPlatform;
use crate::youtube_api::thumbnails::ThumbnailSetResponse;
use crate::youtube_api::videos::{Video, VideoId, VideoInsertRequest};
use eyre::Context;
use http::Method;
use jiff::{SignedDuration, Timestamp};
use oauth2::TokenResponse;
use oauth2::basic::BasicTokenResponse;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tracing::instrument;

/// Access tokens are considered expired this long before Google says they are.
const EXPIRY_BUFFER: SignedDuration = SignedDuration::from_secs(300);

/// An OAuth2 token together with the instant its access token stops being usable.
///
/// This is what gets persisted between runs: the token response alone only carries a relative
/// `expires_in`, which is meaningless once read back from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBoundAccessToken {
    token: BasicTokenResponse,
    /// When the current access token expires (with safety buffer)
    expires_at: Timestamp,
}

impl TimeBoundAccessToken {
    /// Creates a token that is already expired, forcing a refresh before first use.
    pub fn expired(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: Timestamp::UNIX_EPOCH,
            token,
        }
    }

    /// Creates a token with calculated expiry time.
    ///
    /// The expiry time is calculated from the token's `expires_in` field minus
    /// a 5-minute safety buffer to prevent edge-case failures.
    pub fn new(token: BasicTokenResponse) -> Self {
        Self {
            expires_at: Self::calculate_token_expiry(&token),
            token,
        }
    }

    pub fn raw_token(&self) -> &BasicTokenResponse {
        &self.token
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        Timestamp::now() >= self.expires_at
    }

    /// Refreshes this token using the provided OAuth manager, preserving the refresh token.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Token was successfully refreshed
    /// * `Ok(false)` - Refresh failed (invalid grant, no refresh token, etc.)
    /// * `Err(_)` - Network or other error occurred
    pub async fn refresh(&mut self, oauth_manager: &OAuthManager) -> eyre::Result<bool> {
        tracing::trace!("refreshing token");
        match oauth_manager
            .refresh_token(&self.token)
            .await
            .context("refresh OAuth token")?
        {
            Some(new_token) => {
                let old_token = std::mem::replace(&mut self.token, new_token);

                // Google usually omits the refresh token when refreshing
                if self.token.refresh_token().is_none() {
                    tracing::trace!("new token lacks refresh token, preserving original");
                    self.token
                        .set_refresh_token(old_token.refresh_token().cloned());
                } else {
                    tracing::debug!("new token includes refresh token");
                }

                self.expires_at = Self::calculate_token_expiry(&self.token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Uses the current time + expires_in - 5 minute safety buffer.
    /// If no expires_in is provided, assumes a conservative 55-minute lifetime.
    fn calculate_token_expiry(token: &BasicTokenResponse) -> Timestamp {
        let now = Timestamp::now();
        match token.expires_in() {
            Some(expires_in) => {
                let lifetime = i64::try_from(expires_in.as_secs()).unwrap_or(i64::MAX / 2);
                now.checked_add(SignedDuration::from_secs(lifetime) - EXPIRY_BUFFER)
                    .unwrap_or(Timestamp::MAX)
            }
            None => now + SignedDuration::from_secs(3300),
        }
    }
}

/// A local file to be sent as a request body without reading it into memory.
#[derive(Debug)]
struct MediaFile {
    file: tokio::fs::File,
    len: u64,
    content_type: &'static str,
}

impl MediaFile {
    async fn open(path: &Path, fallback_content_type: &'static str) -> eyre::Result<Self> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("open {}", path.display()))?;
        let len = file
            .metadata()
            .await
            .with_context(|| format!("stat {}", path.display()))?
            .len();
        Ok(Self {
            file,
            len,
            content_type: guess_content_type(path).unwrap_or(fallback_content_type),
        })
    }

    fn into_body(self) -> reqwest::Body {
        reqwest::Body::wrap_stream(ReaderStream::new(self.file))
    }
}

fn guess_content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => return None,
    })
}

#[derive(Debug)]
enum RequestBody {
    Json(serde_json::Value),
    Media(MediaFile),
}

/// Client for interacting with the YouTube Data API v3.
///
/// This client wraps an OAuth2 token and provides the calls needed to publish a video.
/// All API calls require a valid OAuth2 access token with the upload scope.
///
/// The client automatically refreshes expired access tokens before API calls using the stored
/// refresh token and OAuth manager. If a token store is attached, refreshed tokens are written
/// back to it.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    /// The current OAuth2 token.
    token: Arc<Mutex<TimeBoundAccessToken>>,
    /// OAuth manager for refreshing tokens
    oauth_manager: Arc<OAuthManager>,
    token_store: Option<TokenStore>,
    /// HTTP client for API requests
    client: reqwest::Client,
    api_base: String,
}

impl YouTubeClient {
    /// Creates a new YouTube API client.
    ///
    /// No request is made here; an invalid token only surfaces once an API call is attempted.
    ///
    /// # Arguments
    ///
    /// * `token` - The OAuth2 token to authenticate with
    /// * `oauth_manager` - OAuth manager for token refresh operations
    /// * `client` - HTTP client for making API requests
    /// * `api_base` - Scheme and host of the API, e.g. `https://www.googleapis.com`
    pub fn new(
        token: TimeBoundAccessToken,
        oauth_manager: Arc<OAuthManager>,
        client: reqwest::Client,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            token: Arc::new(Mutex::new(token)),
            oauth_manager,
            token_store: None,
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Persist refreshed tokens to `store`.
    pub fn with_token_store(mut self, store: TokenStore) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Returns a clone of the current token.
    pub async fn token(&self) -> TimeBoundAccessToken {
        self.token.lock().await.clone()
    }

    /// Gets a guaranteed-fresh access token, refreshing if necessary.
    #[instrument(skip(self))]
    pub(crate) async fn fresh_access_token(&self) -> eyre::Result<String> {
        let mut token = self.token.lock().await;

        if token.is_expired() {
            tracing::debug!("access token expired, attempting refresh");

            if token.refresh(&self.oauth_manager).await? {
                tracing::debug!("access token successfully refreshed");
                if let Some(store) = &self.token_store {
                    if let Err(e) = store.save(&token).await {
                        tracing::warn!("could not persist refreshed token: {e:#}");
                    }
                }
            } else {
                tracing::error!("access token refresh failed, client is unusable");
                return Err(eyre::eyre!(
                    "Unable to refresh expired access token; delete the token file to authorize again"
                ));
            }
        }

        Ok(token.token.access_token().secret().to_string())
    }

    /// Makes an authenticated HTTP request to the YouTube API with common error handling.
    ///
    /// This method consolidates the shared logic across all YouTube API requests:
    /// - Token freshness validation and refresh
    /// - Authorization header setup
    /// - Query parameters and extra headers
    /// - JSON or streamed media body
    /// - Status code validation and error handling
    ///
    /// # Returns
    ///
    /// The raw [`reqwest::Response`] for method-specific parsing.
    #[instrument(skip(self, headers, body), level = tracing::Level::TRACE)]
    async fn make_authenticated_request(
        &self,
        method: Method,
        url: &str,
        query_params: Option<&[(&str, &str)]>,
        headers: &[(&str, String)],
        body: Option<RequestBody>,
    ) -> eyre::Result<reqwest::Response> {
        let access_token = self.fresh_access_token().await?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(access_token);

        if let Some(params) = query_params {
            request = request.query(params);
        }

        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        match body {
            Some(RequestBody::Json(body)) => {
                request = request.json(&body);
            }
            Some(RequestBody::Media(media)) => {
                request = request
                    .header(CONTENT_TYPE, media.content_type)
                    .header(CONTENT_LENGTH, media.len)
                    .body(media.into_body());
            }
            None => {}
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("send {} request to YouTube API: {}", method, url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "YouTube API {} request failed with status {}: {}",
                method,
                status_code,
                error_text
            ));
        }

        Ok(response)
    }

    /// Uploads a video file and creates the video resource described by `video`.
    ///
    /// Uses the resumable upload protocol: the metadata is posted first, YouTube answers with
    /// a session URI, and the file is then streamed to that URI in a single request.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.upload`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/insert>
    /// <https://developers.google.com/youtube/v3/guides/using_resumable_upload_protocol>
    #[instrument(skip(self, video), fields(title = %video.snippet.title), ret)]
    pub async fn insert_video(
        &self,
        video: &VideoInsertRequest,
        media_path: &Path,
    ) -> eyre::Result<Video> {
        let url = format!("{}/upload/youtube/v3/videos", self.api_base);
        let media = MediaFile::open(media_path, "video/*").await?;
        let metadata = serde_json::to_value(video).context("serialize video metadata")?;

        let query_params = [("uploadType", "resumable"), ("part", "snippet,status")];
        let headers = [
            ("X-Upload-Content-Type", media.content_type.to_string()),
            ("X-Upload-Content-Length", media.len.to_string()),
        ];

        let response = self
            .make_authenticated_request(
                Method::POST,
                &url,
                Some(&query_params),
                &headers,
                Some(RequestBody::Json(metadata)),
            )
            .await
            .context("start resumable upload session")?;

        let session_uri = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| eyre::eyre!("no Location header in resumable upload response"))?
            .to_string();
        tracing::debug!(bytes = media.len, "streaming video to upload session");

        let response = self
            .make_authenticated_request(
                Method::PUT,
                &session_uri,
                None,
                &[],
                Some(RequestBody::Media(media)),
            )
            .await
            .context("upload video contents")?;

        let video: Video = response
            .json()
            .await
            .context("parse YouTube videos.insert response as JSON")?;

        tracing::debug!(video_id = %video.id, "successfully inserted video");

        Ok(video)
    }

    /// Uploads a custom thumbnail image and sets it for the given video.
    ///
    /// # Required Scopes
    ///
    /// * `https://www.googleapis.com/auth/youtube.upload`
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/thumbnails/set>
    #[instrument(skip(self), ret)]
    pub async fn set_thumbnail(
        &self,
        video_id: &VideoId,
        image_path: &Path,
    ) -> eyre::Result<ThumbnailSetResponse> {
        let url = format!("{}/upload/youtube/v3/thumbnails/set", self.api_base);
        let media = MediaFile::open(image_path, "application/octet-stream").await?;
        let query_params = [("videoId", video_id.as_str()), ("uploadType", "media")];

        let response = self
            .make_authenticated_request(
                Method::POST,
                &url,
                Some(&query_params),
                &[],
                Some(RequestBody::Media(media)),
            )
            .await?;

        let thumbnails: ThumbnailSetResponse = response
            .json()
            .await
            .context("parse YouTube thumbnails.set response as JSON")?;

        tracing::debug!(%video_id, "successfully set thumbnail");

        Ok(thumbnails)
    }
}

impl VideoPlatform for YouTubeClient {
    async fn insert_video(
        &self,
        video: &VideoInsertRequest,
        media_path: &Path,
    ) -> eyre::Result<Video> {
        YouTubeClient::insert_video(self, video, media_path).await
    }

    async fn set_thumbnail(
        &self,
        video_id: &VideoId,
        image_path: &Path,
    ) -> eyre::Result<ThumbnailSetResponse> {
        YouTubeClient::set_thumbnail(self, video_id, image_path).await
    }
}
