//! The upload workflow: local checks, authorization, video insert, thumbnail set.

use crate::UploadError;
use crate::authorize::{AuthCodeProvider, Authorizer};
use crate::config::UploaderConfig;
use crate::credentials::AppCredentials;
use crate::youtube_api::videos::DEFAULT_LANGUAGE;
use crate::youtube_api::{
    Category, PrivacyStatus, ThumbnailSetResponse, Video, VideoInsertRequest, VideoPlatform,
    VideoSnippet, VideoStatus,
};
use jiff::Timestamp;
use std::path::PathBuf;

/// Everything needed to publish one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub video_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: Category,
    pub privacy_status: PrivacyStatus,
    /// Scheduled publication time. Requires [`PrivacyStatus::Private`].
    pub publish_at: Option<Timestamp>,
}

impl UploadRequest {
    /// A private upload in [`Category::ScienceTechnology`] with no scheduled publication.
    pub fn new(
        video_path: impl Into<PathBuf>,
        thumbnail_path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            video_path: video_path.into(),
            thumbnail_path: thumbnail_path.into(),
            title: title.into(),
            description: description.into(),
            tags,
            category: Category::default(),
            privacy_status: PrivacyStatus::default(),
            publish_at: None,
        }
    }

    /// Checks everything that can be checked without the network.
    pub fn validate(&self) -> Result<(), UploadError> {
        for path in [&self.video_path, &self.thumbnail_path] {
            if !path.is_file() {
                return Err(UploadError::FileNotFound { path: path.clone() });
            }
        }
        if self.publish_at.is_some() && self.privacy_status != PrivacyStatus::Private {
            return Err(UploadError::InvalidRequest(format!(
                "a publish time can only be set for private videos, not {}",
                self.privacy_status
            )));
        }
        Ok(())
    }

    /// The `videos.insert` body for this request.
    pub fn to_insert_request(&self) -> VideoInsertRequest {
        VideoInsertRequest {
            snippet: VideoSnippet {
                title: self.title.clone(),
                description: self.description.clone(),
                tags: self.tags.clone(),
                category_id: self.category.id().to_string(),
                default_language: Some(DEFAULT_LANGUAGE.to_string()),
                default_audio_language: Some(DEFAULT_LANGUAGE.to_string()),
            },
            status: VideoStatus {
                privacy_status: self.privacy_status,
                publish_at: self.publish_at,
                upload_status: None,
            },
        }
    }
}

/// How the thumbnail step of a run ended.
#[derive(Debug)]
pub enum ThumbnailOutcome {
    Set(ThumbnailSetResponse),
    /// The video exists, but still has the thumbnail YouTube picked for it.
    Failed(eyre::Report),
}

/// Result of a run that got as far as creating the video.
#[derive(Debug)]
pub struct UploadOutcome {
    pub video: Video,
    pub thumbnail: ThumbnailOutcome,
}

impl UploadOutcome {
    /// Whether both the video and its thumbnail were uploaded.
    pub fn is_complete(&self) -> bool {
        matches!(self.thumbnail, ThumbnailOutcome::Set(_))
    }
}

/// Validates `request`, then inserts the video and sets its thumbnail through `platform`.
///
/// The thumbnail is only attempted once the insert has returned a video id. A failed thumbnail
/// does not undo the insert; it is reported through [`ThumbnailOutcome::Failed`].
pub async fn publish<P: VideoPlatform>(
    platform: &P,
    request: &UploadRequest,
) -> Result<UploadOutcome, UploadError> {
    request.validate()?;
    insert_then_set_thumbnail(platform, request).await
}

async fn insert_then_set_thumbnail<P: VideoPlatform>(
    platform: &P,
    request: &UploadRequest,
) -> Result<UploadOutcome, UploadError> {
    let video = match platform
        .insert_video(&request.to_insert_request(), &request.video_path)
        .await
    {
        Ok(video) => video,
        Err(e) => {
            tracing::error!("The API returned an error while inserting the video: {e:#}");
            return Err(UploadError::PlatformApi(e));
        }
    };
    tracing::info!(video_id = %video.id, ?video, "Video uploaded. Uploading the thumbnail now.");

    let thumbnail = match platform
        .set_thumbnail(&video.id, &request.thumbnail_path)
        .await
    {
        Ok(response) => {
            tracing::info!(video_id = %video.id, ?response, "thumbnail set");
            ThumbnailOutcome::Set(response)
        }
        Err(e) => {
            tracing::error!(video_id = %video.id, "The API returned an error while setting the thumbnail: {e:#}");
            ThumbnailOutcome::Failed(e)
        }
    };

    Ok(UploadOutcome { video, thumbnail })
}

/// Runs complete uploads: credentials, authorization and the platform calls.
#[derive(Debug)]
pub struct Uploader<P> {
    config: UploaderConfig,
    code_provider: P,
}

impl<P: AuthCodeProvider> Uploader<P> {
    pub fn new(config: UploaderConfig, code_provider: P) -> Self {
        Self {
            config,
            code_provider,
        }
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Uploads the video and thumbnail described by `request`.
    ///
    /// Local files are checked before anything else happens, so a typo in a path never leads
    /// to an authorization prompt or a network request.
    #[tracing::instrument(skip(self, request), fields(video = %request.video_path.display()))]
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadOutcome, UploadError> {
        request.validate()?;

        let credentials = AppCredentials::load(&self.config.client_secret_path)
            .await
            .map_err(|e| {
                tracing::error!("Error loading client secret file: {e:#}");
                UploadError::CredentialsLoad(e)
            })?;

        let client = Authorizer::new(&credentials, &self.config, &self.code_provider)?
            .authorize()
            .await?;

        insert_then_set_thumbnail(&client, request).await
    }
}
