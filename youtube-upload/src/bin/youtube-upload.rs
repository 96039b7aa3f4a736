use clap::Parser;
use jiff::Timestamp;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_upload::{
    Category, ConsoleCodeProvider, PrivacyStatus, ThumbnailOutcome, UploadRequest, Uploader,
    UploaderConfig,
};

/// Upload a video and its custom thumbnail to YouTube.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Video file to upload
    video: PathBuf,

    /// Image to set as the video's thumbnail
    thumbnail: PathBuf,

    #[arg(long)]
    title: String,

    #[arg(long, default_value = "")]
    description: String,

    /// May be given more than once
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Category label, e.g. "Gaming", or its numeric id
    #[arg(long, default_value_t = Category::default())]
    category: Category,

    #[arg(long, default_value_t = PrivacyStatus::default())]
    privacy: PrivacyStatus,

    /// When a private video should go public, e.g. 2026-12-01T09:00:00Z
    #[arg(long)]
    publish_at: Option<Timestamp>,

    /// Google client-secret JSON file
    #[arg(long, default_value = "client_secret.json")]
    client_secret: PathBuf,

    /// Where the OAuth token is kept between runs
    #[arg(long, default_value = "client_oauth_token.json")]
    token_file: PathBuf,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let args = Args::parse();

    let config = UploaderConfig {
        client_secret_path: args.client_secret,
        token_path: args.token_file,
        ..UploaderConfig::default()
    };
    let mut request = UploadRequest::new(
        args.video,
        args.thumbnail,
        args.title,
        args.description,
        args.tags,
    );
    request.category = args.category;
    request.privacy_status = args.privacy;
    request.publish_at = args.publish_at;

    let outcome = Uploader::new(config, ConsoleCodeProvider)
        .upload(&request)
        .await?;

    println!("https://youtu.be/{}", outcome.video.id);
    match outcome.thumbnail {
        ThumbnailOutcome::Set(_) => Ok(()),
        ThumbnailOutcome::Failed(e) => {
            Err(e.wrap_err(format!("video {} was uploaded without its thumbnail", outcome.video.id)))
        }
    }
}
