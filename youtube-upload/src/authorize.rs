//! Turning app credentials into an authorized [`YouTubeClient`].

use crate::UploadError;
use crate::config::UploaderConfig;
use crate::credentials::AppCredentials;
use crate::oauth::OAuthManager;
use crate::token_store::TokenStore;
use crate::youtube_api::{TimeBoundAccessToken, YouTubeClient};
use eyre::Context;
use oauth2::url::Url;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Obtains the authorization code after the user has granted access.
///
/// The provider is shown the URL the user has to visit, and must return the code that the
/// authorization server hands out at the end of that flow.
#[allow(async_fn_in_trait)]
pub trait AuthCodeProvider {
    async fn provide_auth_code(&self, auth_url: &Url) -> eyre::Result<String>;
}

impl<P: AuthCodeProvider + ?Sized> AuthCodeProvider for &P {
    async fn provide_auth_code(&self, auth_url: &Url) -> eyre::Result<String> {
        (**self).provide_auth_code(auth_url).await
    }
}

/// Asks the user on the terminal.
///
/// Prints the authorization URL (and tries to open it in a browser), then reads one line from
/// standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleCodeProvider;

impl AuthCodeProvider for ConsoleCodeProvider {
    async fn provide_auth_code(&self, auth_url: &Url) -> eyre::Result<String> {
        println!("Authorize this app by visiting this url: {auth_url}");
        if let Err(e) = webbrowser::open(auth_url.as_str()) {
            tracing::debug!("could not open a browser: {e}");
        }
        print!("Enter the code from that page here: ");
        std::io::stdout().flush().context("flush stdout")?;

        Self::read_code(tokio::io::BufReader::new(tokio::io::stdin())).await
    }
}

impl ConsoleCodeProvider {
    /// Reads one line from `input` and returns it as the authorization code.
    ///
    /// End of input means nobody is there to type the code, which is an error just like an
    /// empty line.
    pub async fn read_code<R: AsyncBufRead + Unpin>(mut input: R) -> eyre::Result<String> {
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .await
            .context("read authorization code")?;
        if read == 0 {
            eyre::bail!("no interactive terminal to read the authorization code from");
        }

        let code = line.trim();
        if code.is_empty() {
            eyre::bail!("no authorization code entered");
        }
        Ok(code.to_string())
    }
}

/// Produces an authorized client, asking the user for access only when no token is stored.
#[derive(Debug)]
pub struct Authorizer<P> {
    oauth_manager: Arc<OAuthManager>,
    store: TokenStore,
    code_provider: P,
    http_client: reqwest::Client,
    api_base: String,
}

impl<P: AuthCodeProvider> Authorizer<P> {
    pub fn new(
        credentials: &AppCredentials,
        config: &UploaderConfig,
        code_provider: P,
    ) -> Result<Self, UploadError> {
        let oauth_manager =
            OAuthManager::new(credentials, config).map_err(UploadError::Authorization)?;
        Ok(Self {
            oauth_manager: Arc::new(oauth_manager),
            store: TokenStore::new(config.token_path.clone()),
            code_provider,
            http_client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
        })
    }

    /// Returns a client for the authorized account.
    ///
    /// A stored token is used as-is, without contacting Google: if it is expired, the client
    /// refreshes it before its first request, and if it was revoked, that first request fails.
    /// Without a stored token, the user is asked to authorize exactly once, and the resulting
    /// token is persisted for later runs.
    #[tracing::instrument(skip(self), fields(token_path = %self.store.path().display()))]
    pub async fn authorize(&self) -> Result<YouTubeClient, UploadError> {
        let token = match self.store.load().await {
            Some(token) => {
                tracing::debug!("reusing stored OAuth token");
                token
            }
            None => self.authorize_interactively().await.map_err(|e| {
                tracing::error!("Error while trying to retrieve access token: {e:#}");
                UploadError::Authorization(e)
            })?,
        };

        Ok(YouTubeClient::new(
            token,
            Arc::clone(&self.oauth_manager),
            self.http_client.clone(),
            self.api_base.clone(),
        )
        .with_token_store(self.store.clone()))
    }

    async fn authorize_interactively(&self) -> eyre::Result<TimeBoundAccessToken> {
        let request = self.oauth_manager.authorization_request();
        tracing::info!(url = %request.url, "asking user to follow OAuth flow");

        let code = self
            .code_provider
            .provide_auth_code(&request.url)
            .await
            .context("obtain authorization code")?;

        let token = self
            .oauth_manager
            .exchange_code(code, request)
            .await
            .context("authorize user to YouTube")?;
        let token = TimeBoundAccessToken::new(token);

        self.store
            .save(&token)
            .await
            .context("persist OAuth token")?;

        Ok(token)
    }
}
