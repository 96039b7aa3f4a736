//! App credentials issued by the Google Cloud console.

use eyre::Context;
use oauth2::url::Url;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client identity of this app.
///
/// Loaded once per run and never modified.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

// Google nests the credentials under a key that names the client type.
#[derive(Deserialize)]
struct ClientSecretFile {
    web: Option<AppCredentials>,
    installed: Option<AppCredentials>,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

impl AppCredentials {
    /// Reads and parses a client-secret file.
    pub async fn load(path: &Path) -> eyre::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read client secret file {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("parse {}", path.display()))
    }

    /// Parses the contents of a client-secret file.
    ///
    /// Both `web` and `installed` client types are accepted; `web` wins if both are present.
    pub fn from_json(contents: &str) -> eyre::Result<Self> {
        let file: ClientSecretFile =
            serde_json::from_str(contents).context("parse client secret JSON")?;
        let credentials = file.web.or(file.installed).ok_or_else(|| {
            eyre::eyre!("client secret file has neither a `web` nor an `installed` section")
        })?;
        Url::parse(&credentials.auth_uri)
            .with_context(|| format!("parse auth_uri {:?}", credentials.auth_uri))?;
        Url::parse(&credentials.token_uri)
            .with_context(|| format!("parse token_uri {:?}", credentials.token_uri))?;
        Ok(credentials)
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
