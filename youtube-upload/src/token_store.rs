//! Persistence of the OAuth token between runs.

use crate::youtube_api::TimeBoundAccessToken;
use eyre::Context;
use oauth2::basic::BasicTokenResponse;
use std::path::{Path, PathBuf};

/// A JSON file holding the OAuth token of the authorized account.
///
/// A missing file is the normal state before the first authorization, so [`TokenStore::load`]
/// reports it as `None` rather than as an error.
///
/// Besides the format written by [`TokenStore::save`], a plain token endpoint response (as
/// written by other OAuth tools) is accepted too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored token, if there is a usable one.
    pub async fn load(&self) -> Option<TimeBoundAccessToken> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), "no stored OAuth token: {e}");
                return None;
            }
        };
        if let Ok(token) = serde_json::from_str(&contents) {
            return Some(token);
        }
        // A bare token endpoint response carries no absolute expiry, so refresh before first use.
        match serde_json::from_str::<BasicTokenResponse>(&contents) {
            Ok(token) => {
                tracing::debug!(path = %self.path.display(), "stored OAuth token has no expiry, will refresh");
                Some(TimeBoundAccessToken::expired(token))
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unparseable OAuth token file: {e}");
                None
            }
        }
    }

    /// Writes `token`, replacing whatever was stored before.
    pub async fn save(&self, token: &TimeBoundAccessToken) -> eyre::Result<()> {
        let json = serde_json::to_string(token).context("serialize OAuth token")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("write OAuth token to {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "Token stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::token_json;
    use oauth2::TokenResponse;
    use pretty_assertions::assert_eq;

    fn token() -> TimeBoundAccessToken {
        TimeBoundAccessToken::new(serde_json::from_value(token_json("at", Some("rt"))).unwrap())
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("client_oauth_token.json"));
        let token = token();

        store.save(&token).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.raw_token().access_token().secret(), "at");
        assert_eq!(loaded.raw_token().refresh_token().unwrap().secret(), "rt");
        assert_eq!(loaded.expires_at(), token.expires_at());
    }

    #[tokio::test]
    async fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        store.save(&token()).await.unwrap();

        let newer = TimeBoundAccessToken::new(
            serde_json::from_value(token_json("newer", None)).unwrap(),
        );
        store.save(&newer).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.raw_token().access_token().secret(), "newer");
        assert!(loaded.raw_token().refresh_token().is_none());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TokenStore::new(dir.path().join("nope.json")).load().await.is_none());
    }

    #[tokio::test]
    async fn plain_token_response_is_loaded_as_expired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_oauth_token.json");
        std::fs::write(
            &path,
            r#"{"access_token":"ya29.x","refresh_token":"1//rt",
                "scope":"https://www.googleapis.com/auth/youtube.upload",
                "token_type":"Bearer","expiry_date":1700000000000}"#,
        )
        .unwrap();

        let loaded = TokenStore::new(path).load().await.unwrap();

        assert!(loaded.is_expired());
        assert_eq!(loaded.raw_token().access_token().secret(), "ya29.x");
        assert_eq!(loaded.raw_token().refresh_token().unwrap().secret(), "1//rt");
    }

    #[tokio::test]
    async fn garbage_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(TokenStore::new(path).load().await.is_none());
    }

    #[tokio::test]
    async fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("missing").join("token.json"));
        assert!(store.save(&token()).await.is_err());
    }
}
