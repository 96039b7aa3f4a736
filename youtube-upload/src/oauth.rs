//! OAuth 2.0 management for YouTube API authentication.
//!
//! This module encapsulates the OAuth operations needed to upload on a user's behalf: building
//! the authorization URL the user visits, exchanging the pasted authorization code for a token,
//! and refreshing that token once it expires.

use crate::config::UploaderConfig;
use crate::credentials::AppCredentials;
use eyre::Context;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::url::Url;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenUrl,
};
use oauth2::{TokenResponse, reqwest};

/// An authorization URL together with the PKCE verifier needed to redeem its code.
#[derive(Debug)]
pub struct AuthorizationRequest {
    /// The URL the user must visit to grant access.
    pub url: Url,
    verifier: PkceCodeVerifier,
}

/// Manages OAuth 2.0 flows for YouTube API access.
///
/// The OAuthManager holds the app's client configuration and endpoints, and provides a
/// consistent interface for both initial user authorization and token refresh.
#[derive(Debug, Clone)]
pub struct OAuthManager {
    client_id: ClientId,
    client_secret: ClientSecret,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: RedirectUrl,
    scope: Scope,
    http_client: reqwest::Client,
}

impl OAuthManager {
    /// Creates a new OAuth manager from the app's credentials.
    ///
    /// Fails if any of the endpoint URLs is malformed.
    pub fn new(credentials: &AppCredentials, config: &UploaderConfig) -> eyre::Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            // SSRF no thank you.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("build OAuth HTTP client")?;

        Ok(Self {
            client_id: ClientId::new(credentials.client_id.clone()),
            client_secret: ClientSecret::new(credentials.client_secret.clone()),
            auth_url: AuthUrl::new(credentials.auth_uri.clone())
                .context("parse authorization endpoint URL")?,
            token_url: TokenUrl::new(credentials.token_uri.clone())
                .context("parse token endpoint URL")?,
            redirect_url: RedirectUrl::new(config.redirect_uri.clone())
                .context("parse redirect URL")?,
            scope: Scope::new(config.scope.clone()),
            http_client,
        })
    }

    fn client(
        &self,
    ) -> BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet> {
        BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.redirect_url.clone())
    }

    /// Builds the URL the user must visit to authorize this app.
    ///
    /// The URL asks for offline access so that the resulting token carries a refresh token.
    pub fn authorization_request(&self) -> AuthorizationRequest {
        let (pkce_challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, _csrf_token) = self
            .client()
            // The code is pasted back by hand, so there is no redirect whose state we could check.
            .authorize_url(CsrfToken::new_random)
            .add_scope(self.scope.clone())
            .add_extra_param("access_type", "offline")
            .set_pkce_challenge(pkce_challenge)
            .url();

        AuthorizationRequest { url, verifier }
    }

    /// Exchanges an authorization code obtained through [`Self::authorization_request`] for a
    /// token.
    pub async fn exchange_code(
        &self,
        code: String,
        request: AuthorizationRequest,
    ) -> eyre::Result<BasicTokenResponse> {
        let token = self
            .client()
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(request.verifier)
            .request_async(&self.http_client)
            .await
            .context("exchange authorization code with access token")?;

        tracing::debug!("obtained OAuth token from authorization code");
        Ok(token)
    }

    /// Attempts to refresh an existing OAuth token using its refresh token.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(new_token))` - Refresh succeeded, new token is available
    /// * `Ok(None)` - No refresh token available, or the grant was rejected
    /// * `Err(_)` - Network or other error occurred during refresh attempt
    ///
    /// When refresh yields `None`, the token should be considered invalid and the user must
    /// authorize again (delete the token file).
    pub async fn refresh_token(
        &self,
        token: &BasicTokenResponse,
    ) -> eyre::Result<Option<BasicTokenResponse>> {
        let Some(refresh_token) = token.refresh_token() else {
            tracing::warn!("no refresh token available, cannot refresh");
            return Ok(None);
        };

        tracing::debug!("attempting to refresh OAuth token");

        match self
            .client()
            .exchange_refresh_token(refresh_token)
            .request_async(&self.http_client)
            .await
        {
            Ok(new_token) => {
                tracing::debug!("successfully refreshed OAuth token");
                Ok(Some(new_token))
            }
            Err(ref e @ oauth2::RequestTokenError::ServerResponse(ref sr))
                if matches!(
                    sr.error(),
                    oauth2::basic::BasicErrorResponseType::InvalidGrant
                ) =>
            {
                tracing::warn!("OAuth refresh token considered invalid grant: {}", e);
                Ok(None)
            }
            Err(e) => Err(e).context("exchange refresh token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UPLOAD_SCOPE;
    use crate::test_support::{FakeResponse, FakeServer, token_json};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn manager(token_uri: String) -> OAuthManager {
        let credentials = AppCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_uri,
        };
        OAuthManager::new(&credentials, &UploaderConfig::default()).unwrap()
    }

    #[test]
    fn authorization_url_requests_upload_scope_offline() {
        let request = manager("https://oauth2.googleapis.com/token".to_string())
            .authorization_request();
        let params: HashMap<_, _> = request.url.query_pairs().into_owned().collect();

        assert_eq!(request.url.host_str(), Some("accounts.google.com"));
        assert_eq!(params["scope"], UPLOAD_SCOPE);
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["client_id"], "client-id");
        assert_eq!(params["redirect_uri"], "http://www.example.com/oauth2callback");
        assert_eq!(params["code_challenge_method"], "S256");
    }

    #[test]
    fn malformed_token_uri() {
        let credentials = AppCredentials {
            client_id: "a".to_string(),
            client_secret: "b".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_uri: "not a url".to_string(),
        };
        assert!(OAuthManager::new(&credentials, &UploaderConfig::default()).is_err());
    }

    #[tokio::test]
    async fn exchange_code_posts_code_and_verifier() {
        let server = FakeServer::start(|_, _| FakeResponse::json(200, token_json("fresh", Some("rt")))).await;
        let oauth = manager(server.url("/token"));

        let request = oauth.authorization_request();
        let token = oauth.exchange_code("4/the-code".to_string(), request).await.unwrap();

        assert_eq!(token.access_token().secret(), "fresh");
        assert_eq!(token.refresh_token().unwrap().secret(), "rt");

        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        let form = seen[0].form();
        assert_eq!(form["grant_type"], "authorization_code");
        assert_eq!(form["code"], "4/the-code");
        assert!(form.contains_key("code_verifier"));
    }

    #[tokio::test]
    async fn refresh_posts_refresh_token() {
        let server =
            FakeServer::start(|_, _| FakeResponse::json(200, token_json("refreshed", None))).await;
        let oauth = manager(server.url("/token"));
        let token: BasicTokenResponse =
            serde_json::from_value(token_json("stale", Some("rt"))).unwrap();

        let new_token = oauth.refresh_token(&token).await.unwrap().unwrap();

        assert_eq!(new_token.access_token().secret(), "refreshed");
        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "/token");
        assert_eq!(seen[0].form()["grant_type"], "refresh_token");
        assert_eq!(seen[0].form()["refresh_token"], "rt");
        assert!(seen[0].header("authorization").unwrap().starts_with("Basic "));
    }

    #[tokio::test]
    async fn refresh_without_refresh_token() {
        let oauth = manager("http://127.0.0.1:9/token".to_string());
        let token: BasicTokenResponse = serde_json::from_value(token_json("stale", None)).unwrap();
        assert!(oauth.refresh_token(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_invalid_grant() {
        let server = FakeServer::start(|_, _| {
            FakeResponse::json(
                400,
                serde_json::json!({"error": "invalid_grant", "error_description": "Token has been expired or revoked."}),
            )
        })
        .await;
        let oauth = manager(server.url("/token"));
        let token: BasicTokenResponse =
            serde_json::from_value(token_json("stale", Some("revoked"))).unwrap();

        assert!(oauth.refresh_token(&token).await.unwrap().is_none());
        assert_eq!(server.requests()[0].form()["grant_type"], "refresh_token");
    }
}
