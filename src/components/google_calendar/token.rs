//! OAuth 2.0 authorization-code flow against Google, used by sign-in.

use super::api::{error_for_status, ApiError};
use crate::config::GoogleCredentials;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const USER_INFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Scopes requested at sign-in; calendar access is needed to insert events
pub const SCOPES: &str = "openid email profile https://www.googleapis.com/auth/calendar";

/// Tokens returned by the code exchange
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokens {
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OpenID Connect profile of the signed-in user
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Google OAuth client for the sign-in flow
#[derive(Clone)]
pub struct GoogleOAuth {
    client: Client,
    credentials: GoogleCredentials,
    redirect_uri: String,
}

impl GoogleOAuth {
    pub fn new(
        credentials: GoogleCredentials,
        redirect_uri: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            redirect_uri: redirect_uri.into(),
        })
    }

    /// Consent screen URL carrying the CSRF `state`
    pub fn authorization_url(&self, state: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(AUTHORIZATION_URL)
            .map_err(|e| ApiError::Transport(format!("Failed to parse URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("scope", SCOPES)
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, ApiError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Fetch the profile for an access token
    pub async fn user_info(&self, access_token: &str) -> Result<UserInfo, ApiError> {
        let response = self
            .client
            .get(USER_INFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }
}
