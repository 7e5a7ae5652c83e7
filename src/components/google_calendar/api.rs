//! HTTP transport for the Google endpoints the calendar client needs.

use super::models::{EventRequest, EventResponse, TokenInfo};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Base URL for Google Calendar API v3
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Token-info endpoint used to check an access token before writing
pub const TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Failure talking to a Google endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Google API operations used when creating a meeting
#[async_trait]
pub trait GoogleApi: Send + Sync + 'static {
    /// Look up an access token; fails if Google does not accept it
    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, ApiError>;

    /// Insert an event and ask Google to materialize its conference data
    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<EventResponse, ApiError>;
}

/// `GoogleApi` backed by the public REST endpoints
#[derive(Debug, Clone)]
pub struct GoogleRestApi {
    client: Client,
}

impl GoogleRestApi {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Events collection URL for a calendar
    fn events_url(calendar_id: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(CALENDAR_API_BASE)
            .map_err(|e| ApiError::Transport(format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::Transport("Calendar API URL cannot be a base".to_string()))?
            .extend(&["calendars", calendar_id, "events"]);
        url.query_pairs_mut().append_pair("conferenceDataVersion", "1");

        Ok(url)
    }
}

/// Turn a non-success response into an `ApiError::Status`
pub(super) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    Err(ApiError::Status { status, body })
}

#[async_trait]
impl GoogleApi for GoogleRestApi {
    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, ApiError> {
        let response = self
            .client
            .get(TOKEN_INFO_URL)
            .query(&[("access_token", access_token)])
            .send()
            .await?;

        let info: TokenInfo = error_for_status(response).await?.json().await?;
        debug!(scope = ?info.scope, expires_in = ?info.expires_in, "Token info received");
        Ok(info)
    }

    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<EventResponse, ApiError> {
        let url = Self::events_url(calendar_id)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }
}
