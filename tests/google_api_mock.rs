use async_trait::async_trait;
use meetlink::components::google_calendar::models::{
    ConferenceData, EntryPoint, EventRequest, EventResponse, TokenInfo,
};
use meetlink::components::google_calendar::{ApiError, GoogleApi};
use meetlink::config::{Config, GoogleCredentials};
use meetlink::session::{Session, SessionUser};
use meetlink::web::auth::SessionService;
use meetlink::web::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const SESSION_SECRET: &str = "integration-test-secret";
pub const ACCESS_TOKEN: &str = "ya29.test-access-token";

/// An event insert the mock received
#[derive(Debug, Clone)]
pub struct RecordedInsert {
    pub access_token: String,
    pub calendar_id: String,
    pub event: EventRequest,
}

/// Mock implementation of the Google API for testing
#[derive(Debug, Default)]
pub struct MockGoogleApi {
    token_error: Option<(u16, String)>,
    insert_error: Option<(u16, String)>,
    response: EventResponse,
    token_calls: AtomicUsize,
    inserts: Mutex<Vec<RecordedInsert>>,
}

impl MockGoogleApi {
    /// A mock that creates a conference with the given link, id and event id
    pub fn meet(link: &str, conference_id: &str, event_id: &str) -> Self {
        Self::with_response(EventResponse {
            id: Some(event_id.to_string()),
            html_link: None,
            conference_data: Some(ConferenceData {
                conference_id: Some(conference_id.to_string()),
                entry_points: vec![EntryPoint {
                    entry_point_type: Some("video".to_string()),
                    uri: Some(link.to_string()),
                }],
            }),
        })
    }

    pub fn with_response(response: EventResponse) -> Self {
        Self {
            response,
            ..Default::default()
        }
    }

    /// Make the token-info check fail
    pub fn failing_token_info(mut self, status: u16, body: &str) -> Self {
        self.token_error = Some((status, body.to_string()));
        self
    }

    /// Make the event insert fail
    pub fn failing_insert(mut self, status: u16, body: &str) -> Self {
        self.insert_error = Some((status, body.to_string()));
        self
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> Vec<RecordedInsert> {
        self.inserts.lock().unwrap().clone()
    }

    /// Total number of calls into the mock
    pub fn calls(&self) -> usize {
        self.token_calls() + self.inserts().len()
    }
}

#[async_trait]
impl GoogleApi for MockGoogleApi {
    async fn token_info(&self, _access_token: &str) -> Result<TokenInfo, ApiError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);

        match &self.token_error {
            Some((status, body)) => Err(ApiError::Status {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(TokenInfo {
                scope: Some("https://www.googleapis.com/auth/calendar".to_string()),
                expires_in: Some("3599".to_string()),
                ..Default::default()
            }),
        }
    }

    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<EventResponse, ApiError> {
        self.inserts.lock().unwrap().push(RecordedInsert {
            access_token: access_token.to_string(),
            calendar_id: calendar_id.to_string(),
            event: event.clone(),
        });

        match &self.insert_error {
            Some((status, body)) => Err(ApiError::Status {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(self.response.clone()),
        }
    }
}

/// Create a test configuration
pub fn test_config(with_credentials: bool) -> Config {
    Config {
        google_credentials: with_credentials.then(|| GoogleCredentials {
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
        }),
        session_secret: SESSION_SECRET.to_string(),
        public_url: "http://localhost:3000".to_string(),
        google_calendar_id: "primary".to_string(),
        timezone: chrono_tz::UTC,
        host: "127.0.0.1".to_string(),
        port: 0,
        http_timeout_secs: 5,
    }
}

/// App state backed by a mock
pub fn test_state(with_credentials: bool, api: Arc<MockGoogleApi>) -> AppState {
    AppState::new(Arc::new(test_config(with_credentials)), api).unwrap()
}

pub fn test_session(access_token: Option<&str>) -> Session {
    Session::new(
        SessionUser {
            id: "user-1".to_string(),
            name: Some("Test User".to_string()),
            email: Some("test@example.com".to_string()),
        },
        access_token.map(str::to_string),
    )
}

/// Signed session token as issued at sign-in
pub fn session_token(access_token: Option<&str>) -> String {
    SessionService::new(SESSION_SECRET)
        .issue(&test_session(access_token))
        .unwrap()
}

/// Test that the mock records what it receives
#[tokio::test]
async fn test_google_api_mock() {
    let mock = MockGoogleApi::meet("https://meet.example/abc", "abc-defg-hij", "evt1");

    assert!(mock.token_info(ACCESS_TOKEN).await.is_ok());
    assert_eq!(mock.token_calls(), 1);
    assert!(mock.inserts().is_empty());

    let failing = MockGoogleApi::default().failing_token_info(400, "invalid_grant");
    let err = failing.token_info(ACCESS_TOKEN).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 400 - invalid_grant");
}
