pub mod auth;
pub mod handlers;

use crate::components::google_calendar::{CalendarClient, GoogleApi, GoogleOAuth};
use crate::components::meetings::MeetingRequestHandler;
use crate::config::Config;
use crate::error::AppResult;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use self::auth::{
    auth_error_handler, callback_handler, session_handler, signin_handler, signout_handler,
    SessionService,
};
use self::handlers::{create_meeting_handler, health_handler, index_handler};

/// Shared state of the web server
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Meeting request handler
    pub meetings: Arc<MeetingRequestHandler>,
    /// Session token operations
    pub sessions: Arc<SessionService>,
    /// Sign-in client; absent when Google credentials are not configured
    pub oauth: Option<Arc<GoogleOAuth>>,
}

impl AppState {
    /// Wire up the state from configuration and a Google API implementation
    pub fn new(config: Arc<Config>, api: Arc<dyn GoogleApi>) -> AppResult<Self> {
        let calendar = CalendarClient::new(api, &config);
        let meetings = Arc::new(MeetingRequestHandler::new(Arc::clone(&config), calendar));
        let sessions = Arc::new(SessionService::new(config.session_secret.clone()));

        let oauth = match &config.google_credentials {
            Some(credentials) => Some(Arc::new(
                GoogleOAuth::new(
                    credentials.clone(),
                    config.oauth_redirect_uri(),
                    config.http_timeout(),
                )?,
            )),
            None => None,
        };

        Ok(Self {
            config,
            meetings,
            sessions,
            oauth,
        })
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/meetings", post(create_meeting_handler))
        .route("/api/auth/signin", get(signin_handler))
        .route("/api/auth/callback/google", get(callback_handler))
        .route("/api/auth/signout", get(signout_handler).post(signout_handler))
        .route("/api/auth/session", get(session_handler))
        .route("/api/auth/error", get(auth_error_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
