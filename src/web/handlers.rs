use super::auth::MaybeSession;
use super::AppState;
use crate::components::meetings::models::{CreateMeetingResponse, ErrorBody};
use crate::error::MeetingError;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use tracing::error;

impl IntoResponse for MeetingError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

/// `POST /api/meetings`
pub async fn create_meeting_handler(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    body: Bytes,
) -> Response {
    match state.meetings.handle(session.as_ref(), &body).await {
        Ok(result) => (StatusCode::OK, Json(CreateMeetingResponse::new(result))).into_response(),
        Err(err) => {
            error!(kind = %err.kind, status = err.status_code(), "Meeting creation error: {}", err.message);
            err.into_response()
        }
    }
}

/// Handler for the index page
pub async fn index_handler(MaybeSession(session): MaybeSession) -> impl IntoResponse {
    let status = match session {
        Some(_) => r#"<p>Signed in.</p>
<form method="post" action="/api/auth/signout"><button type="submit">Sign out</button></form>"#,
        None => r#"<p><a href="/api/auth/signin">Sign in with Google</a></p>"#,
    };

    Html(format!(
        "<!doctype html><html><head><title>meetlink</title></head><body><h1>meetlink</h1>{}</body></html>",
        status
    ))
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
