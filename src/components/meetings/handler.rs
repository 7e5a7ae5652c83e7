use super::models::{CreateMeetingBody, MeetingRequest, MeetingResult};
use crate::components::google_calendar::CalendarClient;
use crate::config::Config;
use crate::error::{ErrorKind, MeetingError};
use crate::session::Session;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Server-side entry point for meeting creation.
///
/// Checks, in order: Google credentials are configured, a session exists, the
/// session carries an access token, and the body is well formed. Only then is
/// the calendar client called.
#[derive(Clone)]
pub struct MeetingRequestHandler {
    config: Arc<Config>,
    calendar: CalendarClient,
}

impl MeetingRequestHandler {
    pub fn new(config: Arc<Config>, calendar: CalendarClient) -> Self {
        Self { config, calendar }
    }

    /// Create a meeting for the session from a raw JSON body
    pub async fn handle(
        &self,
        session: Option<&Session>,
        body: &[u8],
    ) -> Result<MeetingResult, MeetingError> {
        if !self.config.has_google_credentials() {
            error!("Missing Google OAuth credentials");
            return Err(MeetingError::misconfigured());
        }

        info!(
            has_session = session.is_some(),
            has_access_token = session.and_then(Session::access_token).is_some(),
            "Starting meeting creation"
        );

        let Some(session) = session else {
            info!("No session found");
            return Err(MeetingError::new(
                ErrorKind::Unauthenticated,
                "No session found - Please sign in",
            ));
        };

        let Some(access_token) = session.access_token() else {
            info!(user = %session.user.id, "No access token found in session");
            return Err(MeetingError::new(
                ErrorKind::Unauthorized,
                "No access token - Please sign in again",
            ));
        };

        let body: CreateMeetingBody = serde_json::from_slice(body).map_err(|e| {
            warn!("Malformed meeting request body: {}", e);
            MeetingError::internal("Invalid request body", e.to_string())
        })?;
        info!(
            title = ?body.title,
            start_time = ?body.start_time,
            duration = ?body.duration,
            meeting_type = ?body.meeting_type,
            "Request body parsed"
        );

        let request = MeetingRequest::from_body(body, access_token, self.config.timezone)?;

        match self.calendar.create_meet_link(&request).await {
            Ok(result) => {
                info!(
                    has_meet_link = !result.meet_link.is_empty(),
                    has_meet_id = !result.meet_id.is_empty(),
                    has_event_id = result.event_id.is_some(),
                    "Google Meet link created successfully"
                );
                Ok(result)
            }
            Err(e) => {
                error!(kind = %e.kind(), "Google API error: {}", e);
                Err(MeetingError::from(e))
            }
        }
    }
}
