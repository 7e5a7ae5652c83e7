use super::api::{ApiError, GoogleApi};
use super::models::{
    ConferenceDataRequest, ConferenceSolutionKey, CreateConferenceRequest, EventRequest,
    HANGOUTS_MEET,
};
use super::time::{conference_request_id, event_time, meeting_window};
use crate::components::meetings::models::{MeetingRequest, MeetingResult};
use crate::config::{Config, GoogleCredentials};
use crate::error::CalendarError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Creates calendar events with an attached Google Meet conference
#[derive(Clone)]
pub struct CalendarClient {
    api: Arc<dyn GoogleApi>,
    credentials: Option<GoogleCredentials>,
    calendar_id: String,
    timezone: Tz,
}

impl CalendarClient {
    pub fn new(api: Arc<dyn GoogleApi>, config: &Config) -> Self {
        Self {
            api,
            credentials: config.google_credentials.clone(),
            calendar_id: config.google_calendar_id.clone(),
            timezone: config.timezone,
        }
    }

    /// Create a meeting starting now or at the requested time
    pub async fn create_meet_link(
        &self,
        request: &MeetingRequest,
    ) -> Result<MeetingResult, CalendarError> {
        self.create_meet_link_at(request, Utc::now()).await
    }

    /// Same as `create_meet_link` with an explicit notion of "now"
    pub async fn create_meet_link_at(
        &self,
        request: &MeetingRequest,
        now: DateTime<Utc>,
    ) -> Result<MeetingResult, CalendarError> {
        if self.credentials.is_none() {
            error!("Missing Google OAuth credentials");
            return Err(CalendarError::MissingCredentials);
        }

        let access_token = request.access_credential.as_str();
        if access_token.is_empty() {
            return Err(CalendarError::InvalidAccessToken);
        }

        // Check the token before attempting the write
        if let Err(e) = self.api.token_info(access_token).await {
            error!("Token validation failed: {}", e);
            return Err(classify_token_error(&e));
        }

        let event = self.build_event(request, now);
        debug!(
            start = %event.start.date_time,
            end = %event.end.date_time,
            request_id = %event.conference_data.create_request.request_id,
            "Inserting calendar event"
        );

        let response = self
            .api
            .insert_event(access_token, &self.calendar_id, &event)
            .await
            .map_err(|e| {
                error!("Calendar error: {}", e);
                classify_insert_error(&e)
            })?;

        let (meet_link, meet_id) = match (response.video_uri(), response.conference_id()) {
            (Some(link), Some(id)) => (link.to_string(), id.to_string()),
            (link, id) => {
                // Google may fulfil the conference request asynchronously
                warn!(
                    has_meet_link = link.is_some(),
                    has_meet_id = id.is_some(),
                    event_id = ?response.id,
                    "Missing meet link or ID in response"
                );
                return Err(CalendarError::MeetLinkMissing);
            }
        };

        info!(event_id = ?response.id, "Google Meet link created");

        Ok(MeetingResult {
            meet_link,
            meet_id,
            event_id: response.id,
        })
    }

    /// Build the event payload for a request
    pub fn build_event(&self, request: &MeetingRequest, now: DateTime<Utc>) -> EventRequest {
        let (start, end) = meeting_window(request.start_time, request.duration_minutes, now);

        EventRequest {
            summary: request.title.clone(),
            start: event_time(start, self.timezone),
            end: event_time(end, self.timezone),
            conference_data: ConferenceDataRequest {
                create_request: CreateConferenceRequest {
                    request_id: conference_request_id(now),
                    conference_solution_key: ConferenceSolutionKey {
                        kind: HANGOUTS_MEET.to_string(),
                    },
                },
            },
            attendees: Vec::new(),
        }
    }
}

/// Map a token-info failure to a calendar error
pub fn classify_token_error(err: &ApiError) -> CalendarError {
    let message = err.to_string().to_lowercase();

    if message.contains("invalid_grant") {
        CalendarError::AuthenticationFailed
    } else if message.contains("invalid_token") {
        CalendarError::InvalidAccessToken
    } else {
        CalendarError::TokenValidationFailed {
            detail: err.to_string(),
        }
    }
}

/// Map an event-insert failure to a calendar error
pub fn classify_insert_error(err: &ApiError) -> CalendarError {
    let message = err.to_string().to_lowercase();

    if message.contains("insufficient permission") || message.contains("insufficientpermissions")
    {
        CalendarError::PermissionRequired
    } else if message.contains("invalid_grant") {
        CalendarError::AuthenticationFailed
    } else {
        CalendarError::EventCreationFailed {
            detail: err.to_string(),
        }
    }
}
