//! Client side of meeting creation: submits requests to the server and
//! records the outcome in a `MeetingStore`.

use super::models::{
    CreateMeetingBody, CreateMeetingResponse, ErrorBody, Meeting, MeetingResult, MeetingType,
};
use super::store::MeetingStore;
use crate::components::google_calendar::time::local_to_utc;
use crate::session::SESSION_COOKIE;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use reqwest::{header, Client};
use tracing::{error, info};
use url::Url;
use uuid::Uuid;

/// Shown when a scheduled meeting form is incomplete or in the past
pub const INVALID_FORM_MESSAGE: &str =
    "Please fill all fields and ensure the meeting is scheduled for a future time";

/// Fallback when the server gives no usable error message
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to create meeting";

/// Input of the "schedule meeting" form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleForm {
    pub title: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    /// Minutes
    pub duration: u32,
}

impl ScheduleForm {
    /// Start time of a valid form.
    ///
    /// Returns `None` for a blank title, a missing or unparsable date/time, or
    /// a start that is not strictly after `now`. A time skipped by a DST change
    /// moves forward by an hour.
    pub fn start_time(&self, timezone: Tz, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.title.trim().is_empty() {
            return None;
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M").ok()?;
        let start = local_to_utc(date.and_time(time), timezone)?;

        (start > now).then_some(start)
    }
}

/// HTTP client for `POST /api/meetings`
#[derive(Debug, Clone)]
pub struct MeetingsClient {
    http: Client,
    endpoint: Url,
    session_token: String,
    timezone: Tz,
}

impl MeetingsClient {
    /// Create a client for the server at `base_url`, authenticated by a session token
    pub fn new(
        base_url: &str,
        session_token: impl Into<String>,
        timezone: Tz,
    ) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(base_url)?.join("/api/meetings")?;

        Ok(Self {
            http: Client::new(),
            endpoint,
            session_token: session_token.into(),
            timezone,
        })
    }

    /// Create a meeting that starts now
    pub async fn create_instant(&self, store: &mut MeetingStore) -> Option<Meeting> {
        let title = MeetingType::Instant.default_title().to_string();
        let body = CreateMeetingBody {
            title: Some(title.clone()),
            meeting_type: Some(MeetingType::Instant),
            ..Default::default()
        };

        self.submit(store, &body, |result| Meeting {
            id: Uuid::now_v7().to_string(),
            title,
            meet_link: result.meet_link,
            meet_id: result.meet_id,
            created_at: Utc::now(),
            scheduled_for: None,
            duration: None,
            meeting_type: MeetingType::Instant,
        })
        .await
    }

    /// Validate the form and create a meeting at its start time
    pub async fn create_scheduled(
        &self,
        store: &mut MeetingStore,
        form: &ScheduleForm,
    ) -> Option<Meeting> {
        let Some(start) = form.start_time(self.timezone, Utc::now()) else {
            info!("Schedule form validation failed");
            store.set_error(Some(INVALID_FORM_MESSAGE.to_string()));
            return None;
        };

        let body = CreateMeetingBody {
            title: Some(form.title.clone()),
            start_time: Some(start.to_rfc3339()),
            duration: Some(form.duration),
            meeting_type: Some(MeetingType::Scheduled),
        };

        self.submit(store, &body, |result| Meeting {
            id: Uuid::now_v7().to_string(),
            title: form.title.clone(),
            meet_link: result.meet_link,
            meet_id: result.meet_id,
            created_at: Utc::now(),
            scheduled_for: Some(start),
            duration: Some(form.duration),
            meeting_type: MeetingType::Scheduled,
        })
        .await
    }

    /// Post a body and record the outcome in the store
    async fn submit<F>(
        &self,
        store: &mut MeetingStore,
        body: &CreateMeetingBody,
        to_meeting: F,
    ) -> Option<Meeting>
    where
        F: FnOnce(MeetingResult) -> Meeting,
    {
        store.set_loading(true);
        store.set_error(None);

        let outcome = self.post(body).await;
        store.set_loading(false);

        match outcome {
            Ok(result) => {
                let meeting = to_meeting(result);
                if store.add_meeting(meeting.clone()) {
                    Some(meeting)
                } else {
                    store.set_error(Some(DEFAULT_ERROR_MESSAGE.to_string()));
                    None
                }
            }
            Err(message) => {
                error!("Error creating meeting: {}", message);
                store.set_error(Some(message));
                None
            }
        }
    }

    async fn post(&self, body: &CreateMeetingBody) -> Result<MeetingResult, String> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(
                header::COOKIE,
                format!("{}={}", SESSION_COOKIE, self.session_token),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        info!("API Response: {}", status);

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.error)
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
            return Err(message);
        }

        response
            .json::<CreateMeetingResponse>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|_| DEFAULT_ERROR_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form(title: &str, date: &str, time: &str) -> ScheduleForm {
        ScheduleForm {
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            duration: 30,
        }
    }

    #[test]
    fn test_valid_form() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();

        let start = form("Standup", "2025-01-01", "09:00").start_time(chrono_tz::UTC, now);
        assert_eq!(start, Some(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()));

        // Interpreted in the given time zone
        let start = form("Standup", "2025-01-01", "12:00")
            .start_time(chrono_tz::Europe::Helsinki, now);
        assert_eq!(start, Some(Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()));
    }

    #[test]
    fn test_time_in_dst_gap() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        // Clocks jump from 03:00 to 04:00 in Helsinki on this date
        let start = form("Standup", "2025-03-30", "03:30")
            .start_time(chrono_tz::Europe::Helsinki, now);
        assert_eq!(start, Some(Utc.with_ymd_and_hms(2025, 3, 30, 1, 30, 0).unwrap()));
    }

    #[test]
    fn test_invalid_forms() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let tz = chrono_tz::UTC;

        assert_eq!(form("   ", "2025-01-02", "09:00").start_time(tz, now), None);
        assert_eq!(form("Standup", "", "09:00").start_time(tz, now), None);
        assert_eq!(form("Standup", "2025-01-02", "").start_time(tz, now), None);
        assert_eq!(form("Standup", "01/02/2025", "09:00").start_time(tz, now), None);
        // Not strictly in the future
        assert_eq!(form("Standup", "2025-01-01", "09:00").start_time(tz, now), None);
        assert_eq!(form("Standup", "2024-12-31", "09:00").start_time(tz, now), None);
    }

    #[test]
    fn test_endpoint() {
        let client = MeetingsClient::new("http://127.0.0.1:3000/", "tok", chrono_tz::UTC).unwrap();
        assert_eq!(client.endpoint.as_str(), "http://127.0.0.1:3000/api/meetings");
    }

    #[tokio::test]
    async fn test_invalid_form_sets_error_without_request() {
        // Unroutable address: any request would fail with a transport error instead
        let client = MeetingsClient::new("http://127.0.0.1:9/", "tok", chrono_tz::UTC).unwrap();
        let mut store = MeetingStore::new();

        let meeting = client
            .create_scheduled(&mut store, &form("", "2020-01-01", "09:00"))
            .await;

        assert!(meeting.is_none());
        assert_eq!(store.error(), Some(INVALID_FORM_MESSAGE));
        assert!(!store.is_loading());
        assert!(store.meetings().is_empty());
    }
}
