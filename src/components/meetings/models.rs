use crate::components::google_calendar::time::local_to_utc;
use crate::error::MeetingError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration used when a request does not name one
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Whether a meeting starts now or at a chosen time.
///
/// Server-side this only picks the default title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Instant,
    Scheduled,
}

impl MeetingType {
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Instant => "Instant Meeting",
            Self::Scheduled => "Scheduled Meeting",
        }
    }
}

/// JSON body accepted by `POST /api/meetings`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub meeting_type: Option<MeetingType>,
}

/// A meeting to create, with defaults applied
#[derive(Clone, PartialEq)]
pub struct MeetingRequest {
    pub title: String,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_minutes: u32,
    pub meeting_type: Option<MeetingType>,
    /// Bearer token of the caller; lives for this request only
    pub access_credential: String,
}

impl fmt::Debug for MeetingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeetingRequest")
            .field("title", &self.title)
            .field("start_time", &self.start_time)
            .field("duration_minutes", &self.duration_minutes)
            .field("meeting_type", &self.meeting_type)
            .finish_non_exhaustive()
    }
}

impl MeetingRequest {
    /// Build a request from a parsed body, applying defaults.
    ///
    /// A missing or empty title falls back to the title for the meeting type
    /// ("Scheduled Meeting" unless the type is instant). A missing or zero
    /// duration becomes 60 minutes. A `startTime` without an offset is read
    /// in `timezone`.
    pub fn from_body(
        body: CreateMeetingBody,
        access_credential: impl Into<String>,
        timezone: Tz,
    ) -> Result<Self, MeetingError> {
        let title = match body.title {
            Some(title) if !title.is_empty() => title,
            _ => body
                .meeting_type
                .unwrap_or(MeetingType::Scheduled)
                .default_title()
                .to_string(),
        };

        let start_time = body
            .start_time
            .as_deref()
            .map(|value| parse_start_time(value, timezone))
            .transpose()?;

        let duration_minutes = match body.duration {
            Some(minutes) if minutes > 0 => minutes,
            _ => DEFAULT_DURATION_MINUTES,
        };

        Ok(Self {
            title,
            start_time,
            duration_minutes,
            meeting_type: body.meeting_type,
            access_credential: access_credential.into(),
        })
    }
}

/// Date-time layouts accepted without an offset
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Layouts with an offset but no seconds
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

/// Parse an ISO-8601 start time into UTC.
///
/// Accepts RFC 3339 and the same with seconds omitted. Date-times without an
/// offset are read in `timezone`; a bare date is midnight UTC.
fn parse_start_time(value: &str, timezone: Tz) -> Result<DateTime<Utc>, MeetingError> {
    let invalid = |details: String| {
        MeetingError::internal(format!("Invalid startTime '{}'", value), details)
    };
    let trimmed = value.trim();

    let rfc3339_error = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e.to_string(),
    };

    if let Some(local) = trimmed.strip_suffix(['Z', 'z']) {
        return LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
            .map(|dt| dt.and_utc())
            .ok_or_else(|| invalid(rfc3339_error));
    }

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
    {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    let local = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| invalid(rfc3339_error))?;

    local_to_utc(local, timezone)
        .ok_or_else(|| invalid(format!("{} does not exist in {}", local, timezone.name())))
}

/// A created meeting as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResult {
    pub meet_link: String,
    pub meet_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Success envelope: `{ success: true, data: {...} }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMeetingResponse {
    pub success: bool,
    pub data: MeetingResult,
}

impl CreateMeetingResponse {
    pub fn new(data: MeetingResult) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure body: `{ error, details? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&MeetingError> for ErrorBody {
    fn from(err: &MeetingError) -> Self {
        Self {
            error: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// A meeting shown in the client's list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Locally generated, time-ordered id
    pub id: String,
    pub title: String,
    pub meet_link: String,
    pub meet_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
}
