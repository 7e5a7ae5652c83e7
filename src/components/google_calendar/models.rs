use serde::{Deserialize, Serialize};

/// Conferencing backend that produces Google Meet links
pub const HANGOUTS_MEET: &str = "hangoutsMeet";

/// Entry point type carrying the join URL
pub const VIDEO_ENTRY_POINT: &str = "video";

/// Event body sent to `events.insert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub conference_data: ConferenceDataRequest,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

/// A timestamp with the time zone the calendar should display it in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceDataRequest {
    pub create_request: CreateConferenceRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
}

/// The subset of the created event we read back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
    #[serde(default)]
    pub conference_data: Option<ConferenceData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default)]
    pub conference_id: Option<String>,
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

/// One way of joining a conference (video, phone, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    #[serde(default)]
    pub entry_point_type: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl EventResponse {
    /// URI of the video entry point, if one came back
    pub fn video_uri(&self) -> Option<&str> {
        self.conference_data
            .as_ref()?
            .entry_points
            .iter()
            .find(|entry| entry.entry_point_type.as_deref() == Some(VIDEO_ENTRY_POINT))
            .and_then(|entry| entry.uri.as_deref())
            .filter(|uri| !uri.is_empty())
    }

    pub fn conference_id(&self) -> Option<&str> {
        self.conference_data
            .as_ref()?
            .conference_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// Token-info response for an access token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Google returns this as a string
    #[serde(default)]
    pub expires_in: Option<String>,
}
