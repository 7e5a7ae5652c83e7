use super::models::Meeting;

/// Client-side meeting list with loading and error flags.
///
/// Lives for one signed-in session: starts empty, cleared on sign-out and
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingStore {
    meetings: Vec<Meeting>,
    is_loading: bool,
    error: Option<String>,
}

impl MeetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Prepend a meeting.
    ///
    /// Meetings without a link or id are rejected and `false` is returned.
    pub fn add_meeting(&mut self, meeting: Meeting) -> bool {
        if meeting.meet_link.is_empty() || meeting.meet_id.is_empty() {
            return false;
        }
        self.meetings.insert(0, meeting);
        true
    }

    pub fn clear_meetings(&mut self) {
        self.meetings.clear();
    }

    /// Meetings, newest first
    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn latest(&self) -> Option<&Meeting> {
        self.meetings.first()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::meetings::models::MeetingType;
    use chrono::Utc;

    fn meeting(id: &str, link: &str, meet_id: &str) -> Meeting {
        Meeting {
            id: id.to_string(),
            title: "Instant Meeting".to_string(),
            meet_link: link.to_string(),
            meet_id: meet_id.to_string(),
            created_at: Utc::now(),
            scheduled_for: None,
            duration: None,
            meeting_type: MeetingType::Instant,
        }
    }

    #[test]
    fn test_newest_first() {
        let mut store = MeetingStore::new();
        assert!(store.add_meeting(meeting("1", "https://meet.example/a", "a")));
        assert!(store.add_meeting(meeting("2", "https://meet.example/b", "b")));

        let ids: Vec<&str> = store.meetings().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(store.latest().map(|m| m.id.as_str()), Some("2"));
    }

    #[test]
    fn test_rejects_incomplete_meetings() {
        let mut store = MeetingStore::new();
        assert!(!store.add_meeting(meeting("1", "", "a")));
        assert!(!store.add_meeting(meeting("2", "https://meet.example/b", "")));
        assert!(store.meetings().is_empty());
    }

    #[test]
    fn test_flags_and_clear() {
        let mut store = MeetingStore::new();
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);

        store.set_loading(true);
        store.set_error(Some("Failed to create meeting".to_string()));
        assert!(store.is_loading());
        assert_eq!(store.error(), Some("Failed to create meeting"));

        store.add_meeting(meeting("1", "https://meet.example/a", "a"));
        store.clear_meetings();
        assert!(store.meetings().is_empty());
    }
}
