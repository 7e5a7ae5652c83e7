use super::models::EventDateTime;
use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Compute the start and end of a meeting.
///
/// `start` defaults to `now`; the end is always exactly `duration_minutes` later.
pub fn meeting_window(
    start: Option<DateTime<Utc>>,
    duration_minutes: u32,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start.unwrap_or(now);
    let end = start + Duration::minutes(i64::from(duration_minutes));
    (start, end)
}

/// Format a timestamp for the Calendar API
pub fn event_time(at: DateTime<Utc>, timezone: Tz) -> EventDateTime {
    EventDateTime {
        date_time: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        time_zone: timezone.name().to_string(),
    }
}

/// Resolve a wall-clock time in `timezone` to UTC.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times that
/// fall in a gap (clocks going forward) are moved forward by an hour.
pub fn local_to_utc(local: NaiveDateTime, timezone: Tz) -> Option<DateTime<Utc>> {
    timezone
        .from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            timezone
                .from_local_datetime(&(local + Duration::hours(1)))
                .earliest()
        })
        .map(|at| at.with_timezone(&Utc))
}

/// Conference request id derived from the current time
pub fn conference_request_id(now: DateTime<Utc>) -> String {
    format!("meet-{}", now.timestamp_millis())
}
