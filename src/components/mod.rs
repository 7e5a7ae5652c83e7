pub mod google_calendar;
pub mod meetings;
