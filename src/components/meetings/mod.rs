pub mod client;
mod handler;
pub mod models;
mod store;

pub use client::{MeetingsClient, ScheduleForm};
pub use handler::MeetingRequestHandler;
pub use models::{Meeting, MeetingRequest, MeetingResult, MeetingType};
pub use store::MeetingStore;
