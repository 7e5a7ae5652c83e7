pub mod api;
mod client;
pub mod models;
pub mod time;
pub mod token;

pub use api::{ApiError, GoogleApi, GoogleRestApi};
pub use client::{classify_insert_error, classify_token_error, CalendarClient};
pub use token::GoogleOAuth;
