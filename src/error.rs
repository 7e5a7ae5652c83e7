use crate::components::google_calendar::ApiError;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(meetlink::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(meetlink::config))]
    Config(String),

    #[error("Google API error: {0}")]
    #[diagnostic(code(meetlink::google_api))]
    GoogleApi(String),

    #[error("Server error: {0}")]
    #[diagnostic(code(meetlink::server))]
    Server(String),

    #[error(transparent)]
    #[diagnostic(code(meetlink::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(meetlink::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(meetlink::other))]
    Other(String),
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::GoogleApi(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create server errors
pub fn server_error(message: &str) -> Error {
    Error::Server(message.to_string())
}

/// Category of a failed meeting creation.
///
/// Every failure that reaches a caller of the meetings endpoint carries
/// exactly one of these kinds; the web layer maps each kind to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server lacks its Google OAuth client credentials.
    Misconfigured,
    /// No session accompanied the request.
    Unauthenticated,
    /// A session exists but its access token is missing or rejected.
    Unauthorized,
    /// The access token lacks calendar permission.
    Forbidden,
    /// The event was created but no conference link came back.
    UpstreamResponseIncomplete,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated | Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::Misconfigured | Self::UpstreamResponseIncomplete | Self::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Misconfigured => "misconfigured",
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::UpstreamResponseIncomplete => "upstream-response-incomplete",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced by the calendar client while creating a meeting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Missing Google OAuth credentials")]
    MissingCredentials,

    #[error("Authentication failed. Please sign in again.")]
    AuthenticationFailed,

    #[error("Invalid access token. Please sign in again.")]
    InvalidAccessToken,

    #[error("Token validation failed")]
    TokenValidationFailed { detail: String },

    #[error("Calendar access permission required. Please grant access.")]
    PermissionRequired,

    #[error("Failed to create Google Meet link")]
    MeetLinkMissing,

    #[error("Failed to create calendar event")]
    EventCreationFailed { detail: String },
}

impl CalendarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials => ErrorKind::Misconfigured,
            Self::AuthenticationFailed | Self::InvalidAccessToken => ErrorKind::Unauthorized,
            Self::PermissionRequired => ErrorKind::Forbidden,
            Self::MeetLinkMissing => ErrorKind::UpstreamResponseIncomplete,
            Self::TokenValidationFailed { .. } | Self::EventCreationFailed { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Upstream error text kept for diagnostics, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::TokenValidationFailed { detail } | Self::EventCreationFailed { detail } => {
                Some(detail)
            }
            _ => None,
        }
    }
}

/// A failed meeting creation as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct MeetingError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl MeetingError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Internal failure with diagnostic details attached
    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn misconfigured() -> Self {
        Self::new(
            ErrorKind::Misconfigured,
            "Server configuration error - Missing Google credentials",
        )
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

impl From<CalendarError> for MeetingError {
    fn from(err: CalendarError) -> Self {
        match err.kind() {
            ErrorKind::Unauthorized => Self::new(
                ErrorKind::Unauthorized,
                "Authentication failed. Please sign in again.",
            ),
            ErrorKind::Forbidden => Self::new(
                ErrorKind::Forbidden,
                "Calendar access permission required. Please grant access.",
            ),
            ErrorKind::Misconfigured => Self::misconfigured(),
            kind => Self {
                kind,
                message: err.to_string(),
                details: err.detail().map(str::to_string),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_client_setup_error() {
        let err = Error::from(ApiError::Transport("TLS backend unavailable".to_string()));
        assert!(matches!(err, Error::GoogleApi(_)));
        assert_eq!(
            err.to_string(),
            "Google API error: Request failed: TLS backend unavailable"
        );
    }

    #[test]
    fn test_calendar_error_kinds() {
        assert_eq!(CalendarError::MissingCredentials.kind(), ErrorKind::Misconfigured);
        assert_eq!(CalendarError::AuthenticationFailed.kind(), ErrorKind::Unauthorized);
        assert_eq!(CalendarError::InvalidAccessToken.kind(), ErrorKind::Unauthorized);
        assert_eq!(CalendarError::PermissionRequired.kind(), ErrorKind::Forbidden);
        assert_eq!(
            CalendarError::MeetLinkMissing.kind(),
            ErrorKind::UpstreamResponseIncomplete
        );
        assert_eq!(
            CalendarError::EventCreationFailed { detail: String::new() }.kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_meeting_error_from_calendar_error() {
        let err = MeetingError::from(CalendarError::InvalidAccessToken);
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Authentication failed. Please sign in again.");
        assert_eq!(err.status_code(), 401);

        let err = MeetingError::from(CalendarError::PermissionRequired);
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err.message,
            "Calendar access permission required. Please grant access."
        );

        let err = MeetingError::from(CalendarError::MissingCredentials);
        assert_eq!(err.kind, ErrorKind::Misconfigured);
        assert_eq!(err.status_code(), 500);

        let err = MeetingError::from(CalendarError::MeetLinkMissing);
        assert_eq!(err.message, "Failed to create Google Meet link");
        assert_eq!(err.status_code(), 500);

        // Internal failures pass their message through and keep the upstream text
        let err = MeetingError::from(CalendarError::EventCreationFailed {
            detail: "HTTP 500 - backend error".to_string(),
        });
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, "Failed to create calendar event");
        assert_eq!(err.details.as_deref(), Some("HTTP 500 - backend error"));
    }
}
