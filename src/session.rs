use serde::{Deserialize, Serialize};

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "meetlink.session-token";

/// Profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Authenticated session context for one request.
///
/// Built by the web layer from the session cookie and handed explicitly to
/// the meeting handler.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    /// Google access token obtained at sign-in
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(user: SessionUser, access_token: Option<String>) -> Self {
        Self { user, access_token }
    }

    /// Access token, if present and non-empty
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("has_access_token", &self.access_token().is_some())
            .finish()
    }
}
