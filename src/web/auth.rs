use super::AppState;
use crate::session::{Session, SessionUser, SESSION_COOKIE};
use axum::extract::{FromRequestParts, Query, State};
use axum::http::{header, request::Parts};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;
use uuid::Uuid;

/// Cookie holding the CSRF state of an in-flight sign-in
pub const OAUTH_STATE_COOKIE: &str = "meetlink.oauth-state";

/// Session lifetime in minutes
pub const SESSION_LIFETIME_MINUTES: i64 = 60 * 24;

/// JWT claims stored in the session cookie
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (Google user id)
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Google access token obtained at sign-in
    pub access_token: Option<String>,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

/// Session token errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session token is missing")]
    MissingToken,
    #[error("Session token is invalid")]
    InvalidToken,
    #[error("Failed to sign session token: {0}")]
    Signing(String),
}

/// Issues and validates signed session tokens
pub struct SessionService {
    secret: String,
    lifetime_minutes: i64,
}

impl SessionService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            lifetime_minutes: SESSION_LIFETIME_MINUTES,
        }
    }

    /// Sign a token for a session
    pub fn issue(&self, session: &Session) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.lifetime_minutes);

        let claims = SessionClaims {
            sub: session.user.id.clone(),
            name: session.user.name.clone(),
            email: session.user.email.clone(),
            access_token: session.access_token.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validate a token and rebuild its session
    pub fn validate(&self, token: &str) -> Result<Session, AuthError> {
        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("Session token validation error: {:?}", e);
            AuthError::InvalidToken
        })?;

        Ok(Session::new(
            SessionUser {
                id: claims.sub,
                name: claims.name,
                email: claims.email,
            },
            claims.access_token,
        ))
    }

    pub fn lifetime_minutes(&self) -> i64 {
        self.lifetime_minutes
    }
}

/// Session token carried by the session cookie
pub fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Session token carried by an `Authorization: Bearer` header
pub fn bearer_token(parts: &Parts) -> Result<String, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken)
}

impl SessionService {
    /// Session of a request: a valid cookie wins, otherwise a valid bearer token
    pub fn session_for(&self, parts: &Parts) -> Option<Session> {
        cookie_token(parts)
            .and_then(|token| self.validate(&token).ok())
            .or_else(|| {
                bearer_token(parts)
                    .and_then(|token| self.validate(&token))
                    .ok()
            })
    }
}

/// Session of the request, if it carries a valid token
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(state.sessions.session_for(parts)))
    }
}

/// Path of the auth error page with its query
pub fn auth_error_location(error: &str, description: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("error", error);
    if let Some(description) = description {
        query.append_pair("error_description", description);
    }
    format!("/api/auth/error?{}", query.finish())
}

/// Start the Google sign-in flow
pub async fn signin_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(oauth) = state.oauth.as_ref() else {
        error!("Sign-in attempted without Google OAuth credentials");
        return Redirect::to(&auth_error_location("Configuration", None)).into_response();
    };

    let csrf_state = Uuid::new_v4().to_string();
    let url = match oauth.authorization_url(&csrf_state) {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to build authorization URL: {}", e);
            return Redirect::to(&auth_error_location("Configuration", None)).into_response();
        }
    };

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, csrf_state))
        .path("/api/auth")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .max_age(time::Duration::minutes(10));

    (jar.add(cookie), Redirect::to(url.as_str())).into_response()
}

/// Query parameters Google sends back to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Finish sign-in: exchange the code and issue the session cookie
pub async fn callback_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let jar = jar.remove(Cookie::build((OAUTH_STATE_COOKIE, "")).path("/api/auth"));

    if let Some(error) = params.error.as_deref() {
        warn!("Google returned an OAuth error: {}", error);
        let location = auth_error_location("OAuthCallback", Some(error));
        return (jar, Redirect::to(&location)).into_response();
    }

    let Some(oauth) = state.oauth.as_ref() else {
        return (jar, Redirect::to(&auth_error_location("Configuration", None))).into_response();
    };

    let state_matches = matches!(
        (params.state.as_deref(), expected_state.as_deref()),
        (Some(got), Some(expected)) if got == expected
    );
    let (Some(code), true) = (params.code.as_deref(), state_matches) else {
        warn!("OAuth callback with missing code or mismatched state");
        return (jar, Redirect::to(&auth_error_location("OAuthState", None))).into_response();
    };

    let tokens = match oauth.exchange_code(code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("Failed to exchange authorization code: {}", e);
            let location = auth_error_location("OAuthCallback", Some(&e.to_string()));
            return (jar, Redirect::to(&location)).into_response();
        }
    };

    let Some(access_token) = tokens.access_token.filter(|t| !t.is_empty()) else {
        error!("Token response missing 'access_token' field");
        let location = auth_error_location("OAuthCallback", Some("No access token returned"));
        return (jar, Redirect::to(&location)).into_response();
    };

    let user = match oauth.user_info(&access_token).await {
        Ok(info) => SessionUser {
            id: info.sub,
            name: info.name,
            email: info.email,
        },
        Err(e) => {
            error!("Failed to fetch user info: {}", e);
            let location = auth_error_location("OAuthCallback", Some(&e.to_string()));
            return (jar, Redirect::to(&location)).into_response();
        }
    };

    let session = Session::new(user, Some(access_token));
    let token = match state.sessions.issue(&session) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to issue session: {}", e);
            return (jar, Redirect::to(&auth_error_location("SessionRequired", None)))
                .into_response();
        }
    };

    info!(user = %session.user.id, "User signed in");
    let cookie = session_cookie(token, state.config.secure_cookies(), state.sessions.lifetime_minutes());
    (jar.add(cookie), Redirect::to("/")).into_response()
}

/// Session cookie for a signed token
pub fn session_cookie(token: String, secure: bool, lifetime_minutes: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::minutes(lifetime_minutes))
        .build()
}

/// Clear the session cookie
pub async fn signout_handler(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/")),
        Redirect::to("/"),
    )
}

/// Current session, without the access token
pub async fn session_handler(MaybeSession(session): MaybeSession) -> impl IntoResponse {
    match session {
        Some(session) => Json(json!({ "user": session.user })),
        None => Json(json!({})),
    }
}

/// Describe a failed sign-in
pub async fn auth_error_handler(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let error = params
        .get("error")
        .cloned()
        .unwrap_or_else(|| "Unknown error".to_string());

    let mut body = json!({
        "error": error,
        "hint": "Please check your environment variables and Google OAuth configuration."
    });
    if let Some(description) = params.get("error_description") {
        body["errorDescription"] = json!(description);
    }

    Json(body)
}
