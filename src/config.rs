use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::time::Duration;

/// Optional settings file, read relative to the working directory
pub const SETTINGS_FILE: &str = "config/meetlink.toml";

/// Default public URL used to build the OAuth redirect URI
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// Google OAuth client credentials
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Non-secret server settings that may come from the settings file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timezone: Option<String>,
    pub calendar_id: Option<String>,
    pub http_timeout_secs: Option<u64>,
}

/// Main configuration structure for the server
#[derive(Clone)]
pub struct Config {
    /// Google OAuth client credentials; meeting requests fail closed without them
    pub google_credentials: Option<GoogleCredentials>,
    /// Secret used to sign session cookies
    pub session_secret: String,
    /// Externally reachable base URL of this server
    pub public_url: String,
    /// Calendar that receives the created events
    pub google_calendar_id: String,
    /// Time zone attached to event start and end times
    pub timezone: Tz,
    pub host: String,
    pub port: u16,
    /// Timeout for outbound Google API calls
    pub http_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("has_google_credentials", &self.google_credentials.is_some())
            .field("public_url", &self.public_url)
            .field("google_calendar_id", &self.google_calendar_id)
            .field("timezone", &self.timezone.name())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let settings = match fs::read_to_string(SETTINGS_FILE) {
            Ok(content) => toml::from_str::<FileSettings>(&content)?,
            Err(_) => FileSettings::default(),
        };

        Self::from_sources(|key| env::var(key).ok(), settings)
    }

    /// Build configuration from a variable lookup and file settings.
    /// Variables take precedence over the file.
    pub fn from_sources<F>(lookup: F, settings: FileSettings) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let google_credentials = match (var("GOOGLE_CLIENT_ID"), var("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(GoogleCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let session_secret = var("SESSION_SECRET").ok_or_else(|| env_error("SESSION_SECRET"))?;

        let public_url = var("PUBLIC_URL")
            .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&public_url)
            .map_err(|e| config_error(&format!("Invalid PUBLIC_URL '{}': {}", public_url, e)))?;

        let google_calendar_id = var("GOOGLE_CALENDAR_ID")
            .or(settings.calendar_id)
            .unwrap_or_else(|| String::from("primary"));

        let timezone_name = var("TIMEZONE")
            .or(settings.timezone)
            .unwrap_or_else(|| String::from("UTC"));
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown TIMEZONE '{}'", timezone_name)))?;

        let host = var("HOST")
            .or(settings.host)
            .unwrap_or_else(|| String::from("127.0.0.1"));

        let port = match var("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            None => settings.port.unwrap_or(3000),
        };

        let http_timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(t) => t
                .parse::<u64>()
                .map_err(|_| config_error("Invalid HTTP_TIMEOUT_SECS format"))?,
            None => settings.http_timeout_secs.unwrap_or(30),
        };

        Ok(Config {
            google_credentials,
            session_secret,
            public_url,
            google_calendar_id,
            timezone,
            host,
            port,
            http_timeout_secs,
        })
    }

    /// Whether the Google OAuth client credentials are configured
    pub fn has_google_credentials(&self) -> bool {
        self.google_credentials.is_some()
    }

    /// OAuth redirect URI registered with Google
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/api/auth/callback/google", self.public_url)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Whether cookies should carry the Secure attribute
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_sources(lookup(&[("SESSION_SECRET", "s3cret")]), FileSettings::default())
                .unwrap();

        assert!(!config.has_google_credentials());
        assert_eq!(config.public_url, DEFAULT_PUBLIC_URL);
        assert_eq!(config.google_calendar_id, "primary");
        assert_eq!(config.timezone, chrono_tz::UTC);
        assert_eq!(config.port, 3000);
        assert_eq!(config.http_timeout_secs, 30);
        assert!(!config.secure_cookies());
        assert_eq!(
            config.oauth_redirect_uri(),
            "http://localhost:3000/api/auth/callback/google"
        );
    }

    #[test]
    fn test_credentials_require_both_values() {
        let config = Config::from_sources(
            lookup(&[("SESSION_SECRET", "s"), ("GOOGLE_CLIENT_ID", "id")]),
            FileSettings::default(),
        )
        .unwrap();
        assert!(config.google_credentials.is_none());

        let config = Config::from_sources(
            lookup(&[
                ("SESSION_SECRET", "s"),
                ("GOOGLE_CLIENT_ID", "id"),
                ("GOOGLE_CLIENT_SECRET", "  "),
            ]),
            FileSettings::default(),
        )
        .unwrap();
        assert!(config.google_credentials.is_none());

        let config = Config::from_sources(
            lookup(&[
                ("SESSION_SECRET", "s"),
                ("GOOGLE_CLIENT_ID", "id"),
                ("GOOGLE_CLIENT_SECRET", "secret"),
            ]),
            FileSettings::default(),
        )
        .unwrap();
        assert_eq!(
            config.google_credentials,
            Some(GoogleCredentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            })
        );
        assert!(!format!("{:?}", config).contains("secret\""));
    }

    #[test]
    fn test_missing_session_secret() {
        let result = Config::from_sources(lookup(&[]), FileSettings::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_file_settings() {
        let settings: FileSettings = toml::from_str(
            r#"
            host = "0.0.0.0"
            port = 8080
            timezone = "Europe/Helsinki"
            "#,
        )
        .unwrap();

        let config = Config::from_sources(
            lookup(&[("SESSION_SECRET", "s"), ("PORT", "9090")]),
            settings,
        )
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.timezone, chrono_tz::Europe::Helsinki);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_sources(
            lookup(&[("SESSION_SECRET", "s"), ("TIMEZONE", "Mars/Olympus")]),
            FileSettings::default()
        )
        .is_err());
        assert!(Config::from_sources(
            lookup(&[("SESSION_SECRET", "s"), ("PORT", "http")]),
            FileSettings::default()
        )
        .is_err());
        assert!(Config::from_sources(
            lookup(&[("SESSION_SECRET", "s"), ("PUBLIC_URL", "not a url")]),
            FileSettings::default()
        )
        .is_err());
    }
}
