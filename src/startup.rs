use crate::shutdown;
use meetlink::components::google_calendar::{GoogleApi, GoogleRestApi};
use meetlink::config::Config;
use meetlink::error::{server_error, Error};
use meetlink::web::{router, AppState};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            info!(config = ?config, "Configuration loaded");
            if !config.has_google_credentials() {
                warn!(
                    "GOOGLE_CLIENT_ID or GOOGLE_CLIENT_SECRET is not set; meeting requests and sign-in will fail"
                );
            }
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Bind the listener and serve the router until shutdown
pub async fn start_server(config: Arc<Config>) -> miette::Result<()> {
    let api: Arc<dyn GoogleApi> =
        Arc::new(GoogleRestApi::new(config.http_timeout()).map_err(Error::from)?);
    let state = AppState::new(Arc::clone(&config), api)?;
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| server_error(&format!("Failed to bind {}: {}", addr, e)))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
