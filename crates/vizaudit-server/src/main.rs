mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(vizaudit_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = vizaudit_db::PoolConfig::from_app_config(&config);
    let pool = vizaudit_db::connect_pool(&config.database_url, pool_config).await?;
    vizaudit_db::run_migrations(&pool).await?;

    let directories = vizaudit_core::load_directories(&config.directories_path)?.directories;

    let places = match &config.places_api_key {
        Some(key) => Some(Arc::new(
            vizaudit_places::PlacesClient::new(key, config.places_timeout_secs)?
                .with_retry_policy(config.places_max_retries, config.places_retry_backoff_base_ms),
        )),
        None => {
            tracing::warn!(
                "PLACES_API_KEY not set; business search and place details will be unavailable"
            );
            None
        }
    };

    let checker = Arc::new(vizaudit_webcheck::AuditChecker::from_app_config(&config)?);

    let state = AppState {
        pool,
        config: Arc::clone(&config),
        places,
        checker,
        social: Arc::new(vizaudit_social::EstimatedSocialSource),
        directories: Arc::new(directories),
    };

    let app = build_app(state, default_rate_limit_state());

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
