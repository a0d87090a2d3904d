use std::{future::Future, io};

use asset_recommender::api::{create_router, AppState};
use asset_recommender::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. If the handler cannot be installed the
/// server keeps running until killed instead of shutting down at once.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_signal_resolves_shutdown() {
        let result = tokio::time::timeout(
            Duration::from_millis(100),
            wait_for_signal(async { io::Result::Ok(()) }),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_signal_install_failure_never_shuts_down() {
        let failed = async { io::Result::<()>::Err(io::Error::other("no signal handler")) };
        let result = tokio::time::timeout(Duration::from_millis(100), wait_for_signal(failed)).await;
        assert!(result.is_err());
    }
}
