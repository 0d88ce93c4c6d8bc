use anyhow::Result;
use dotenv::dotenv;
use raffle_api::{config::AppConfig, observability::Observability, state::AppState};
use raffle_core::RaffleService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = AppConfig::from_env()?;
    let obs = Observability::init(config.log_format)?;

    tracing::info!(
        "Configuration loaded: bind={}, cors_origins={:?}, log_format={:?}",
        config.bind_addr,
        config.cors_origins,
        config.log_format
    );

    let state = AppState::new(RaffleService::default(), obs.registry);
    let app = raffle_api::app(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Raffle API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Raffle API stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                    _ = sigint.recv() => tracing::info!("Received SIGINT"),
                }
            }
            _ => {
                tracing::warn!("Failed to register signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C");
        }
    }
}
