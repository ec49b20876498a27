mod health;
mod relay;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sitequote_core::config::{AppConfig, LoadOptions};
use sitequote_mail::SmtpTransportFactory;

fn init_logging(config: &AppConfig) {
    use sitequote_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let state = relay::RelayState {
        mail: config.mail.clone(),
        factory: Arc::new(SmtpTransportFactory),
    };
    let app = relay::router(state).merge(health::router(config.mail.clone()));

    let address = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        bind_address = %address,
        "sitequote relay listening"
    );

    let grace = Duration::from_secs(config.server.graceful_shutdown_secs);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        grace_secs = grace.as_secs(),
        "shutdown signal received, draining in-flight requests"
    );
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.drain_timeout",
                grace_secs = grace.as_secs(),
                "drain period elapsed, exiting with requests still in flight"
            );
        }
    }

    tracing::info!(event_name = "system.server.stopped", "sitequote relay stopped");
    Ok(())
}
