//! owr-monitor - weather ingestion and recommendation service
//!
//! Runs three units side by side: decoder ingestion, the recommendation
//! scheduler, and the HTTP query surface. If ingestion or the server stops,
//! the process exits non-zero so the service manager can restart it.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use owr_common::config::{ConfigOverrides, MonitorConfig};
use owr_monitor::ingest::{run_feed, IngestionPipeline};
use owr_monitor::recommend::{OllamaClient, RecommendationEngine, RecommendationScheduler};
use owr_monitor::AppState;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for owr-monitor
#[derive(Parser, Debug)]
#[command(name = "owr-monitor")]
#[command(about = "433 MHz weather sensor monitor with climate recommendations")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "OWR_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, env = "OWR_DATABASE")]
    database: Option<PathBuf>,

    /// HTTP port to listen on
    #[arg(short, long, env = "OWR_PORT")]
    port: Option<u16>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            database_path: self.database.clone(),
            port: self.port,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = MonitorConfig::load(&args.overrides()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting owr-monitor v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {}", config.database_path.display());
    info!(
        "Language model: {} at {}",
        config.llm.model, config.llm.server_url
    );
    info!(
        indoor = %config.indoor_device_model,
        outdoor = %config.outdoor_device_model,
        interval_secs = config.recommendation_interval.as_secs(),
        "Recommendation settings"
    );

    let db = owr_common::db::init_database(&config.database_path)
        .await
        .context("Failed to open database")?;

    let pipeline = IngestionPipeline::new(db.clone());
    let feed_config = config.feed.clone();
    let mut ingest_task = tokio::spawn(async move { run_feed(&feed_config, &pipeline).await });

    let model = OllamaClient::new(&config.llm).context("Failed to build language model client")?;
    let engine = RecommendationEngine::new(
        db.clone(),
        model,
        config.indoor_device_model.clone(),
        config.outdoor_device_model.clone(),
    );
    let scheduler = RecommendationScheduler::new(engine, config.recommendation_interval);
    let mut scheduler_task = tokio::spawn(scheduler.run());

    let app = owr_monitor::build_router(AppState::new(db, config.static_assets.clone()));
    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    let server = async move { axum::serve(listener, app).await };

    let outcome = tokio::select! {
        result = &mut ingest_task => match result {
            Ok(err) => Err(anyhow!("Ingestion stopped: {}", err)),
            Err(e) => Err(anyhow!("Ingestion task failed: {}", e)),
        },
        result = &mut scheduler_task => match result {
            Ok(()) => Err(anyhow!("Recommendation scheduler exited")),
            Err(e) => Err(anyhow!("Recommendation scheduler failed: {}", e)),
        },
        result = server => match result {
            Ok(()) => Err(anyhow!("HTTP server exited")),
            Err(e) => Err(anyhow::Error::new(e).context("HTTP server error")),
        },
        _ = shutdown_signal() => Ok(()),
    };

    ingest_task.abort();
    scheduler_task.abort();

    match &outcome {
        Ok(()) => info!("Shutdown complete"),
        Err(e) => error!("{:#}", e),
    }
    outcome
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
