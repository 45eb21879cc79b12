//! engine-rul server binary.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use engine_rul::config::{Cli, Config};
use engine_rul::inference::model::Regressor;
use engine_rul::inference::model_loader::load_model;
use engine_rul::server::api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "engine_rul=debug,tower_http=debug"
    } else {
        "engine_rul=info,tower_http=info"
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true);

    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("engine-rul v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    config.apply_cli(&cli);
    let config = Arc::new(config);

    info!(
        model = %config.model.model_path.display(),
        version = config.model.version_label,
        urgent_max = config.thresholds.urgent_max,
        warning_max = config.thresholds.warning_max,
        "Configuration loaded"
    );

    // Load the model once. A failure leaves the server up without a model.
    let model: Option<Arc<dyn Regressor>> = match load_model(&config.model.model_path) {
        Ok(model) => {
            info!(model = model.describe(), "Model loaded successfully");
            Some(Arc::new(model))
        }
        Err(e) => {
            error!(
                path = %config.model.model_path.display(),
                "Error loading model: {e}; /predict will answer 500 until restart"
            );
            None
        }
    };

    // Build application state and router.
    let state = Arc::new(AppState::new(config.clone(), model)?);
    let app = build_router(state);

    // Start the server.
    let listen_addr = config.server.listen.clone();
    info!(addr = listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
