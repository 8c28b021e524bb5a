use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use teller::account::AccountController;
use teller::config::{config, init_config};
use teller::database::init_store;
use teller::notify::NotificationLog;
use teller::review::{review_channel, ReviewPolicy, ReviewWorker};
use teller::server::{create_router, AppState};
use teller::shutdown::ShutdownCoordinator;
use teller::telemetry::{init_telemetry, shutdown_telemetry};

#[derive(Parser)]
#[command(name = "teller")]
#[command(about = "Account onboarding service with an approval workflow")]
#[command(long_about = "Teller accepts account applications over HTTP, routes them through \
                       an asynchronous review, and notifies owners of the outcome. \
                       Run 'teller serve' to start the server and the review worker.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server and the review worker
    Serve {
        /// Override the configured listen port
        #[arg(long, help = "Port to listen on (overrides configuration)")]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default behavior: no subcommand runs the server with configured values
    let port = match cli.command {
        Some(Commands::Serve { port }) => port,
        None => None,
    };

    tokio::runtime::Runtime::new()?.block_on(serve(port))
}

async fn serve(port_override: Option<u16>) -> Result<()> {
    init_telemetry()?;
    init_config()?;
    let config = config()?;

    // Persistence, notifications, and the review channel
    let store = init_store(config).await?;
    let notifications = NotificationLog::new();
    let (reviewer, review_rx) = review_channel(config.review.queue_capacity);

    let controller = Arc::new(AccountController::new(
        store.clone(),
        Arc::new(reviewer),
        Arc::new(notifications.clone()),
    ));

    // Background review worker
    let policy = ReviewPolicy::from_config(&config.review)?;
    let worker = ReviewWorker::new(
        review_rx,
        controller.clone(),
        policy,
        Duration::from_millis(config.review.max_decision_delay_ms),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    let app = create_router(AppState {
        controller,
        store,
        notifications,
    });

    let port = port_override.unwrap_or(config.server.port);
    let addr = format!("{}:{}", config.server.host, port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(ShutdownCoordinator::wait_for_signal())
        .await?;

    ShutdownCoordinator::new(shutdown_tx, worker_handle)
        .shutdown_all_services()
        .await?;
    shutdown_telemetry();

    Ok(())
}
