//! NusaStay Booking Server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use nusastay_core::config::AppConfig;
use nusastay_core::error::{AppError, ErrorKind};
use nusastay_core::traits::EventSink;
use nusastay_database::repositories::{
    BookingStore, PgBookingRepository, PgPropertyRepository, PropertyStore,
};
use nusastay_service::availability::AvailabilityChecker;
use nusastay_service::booking::BookingService;
use nusastay_service::notification::LogEventSink;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("NUSASTAY_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting NusaStay v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db_pool = nusastay_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    nusastay_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    let booking_repo: Arc<dyn BookingStore> = Arc::new(PgBookingRepository::new(db_pool.clone()));
    let property_repo: Arc<dyn PropertyStore> =
        Arc::new(PgPropertyRepository::new(db_pool.clone()));
    let event_sink: Arc<dyn EventSink> = Arc::new(LogEventSink);

    let booking_service = Arc::new(BookingService::new(
        Arc::clone(&booking_repo),
        Arc::clone(&property_repo),
        Arc::clone(&event_sink),
        config.booking.clone(),
    ));
    let availability = Arc::new(AvailabilityChecker::new(
        Arc::clone(&booking_repo),
        Arc::clone(&property_repo),
    ));

    let app_state = nusastay_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        booking_service,
        availability,
    };

    let app = nusastay_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
        })?;

    tracing::info!("NusaStay server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    tracing::info!("NusaStay server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
