//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use nusastay_core::config::AppConfig;
use nusastay_service::availability::AvailabilityChecker;
use nusastay_service::booking::BookingService;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks only; repositories hold
    /// their own clone).
    pub db_pool: PgPool,
    /// Booking lifecycle manager.
    pub booking_service: Arc<BookingService>,
    /// Availability checker.
    pub availability: Arc<AvailabilityChecker>,
}
