//! Repository traits and their Postgres implementations.
//!
//! The traits are the injection seam required by the service layer: the
//! lifecycle manager is written against [`BookingStore`] /
//! [`PropertyStore`] so it can be unit-tested with in-memory fakes while
//! production wires in the sqlx-backed implementations.

pub mod booking;
pub mod property;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nusastay_core::result::AppResult;
use nusastay_core::types::pagination::{PageRequest, PageResponse};
use nusastay_core::types::stay_range::StayRange;
use nusastay_entity::booking::{
    Booking, BookingStatus, CancellationRecord, PaymentRecord, PaymentStatus,
};
use nusastay_entity::property::PropertySnapshot;

pub use booking::PgBookingRepository;
pub use property::PgPropertyRepository;

/// Filters for booking list queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingFilter {
    /// Restrict to bookings owned by this user.
    pub user_id: Option<Uuid>,
    /// Restrict to bookings for this property.
    pub property_id: Option<Uuid>,
    /// Restrict to bookings in this status.
    pub status: Option<BookingStatus>,
    /// Only stays ending after this date.
    pub from: Option<NaiveDate>,
    /// Only stays starting before this date.
    pub to: Option<NaiveDate>,
}

/// Durable storage for bookings.
///
/// Every lifecycle transition is a single conditional update keyed on the
/// expected source status; a `None` return means no row matched (either
/// the booking does not exist or its status changed underneath the
/// caller, who re-reads to tell the two apart).
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Find a booking by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Count active (confirmed or checked-in) bookings for a property
    /// overlapping the given half-open range.
    async fn count_active_overlapping(
        &self,
        property_id: Uuid,
        range: &StayRange,
    ) -> AppResult<u64>;

    /// Insert a new pending booking, re-checking for active overlaps in
    /// the same transaction as the insert.
    async fn create_checked(&self, booking: &Booking) -> AppResult<Booking>;

    /// List bookings matching the filter, newest first.
    async fn list(
        &self,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>>;

    /// pending → confirmed; also marks the payment paid and stamps the
    /// confirmation time.
    async fn confirm(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>>;

    /// confirmed → checked_in.
    async fn check_in(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>>;

    /// checked_in → completed.
    async fn check_out(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>>;

    /// pending|confirmed → cancelled, recording the cancellation details.
    async fn cancel(
        &self,
        id: Uuid,
        record: &CancellationRecord,
    ) -> AppResult<Option<Booking>>;

    /// Replace the payment sub-record, guarded on the payment status the
    /// caller read. Does not touch the booking status. `None` means no
    /// row matched: the booking is gone or the payment changed underneath
    /// the caller.
    async fn update_payment(
        &self,
        id: Uuid,
        expected: PaymentStatus,
        payment: &PaymentRecord,
    ) -> AppResult<Option<Booking>>;
}

/// Read access to the property catalog (pricing and rules only).
#[async_trait]
pub trait PropertyStore: Send + Sync + 'static {
    /// Fetch the pricing-and-rules snapshot for a property.
    async fn pricing_and_rules(&self, property_id: Uuid) -> AppResult<Option<PropertySnapshot>>;
}
