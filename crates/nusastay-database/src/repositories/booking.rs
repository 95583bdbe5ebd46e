//! Booking repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use nusastay_core::error::{AppError, ErrorKind};
use nusastay_core::result::AppResult;
use nusastay_core::types::pagination::{PageRequest, PageResponse};
use nusastay_core::types::stay_range::StayRange;
use nusastay_entity::booking::{Booking, CancellationRecord, PaymentRecord, PaymentStatus};

use super::{BookingFilter, BookingStore};

/// sqlx-backed [`BookingStore`].
#[derive(Debug, Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    async fn count_active_overlapping(
        &self,
        property_id: Uuid,
        range: &StayRange,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE property_id = $1 \
               AND status IN ('confirmed', 'checked_in') \
               AND check_in < $3 AND check_out > $2",
        )
        .bind(property_id)
        .bind(range.check_in)
        .bind(range.check_out)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count overlapping bookings", e)
        })?;

        Ok(count as u64)
    }

    async fn create_checked(&self, booking: &Booking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to start transaction", e)
        })?;

        // Re-check inside the transaction so the read and the insert see
        // one snapshot; the partial exclusion constraint on active
        // bookings remains the backstop at confirmation time.
        let conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE property_id = $1 \
               AND status IN ('confirmed', 'checked_in') \
               AND check_in < $3 AND check_out > $2",
        )
        .bind(booking.property_id)
        .bind(booking.stay.check_in)
        .bind(booking.stay.check_out)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to re-check availability", e)
        })?;

        if conflicts > 0 {
            return Err(AppError::unavailable(
                "Property is already booked for the requested dates",
            ));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (\
                id, reference, user_id, property_id, check_in, check_out, nights, \
                adults, children, infants, total_guests, \
                contact_first_name, contact_last_name, contact_email, contact_phone, \
                special_requests, \
                currency, base_price_minor, subtotal_minor, service_fee_minor, \
                cleaning_fee_minor, taxes_minor, discount_minor, discount_type, \
                discount_reason, total_minor, \
                payment_method, payment_status, transaction_ref, paid_at, refunded_at, \
                refund_amount_minor, \
                status, confirmation_sent_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
                     $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, \
                     $29, $30, $31, $32, $33, $34, $35, $36) \
             RETURNING *",
        )
        .bind(booking.id)
        .bind(&booking.reference)
        .bind(booking.user_id)
        .bind(booking.property_id)
        .bind(booking.stay.check_in)
        .bind(booking.stay.check_out)
        .bind(booking.nights)
        .bind(booking.guests.adults)
        .bind(booking.guests.children)
        .bind(booking.guests.infants)
        .bind(booking.total_guests)
        .bind(&booking.contact.first_name)
        .bind(&booking.contact.last_name)
        .bind(&booking.contact.email)
        .bind(&booking.contact.phone)
        .bind(&booking.contact.special_requests)
        .bind(&booking.pricing.currency)
        .bind(booking.pricing.base_price.minor())
        .bind(booking.pricing.subtotal.minor())
        .bind(booking.pricing.service_fee.map(|m| m.minor()))
        .bind(booking.pricing.cleaning_fee.map(|m| m.minor()))
        .bind(booking.pricing.taxes.map(|m| m.minor()))
        .bind(booking.pricing.discount.as_ref().map(|d| d.amount.minor()))
        .bind(booking.pricing.discount.as_ref().map(|d| d.discount_type))
        .bind(
            booking
                .pricing
                .discount
                .as_ref()
                .and_then(|d| d.reason.clone()),
        )
        .bind(booking.pricing.total.minor())
        .bind(&booking.payment.method)
        .bind(booking.payment.status)
        .bind(&booking.payment.transaction_ref)
        .bind(booking.payment.paid_at)
        .bind(booking.payment.refunded_at)
        .bind(booking.payment.refund_amount.map(|m| m.minor()))
        .bind(booking.status)
        .bind(booking.confirmation_sent_at)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create booking"))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit booking", e)
        })?;

        Ok(created)
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::uuid IS NULL OR property_id = $2) \
               AND ($3::booking_status IS NULL OR status = $3) \
               AND ($4::date IS NULL OR check_out > $4) \
               AND ($5::date IS NULL OR check_in < $5)",
        )
        .bind(filter.user_id)
        .bind(filter.property_id)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count bookings", e))?;

        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE ($1::uuid IS NULL OR user_id = $1) \
               AND ($2::uuid IS NULL OR property_id = $2) \
               AND ($3::booking_status IS NULL OR status = $3) \
               AND ($4::date IS NULL OR check_out > $4) \
               AND ($5::date IS NULL OR check_in < $5) \
             ORDER BY created_at DESC LIMIT $6 OFFSET $7",
        )
        .bind(filter.user_id)
        .bind(filter.property_id)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list bookings", e))?;

        Ok(PageResponse::new(
            bookings,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn confirm(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings \
             SET status = 'confirmed', payment_status = 'paid', \
                 paid_at = COALESCE(paid_at, $2), confirmation_sent_at = $2, \
                 updated_at = $2 \
             WHERE id = $1 AND status = 'pending' \
             RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to confirm booking"))
    }

    async fn check_in(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'checked_in', updated_at = $2 \
             WHERE id = $1 AND status = 'confirmed' \
             RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check in booking", e))
    }

    async fn check_out(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'completed', updated_at = $2 \
             WHERE id = $1 AND status = 'checked_in' \
             RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check out booking", e))
    }

    async fn cancel(
        &self,
        id: Uuid,
        record: &CancellationRecord,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings \
             SET status = 'cancelled', cancelled_at = $2, cancelled_by = $3, \
                 cancellation_reason = $4, cancellation_refund_minor = $5, \
                 updated_at = $2 \
             WHERE id = $1 AND status IN ('pending', 'confirmed') \
             RETURNING *",
        )
        .bind(id)
        .bind(record.cancelled_at)
        .bind(record.cancelled_by)
        .bind(&record.reason)
        .bind(record.refund_amount.map(|m| m.minor()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel booking", e))
    }

    async fn update_payment(
        &self,
        id: Uuid,
        expected: PaymentStatus,
        payment: &PaymentRecord,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings \
             SET payment_method = $2, payment_status = $3, transaction_ref = $4, \
                 paid_at = $5, refunded_at = $6, refund_amount_minor = $7, \
                 updated_at = NOW() \
             WHERE id = $1 AND payment_status = $8 \
             RETURNING *",
        )
        .bind(id)
        .bind(&payment.method)
        .bind(payment.status)
        .bind(&payment.transaction_ref)
        .bind(payment.paid_at)
        .bind(payment.refunded_at)
        .bind(payment.refund_amount.map(|m| m.minor()))
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update payment", e))
    }
}

/// Map write-path database errors onto domain kinds.
///
/// `23505` (unique violation) means the generated booking reference
/// collided; `23P01` (exclusion violation) means the active-booking
/// no-overlap constraint fired under a concurrent write.
fn map_write_error(e: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.code().as_deref() {
            Some("23505") => {
                return AppError::conflict(format!("{context}: duplicate booking reference"));
            }
            Some("23P01") => {
                return AppError::unavailable(
                    "Property is already booked for the requested dates",
                );
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), e)
}
