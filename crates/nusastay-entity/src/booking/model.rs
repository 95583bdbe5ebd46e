//! Booking entity model.
//!
//! A booking is one row in the `bookings` table; the nested value objects
//! (`guests`, `contact`, `pricing`, `payment`, `cancellation`) are mapped
//! from flat columns by the manual [`sqlx::FromRow`] implementation below.
//! This is the single canonical shape — there is no legacy flat variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use nusastay_core::types::{Money, StayRange};

use super::guests::{GuestBreakdown, GuestContact};
use super::payment::PaymentRecord;
use super::pricing::{Discount, DiscountType, PricingSnapshot};
use super::status::BookingStatus;

/// Populated when a booking is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRecord {
    /// When the cancellation happened.
    pub cancelled_at: DateTime<Utc>,
    /// The actor who cancelled (guest or operator).
    pub cancelled_by: Uuid,
    /// Free-text reason.
    pub reason: Option<String>,
    /// Amount refunded as part of the cancellation.
    pub refund_amount: Option<Money>,
}

/// A reservation for a property over a stay range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: Uuid,
    /// Human-readable booking reference (unique).
    pub reference: String,
    /// Owning user. Immutable after creation.
    pub user_id: Uuid,
    /// Target property. Immutable after creation.
    pub property_id: Uuid,
    /// Stay dates, half-open `[check_in, check_out)`.
    pub stay: StayRange,
    /// Derived: whole nights in the stay.
    pub nights: i32,
    /// Guest composition.
    pub guests: GuestBreakdown,
    /// Derived: adults + children (infants excluded).
    pub total_guests: i32,
    /// Guest contact snapshot.
    pub contact: GuestContact,
    /// Pricing snapshot, frozen at creation.
    pub pricing: PricingSnapshot,
    /// Payment sub-record.
    pub payment: PaymentRecord,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Cancellation details, present only when status is `cancelled`.
    pub cancellation: Option<CancellationRecord>,
    /// When the confirmation notification was triggered.
    pub confirmation_sent_at: Option<DateTime<Utc>>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Assemble a new pending booking with its derived fields computed.
    #[allow(clippy::too_many_arguments)]
    pub fn new_pending(
        reference: String,
        user_id: Uuid,
        property_id: Uuid,
        stay: StayRange,
        guests: GuestBreakdown,
        contact: GuestContact,
        pricing: PricingSnapshot,
        payment_method: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            reference,
            user_id,
            property_id,
            stay,
            nights: stay.nights() as i32,
            guests,
            total_guests: guests.total_guests(),
            contact,
            pricing,
            payment: PaymentRecord::unpaid(payment_method),
            status: BookingStatus::Pending,
            cancellation: None,
            confirmation_sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given user owns this booking.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Whether the booking currently blocks availability.
    pub fn is_active(&self) -> bool {
        self.status.blocks_availability()
    }
}

impl sqlx::FromRow<'_, PgRow> for Booking {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let discount = match row.try_get::<Option<i64>, _>("discount_minor")? {
            Some(amount) => Some(Discount {
                amount: Money::from_minor(amount),
                discount_type: row
                    .try_get::<Option<DiscountType>, _>("discount_type")?
                    .unwrap_or(DiscountType::Fixed),
                reason: row.try_get("discount_reason")?,
            }),
            None => None,
        };

        let cancellation = match (
            row.try_get::<Option<DateTime<Utc>>, _>("cancelled_at")?,
            row.try_get::<Option<Uuid>, _>("cancelled_by")?,
        ) {
            (Some(cancelled_at), Some(cancelled_by)) => Some(CancellationRecord {
                cancelled_at,
                cancelled_by,
                reason: row.try_get("cancellation_reason")?,
                refund_amount: row
                    .try_get::<Option<i64>, _>("cancellation_refund_minor")?
                    .map(Money::from_minor),
            }),
            _ => None,
        };

        Ok(Self {
            id: row.try_get("id")?,
            reference: row.try_get("reference")?,
            user_id: row.try_get("user_id")?,
            property_id: row.try_get("property_id")?,
            stay: StayRange {
                check_in: row.try_get("check_in")?,
                check_out: row.try_get("check_out")?,
            },
            nights: row.try_get("nights")?,
            guests: GuestBreakdown {
                adults: row.try_get("adults")?,
                children: row.try_get("children")?,
                infants: row.try_get("infants")?,
            },
            total_guests: row.try_get("total_guests")?,
            contact: GuestContact {
                first_name: row.try_get("contact_first_name")?,
                last_name: row.try_get("contact_last_name")?,
                email: row.try_get("contact_email")?,
                phone: row.try_get("contact_phone")?,
                special_requests: row.try_get("special_requests")?,
            },
            pricing: PricingSnapshot {
                currency: row.try_get("currency")?,
                base_price: Money::from_minor(row.try_get("base_price_minor")?),
                subtotal: Money::from_minor(row.try_get("subtotal_minor")?),
                service_fee: row
                    .try_get::<Option<i64>, _>("service_fee_minor")?
                    .map(Money::from_minor),
                cleaning_fee: row
                    .try_get::<Option<i64>, _>("cleaning_fee_minor")?
                    .map(Money::from_minor),
                taxes: row
                    .try_get::<Option<i64>, _>("taxes_minor")?
                    .map(Money::from_minor),
                discount,
                total: Money::from_minor(row.try_get("total_minor")?),
            },
            payment: PaymentRecord {
                method: row.try_get("payment_method")?,
                status: row.try_get("payment_status")?,
                transaction_ref: row.try_get("transaction_ref")?,
                paid_at: row.try_get("paid_at")?,
                refunded_at: row.try_get("refunded_at")?,
                refund_amount: row
                    .try_get::<Option<i64>, _>("refund_amount_minor")?
                    .map(Money::from_minor),
            },
            status: row.try_get("status")?,
            cancellation,
            confirmation_sent_at: row.try_get("confirmation_sent_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
