//! Booking lifecycle events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted by the booking lifecycle manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A booking was created in the pending state.
    Created {
        /// Booking ID.
        booking_id: Uuid,
        /// Human-readable booking reference.
        reference: String,
        /// Target property.
        property_id: Uuid,
    },
    /// A booking was confirmed; the email collaborator sends the
    /// confirmation message for this event.
    Confirmed {
        /// Booking ID.
        booking_id: Uuid,
        /// Human-readable booking reference.
        reference: String,
        /// Guest contact email for the confirmation message.
        guest_email: String,
        /// Stay start date.
        check_in: NaiveDate,
        /// Stay end date (exclusive).
        check_out: NaiveDate,
    },
    /// The guest checked in.
    CheckedIn {
        /// Booking ID.
        booking_id: Uuid,
    },
    /// The guest checked out; the booking is completed.
    Completed {
        /// Booking ID.
        booking_id: Uuid,
    },
    /// The booking was cancelled.
    Cancelled {
        /// Booking ID.
        booking_id: Uuid,
        /// Free-text cancellation reason.
        reason: Option<String>,
    },
    /// The payment sub-record changed.
    PaymentUpdated {
        /// Booking ID.
        booking_id: Uuid,
        /// New payment status as a lowercase string.
        payment_status: String,
    },
}
