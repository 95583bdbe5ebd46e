//! Request DTOs.
//!
//! Shape validation (field presence, formats) lives here via `validator`;
//! domain validation (capacity, availability, stay rules) lives in the
//! service layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use nusastay_core::types::Money;
use nusastay_entity::booking::{
    BookingStatus, Discount, DiscountType, GuestBreakdown, GuestContact, PaymentStatus,
    PricingExtras,
};

/// POST /api/bookings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// Target property.
    pub property_id: Uuid,
    /// First night of the stay.
    pub check_in: NaiveDate,
    /// Departure day (exclusive).
    pub check_out: NaiveDate,
    /// Adult guests.
    pub adults: i32,
    /// Children (count toward capacity).
    #[serde(default)]
    pub children: i32,
    /// Infants (do not count toward capacity).
    #[serde(default)]
    pub infants: i32,
    /// Guest contact details.
    #[validate(nested)]
    pub contact: ContactRequest,
    /// Intended payment method.
    pub payment_method: Option<String>,
    /// Fees, taxes, and discount to fold into the pricing snapshot.
    #[serde(default)]
    pub pricing: PricingRequest,
}

/// Contact details on a booking request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5, max = 30))]
    pub phone: String,
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

/// Optional pricing inputs, all in minor units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingRequest {
    pub service_fee: Option<i64>,
    pub cleaning_fee: Option<i64>,
    pub taxes: Option<i64>,
    pub discount: Option<DiscountRequest>,
}

/// A discount supplied with a booking request.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountRequest {
    /// Resolved amount in minor units.
    pub amount: i64,
    pub discount_type: DiscountType,
    pub reason: Option<String>,
}

impl CreateBookingRequest {
    /// Guest composition from the flat count fields.
    pub fn guests(&self) -> GuestBreakdown {
        GuestBreakdown {
            adults: self.adults,
            children: self.children,
            infants: self.infants,
        }
    }

    /// Contact snapshot for the booking.
    pub fn contact_snapshot(&self) -> GuestContact {
        GuestContact {
            first_name: self.contact.first_name.clone(),
            last_name: self.contact.last_name.clone(),
            email: self.contact.email.clone(),
            phone: self.contact.phone.clone(),
            special_requests: self.contact.special_requests.clone(),
        }
    }

    /// Pricing extras in domain terms.
    pub fn extras(&self) -> PricingExtras {
        PricingExtras {
            service_fee: self.pricing.service_fee.map(Money::from_minor),
            cleaning_fee: self.pricing.cleaning_fee.map(Money::from_minor),
            taxes: self.pricing.taxes.map(Money::from_minor),
            discount: self.pricing.discount.as_ref().map(|d| Discount {
                amount: Money::from_minor(d.amount),
                discount_type: d.discount_type,
                reason: d.reason.clone(),
            }),
        }
    }
}

/// POST /api/bookings/{id}/cancel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelBookingRequest {
    /// Free-text cancellation reason.
    pub reason: Option<String>,
}

/// PUT /api/bookings/{id}/payment
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentRequest {
    /// Payment method as reported by the gateway.
    pub method: Option<String>,
    /// New payment status.
    pub status: PaymentStatus,
    /// External gateway transaction reference.
    pub transaction_ref: Option<String>,
    /// Refund amount in minor units (full refunds default to the booking
    /// total when omitted).
    pub refund_amount: Option<i64>,
}

/// GET /api/properties/{id}/availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Filter parameters for GET /api/bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    /// Restrict to this user's bookings (operators only; ignored for
    /// guests, who always see their own).
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
