//! Property entity model.
//!
//! The property catalog itself (browsing, search, media) lives in another
//! service; the booking engine only reads the columns needed for pricing
//! and availability decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use nusastay_core::types::Money;

use super::rules::BookingRules;

/// A rentable property.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    /// Unique property identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Nightly base price in minor units.
    pub base_price_minor: i64,
    /// ISO currency code for the base price.
    pub currency: String,
    /// Maximum capacity-relevant guests (adults + children).
    pub max_guests: i32,
    /// Whether the property accepts bookings at all.
    pub is_available: bool,
    /// Minimum stay length in nights.
    pub min_stay_nights: i32,
    /// Maximum stay length in nights.
    pub max_stay_nights: Option<i32>,
    /// Earliest check-in time, `HH:MM`.
    pub check_in_time: String,
    /// Latest check-out time, `HH:MM`.
    pub check_out_time: String,
    /// When the property was created.
    pub created_at: DateTime<Utc>,
    /// When the property was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// The booking rules advertised by this property.
    pub fn rules(&self) -> BookingRules {
        BookingRules {
            min_stay_nights: self.min_stay_nights,
            max_stay_nights: self.max_stay_nights,
            check_in_time: self.check_in_time.clone(),
            check_out_time: self.check_out_time.clone(),
        }
    }

    /// The pricing-and-rules snapshot consumed by the booking engine.
    pub fn snapshot(&self) -> PropertySnapshot {
        PropertySnapshot {
            property_id: self.id,
            base_price: Money::from_minor(self.base_price_minor),
            currency: self.currency.clone(),
            max_guests: self.max_guests,
            is_available: self.is_available,
            rules: self.rules(),
        }
    }
}

/// The slice of property data the booking engine depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySnapshot {
    /// Property identifier.
    pub property_id: Uuid,
    /// Nightly base price at lookup time.
    pub base_price: Money,
    /// ISO currency code.
    pub currency: String,
    /// Maximum capacity-relevant guests.
    pub max_guests: i32,
    /// Whether the property accepts bookings.
    pub is_available: bool,
    /// Advertised stay rules.
    pub rules: BookingRules,
}
