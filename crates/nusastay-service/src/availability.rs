//! Availability checking for a property over a stay range.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nusastay_core::result::AppResult;
use nusastay_core::types::StayRange;
use nusastay_core::AppError;
use nusastay_database::repositories::{BookingStore, PropertyStore};
use nusastay_entity::property::BookingRules;

/// Outcome of an availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// The property that was checked.
    pub property_id: Uuid,
    /// The requested stay range.
    pub range: StayRange,
    /// Whether the property can be booked for the range.
    pub available: bool,
    /// Number of active bookings overlapping the range.
    pub conflicting_bookings: u64,
    /// The property's advertised stay rules, so callers can surface the
    /// constraints that apply before a reservation is attempted.
    pub rules: BookingRules,
    /// Why the property is unavailable, when it is.
    pub reason: Option<String>,
}

/// Answers "can this property be booked for these dates?".
///
/// The check is advisory: creation re-verifies inside a transaction, and
/// the storage-level exclusion constraint is the final arbiter.
#[derive(Clone)]
pub struct AvailabilityChecker {
    bookings: Arc<dyn BookingStore>,
    properties: Arc<dyn PropertyStore>,
}

impl AvailabilityChecker {
    /// Create a new checker over the given stores.
    pub fn new(bookings: Arc<dyn BookingStore>, properties: Arc<dyn PropertyStore>) -> Self {
        Self {
            bookings,
            properties,
        }
    }

    /// Check availability of `property_id` for the half-open `range`.
    ///
    /// A booking conflicts only while it holds the dates: `confirmed` and
    /// `checked_in` block, everything else does not. Back-to-back stays
    /// sharing a turnover day never conflict.
    pub async fn check(
        &self,
        property_id: Uuid,
        range: &StayRange,
    ) -> AppResult<AvailabilityReport> {
        let snapshot = self
            .properties
            .pricing_and_rules(property_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Property {property_id} not found")))?;

        if !snapshot.is_available {
            return Ok(AvailabilityReport {
                property_id,
                range: *range,
                available: false,
                conflicting_bookings: 0,
                rules: snapshot.rules,
                reason: Some("Property is not accepting bookings".to_string()),
            });
        }

        let conflicts = self
            .bookings
            .count_active_overlapping(property_id, range)
            .await?;

        Ok(AvailabilityReport {
            property_id,
            range: *range,
            available: conflicts == 0,
            conflicting_bookings: conflicts,
            rules: snapshot.rules,
            reason: (conflicts > 0)
                .then(|| "Property is already booked for the requested dates".to_string()),
        })
    }
}
