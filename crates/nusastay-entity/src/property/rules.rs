//! Per-property booking rules.

use serde::{Deserialize, Serialize};

/// Stay rules advertised by a property.
///
/// Returned alongside availability results so a caller can explain why a
/// request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRules {
    /// Minimum stay length in nights.
    pub min_stay_nights: i32,
    /// Maximum stay length in nights (None = unlimited).
    pub max_stay_nights: Option<i32>,
    /// Earliest check-in time, `HH:MM` local.
    pub check_in_time: String,
    /// Latest check-out time, `HH:MM` local.
    pub check_out_time: String,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            min_stay_nights: 1,
            max_stay_nights: None,
            check_in_time: "14:00".to_string(),
            check_out_time: "12:00".to_string(),
        }
    }
}
