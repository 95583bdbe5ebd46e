//! Booking engine configuration.

use serde::{Deserialize, Serialize};

/// Booking lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Prefix for generated booking references.
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
    /// Hours a guest must leave before check-in to self-cancel.
    ///
    /// Strictly more than this many hours must remain; exactly at the
    /// boundary the cancellation is rejected.
    #[serde(default = "default_cancellation_lead_time")]
    pub cancellation_lead_time_hours: i64,
    /// Default currency code for pricing snapshots.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            reference_prefix: default_reference_prefix(),
            cancellation_lead_time_hours: default_cancellation_lead_time(),
            currency: default_currency(),
        }
    }
}

fn default_reference_prefix() -> String {
    "NS".to_string()
}

fn default_cancellation_lead_time() -> i64 {
    24
}

fn default_currency() -> String {
    "IDR".to_string()
}
