//! Payment sub-record of a booking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use nusastay_core::types::Money;

/// Status of the payment attached to a booking.
///
/// Only loosely coupled to the booking lifecycle: the single coupling is
/// that `confirm()` forces the status to `paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No successful capture yet.
    Pending,
    /// Fully captured.
    Paid,
    /// The capture attempt failed.
    Failed,
    /// Fully refunded.
    Refunded,
    /// Partially refunded.
    PartiallyRefunded,
}

impl PaymentStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::PartiallyRefunded => "partially_refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = nusastay_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            "partially_refunded" => Ok(Self::PartiallyRefunded),
            _ => Err(nusastay_core::AppError::validation(format!(
                "Invalid payment status: '{s}'"
            ))),
        }
    }
}

/// Payment details attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment method as reported by the gateway (e.g. `credit_card`).
    pub method: Option<String>,
    /// Current payment status.
    pub status: PaymentStatus,
    /// External gateway transaction reference.
    pub transaction_ref: Option<String>,
    /// When the payment was captured.
    pub paid_at: Option<DateTime<Utc>>,
    /// When the payment was refunded.
    pub refunded_at: Option<DateTime<Utc>>,
    /// Refunded amount in minor units.
    pub refund_amount: Option<Money>,
}

impl PaymentRecord {
    /// Initial payment record for a freshly created booking.
    pub fn unpaid(method: Option<String>) -> Self {
        Self {
            method,
            status: PaymentStatus::Pending,
            transaction_ref: None,
            paid_at: None,
            refunded_at: None,
            refund_amount: None,
        }
    }
}
