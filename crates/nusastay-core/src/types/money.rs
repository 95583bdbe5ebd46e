//! Monetary amounts in minor units.
//!
//! Amounts are stored as `i64` minor units (cents, or whole rupiah for
//! zero-decimal currencies). The currency code travels separately on the
//! pricing snapshot; `Money` itself is pure magnitude so it can be summed
//! and scaled without floating point.

use serde::{Deserialize, Serialize};

/// A monetary amount in minor units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units.
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Raw minor-unit value.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Scale by a whole number (e.g. nightly price × nights).
    pub fn times(&self, factor: i64) -> Money {
        Money(self.0.saturating_mul(factor))
    }

    /// Saturating addition.
    pub fn plus(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction clamped at zero; a discount can never push
    /// a total negative.
    pub fn minus_clamped(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Whether the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
