//! Pricing snapshot computation.
//!
//! All amounts are copied onto the booking at creation time; later changes
//! to the property's nightly price never alter existing bookings.

use serde::{Deserialize, Serialize};
use std::fmt;

use nusastay_core::types::Money;
use nusastay_core::{AppError, AppResult};

/// How a discount amount was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "discount_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// A fixed amount off the total.
    Fixed,
    /// Derived from a percentage of the subtotal; the stored amount is the
    /// already-resolved value.
    Percentage,
}

impl DiscountType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discount applied to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// Resolved discount amount in minor units.
    pub amount: Money,
    /// How the amount was derived.
    pub discount_type: DiscountType,
    /// Why the discount was granted (promo code, loyalty, …).
    pub reason: Option<String>,
}

/// Optional charges supplied at creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingExtras {
    /// Service fee.
    pub service_fee: Option<Money>,
    /// Cleaning fee.
    pub cleaning_fee: Option<Money>,
    /// Taxes.
    pub taxes: Option<Money>,
    /// Discount.
    pub discount: Option<Discount>,
}

impl PricingExtras {
    /// Validate the supplied amounts: every fee, tax, and discount must
    /// be non-negative.
    pub fn validate(&self) -> AppResult<()> {
        let charges = [
            ("service_fee", self.service_fee),
            ("cleaning_fee", self.cleaning_fee),
            ("taxes", self.taxes),
            ("discount", self.discount.as_ref().map(|d| d.amount)),
        ];
        for (name, amount) in charges {
            if amount.is_some_and(|a| a.is_negative()) {
                return Err(AppError::validation(format!(
                    "Pricing amount '{name}' cannot be negative"
                )));
            }
        }
        Ok(())
    }
}

/// The immutable pricing snapshot stored on a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    /// ISO currency code (e.g. `IDR`).
    pub currency: String,
    /// Nightly base price at booking time.
    pub base_price: Money,
    /// `base_price × nights`.
    pub subtotal: Money,
    /// Service fee, if charged.
    pub service_fee: Option<Money>,
    /// Cleaning fee, if charged.
    pub cleaning_fee: Option<Money>,
    /// Taxes, if charged.
    pub taxes: Option<Money>,
    /// Discount, if granted.
    pub discount: Option<Discount>,
    /// Grand total: subtotal + fees + taxes − discount, floored at zero.
    pub total: Money,
}

impl PricingSnapshot {
    /// Compute the snapshot from the property's nightly price and the
    /// extras supplied with the reservation request.
    pub fn compute(
        currency: impl Into<String>,
        base_price: Money,
        nights: i64,
        extras: &PricingExtras,
    ) -> Self {
        let subtotal = base_price.times(nights);
        let mut total = subtotal
            .plus(extras.service_fee.unwrap_or(Money::ZERO))
            .plus(extras.cleaning_fee.unwrap_or(Money::ZERO))
            .plus(extras.taxes.unwrap_or(Money::ZERO));
        if let Some(discount) = &extras.discount {
            total = total.minus_clamped(discount.amount);
        }
        Self {
            currency: currency.into(),
            base_price,
            subtotal,
            service_fee: extras.service_fee,
            cleaning_fee: extras.cleaning_fee,
            taxes: extras.taxes,
            discount: extras.discount.clone(),
            total,
        }
    }
}
