//! Booking entity: model, lifecycle status, guests, pricing, payment.

pub mod guests;
pub mod model;
pub mod payment;
pub mod pricing;
pub mod status;

pub use guests::{GuestBreakdown, GuestContact};
pub use model::{Booking, CancellationRecord};
pub use payment::{PaymentRecord, PaymentStatus};
pub use pricing::{Discount, DiscountType, PricingExtras, PricingSnapshot};
pub use status::BookingStatus;
