//! Business logic for the NusaStay booking engine.
//!
//! Services are written against the storage traits from
//! `nusastay-database`, receive an authenticated [`RequestContext`] from
//! the HTTP layer, and emit domain events through an
//! [`nusastay_core::traits::EventSink`].

pub mod availability;
pub mod booking;
pub mod context;
pub mod notification;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::{AvailabilityChecker, AvailabilityReport};
pub use booking::{BookingService, CreateBooking, PaymentUpdate};
pub use context::RequestContext;
