//! Booking lifecycle management.

pub mod reference;
pub mod service;

pub use reference::ReferenceGenerator;
pub use service::{BookingService, CreateBooking, PaymentUpdate};
