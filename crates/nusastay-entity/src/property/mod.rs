//! Property entity and booking rules.

pub mod model;
pub mod rules;

pub use model::{Property, PropertySnapshot};
pub use rules::BookingRules;
