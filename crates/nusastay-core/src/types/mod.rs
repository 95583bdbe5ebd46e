//! Shared value types used across the NusaStay crates.

pub mod money;
pub mod pagination;
pub mod stay_range;

pub use money::Money;
pub use pagination::{PageRequest, PageResponse};
pub use stay_range::StayRange;
