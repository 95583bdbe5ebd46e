//! # nusastay-core
//!
//! Core crate for the NusaStay booking backend. Contains configuration
//! schemas, domain events, shared value types (pagination, money, stay
//! ranges), and the unified error system.
//!
//! This crate has **no** internal dependencies on other NusaStay crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
