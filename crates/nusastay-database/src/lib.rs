//! # nusastay-database
//!
//! PostgreSQL connection management, the repository trait seams
//! ([`repositories::BookingStore`], [`repositories::PropertyStore`]), and
//! their concrete sqlx implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
