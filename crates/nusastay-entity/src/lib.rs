//! # nusastay-entity
//!
//! Domain entity models for NusaStay. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`; database entities
//! additionally map to rows via `sqlx::FromRow`.

pub mod booking;
pub mod property;
pub mod user;
