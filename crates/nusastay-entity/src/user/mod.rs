//! Actor role for authorization decisions.

pub mod role;

pub use role::ActorRole;
