//! HTTP surface of the NusaStay booking engine.
//!
//! Thin axum handlers over the service layer: extract the authenticated
//! context, shape-validate the request, call the service, wrap the result
//! in the standard envelope.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
