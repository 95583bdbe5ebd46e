//! Cross-crate trait seams.

pub mod events;

pub use events::EventSink;
