//! Etude Core - Domain entities, services, and traits.
//!
//! This crate contains the goal engine for Etude: recurring and one-shot
//! practice goals, the renewal of expired goal instances, and the
//! aggregation of recorded practice time into goal progress.
//! It is database-agnostic and defines traits that are implemented
//! by the storage layer.

pub mod errors;
pub mod events;
pub mod goals;
pub mod library;
pub mod sessions;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
