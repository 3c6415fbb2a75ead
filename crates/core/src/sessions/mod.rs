//! Sessions module - domain models and traits.
//!
//! Sessions are recorded by a collaborator; the goal engine reads them to
//! aggregate practice time into goal progress.

mod sessions_model;
mod sessions_traits;

pub use sessions_model::{PracticeSection, Session};
pub use sessions_traits::SessionRepositoryTrait;
