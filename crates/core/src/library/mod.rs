//! Library module - domain models and traits.
//!
//! The practice library itself is owned by a collaborator; the goal engine
//! only needs items for scope validation and scoped aggregation.

mod library_model;
mod library_traits;

pub use library_model::LibraryItem;
pub use library_traits::LibraryRepositoryTrait;
