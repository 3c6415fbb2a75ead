use crate::errors::Result;
use crate::library::library_model::LibraryItem;

/// Trait for the library repository operations the goal engine depends on.
pub trait LibraryRepositoryTrait: Send + Sync {
    /// Whether a non-deleted library item with this id exists.
    fn exists_item(&self, item_id: &str) -> Result<bool>;

    /// Load items by id; unknown ids are silently omitted.
    fn get_items_by_ids(&self, item_ids: &[String]) -> Result<Vec<LibraryItem>>;
}
