//! Library domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain model representing an item of the practice library
/// (a piece, an exercise, a technique).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub id: String,
    pub name: String,
    pub color_index: i32,
    pub created_at: DateTime<Utc>,
}
