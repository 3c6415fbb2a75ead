//! Session domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous stretch of practice on a single library item.
///
/// Progress is attributed per section: a section belongs to a goal window
/// if its own timestamp falls inside the window, independent of where the
/// rest of its session lies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSection {
    pub id: String,
    pub library_item_id: String,
    pub start_timestamp: DateTime<Utc>,
    pub duration_seconds: i64,
}

/// A recorded practice session carrying its sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub sections: Vec<PracticeSection>,
}
