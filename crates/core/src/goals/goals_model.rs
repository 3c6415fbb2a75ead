//! Goals domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Whether a goal counts all practice time or only time spent on
/// designated library items.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    #[default]
    NonSpecific,
    ItemSpecific,
}

/// Calendar granularity of a goal period.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalPeriodUnit {
    #[default]
    Day,
    Week,
    Month,
}

/// Template of a goal: type, period, and repetition.
///
/// Immutable once created except for the `archived`, `paused`, and
/// `deleted` flags. Archived and deleted are orthogonal: a description can
/// carry both at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDescription {
    pub id: String,
    pub goal_type: GoalType,
    /// When true, a new instance is spawned every period; when false the
    /// goal is one-shot and is archived once its single instance expires.
    pub repeat: bool,
    /// Number of `period_unit`s per instance, at least 1.
    pub period_count: u32,
    pub period_unit: GoalPeriodUnit,
    /// Archived descriptions never spawn further instances.
    pub archived: bool,
    /// Paused descriptions keep their instances but accrue no progress and
    /// are skipped by renewal until unpaused.
    pub paused: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    /// Library items this goal restricts to; empty for non-specific goals.
    /// An item-specific goal with an empty set matches nothing.
    pub library_item_ids: Vec<String>,
}

impl GoalDescription {
    /// Whether the renewal engine should spawn a successor for an expired
    /// instance of this description.
    pub fn renews(&self) -> bool {
        self.repeat && !self.archived && !self.paused
    }
}

/// One concrete period of a goal.
///
/// The window is fixed at creation time: `period_in_seconds` materializes
/// the calendar length of the period starting at `start_timestamp`, so
/// later timezone or calendar changes never move an existing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalInstance {
    pub id: String,
    pub description_id: String,
    pub start_timestamp: DateTime<Utc>,
    pub period_in_seconds: i64,
    pub target_seconds: i64,
    /// Cached aggregate. Sessions remain the source of truth; the
    /// aggregator overwrites this value on every refresh.
    pub progress_seconds: i64,
    /// Set once by the renewal engine after this instance's successor (if
    /// any) has been created. A renewed instance is never processed again.
    pub renewed: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl GoalInstance {
    /// Exclusive end of this instance's window.
    pub fn end_timestamp(&self) -> DateTime<Utc> {
        self.start_timestamp + Duration::seconds(self.period_in_seconds)
    }

    /// An instance is outdated once its window has elapsed and it has not
    /// been renewed yet.
    pub fn is_outdated(&self, now: DateTime<Utc>) -> bool {
        !self.renewed && now >= self.end_timestamp()
    }
}

/// Input model for creating a new goal.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub goal_type: GoalType,
    pub repeat: bool,
    pub period_count: u32,
    pub period_unit: GoalPeriodUnit,
    pub target_seconds: i64,
    pub library_item_ids: Vec<String>,
}

/// Progress of one current goal instance, shaped for UI consumption.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub description_id: String,
    pub instance_id: String,
    pub target_seconds: i64,
    /// Stored progress. For a paused goal this is the value frozen at pause
    /// time, kept for resumption.
    pub progress_seconds: i64,
    /// What progress bars show: `progress_seconds` for active goals, 0 for
    /// paused ones.
    pub displayed_seconds: i64,
    pub paused: bool,
}
