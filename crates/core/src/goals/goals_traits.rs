use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::goals::goals_model::{GoalDescription, GoalInstance, NewGoal};

/// Trait for goal repository operations.
///
/// By-id lookups include soft-deleted records; the scan queries
/// (`get_outdated_*`, `get_current_*`) exclude them.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_description(&self, description_id: &str) -> Result<GoalDescription>;

    /// Load descriptions by id; unknown ids are silently omitted.
    fn get_descriptions_by_ids(&self, description_ids: &[String]) -> Result<Vec<GoalDescription>>;

    /// The most recent instance (renewed or not) of a description, if any.
    fn get_latest_instance(&self, description_id: &str) -> Result<Option<GoalInstance>>;

    /// Un-renewed instances whose window has elapsed at `now`, paired with
    /// their descriptions. Instances of soft-deleted descriptions are
    /// excluded; those of paused descriptions are included (renewal
    /// finalizes them without a successor).
    fn get_outdated_instances_with_descriptions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(GoalInstance, GoalDescription)>>;

    /// The latest un-renewed instance of every non-deleted description,
    /// paired with it.
    fn get_current_instances_with_descriptions(
        &self,
        exclude_paused: bool,
    ) -> Result<Vec<(GoalInstance, GoalDescription)>>;

    /// Insert a description together with its first instance atomically.
    async fn insert_goal(
        &self,
        description: &GoalDescription,
        first_instance: &GoalInstance,
    ) -> Result<()>;

    async fn insert_instance(&self, instance: &GoalInstance) -> Result<()>;

    /// Overwrite an instance (used to set `renewed`, `target_seconds`, and
    /// the `progress_seconds` cache).
    async fn update_instance(&self, instance: &GoalInstance) -> Result<()>;

    /// Overwrite a description (used to set `archived` and `paused`).
    async fn update_description(&self, description: &GoalDescription) -> Result<()>;

    /// Commit one instance's renewal atomically: persist `renewed` and, for
    /// repeating goals, insert the successor in the same transaction. This
    /// is the per-instance commit granularity of the renewal engine; a
    /// failure must leave both records untouched.
    async fn renew_instance(
        &self,
        renewed: &GoalInstance,
        successor: Option<&GoalInstance>,
    ) -> Result<()>;

    /// Soft-delete descriptions (and thereby their instances).
    async fn delete(&self, description_ids: &[String]) -> Result<()>;

    /// Reverse a soft-delete.
    async fn restore(&self, description_ids: &[String]) -> Result<()>;
}

/// Trait for goal lifecycle operations.
///
/// `now` is always injected by the caller, never read from the system
/// clock, to keep the engine deterministically testable.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// Create a goal description together with its first instance, anchored
    /// at the start of the current period.
    async fn add_goal(&self, new_goal: NewGoal, now: DateTime<Utc>) -> Result<GoalDescription>;

    /// Change the target of the current (un-renewed) instance. Past
    /// instances keep the target they were created with; future instances
    /// inherit the new one through renewal.
    async fn edit_goal_target(&self, description_id: &str, new_target_seconds: i64) -> Result<()>;

    async fn archive_goals(&self, description_ids: &[String]) -> Result<()>;

    /// Reverse archival. A goal whose instance chain was finalized while it
    /// was archived gets a fresh current instance anchored at `now`'s
    /// period.
    async fn unarchive_goals(&self, description_ids: &[String], now: DateTime<Utc>) -> Result<()>;

    async fn pause_goals(&self, description_ids: &[String]) -> Result<()>;

    /// Reverse a pause. Like `unarchive_goals`, restores a current instance
    /// when the chain was finalized while paused.
    async fn unpause_goals(&self, description_ids: &[String], now: DateTime<Utc>) -> Result<()>;

    async fn delete_goals(&self, description_ids: &[String]) -> Result<()>;

    async fn restore_goals(&self, description_ids: &[String]) -> Result<()>;

    /// Restore the goals removed by the most recent `delete_goals`, if no
    /// other lifecycle action has happened since. Returns the restored ids.
    async fn restore_last_deleted(&self) -> Result<Vec<String>>;
}
