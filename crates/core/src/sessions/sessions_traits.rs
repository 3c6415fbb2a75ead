use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::sessions::sessions_model::Session;

/// Trait for the session repository operations the goal engine depends on.
pub trait SessionRepositoryTrait: Send + Sync {
    /// Sessions with at least one section inside `[start, end)`, each
    /// carrying all of its sections. The time filter is a fetch
    /// optimization; the aggregator still matches section by section.
    fn get_sessions_in_timeframe(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>>;
}
