//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Runtime adapters
/// translate them into platform-specific actions; most importantly, both
/// goal and session changes re-trigger the progress aggregator, which keeps
/// the reactive recomputation at the boundary instead of inside the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Goal descriptions were created, updated, archived, paused, or
    /// soft-deleted.
    GoalsChanged { description_ids: Vec<String> },

    /// The renewal engine advanced one or more goal instances.
    GoalsRenewed { renewed_instance_ids: Vec<String> },

    /// Sessions were recorded, edited, or removed by the session
    /// collaborator.
    SessionsChanged { session_ids: Vec<String> },
}

impl DomainEvent {
    /// Creates a GoalsChanged event.
    pub fn goals_changed(description_ids: Vec<String>) -> Self {
        Self::GoalsChanged { description_ids }
    }

    /// Creates a GoalsRenewed event.
    pub fn goals_renewed(renewed_instance_ids: Vec<String>) -> Self {
        Self::GoalsRenewed {
            renewed_instance_ids,
        }
    }

    /// Creates a SessionsChanged event.
    pub fn sessions_changed(session_ids: Vec<String>) -> Self {
        Self::SessionsChanged { session_ids }
    }
}
