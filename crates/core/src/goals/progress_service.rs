use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::errors::Result;
use crate::goals::goals_model::{GoalDescription, GoalInstance, GoalProgress, GoalType};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::sessions::{Session, SessionRepositoryTrait};

/// Practice time accrued against one goal instance, in seconds.
///
/// Pure over its inputs: sums the durations of sections whose own timestamp
/// lies inside the half-open window `[start, start + period)` and whose
/// library item matches the goal's scope. Sections are matched one by one -
/// a session straddling the window boundary contributes only its in-window
/// sections. An item-specific goal with an empty scope matches nothing.
pub fn compute_progress(
    description: &GoalDescription,
    instance: &GoalInstance,
    sessions: &[Session],
) -> i64 {
    let end = instance.end_timestamp();
    let scope: HashSet<&str> = description
        .library_item_ids
        .iter()
        .map(String::as_str)
        .collect();

    sessions
        .iter()
        .flat_map(|session| session.sections.iter())
        .filter(|section| {
            section.start_timestamp >= instance.start_timestamp && section.start_timestamp < end
        })
        .filter(|section| match description.goal_type {
            GoalType::NonSpecific => true,
            GoalType::ItemSpecific => scope.contains(section.library_item_id.as_str()),
        })
        .map(|section| section.duration_seconds)
        .sum()
}

/// Recomputes goal progress from recorded sessions.
///
/// Sessions are the source of truth; `GoalInstance::progress_seconds` is
/// only a read cache. Every refresh overwrites the cache from scratch
/// (never increments), so the operation is safe to re-run at any time and a
/// run superseded by a newer one cannot introduce drift - the last writer
/// always wrote a value derived from a complete snapshot.
pub struct ProgressService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    session_repository: Arc<dyn SessionRepositoryTrait>,
}

impl ProgressService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        session_repository: Arc<dyn SessionRepositoryTrait>,
    ) -> Self {
        Self {
            goal_repository,
            session_repository,
        }
    }

    /// Recompute and cache progress for every current goal instance,
    /// returning the per-goal numbers for display.
    ///
    /// Paused goals are skipped: their stored progress stays frozen at the
    /// value accrued before pausing (kept for resumption) and they are
    /// reported with a displayed contribution of 0.
    pub async fn refresh_progress(&self) -> Result<Vec<GoalProgress>> {
        let current = self
            .goal_repository
            .get_current_instances_with_descriptions(false)?;
        let mut progress = Vec::with_capacity(current.len());

        for (instance, description) in current {
            if description.paused {
                progress.push(GoalProgress {
                    description_id: description.id,
                    instance_id: instance.id,
                    target_seconds: instance.target_seconds,
                    progress_seconds: instance.progress_seconds,
                    displayed_seconds: 0,
                    paused: true,
                });
                continue;
            }

            let sessions = self.session_repository.get_sessions_in_timeframe(
                instance.start_timestamp,
                instance.end_timestamp(),
            )?;
            let computed = compute_progress(&description, &instance, &sessions);

            let mut updated = instance;
            updated.progress_seconds = computed;
            self.goal_repository.update_instance(&updated).await?;

            progress.push(GoalProgress {
                description_id: description.id,
                instance_id: updated.id,
                target_seconds: updated.target_seconds,
                progress_seconds: computed,
                displayed_seconds: computed,
                paused: false,
            });
        }

        debug!("Refreshed progress for {} goal(s)", progress.len());
        Ok(progress)
    }
}
