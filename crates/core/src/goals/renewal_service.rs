use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::goals_model::{GoalDescription, GoalInstance};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::utils::time_utils::{period_in_seconds, PeriodAnchor};

/// Brings every expired goal instance up to date.
///
/// The host invokes this once per cold start and on demand. Each run scans
/// for un-renewed instances whose window has elapsed and either chains a
/// successor (repeating goals) or retires the description (one-shot goals),
/// repeating the scan until nothing is outdated. Because a freshly created
/// successor can itself already be expired when the app was closed for
/// several periods, the loop is what turns a late invocation into a full
/// catch-up.
pub struct RenewalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    anchor: PeriodAnchor,
}

impl RenewalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        anchor: PeriodAnchor,
    ) -> Self {
        Self {
            goal_repository,
            event_sink,
            anchor,
        }
    }

    /// Renew all outdated instances as of `now`. Returns how many instances
    /// were processed.
    ///
    /// Idempotent: an instance is marked `renewed` in the same per-instance
    /// commit that creates its successor, so re-running (or resuming after
    /// an interrupted run) never duplicates work. A persistence failure
    /// aborts the pass; renewals committed before it remain in place.
    pub async fn update_goals(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut renewed_instance_ids: Vec<String> = Vec::new();
        let mut previous_pass: Option<HashSet<String>> = None;

        loop {
            let outdated = self
                .goal_repository
                .get_outdated_instances_with_descriptions(now)?;
            if outdated.is_empty() {
                break;
            }

            // if the set of outdated instances didn't shrink, the storage
            // layer is not persisting our renewals
            let pass: HashSet<String> = outdated.iter().map(|(i, _)| i.id.clone()).collect();
            if previous_pass.as_ref() == Some(&pass) {
                return Err(Error::InvariantViolation(
                    "goal renewal made no progress over a full pass".to_string(),
                ));
            }

            debug!("Renewing {} outdated goal instance(s)", outdated.len());

            for (instance, description) in &outdated {
                if instance.description_id != description.id {
                    return Err(Error::InvariantViolation(format!(
                        "instance {} does not belong to description {}",
                        instance.id, description.id
                    )));
                }

                if description.renews() {
                    let successor = self.successor_of(instance, description, now);
                    let mut renewed = instance.clone();
                    renewed.renewed = true;
                    self.goal_repository
                        .renew_instance(&renewed, Some(&successor))
                        .await?;
                } else {
                    // One-shot goals are retired once their single window
                    // closes. Archiving is ordered before the renewal
                    // commit: a failure in between leaves an archived
                    // description with an outdated instance, a state the
                    // next pass finalizes on its own. Paused repeating
                    // goals are finalized without a successor and stay
                    // unarchived; unpausing restores a current instance.
                    if !description.repeat && !description.archived {
                        let mut archived = description.clone();
                        archived.archived = true;
                        self.goal_repository.update_description(&archived).await?;
                    }

                    let mut renewed = instance.clone();
                    renewed.renewed = true;
                    self.goal_repository.renew_instance(&renewed, None).await?;
                }

                renewed_instance_ids.push(instance.id.clone());
            }

            previous_pass = Some(pass);
        }

        if !renewed_instance_ids.is_empty() {
            self.event_sink
                .emit(DomainEvent::goals_renewed(renewed_instance_ids.clone()));
        }

        Ok(renewed_instance_ids.len())
    }

    /// The next instance in the chain, starting exactly where `instance`
    /// ends (never at "now" - late renewal must not leave gaps), with the
    /// period length recomputed from that start and the target carried
    /// forward.
    fn successor_of(
        &self,
        instance: &GoalInstance,
        description: &GoalDescription,
        now: DateTime<Utc>,
    ) -> GoalInstance {
        let start = instance.end_timestamp();
        GoalInstance {
            id: Uuid::new_v4().to_string(),
            description_id: instance.description_id.clone(),
            start_timestamp: start,
            period_in_seconds: period_in_seconds(
                start,
                description.period_count,
                description.period_unit,
                &self.anchor,
            ),
            target_seconds: instance.target_seconds,
            progress_seconds: 0,
            renewed: false,
            deleted: false,
            created_at: now,
        }
    }
}
