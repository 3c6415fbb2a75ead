use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::goals_model::{GoalDescription, GoalInstance, GoalType, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::library::LibraryRepositoryTrait;
use crate::utils::time_utils::{period_in_seconds, start_of_period, PeriodAnchor};

/// Service for goal lifecycle operations.
///
/// All transitions are soft-state: archive, pause, and delete flip flags on
/// the description and never touch recorded progress history. The service
/// additionally keeps a short-lived in-memory buffer of the ids passed to
/// the most recent delete, backing a single-level undo at the UI boundary;
/// the buffer is cleared by any other lifecycle action and is never
/// persisted.
pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    library_repository: Arc<dyn LibraryRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    anchor: PeriodAnchor,
    last_deleted: RwLock<Vec<String>>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        library_repository: Arc<dyn LibraryRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        anchor: PeriodAnchor,
    ) -> Self {
        Self {
            goal_repository,
            library_repository,
            event_sink,
            anchor,
            last_deleted: RwLock::new(Vec::new()),
        }
    }

    /// Load every referenced description, failing if any id is unknown.
    fn load_all(&self, description_ids: &[String]) -> Result<Vec<GoalDescription>> {
        let mut unique: Vec<String> = Vec::with_capacity(description_ids.len());
        for id in description_ids {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }

        let descriptions = self.goal_repository.get_descriptions_by_ids(&unique)?;
        if descriptions.len() != unique.len() {
            let found: HashSet<&str> = descriptions.iter().map(|d| d.id.as_str()).collect();
            let missing: Vec<&String> = unique
                .iter()
                .filter(|id| !found.contains(id.as_str()))
                .collect();
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Could not find goal(s) with description id(s): {:?}",
                missing
            ))));
        }

        Ok(descriptions)
    }

    /// A new current instance anchored at the start of `now`'s period.
    fn fresh_instance(
        &self,
        description: &GoalDescription,
        target_seconds: i64,
        now: DateTime<Utc>,
    ) -> GoalInstance {
        let start = start_of_period(now, description.period_unit, &self.anchor);
        GoalInstance {
            id: Uuid::new_v4().to_string(),
            description_id: description.id.clone(),
            start_timestamp: start,
            period_in_seconds: period_in_seconds(
                start,
                description.period_count,
                description.period_unit,
                &self.anchor,
            ),
            target_seconds,
            progress_seconds: 0,
            renewed: false,
            deleted: false,
            created_at: now,
        }
    }

    /// Re-insert a current instance for a description whose chain was
    /// finalized while it was archived or paused.
    async fn restore_current_instance(
        &self,
        description: &GoalDescription,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let latest = self
            .goal_repository
            .get_latest_instance(&description.id)?
            .ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "goal description {} has no instances",
                    description.id
                ))
            })?;

        if latest.renewed {
            let instance = self.fresh_instance(description, latest.target_seconds, now);
            self.goal_repository.insert_instance(&instance).await?;
        }

        Ok(())
    }

    fn remember_deleted(&self, description_ids: &[String]) {
        *self.last_deleted.write().unwrap() = description_ids.to_vec();
    }

    fn clear_undo(&self) {
        self.last_deleted.write().unwrap().clear();
    }

    fn emit_goals_changed(&self, description_ids: Vec<String>) {
        self.event_sink
            .emit(DomainEvent::goals_changed(description_ids));
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn add_goal(&self, new_goal: NewGoal, now: DateTime<Utc>) -> Result<GoalDescription> {
        debug!(
            "Adding goal: type {:?}, {} x {:?}, repeat: {}",
            new_goal.goal_type, new_goal.period_count, new_goal.period_unit, new_goal.repeat
        );

        if new_goal.period_count == 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Period count must be greater than 0".to_string(),
            )));
        }

        if new_goal.target_seconds <= 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Target must be greater than 0".to_string(),
            )));
        }

        match new_goal.goal_type {
            GoalType::NonSpecific => {
                if !new_goal.library_item_ids.is_empty() {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "Library items must be empty for non-specific goals".to_string(),
                    )));
                }
            }
            GoalType::ItemSpecific => {
                if new_goal.library_item_ids.is_empty() {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "Item-specific goals must have at least one library item".to_string(),
                    )));
                }
                let mut missing = Vec::new();
                for item_id in &new_goal.library_item_ids {
                    if !self.library_repository.exists_item(item_id)? {
                        missing.push(item_id.clone());
                    }
                }
                if !missing.is_empty() {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "Library items do not exist: {:?}",
                        missing
                    ))));
                }
            }
        }

        let description = GoalDescription {
            id: new_goal
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            goal_type: new_goal.goal_type,
            repeat: new_goal.repeat,
            period_count: new_goal.period_count,
            period_unit: new_goal.period_unit,
            archived: false,
            paused: false,
            deleted: false,
            created_at: now,
            library_item_ids: new_goal.library_item_ids,
        };
        let first_instance = self.fresh_instance(&description, new_goal.target_seconds, now);

        self.goal_repository
            .insert_goal(&description, &first_instance)
            .await?;

        self.clear_undo();
        self.emit_goals_changed(vec![description.id.clone()]);
        Ok(description)
    }

    async fn edit_goal_target(&self, description_id: &str, new_target_seconds: i64) -> Result<()> {
        if new_target_seconds <= 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Target must be greater than 0".to_string(),
            )));
        }

        let description = self.goal_repository.get_description(description_id)?;

        let current = self
            .goal_repository
            .get_latest_instance(&description.id)?
            .filter(|instance| !instance.renewed)
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Goal {} has no current instance to edit",
                    description.id
                )))
            })?;

        let mut updated = current;
        updated.target_seconds = new_target_seconds;
        self.goal_repository.update_instance(&updated).await?;

        self.clear_undo();
        self.emit_goals_changed(vec![description.id]);
        Ok(())
    }

    async fn archive_goals(&self, description_ids: &[String]) -> Result<()> {
        let descriptions = self.load_all(description_ids)?;

        let already_archived: Vec<&String> = descriptions
            .iter()
            .filter(|d| d.archived)
            .map(|d| &d.id)
            .collect();
        if !already_archived.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Cannot archive goals that are already archived: {:?}",
                already_archived
            ))));
        }

        for description in descriptions {
            let mut updated = description;
            updated.archived = true;
            self.goal_repository.update_description(&updated).await?;
        }

        self.clear_undo();
        self.emit_goals_changed(description_ids.to_vec());
        Ok(())
    }

    async fn unarchive_goals(&self, description_ids: &[String], now: DateTime<Utc>) -> Result<()> {
        let descriptions = self.load_all(description_ids)?;

        let not_archived: Vec<&String> = descriptions
            .iter()
            .filter(|d| !d.archived)
            .map(|d| &d.id)
            .collect();
        if !not_archived.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Cannot unarchive goals that aren't archived: {:?}",
                not_archived
            ))));
        }

        for description in descriptions {
            self.restore_current_instance(&description, now).await?;

            let mut updated = description;
            updated.archived = false;
            self.goal_repository.update_description(&updated).await?;
        }

        self.clear_undo();
        self.emit_goals_changed(description_ids.to_vec());
        Ok(())
    }

    async fn pause_goals(&self, description_ids: &[String]) -> Result<()> {
        let descriptions = self.load_all(description_ids)?;

        let already_paused: Vec<&String> = descriptions
            .iter()
            .filter(|d| d.paused)
            .map(|d| &d.id)
            .collect();
        if !already_paused.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Cannot pause goals that are already paused: {:?}",
                already_paused
            ))));
        }

        for description in descriptions {
            let mut updated = description;
            updated.paused = true;
            self.goal_repository.update_description(&updated).await?;
        }

        self.clear_undo();
        self.emit_goals_changed(description_ids.to_vec());
        Ok(())
    }

    async fn unpause_goals(&self, description_ids: &[String], now: DateTime<Utc>) -> Result<()> {
        let descriptions = self.load_all(description_ids)?;

        let not_paused: Vec<&String> = descriptions
            .iter()
            .filter(|d| !d.paused)
            .map(|d| &d.id)
            .collect();
        if !not_paused.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Cannot unpause goals that are not paused: {:?}",
                not_paused
            ))));
        }

        for description in descriptions {
            // archived goals get their instance back on unarchive instead
            if !description.archived {
                self.restore_current_instance(&description, now).await?;
            }

            let mut updated = description;
            updated.paused = false;
            self.goal_repository.update_description(&updated).await?;
        }

        self.clear_undo();
        self.emit_goals_changed(description_ids.to_vec());
        Ok(())
    }

    async fn delete_goals(&self, description_ids: &[String]) -> Result<()> {
        self.load_all(description_ids)?;

        self.goal_repository.delete(description_ids).await?;

        self.remember_deleted(description_ids);
        self.emit_goals_changed(description_ids.to_vec());
        Ok(())
    }

    async fn restore_goals(&self, description_ids: &[String]) -> Result<()> {
        self.load_all(description_ids)?;

        self.goal_repository.restore(description_ids).await?;

        self.clear_undo();
        self.emit_goals_changed(description_ids.to_vec());
        Ok(())
    }

    async fn restore_last_deleted(&self) -> Result<Vec<String>> {
        let description_ids = std::mem::take(&mut *self.last_deleted.write().unwrap());
        if description_ids.is_empty() {
            return Ok(description_ids);
        }

        self.goal_repository.restore(&description_ids).await?;

        self.emit_goals_changed(description_ids.clone());
        Ok(description_ids)
    }
}
