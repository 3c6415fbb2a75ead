//! In-memory fakes shared by the goal engine tests.
//!
//! These are functional stand-ins for the persistence collaborator, not
//! assertion mocks: they store real state so tests can drive multi-step
//! scenarios (create, let time pass, renew, aggregate) end to end.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{DatabaseError, Error, Result};
use crate::goals::goals_model::{GoalDescription, GoalInstance};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::library::{LibraryItem, LibraryRepositoryTrait};
use crate::sessions::{Session, SessionRepositoryTrait};

#[derive(Default)]
pub struct InMemoryGoalRepository {
    descriptions: RwLock<Vec<GoalDescription>>,
    instances: RwLock<Vec<GoalInstance>>,
    /// When set, every write fails with a database error.
    fail_writes: RwLock<bool>,
    /// When set, `renew_instance` reports success without persisting
    /// anything (a storage layer losing writes).
    drop_renewals: RwLock<bool>,
}

impl InMemoryGoalRepository {
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().unwrap() = fail;
    }

    pub fn set_drop_renewals(&self, drop: bool) {
        *self.drop_renewals.write().unwrap() = drop;
    }

    pub fn descriptions(&self) -> Vec<GoalDescription> {
        self.descriptions.read().unwrap().clone()
    }

    pub fn instances(&self) -> Vec<GoalInstance> {
        self.instances.read().unwrap().clone()
    }

    pub fn instances_sorted(&self) -> Vec<GoalInstance> {
        let mut instances = self.instances();
        instances.sort_by_key(|i| i.start_timestamp);
        instances
    }

    pub fn description(&self, description_id: &str) -> GoalDescription {
        self.get_description(description_id).unwrap()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.fail_writes.read().unwrap() {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "write failed".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryGoalRepository {
    fn get_description(&self, description_id: &str) -> Result<GoalDescription> {
        self.descriptions
            .read()
            .unwrap()
            .iter()
            .find(|d| d.id == description_id)
            .cloned()
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!(
                    "goal description {}",
                    description_id
                )))
            })
    }

    fn get_descriptions_by_ids(&self, description_ids: &[String]) -> Result<Vec<GoalDescription>> {
        Ok(self
            .descriptions
            .read()
            .unwrap()
            .iter()
            .filter(|d| description_ids.contains(&d.id))
            .cloned()
            .collect())
    }

    fn get_latest_instance(&self, description_id: &str) -> Result<Option<GoalInstance>> {
        Ok(self
            .instances
            .read()
            .unwrap()
            .iter()
            .filter(|i| i.description_id == description_id)
            .max_by_key(|i| i.start_timestamp)
            .cloned())
    }

    fn get_outdated_instances_with_descriptions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(GoalInstance, GoalDescription)>> {
        let descriptions = self.descriptions.read().unwrap();
        let mut outdated: Vec<(GoalInstance, GoalDescription)> = self
            .instances
            .read()
            .unwrap()
            .iter()
            .filter(|i| !i.deleted && i.is_outdated(now))
            .filter_map(|i| {
                descriptions
                    .iter()
                    .find(|d| d.id == i.description_id && !d.deleted)
                    .map(|d| (i.clone(), d.clone()))
            })
            .collect();
        outdated.sort_by_key(|(i, _)| i.start_timestamp);
        Ok(outdated)
    }

    fn get_current_instances_with_descriptions(
        &self,
        exclude_paused: bool,
    ) -> Result<Vec<(GoalInstance, GoalDescription)>> {
        let instances = self.instances.read().unwrap();
        Ok(self
            .descriptions
            .read()
            .unwrap()
            .iter()
            .filter(|d| !d.deleted && !(exclude_paused && d.paused))
            .filter_map(|d| {
                instances
                    .iter()
                    .filter(|i| i.description_id == d.id && !i.renewed && !i.deleted)
                    .max_by_key(|i| i.start_timestamp)
                    .map(|i| (i.clone(), d.clone()))
            })
            .collect())
    }

    async fn insert_goal(
        &self,
        description: &GoalDescription,
        first_instance: &GoalInstance,
    ) -> Result<()> {
        self.check_writable()?;
        self.descriptions.write().unwrap().push(description.clone());
        self.instances.write().unwrap().push(first_instance.clone());
        Ok(())
    }

    async fn insert_instance(&self, instance: &GoalInstance) -> Result<()> {
        self.check_writable()?;
        self.instances.write().unwrap().push(instance.clone());
        Ok(())
    }

    async fn update_instance(&self, instance: &GoalInstance) -> Result<()> {
        self.check_writable()?;
        let mut instances = self.instances.write().unwrap();
        let stored = instances
            .iter_mut()
            .find(|i| i.id == instance.id)
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!(
                    "goal instance {}",
                    instance.id
                )))
            })?;
        *stored = instance.clone();
        Ok(())
    }

    async fn update_description(&self, description: &GoalDescription) -> Result<()> {
        self.check_writable()?;
        let mut descriptions = self.descriptions.write().unwrap();
        let stored = descriptions
            .iter_mut()
            .find(|d| d.id == description.id)
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!(
                    "goal description {}",
                    description.id
                )))
            })?;
        *stored = description.clone();
        Ok(())
    }

    async fn renew_instance(
        &self,
        renewed: &GoalInstance,
        successor: Option<&GoalInstance>,
    ) -> Result<()> {
        self.check_writable()?;
        if *self.drop_renewals.read().unwrap() {
            return Ok(());
        }
        self.update_instance(renewed).await?;
        if let Some(successor) = successor {
            self.instances.write().unwrap().push(successor.clone());
        }
        Ok(())
    }

    async fn delete(&self, description_ids: &[String]) -> Result<()> {
        self.check_writable()?;
        for description in self
            .descriptions
            .write()
            .unwrap()
            .iter_mut()
            .filter(|d| description_ids.contains(&d.id))
        {
            description.deleted = true;
        }
        Ok(())
    }

    async fn restore(&self, description_ids: &[String]) -> Result<()> {
        self.check_writable()?;
        for description in self
            .descriptions
            .write()
            .unwrap()
            .iter_mut()
            .filter(|d| description_ids.contains(&d.id))
        {
            description.deleted = false;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLibraryRepository {
    items: RwLock<Vec<LibraryItem>>,
}

impl InMemoryLibraryRepository {
    pub fn add_item(&self, item: LibraryItem) {
        self.items.write().unwrap().push(item);
    }
}

impl LibraryRepositoryTrait for InMemoryLibraryRepository {
    fn exists_item(&self, item_id: &str) -> Result<bool> {
        Ok(self.items.read().unwrap().iter().any(|i| i.id == item_id))
    }

    fn get_items_by_ids(&self, item_ids: &[String]) -> Result<Vec<LibraryItem>> {
        Ok(self
            .items
            .read()
            .unwrap()
            .iter()
            .filter(|i| item_ids.contains(&i.id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<Vec<Session>>,
}

impl InMemorySessionRepository {
    pub fn add_session(&self, session: Session) {
        self.sessions.write().unwrap().push(session);
    }
}

impl SessionRepositoryTrait for InMemorySessionRepository {
    fn get_sessions_in_timeframe(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>> {
        Ok(self
            .sessions
            .read()
            .unwrap()
            .iter()
            .filter(|s| {
                s.sections
                    .iter()
                    .any(|sec| sec.start_timestamp >= start && sec.start_timestamp < end)
            })
            .cloned()
            .collect())
    }
}
