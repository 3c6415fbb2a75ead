//! Goals module - domain models, services, and traits.
//!
//! The heart of the engine: recurring and one-shot practice goals, the
//! renewal of expired goal instances into their successors, and the
//! aggregation of recorded practice time into per-goal progress.

mod goals_model;
mod goals_service;
mod goals_traits;
mod progress_service;
mod renewal_service;

#[cfg(test)]
mod goals_model_tests;


#[cfg(test)]
mod test_fixtures;

pub use goals_model::{
    GoalDescription, GoalInstance, GoalPeriodUnit, GoalProgress, GoalType, NewGoal,
};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
pub use progress_service::{compute_progress, ProgressService};
pub use renewal_service::RenewalService;
