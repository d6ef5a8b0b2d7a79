//! Goals module - domain models, services, and traits.

mod goals_model;
mod goals_progress;
mod goals_service;
mod goals_traits;

#[cfg(test)]
mod goals_service_tests;

pub use goals_model::{
    clamp_progress, Goal, GoalProgressUpdate, GoalType, NewGoal, MAX_PROGRESS, MIN_PROGRESS,
};
pub use goals_progress::{KeepStoredProgress, ProgressDerivation};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
