use crate::constants::GOAL_NOT_FOUND;
use crate::errors::{Error, Result};
use crate::goals::goals_model::{clamp_progress, Goal, GoalProgressUpdate, NewGoal};
use crate::goals::goals_progress::{KeepStoredProgress, ProgressDerivation};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

pub struct GoalService<T: GoalRepositoryTrait> {
    goal_repo: Arc<T>,
    derivation: Arc<dyn ProgressDerivation>,
}

impl<T: GoalRepositoryTrait> GoalService<T> {
    pub fn new(goal_repo: Arc<T>) -> Self {
        Self::with_derivation(goal_repo, Arc::new(KeepStoredProgress))
    }

    pub fn with_derivation(goal_repo: Arc<T>, derivation: Arc<dyn ProgressDerivation>) -> Self {
        GoalService {
            goal_repo,
            derivation,
        }
    }

    /// Recomputes derived progress right before the goal is persisted.
    fn prepare_for_save(&self, goal: &mut Goal) {
        if goal.goal_type.tracks_current_value() {
            goal.progress = clamp_progress(self.derivation.derive(goal));
        }
        goal.updated_at = Utc::now().naive_utc();
    }

    fn find_owned(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.goal_repo
            .find_goal_for_user(goal_id, user_id)?
            .ok_or_else(|| Error::NotFound(GOAL_NOT_FOUND.to_string()))
    }
}

#[async_trait]
impl<T: GoalRepositoryTrait + Send + Sync> GoalServiceTrait for GoalService<T> {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repo.load_goals_for_user(user_id)
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.find_owned(user_id, goal_id)
    }

    async fn create_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        let now = Utc::now().naive_utc();
        let mut goal = Goal {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: new_goal.title.trim().to_string(),
            description: new_goal.description,
            goal_type: new_goal.goal_type,
            current_value: new_goal.current_value.unwrap_or(0.0),
            target_value: new_goal.target_value,
            progress: clamp_progress(new_goal.progress.unwrap_or(0.0)),
            created_at: now,
            updated_at: now,
        };
        self.prepare_for_save(&mut goal);
        self.goal_repo.insert_goal(goal).await
    }

    async fn update_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        update: GoalProgressUpdate,
    ) -> Result<Goal> {
        let mut goal = self.find_owned(user_id, goal_id)?;
        if !goal.apply_progress_update(&update) {
            debug!(
                "No applicable progress field for {} goal {}",
                goal.goal_type, goal.id
            );
        }
        self.prepare_for_save(&mut goal);
        self.goal_repo.save_goal(goal).await
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()> {
        let deleted = self
            .goal_repo
            .delete_goal_for_user(goal_id.to_string(), user_id.to_string())
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound(GOAL_NOT_FOUND.to_string()));
        }
        Ok(())
    }
}
