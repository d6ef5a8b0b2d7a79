use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalProgressUpdate, NewGoal};
use async_trait::async_trait;

/// Trait for goal repository operations.
///
/// Every lookup is owner-scoped: implementations must filter on both the goal
/// id and the user id in the same query.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn find_goal_for_user(&self, goal_id: &str, user_id: &str) -> Result<Option<Goal>>;
    async fn insert_goal(&self, goal: Goal) -> Result<Goal>;
    async fn save_goal(&self, goal: Goal) -> Result<Goal>;
    async fn delete_goal_for_user(&self, goal_id: String, user_id: String) -> Result<usize>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    async fn create_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal>;
    async fn update_progress(
        &self,
        user_id: &str,
        goal_id: &str,
        update: GoalProgressUpdate,
    ) -> Result<Goal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<()>;
}
