use lifeplan_core::constants::GOAL_NOT_FOUND;
use lifeplan_core::errors::Error;
use lifeplan_core::goals::{Goal, GoalRepositoryTrait};
use lifeplan_core::Result;

use super::model::GoalDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::goals;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn load_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let goals_db = goals::table
            .filter(goals::user_id.eq(user_id))
            .order(goals::created_at.asc())
            .select(GoalDB::as_select())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        goals_db.into_iter().map(Goal::try_from).collect()
    }

    fn find_goal_for_user(&self, goal_id: &str, user_id: &str) -> Result<Option<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        goals::table
            .filter(goals::id.eq(goal_id))
            .filter(goals::user_id.eq(user_id))
            .select(GoalDB::as_select())
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Goal::try_from)
            .transpose()
    }

    async fn insert_goal(&self, goal: Goal) -> Result<Goal> {
        let goal_db = GoalDB::from(goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let result_db = diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Goal::try_from(result_db)
            })
            .await
    }

    async fn save_goal(&self, goal: Goal) -> Result<Goal> {
        let goal_db = GoalDB::from(goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let result_db = diesel::update(
                    goals::table
                        .filter(goals::id.eq(&goal_db.id))
                        .filter(goals::user_id.eq(&goal_db.user_id)),
                )
                .set(&goal_db)
                .returning(GoalDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| Error::NotFound(GOAL_NOT_FOUND.to_string()))?;
                Goal::try_from(result_db)
            })
            .await
    }

    async fn delete_goal_for_user(&self, goal_id: String, user_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    goals::table
                        .filter(goals::id.eq(goal_id))
                        .filter(goals::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
