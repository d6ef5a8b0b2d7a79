//! Database models for goals.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use lifeplan_core::errors::Error;
use lifeplan_core::goals::{Goal, GoalType};

/// Database model for goals
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: String,
    pub current_value: f64,
    pub target_value: Option<f64>,
    pub progress: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion to domain models
impl TryFrom<GoalDB> for Goal {
    type Error = Error;

    fn try_from(db: GoalDB) -> Result<Self, Self::Error> {
        Ok(Self {
            goal_type: db.goal_type.parse::<GoalType>()?,
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            description: db.description,
            current_value: db.current_value,
            target_value: db.target_value,
            progress: db.progress,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<Goal> for GoalDB {
    fn from(domain: Goal) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            title: domain.title,
            description: domain.description,
            goal_type: domain.goal_type.as_str().to_string(),
            current_value: domain.current_value,
            target_value: domain.target_value,
            progress: domain.progress,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
