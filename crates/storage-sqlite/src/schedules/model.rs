//! Database models for schedules.
//!
//! The block list is stored as a JSON array in a single column so a day's
//! schedule stays one document.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use lifeplan_core::errors::Error;
use lifeplan_core::schedules::{Block, Schedule};

use crate::errors::StorageError;

/// Database model for schedules
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScheduleDB {
    pub id: String,
    pub user_id: String,
    pub schedule_date: NaiveDate,
    pub blocks: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ScheduleDB> for Schedule {
    type Error = Error;

    fn try_from(db: ScheduleDB) -> Result<Self, Self::Error> {
        let blocks: Vec<Block> = serde_json::from_str(&db.blocks).map_err(StorageError::from)?;
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            date: db.schedule_date,
            blocks,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<Schedule> for ScheduleDB {
    type Error = Error;

    fn try_from(domain: Schedule) -> Result<Self, Self::Error> {
        let blocks = serde_json::to_string(&domain.blocks).map_err(StorageError::from)?;
        Ok(Self {
            id: domain.id,
            user_id: domain.user_id,
            schedule_date: domain.date,
            blocks,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}
