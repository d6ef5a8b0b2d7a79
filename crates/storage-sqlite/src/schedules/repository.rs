use chrono::NaiveDate;
use lifeplan_core::constants::SCHEDULE_NOT_FOUND;
use lifeplan_core::errors::Error;
use lifeplan_core::schedules::{Schedule, ScheduleRepositoryTrait};
use lifeplan_core::Result;

use super::model::ScheduleDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::schedules;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use std::sync::Arc;

pub struct ScheduleRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ScheduleRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ScheduleRepository { pool, writer }
    }
}

#[async_trait]
impl ScheduleRepositoryTrait for ScheduleRepository {
    fn find_schedule_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Option<Schedule>> {
        let mut conn = get_connection(&self.pool)?;
        schedules::table
            .filter(schedules::user_id.eq(user_id))
            .filter(schedules::schedule_date.eq(date))
            .select(ScheduleDB::as_select())
            .first::<ScheduleDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Schedule::try_from)
            .transpose()
    }

    fn find_schedule_for_user(
        &self,
        schedule_id: &str,
        user_id: &str,
    ) -> Result<Option<Schedule>> {
        let mut conn = get_connection(&self.pool)?;
        schedules::table
            .filter(schedules::id.eq(schedule_id))
            .filter(schedules::user_id.eq(user_id))
            .select(ScheduleDB::as_select())
            .first::<ScheduleDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Schedule::try_from)
            .transpose()
    }

    async fn upsert_day(&self, candidate: Schedule) -> Result<Schedule> {
        let candidate_db = ScheduleDB::try_from(candidate)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Schedule> {
                // Lookup and write share the writer's transaction, so two first
                // writes for the same day cannot both insert.
                let existing_id = schedules::table
                    .filter(schedules::user_id.eq(&candidate_db.user_id))
                    .filter(schedules::schedule_date.eq(candidate_db.schedule_date))
                    .select(schedules::id)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                let saved = match existing_id {
                    Some(existing_id) => diesel::update(schedules::table.find(existing_id))
                        .set((
                            schedules::blocks.eq(&candidate_db.blocks),
                            schedules::updated_at.eq(candidate_db.updated_at),
                        ))
                        .returning(ScheduleDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?,
                    None => diesel::insert_into(schedules::table)
                        .values(&candidate_db)
                        .returning(ScheduleDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?,
                };
                Schedule::try_from(saved)
            })
            .await
    }

    async fn save_schedule(&self, schedule: Schedule) -> Result<Schedule> {
        let schedule_db = ScheduleDB::try_from(schedule)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Schedule> {
                let result_db = diesel::update(
                    schedules::table
                        .filter(schedules::id.eq(&schedule_db.id))
                        .filter(schedules::user_id.eq(&schedule_db.user_id)),
                )
                .set((
                    schedules::blocks.eq(&schedule_db.blocks),
                    schedules::updated_at.eq(schedule_db.updated_at),
                ))
                .returning(ScheduleDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| Error::NotFound(SCHEDULE_NOT_FOUND.to_string()))?;
                Schedule::try_from(result_db)
            })
            .await
    }
}
