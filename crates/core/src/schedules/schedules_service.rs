use crate::constants::{BLOCK_NOT_FOUND, SCHEDULE_NOT_FOUND};
use crate::errors::{Error, Result};
use crate::schedules::schedules_model::{BlockPatch, DaySchedule, Schedule, ScheduleUpdate};
use crate::schedules::schedules_traits::{ScheduleRepositoryTrait, ScheduleServiceTrait};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

pub struct ScheduleService<T: ScheduleRepositoryTrait> {
    schedule_repo: Arc<T>,
}

impl<T: ScheduleRepositoryTrait> ScheduleService<T> {
    pub fn new(schedule_repo: Arc<T>) -> Self {
        ScheduleService { schedule_repo }
    }

    fn find_owned(&self, user_id: &str, schedule_id: &str) -> Result<Schedule> {
        self.schedule_repo
            .find_schedule_for_user(schedule_id, user_id)?
            .ok_or_else(|| Error::NotFound(SCHEDULE_NOT_FOUND.to_string()))
    }
}

#[async_trait]
impl<T: ScheduleRepositoryTrait + Send + Sync> ScheduleServiceTrait for ScheduleService<T> {
    fn get_day(&self, user_id: &str, date: NaiveDate) -> Result<DaySchedule> {
        Ok(self
            .schedule_repo
            .find_schedule_by_date(user_id, date)?
            .map(DaySchedule::from)
            .unwrap_or_else(|| DaySchedule::empty(date)))
    }

    async fn replace_blocks(&self, user_id: &str, update: ScheduleUpdate) -> Result<DaySchedule> {
        update.validate()?;
        let now = Utc::now().naive_utc();
        let candidate = Schedule {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date: update.date,
            blocks: update.blocks,
            created_at: now,
            updated_at: now,
        };
        debug!(
            "Replacing {} block(s) on {} for user {}",
            candidate.blocks.len(),
            candidate.date,
            user_id
        );
        let saved = self.schedule_repo.upsert_day(candidate).await?;
        Ok(saved.into())
    }

    async fn update_block(
        &self,
        user_id: &str,
        schedule_id: &str,
        block_id: &str,
        patch: BlockPatch,
    ) -> Result<DaySchedule> {
        patch.validate()?;
        let mut schedule = self.find_owned(user_id, schedule_id)?;
        let block = schedule
            .blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .ok_or_else(|| Error::NotFound(BLOCK_NOT_FOUND.to_string()))?;
        block.apply_patch(&patch);
        schedule.updated_at = Utc::now().naive_utc();
        let saved = self.schedule_repo.save_schedule(schedule).await?;
        Ok(saved.into())
    }

    async fn delete_block(
        &self,
        user_id: &str,
        schedule_id: &str,
        block_id: &str,
    ) -> Result<DaySchedule> {
        let mut schedule = self.find_owned(user_id, schedule_id)?;
        let before = schedule.blocks.len();
        schedule.blocks.retain(|b| b.id != block_id);
        if schedule.blocks.len() == before {
            return Err(Error::NotFound(BLOCK_NOT_FOUND.to_string()));
        }
        schedule.updated_at = Utc::now().naive_utc();
        let saved = self.schedule_repo.save_schedule(schedule).await?;
        Ok(saved.into())
    }
}
