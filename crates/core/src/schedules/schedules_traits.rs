use crate::errors::Result;
use crate::schedules::schedules_model::{BlockPatch, DaySchedule, Schedule, ScheduleUpdate};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for schedule repository operations.
///
/// Lookups filter on the owning user id in the same query as the key.
#[async_trait]
pub trait ScheduleRepositoryTrait: Send + Sync {
    fn find_schedule_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Option<Schedule>>;
    fn find_schedule_for_user(&self, schedule_id: &str, user_id: &str)
        -> Result<Option<Schedule>>;

    /// Stores `candidate` as the schedule for its user and date.
    ///
    /// When a schedule already exists for that pair, only its blocks and
    /// `updated_at` are replaced and the existing id is kept.
    async fn upsert_day(&self, candidate: Schedule) -> Result<Schedule>;

    async fn save_schedule(&self, schedule: Schedule) -> Result<Schedule>;
}

/// Trait for schedule service operations
#[async_trait]
pub trait ScheduleServiceTrait: Send + Sync {
    fn get_day(&self, user_id: &str, date: NaiveDate) -> Result<DaySchedule>;
    async fn replace_blocks(&self, user_id: &str, update: ScheduleUpdate) -> Result<DaySchedule>;
    async fn update_block(
        &self,
        user_id: &str,
        schedule_id: &str,
        block_id: &str,
        patch: BlockPatch,
    ) -> Result<DaySchedule>;
    async fn delete_block(
        &self,
        user_id: &str,
        schedule_id: &str,
        block_id: &str,
    ) -> Result<DaySchedule>;
}
