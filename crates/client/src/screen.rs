//! State container for the daily schedule screen.
//!
//! Each method corresponds to one user gesture. Network failures never
//! propagate out of the screen; they become an [`Alert`] the user dismisses.

use chrono::{Days, NaiveDate};
use lifeplan_core::schedules::{Block, BlockCategory, BlockPatch, DaySchedule};
use log::warn;

use crate::api::ScheduleApi;
use crate::errors::ClientError;
use crate::format::generate_block_id;

/// A dismissible message shown over the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn error(title: &str, err: &ClientError) -> Self {
        Self {
            title: title.to_string(),
            message: err.to_string(),
        }
    }
}

/// Fields of the add-task modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTaskForm {
    pub title: String,
    pub category: BlockCategory,
    pub start_time: String,
    pub end_time: String,
    pub goal_id: Option<String>,
}

impl Default for AddTaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: BlockCategory::default(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            goal_id: None,
        }
    }
}

impl AddTaskForm {
    fn to_block(&self) -> Block {
        Block {
            id: generate_block_id(),
            title: self.title.trim().to_string(),
            category: self.category,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            completed: false,
            goal_id: self.goal_id.clone(),
        }
    }
}

pub struct ScheduleScreen<A: ScheduleApi> {
    api: A,
    selected_date: NaiveDate,
    schedule_id: Option<String>,
    blocks: Vec<Block>,
    loading: bool,
    refreshing: bool,
    form: AddTaskForm,
    modal_visible: bool,
    pending_delete: Option<String>,
    alert: Option<Alert>,
}

impl<A: ScheduleApi> ScheduleScreen<A> {
    /// Creates the screen for `date`. Call [`fetch`](Self::fetch) to load it.
    pub fn new(api: A, date: NaiveDate) -> Self {
        Self {
            api,
            selected_date: date,
            schedule_id: None,
            blocks: Vec::new(),
            loading: false,
            refreshing: false,
            form: AddTaskForm::default(),
            modal_visible: false,
            pending_delete: None,
            alert: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn schedule_id(&self) -> Option<&str> {
        self.schedule_id.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn form(&self) -> &AddTaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AddTaskForm {
        &mut self.form
    }

    pub fn is_modal_visible(&self) -> bool {
        self.modal_visible
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn open_add_modal(&mut self) {
        self.modal_visible = true;
    }

    pub fn close_add_modal(&mut self) {
        self.modal_visible = false;
    }

    fn apply(&mut self, schedule: DaySchedule) {
        self.schedule_id = schedule.id;
        self.blocks = schedule.blocks;
    }

    fn raise(&mut self, title: &str, err: ClientError) {
        warn!("{}: {}", title, err);
        self.alert = Some(Alert::error(title, &err));
    }

    /// Loads the schedule for `date`, which becomes the selected day.
    ///
    /// On failure the screen stays on the previous day with its blocks, so
    /// the date, schedule id and blocks always describe the same day.
    pub async fn fetch(&mut self, date: NaiveDate) {
        self.loading = true;
        let result = self.api.get_schedule(date).await;
        self.loading = false;
        match result {
            Ok(schedule) => {
                self.selected_date = date;
                self.apply(schedule);
            }
            Err(err) => self.raise("Could not load schedule", err),
        }
    }

    /// Pull-to-refresh of the selected day.
    pub async fn refresh(&mut self) {
        self.refreshing = true;
        let result = self.api.get_schedule(self.selected_date).await;
        self.refreshing = false;
        match result {
            Ok(schedule) => self.apply(schedule),
            Err(err) => self.raise("Could not refresh schedule", err),
        }
    }

    pub async fn select_date(&mut self, date: NaiveDate) {
        self.fetch(date).await;
    }

    pub async fn next_day(&mut self) {
        match self.selected_date.checked_add_days(Days::new(1)) {
            Some(date) => self.fetch(date).await,
            None => warn!("No day after {}", self.selected_date),
        }
    }

    pub async fn previous_day(&mut self) {
        match self.selected_date.checked_sub_days(Days::new(1)) {
            Some(date) => self.fetch(date).await,
            None => warn!("No day before {}", self.selected_date),
        }
    }

    /// Flips `completed` on one block and takes the server's block list.
    pub async fn toggle_completion(&mut self, block_id: &str) {
        let Some(schedule_id) = self.schedule_id.clone() else {
            return;
        };
        let Some(block) = self.blocks.iter().find(|b| b.id == block_id) else {
            return;
        };
        let patch = BlockPatch::completed(!block.completed);
        match self.api.update_block(&schedule_id, block_id, patch).await {
            Ok(schedule) => self.apply(schedule),
            Err(err) => self.raise("Could not update task", err),
        }
    }

    /// Appends the task described by the form and saves the whole day.
    ///
    /// A blank title raises a validation alert without contacting the server.
    pub async fn add_task(&mut self) {
        if self.form.title.trim().is_empty() {
            self.alert = Some(Alert {
                title: "Missing title".to_string(),
                message: "Please enter a title for the task.".to_string(),
            });
            return;
        }

        let mut blocks = self.blocks.clone();
        blocks.push(self.form.to_block());
        match self.api.update_schedule(self.selected_date, blocks).await {
            Ok(schedule) => {
                self.apply(schedule);
                self.form = AddTaskForm::default();
                self.modal_visible = false;
            }
            Err(err) => self.raise("Could not add task", err),
        }
    }

    /// Asks for confirmation before deleting `block_id`.
    pub fn request_delete(&mut self, block_id: &str) {
        if self.blocks.iter().any(|b| b.id == block_id) {
            self.pending_delete = Some(block_id.to_string());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the block awaiting confirmation, if any.
    pub async fn confirm_delete(&mut self) {
        let Some(block_id) = self.pending_delete.take() else {
            return;
        };
        let Some(schedule_id) = self.schedule_id.clone() else {
            return;
        };
        match self.api.delete_block(&schedule_id, &block_id).await {
            Ok(schedule) => self.apply(schedule),
            Err(err) => self.raise("Could not delete task", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory API that records every call.
    #[derive(Default)]
    struct FakeScheduleApi {
        days: Mutex<HashMap<NaiveDate, DaySchedule>>,
        calls: Mutex<Vec<String>>,
        fail: Mutex<bool>,
    }

    impl FakeScheduleApi {
        fn with_day(schedule: DaySchedule) -> Self {
            let api = Self::default();
            api.days.lock().unwrap().insert(schedule.date, schedule);
            api
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn set_failing(&self, failing: bool) {
            *self.fail.lock().unwrap() = failing;
        }

        fn record(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if *self.fail.lock().unwrap() {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Server error: database is locked".to_string(),
                });
            }
            Ok(())
        }

        fn find_by_id(&self, schedule_id: &str) -> Result<NaiveDate> {
            self.days
                .lock()
                .unwrap()
                .values()
                .find(|d| d.id.as_deref() == Some(schedule_id))
                .map(|d| d.date)
                .ok_or(ClientError::Api {
                    status: 404,
                    message: "Schedule not found".to_string(),
                })
        }
    }

    #[async_trait]
    impl ScheduleApi for FakeScheduleApi {
        async fn get_schedule(&self, date: NaiveDate) -> Result<DaySchedule> {
            self.record(format!("get {date}"))?;
            Ok(self
                .days
                .lock()
                .unwrap()
                .get(&date)
                .cloned()
                .unwrap_or_else(|| DaySchedule::empty(date)))
        }

        async fn update_schedule(
            &self,
            date: NaiveDate,
            blocks: Vec<Block>,
        ) -> Result<DaySchedule> {
            self.record(format!("put {date}"))?;
            let mut days = self.days.lock().unwrap();
            let day = days.entry(date).or_insert_with(|| DaySchedule::empty(date));
            if day.id.is_none() {
                day.id = Some(format!("sched-{date}"));
            }
            day.blocks = blocks;
            Ok(day.clone())
        }

        async fn update_block(
            &self,
            schedule_id: &str,
            block_id: &str,
            patch: BlockPatch,
        ) -> Result<DaySchedule> {
            self.record(format!("patch {schedule_id}/{block_id}"))?;
            let date = self.find_by_id(schedule_id)?;
            let mut days = self.days.lock().unwrap();
            let day = days.get_mut(&date).unwrap();
            if let Some(block) = day.blocks.iter_mut().find(|b| b.id == block_id) {
                block.apply_patch(&patch);
            }
            Ok(day.clone())
        }

        async fn delete_block(&self, schedule_id: &str, block_id: &str) -> Result<DaySchedule> {
            self.record(format!("delete {schedule_id}/{block_id}"))?;
            let date = self.find_by_id(schedule_id)?;
            let mut days = self.days.lock().unwrap();
            let day = days.get_mut(&date).unwrap();
            day.blocks.retain(|b| b.id != block_id);
            Ok(day.clone())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    fn block(id: &str, title: &str) -> Block {
        Block {
            id: id.to_string(),
            title: title.to_string(),
            category: BlockCategory::Mental,
            start_time: "08:00".to_string(),
            end_time: "08:20".to_string(),
            completed: false,
            goal_id: None,
        }
    }

    fn seeded_api() -> FakeScheduleApi {
        FakeScheduleApi::with_day(DaySchedule {
            id: Some("sched-1".to_string()),
            date: today(),
            blocks: vec![block("b1", "Meditate"), block("b2", "Journal")],
        })
    }

    #[tokio::test]
    async fn fetch_replaces_blocks_and_remembers_schedule_id() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());

        screen.fetch(today()).await;

        assert_eq!(screen.schedule_id(), Some("sched-1"));
        assert_eq!(screen.blocks().len(), 2);
        assert!(!screen.is_loading());
        assert!(screen.alert().is_none());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_prior_state_and_alerts() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.fetch(today()).await;

        screen.api().set_failing(true);
        screen.refresh().await;

        assert_eq!(screen.blocks().len(), 2);
        assert!(!screen.is_refreshing());
        let alert = screen.alert().unwrap();
        assert_eq!(alert.title, "Could not refresh schedule");
        assert!(alert.message.contains("database is locked"));

        screen.dismiss_alert();
        assert!(screen.alert().is_none());
    }

    #[tokio::test]
    async fn failed_day_change_stays_on_the_loaded_day() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.fetch(today()).await;

        screen.api().set_failing(true);
        screen.next_day().await;

        assert_eq!(screen.selected_date(), today());
        assert_eq!(screen.schedule_id(), Some("sched-1"));
        assert_eq!(screen.alert().unwrap().title, "Could not load schedule");

        screen.api().set_failing(false);
        screen.dismiss_alert();
        screen.form_mut().title = "Stretch".to_string();
        screen.add_task().await;

        assert_eq!(screen.api().calls().last().unwrap(), "put 2024-05-14");
        assert_eq!(screen.blocks().len(), 3);
        let next = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert!(!screen.api().days.lock().unwrap().contains_key(&next));
    }

    #[tokio::test]
    async fn add_task_with_blank_title_never_calls_the_api() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.open_add_modal();
        screen.form_mut().title = "   ".to_string();

        screen.add_task().await;

        assert!(screen.api().calls().is_empty());
        assert_eq!(screen.alert().unwrap().title, "Missing title");
        assert!(screen.is_modal_visible());
    }

    #[tokio::test]
    async fn first_task_of_a_day_adopts_new_schedule_id() {
        let mut screen = ScheduleScreen::new(FakeScheduleApi::default(), today());
        screen.fetch(today()).await;
        assert_eq!(screen.schedule_id(), None);

        screen.open_add_modal();
        screen.form_mut().title = "Call grandma".to_string();
        screen.form_mut().category = BlockCategory::Social;
        screen.add_task().await;

        assert_eq!(screen.schedule_id(), Some("sched-2024-05-14"));
        assert_eq!(screen.blocks().len(), 1);
        assert_eq!(screen.blocks()[0].title, "Call grandma");
        assert_eq!(screen.blocks()[0].category, BlockCategory::Social);
        assert!(!screen.is_modal_visible());
        assert_eq!(screen.form(), &AddTaskForm::default());
    }

    #[tokio::test]
    async fn add_task_sends_the_whole_list() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.fetch(today()).await;

        screen.form_mut().title = "Stretch".to_string();
        screen.add_task().await;

        let titles: Vec<&str> = screen.blocks().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Meditate", "Journal", "Stretch"]);
        assert_eq!(screen.api().calls().last().unwrap(), "put 2024-05-14");
    }

    #[tokio::test]
    async fn failed_add_keeps_form_and_blocks() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.fetch(today()).await;
        screen.open_add_modal();
        screen.form_mut().title = "Stretch".to_string();

        screen.api().set_failing(true);
        screen.add_task().await;

        assert_eq!(screen.blocks().len(), 2);
        assert_eq!(screen.form().title, "Stretch");
        assert!(screen.is_modal_visible());
        assert_eq!(screen.alert().unwrap().title, "Could not add task");
    }

    #[tokio::test]
    async fn toggle_completion_uses_server_response() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.fetch(today()).await;

        screen.toggle_completion("b2").await;
        assert!(screen.blocks()[1].completed);

        screen.toggle_completion("b2").await;
        assert!(!screen.blocks()[1].completed);
        assert_eq!(screen.api().calls().last().unwrap(), "patch sched-1/b2");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.fetch(today()).await;

        screen.request_delete("b1");
        assert_eq!(screen.pending_delete(), Some("b1"));
        screen.cancel_delete();
        screen.confirm_delete().await;
        assert_eq!(screen.blocks().len(), 2);
        assert!(!screen.api().calls().iter().any(|c| c.starts_with("delete")));

        screen.request_delete("b1");
        screen.confirm_delete().await;
        assert_eq!(screen.blocks(), &[block("b2", "Journal")]);
        assert_eq!(screen.pending_delete(), None);
    }

    #[tokio::test]
    async fn date_navigation_refetches_every_time() {
        let mut screen = ScheduleScreen::new(seeded_api(), today());
        screen.fetch(today()).await;

        screen.next_day().await;
        assert_eq!(screen.selected_date(), NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert!(screen.blocks().is_empty());
        assert_eq!(screen.schedule_id(), None);

        screen.previous_day().await;
        assert_eq!(screen.selected_date(), today());
        assert_eq!(screen.blocks().len(), 2);

        assert_eq!(
            screen.api().calls(),
            vec!["get 2024-05-14", "get 2024-05-15", "get 2024-05-14"]
        );
    }
}
