//! Schedule domain models.

use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Life area a block contributes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Physical,
    Mental,
    Financial,
    Social,
    #[default]
    Personal,
}

impl BlockCategory {
    pub const ALL: [BlockCategory; 5] = [
        BlockCategory::Physical,
        BlockCategory::Mental,
        BlockCategory::Financial,
        BlockCategory::Social,
        BlockCategory::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockCategory::Physical => "physical",
            BlockCategory::Mental => "mental",
            BlockCategory::Financial => "financial",
            BlockCategory::Social => "social",
            BlockCategory::Personal => "personal",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One time-boxed task on a day's schedule.
///
/// `start_time` and `end_time` are free-form `HH:MM` strings; nothing checks
/// their order or overlap with other blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub title: String,
    pub category: BlockCategory,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
}

impl Block {
    pub fn apply_patch(&mut self, patch: &BlockPatch) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(start_time) = &patch.start_time {
            self.start_time = start_time.clone();
        }
        if let Some(end_time) = &patch.end_time {
            self.end_time = end_time.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(goal_id) = &patch.goal_id {
            self.goal_id = Some(goal_id.clone());
        }
    }
}

/// Partial update of a single block. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<BlockCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
}

impl BlockPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(ValidationError::MissingField("title".to_string()));
        }
        Ok(())
    }
}

/// Domain model representing a stored schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub blocks: Vec<Block>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// What clients see for a calendar day.
///
/// `id` is `None` until the first write for that date creates the schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub id: Option<String>,
    pub date: NaiveDate,
    pub blocks: Vec<Block>,
}

impl DaySchedule {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            id: None,
            date,
            blocks: Vec::new(),
        }
    }
}

impl From<Schedule> for DaySchedule {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: Some(schedule.id),
            date: schedule.date,
            blocks: schedule.blocks,
        }
    }
}

/// Replacement of a day's whole block list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub date: NaiveDate,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl ScheduleUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for block in &self.blocks {
            if block.id.trim().is_empty() {
                return Err(ValidationError::MissingField("block id".to_string()));
            }
            if block.title.trim().is_empty() {
                return Err(ValidationError::MissingField("title".to_string()));
            }
            if !seen.insert(block.id.as_str()) {
                return Err(ValidationError::InvalidInput(format!(
                    "Duplicate block id '{}'",
                    block.id
                )));
            }
        }
        Ok(())
    }
}
