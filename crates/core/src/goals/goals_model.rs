//! Goals domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationError;

/// Lowest progress a goal can report.
pub const MIN_PROGRESS: f64 = 0.0;

/// Highest progress a goal can report.
pub const MAX_PROGRESS: f64 = 100.0;

/// How a goal represents its progress.
///
/// Numeric and habit goals accumulate a `current_value` and derive their
/// percentage from it. Milestone goals store the percentage directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Numeric,
    Habit,
    Milestone,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Numeric => "numeric",
            GoalType::Habit => "habit",
            GoalType::Milestone => "milestone",
        }
    }

    /// Whether progress for this type is derived from `current_value`.
    pub fn tracks_current_value(&self) -> bool {
        matches!(self, GoalType::Numeric | GoalType::Habit)
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric" => Ok(GoalType::Numeric),
            "habit" => Ok(GoalType::Habit),
            "milestone" => Ok(GoalType::Milestone),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown goal type '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub current_value: f64,
    pub target_value: Option<f64>,
    pub progress: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    /// Applies the single type-specific progress rule.
    ///
    /// Returns `true` when a field changed. Fields that do not belong to the
    /// goal's type are ignored.
    pub fn apply_progress_update(&mut self, update: &GoalProgressUpdate) -> bool {
        match self.goal_type {
            GoalType::Numeric | GoalType::Habit => match update.current_value {
                Some(value) => {
                    self.current_value = value;
                    true
                }
                None => false,
            },
            GoalType::Milestone => match update.progress {
                Some(progress) => {
                    self.progress = clamp_progress(progress);
                    true
                }
                None => false,
            },
        }
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    pub progress: Option<f64>,
}

impl NewGoal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()));
        }
        let numbers = [self.current_value, self.target_value, self.progress];
        if numbers.iter().flatten().any(|n| !n.is_finite()) {
            return Err(ValidationError::InvalidInput(
                "Goal values must be finite numbers".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body of a progress update request.
///
/// Both fields are optional; which one is honored depends on the goal type.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressUpdate {
    pub current_value: Option<f64>,
    pub progress: Option<f64>,
}

impl GoalProgressUpdate {
    /// Reads an update from a raw JSON body.
    ///
    /// Malformed bodies and fields that are missing or not numbers are
    /// treated as absent, so they never fail the request.
    pub fn from_json_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let number = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_f64)
                .filter(|n| n.is_finite())
        };
        Self {
            current_value: number("currentValue"),
            progress: number("progress"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current_value.is_none() && self.progress.is_none()
    }
}

/// Clamps a progress percentage into `[0, 100]`.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return MIN_PROGRESS;
    }
    progress.clamp(MIN_PROGRESS, MAX_PROGRESS)
}
