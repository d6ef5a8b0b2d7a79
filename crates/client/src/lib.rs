//! Lifeplan client - the daily schedule screen and the HTTP API it talks to.
//!
//! The screen is a plain state container: a UI layer renders its getters and
//! forwards gestures to its async methods. It is generic over [`ScheduleApi`]
//! so it can run against the real server or an in-memory fake.

pub mod api;
pub mod errors;
pub mod format;
pub mod screen;

pub use api::{HttpScheduleApi, ScheduleApi};
pub use errors::{ClientError, Result};
pub use format::{format_date, format_display_date, generate_block_id, parse_date};
pub use screen::{AddTaskForm, Alert, ScheduleScreen};
