//! SQLite storage implementation for schedules.

mod model;
mod repository;

pub use model::ScheduleDB;
pub use repository::ScheduleRepository;
