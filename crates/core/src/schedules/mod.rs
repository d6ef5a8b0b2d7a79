//! Schedules module - date-keyed block lists, services, and traits.

mod schedules_model;
mod schedules_service;
mod schedules_traits;


pub use schedules_model::{
    Block, BlockCategory, BlockPatch, DaySchedule, Schedule, ScheduleUpdate,
};
pub use schedules_service::ScheduleService;
pub use schedules_traits::{ScheduleRepositoryTrait, ScheduleServiceTrait};
