/// Message returned when a goal is missing or belongs to another user.
pub const GOAL_NOT_FOUND: &str = "Goal not found";

/// Message returned when a schedule is missing or belongs to another user.
pub const SCHEDULE_NOT_FOUND: &str = "Schedule not found";

/// Message returned when a block id is not part of the schedule.
pub const BLOCK_NOT_FOUND: &str = "Block not found";

/// Calendar date format used on the wire and in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
