//! Block id generation and date formatting shared by the screen and the API client.

use chrono::NaiveDate;
use lifeplan_core::constants::DATE_FORMAT;
use uuid::Uuid;

/// Returns a fresh id for a block created on this device.
pub fn generate_block_id() -> String {
    Uuid::new_v4().to_string()
}

/// Formats a date the way the API expects it (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Header label for the selected day, e.g. `Tuesday, May 14`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_api_and_display_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();

        assert_eq!(format_date(date), "2024-05-04");
        assert_eq!(format_display_date(date), "Saturday, May 4");
        assert_eq!(parse_date(" 2024-05-04 "), Some(date));
        assert_eq!(parse_date("05/04/2024"), None);
    }

    #[test]
    fn block_ids_are_unique() {
        assert_ne!(generate_block_id(), generate_block_id());
    }
}
