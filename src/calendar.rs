use chrono::{DateTime, Datelike, Utc};

use crate::error::LoadError;
use crate::loader::require_timestamp;
use crate::table::{Column, ColumnData, Table};

pub const UTC_TIME: &str = "utc_time";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const MONTH_NAME: &str = "month_name";

pub const DAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// Season months only; June and July kickoffs have no level.
pub const MONTH_ORDER: [&str; 10] = [
    "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May",
];

pub fn day_code(ts: &DateTime<Utc>) -> usize {
    ts.weekday().num_days_from_monday() as usize
}

pub fn month_code(ts: &DateTime<Utc>) -> Option<usize> {
    match ts.month() {
        8..=12 => Some(ts.month() as usize - 8),
        1..=5 => Some(ts.month() as usize + 4),
        _ => None,
    }
}

/// Adds `day_of_week` and `month_name` derived from `utc_time`.
///
/// Returns `false` without touching the table when both columns exist.
pub fn derive_calendar_columns(table: &mut Table) -> Result<bool, LoadError> {
    if table.has_column(DAY_OF_WEEK) && table.has_column(MONTH_NAME) {
        return Ok(false);
    }
    let times = require_timestamp(table)?;

    let days = times.iter().map(|ts| ts.as_ref().map(day_code)).collect();
    let months = times.iter().map(|ts| ts.as_ref().and_then(month_code)).collect();

    if !table.has_column(DAY_OF_WEEK) {
        table.add_column(Column::new(
            DAY_OF_WEEK,
            ColumnData::Ordered {
                levels: DAY_ORDER.iter().map(|s| s.to_string()).collect(),
                codes: days,
            },
        ))?;
    }
    if !table.has_column(MONTH_NAME) {
        table.add_column(Column::new(
            MONTH_NAME,
            ColumnData::Ordered {
                levels: MONTH_ORDER.iter().map(|s| s.to_string()).collect(),
                codes: months,
            },
        ))?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn season_months_map_in_order() {
        let aug = Utc.with_ymd_and_hms(2023, 8, 11, 17, 30, 0).unwrap();
        let may = Utc.with_ymd_and_hms(2024, 5, 26, 19, 0, 0).unwrap();
        let jul = Utc.with_ymd_and_hms(2024, 7, 1, 19, 0, 0).unwrap();
        assert_eq!(month_code(&aug).map(|c| MONTH_ORDER[c]), Some("Aug"));
        assert_eq!(month_code(&may).map(|c| MONTH_ORDER[c]), Some("May"));
        assert_eq!(month_code(&jul), None);
        assert_eq!(DAY_ORDER[day_code(&aug)], "Friday");
    }
}
