use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::outcome::LeaveRejection;

static DATE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("leave date pattern compiles")
});

pub fn is_valid_date_format(raw: &str) -> bool {
    DATE_FORMAT.is_match(raw)
}

/// Validate a requested leave date in two stages: shape first, then the calendar.
///
/// Year zero passes chrono but is not a usable calendar year, so it is
/// reported as an invalid date.
pub fn parse_leave_date(raw: &str) -> Result<NaiveDate, LeaveRejection> {
    if !is_valid_date_format(raw) {
        return Err(LeaveRejection::InvalidFormat);
    }

    let date =
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| LeaveRejection::InvalidDate)?;
    if date.year() < 1 {
        return Err(LeaveRejection::InvalidDate);
    }
    Ok(date)
}
