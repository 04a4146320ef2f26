use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_PATTERN: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
}

/// Accepts only real calendar dates written as `YYYY-MM-DD`.
pub fn is_valid_date(value: &str) -> bool {
    let Some(captures) = DATE_PATTERN.captures(value) else {
        return false;
    };

    let (Ok(year), Ok(month), Ok(day)) = (
        captures[1].parse::<i32>(),
        captures[2].parse::<u32>(),
        captures[3].parse::<u32>(),
    ) else {
        return false;
    };

    // chrono refuses out-of-range components instead of rolling them over
    NaiveDate::from_ymd_opt(year, month, day)
        .is_some_and(|date| date.year() == year && date.month() == month && date.day() == day)
}
