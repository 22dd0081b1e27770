//! Date format validation

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").unwrap());

static MONTH_DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").unwrap());

/// Supported date layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `d.m.Y`, e.g. `29.02.2024`
    DayMonthYear,
    /// `m/d/Y`, e.g. `02/29/2024`
    MonthDayYear,
}

impl DateFormat {
    /// Parse a format token; anything but `d.m.Y` and `m/d/Y` yields `None`
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "d.m.Y" => Some(DateFormat::DayMonthYear),
            "m/d/Y" => Some(DateFormat::MonthDayYear),
            _ => None,
        }
    }

    /// Extracts `(year, month, day)` if the value matches the layout
    fn split(self, value: &str) -> Option<(i32, u32, u32)> {
        let (regex, day_idx, month_idx) = match self {
            DateFormat::DayMonthYear => (&*DAY_MONTH_YEAR, 1, 2),
            DateFormat::MonthDayYear => (&*MONTH_DAY_YEAR, 2, 1),
        };
        let caps = regex.captures(value)?;
        let day = caps.get(day_idx)?.as_str().parse().ok()?;
        let month = caps.get(month_idx)?.as_str().parse().ok()?;
        let year = caps.get(3)?.as_str().parse().ok()?;
        Some((year, month, day))
    }
}

/// Value matches the layout and names a real calendar day in year 1 or later
pub fn is_valid_date(value: &str, format: DateFormat) -> bool {
    format
        .split(value)
        .filter(|(year, _, _)| *year >= 1)
        .and_then(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day))
        .is_some()
}

/// Same as [`is_valid_date`] with a raw format token; unknown tokens never validate
pub fn is_valid_date_str(value: &str, token: &str) -> bool {
    DateFormat::parse(token).is_some_and(|format| is_valid_date(value, format))
}
