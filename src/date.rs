use std::sync::LazyLock;

use chrono::{DateTime, Days, FixedOffset, Months, NaiveDate, Utc};
use regex::Regex;

/// Path dates look like `2024/02/29`; single-digit months and days are accepted.
static PAGE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4})/(\d{1,2})/(\d{1,2})$").expect("static regex"));

/// Join the three path segments into the `YYYY/MM/DD` lookup form.
pub fn join_segments(yyyy: &str, mm: &str, dd: &str) -> String {
    format!("{yyyy}/{mm}/{dd}")
}

/// Parse a `YYYY/MM/DD` string into a calendar date.
///
/// Returns `None` for anything non-numeric and for impossible dates such as
/// `2023/02/30` or `2023/13/40`.
pub fn parse_page_date(s: &str) -> Option<NaiveDate> {
    let (year, month, day) = numeric_parts(s)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Like [`parse_page_date`], but months and days past the end of their range
/// roll over into the following period, so `2023/13/40` reads as `2024/02/09`.
///
/// Only used to pick neighbours for an invalid date; zero months or days
/// still yield `None`.
pub fn lenient_page_date(s: &str) -> Option<NaiveDate> {
    let (year, month, day) = numeric_parts(s)?;
    if month == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, 1, 1)?
        .checked_add_months(Months::new(month - 1))?
        .checked_add_days(Days::new(u64::from(day - 1)))
}

fn numeric_parts(s: &str) -> Option<(i32, u32, u32)> {
    let caps = PAGE_DATE.captures(s)?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Format a date as `YYYY/MM/DD`, zero-padded.
pub fn format_page_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

pub fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

/// The calendar date at `now` as seen from `offset`.
pub fn today_in(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}
