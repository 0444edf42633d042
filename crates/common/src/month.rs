//! Month-granularity date helpers.

use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `date` shifted forward by `n` months, `None` on calendar overflow.
pub fn add_months(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(n))
}

/// `date` shifted backward by `n` months, `None` on calendar overflow.
pub fn sub_months(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(n))
}

/// The `count` month starts following the month of `last`.
pub fn months_after(last: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let start = month_start(last);
    (1..=count).filter_map(|i| add_months(start, i)).collect()
}
