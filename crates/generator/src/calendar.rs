use chrono::{Datelike, NaiveDate, Weekday};

/// Every Monday to Friday between `start` and `end`, inclusive.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Every `anchor` weekday between `start` and `end`, inclusive.
pub fn weekly(start: NaiveDate, end: NaiveDate, anchor: Weekday) -> Vec<NaiveDate> {
    let offset = (7 + anchor.num_days_from_monday() as i64
        - start.weekday().num_days_from_monday() as i64)
        % 7;
    let Some(first) = start.checked_add_days(chrono::Days::new(offset as u64)) else {
        return Vec::new();
    };
    first
        .iter_weeks()
        .take_while(|d| *d <= end)
        .collect()
}
