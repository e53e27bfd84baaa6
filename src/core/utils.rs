use chrono::{
    DateTime,
    Duration,
    NaiveDate,
    Utc,
};

/// Calendar date of a timestamp, normalized to UTC midnight.
pub fn utc_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Whole calendar days from `from` to `to`, both taken at UTC midnight.
/// Negative when `to` falls on an earlier day than `from`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (utc_day(to) - utc_day(from)).num_days()
}

/// Calendar date `days` after the UTC day of `timestamp`.
pub fn date_after(timestamp: DateTime<Utc>, days: i64) -> NaiveDate {
    utc_day(timestamp + Duration::days(days))
}
