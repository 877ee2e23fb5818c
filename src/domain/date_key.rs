use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Storage key for a calendar date: `YYYY-MM-DD`, zero padded.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Key of the local calendar date an instant falls on.
pub fn date_key_at<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    date_key(instant.with_timezone(&Local).date_naive())
}

/// Key for today in local time (not UTC).
pub fn today_key() -> String {
    date_key(Local::now().date_naive())
}
