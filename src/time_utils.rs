// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a date parameter given either as `YYYY-MM-DD` or as an RFC3339
/// timestamp (the UTC date part is used).
pub fn parse_date_param(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

/// Zero-padded `HH:MM` for a time of day.
pub fn format_hh_mm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Combine a scheduled date and time into a UTC instant.
pub fn scheduled_at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    NaiveDateTime::new(date, time).and_utc()
}

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
