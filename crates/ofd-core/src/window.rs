//! # Day Window
//!
//! Computes the query range for "all transactions on day D".
//!
//! ```text
//!   2024-01-15 in UTC+03:00
//!   ├── start: 2024-01-15 00:00:00.000 +03:00 ──► 1705266000000 ms
//!   └── end:   2024-01-15 23:59:59.000 +03:00 ──► 1705352399000 ms
//! ```
//!
//! The end bound stops at second 59 with zero milliseconds; the remote
//! endpoint treats both bounds as inclusive.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use serde::{Deserialize, Serialize};

/// Inclusive start/end of one calendar day, in Unix epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DayWindow {
    /// Window for `date` as a calendar day in `tz`.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        DayWindow {
            start_ms: local_millis(date.and_time(NaiveTime::MIN), tz),
            end_ms: local_millis(date.and_time(end_of_day()), tz),
        }
    }

    /// Window for the calendar day `instant` falls on, in its own time zone.
    pub fn for_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::for_date(instant.date_naive(), &instant.timezone())
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Maps a wall-clock time in `tz` to epoch milliseconds.
///
/// Ambiguous times (clock set back) resolve to the earlier instant. Times
/// skipped by a forward transition are read with the zone's offset at the
/// same UTC wall-clock reading.
fn local_millis<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> i64 {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            let offset = tz.offset_from_utc_datetime(&local);
            (local - offset.fix()).and_utc().timestamp_millis()
        }
    }
}
