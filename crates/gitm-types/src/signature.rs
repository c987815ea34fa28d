//! Author and committer identity.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A point in time as recorded in a commit: seconds since the Unix epoch
/// plus the author's UTC offset in minutes.
///
/// Ordering compares the instant (seconds first), so commits can be sorted
/// chronologically regardless of the timezone they were written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since the Unix epoch (UTC).
    pub seconds: i64,
    /// Offset from UTC, in minutes, as recorded by the author.
    pub offset_minutes: i32,
}

impl Timestamp {
    /// Create a timestamp from epoch seconds and a UTC offset in minutes.
    pub fn new(seconds: i64, offset_minutes: i32) -> Self {
        Self {
            seconds,
            offset_minutes,
        }
    }

    /// The current time, UTC offset zero.
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp(), 0)
    }

    /// Convert to a timezone-aware `chrono` datetime.
    ///
    /// Returns `None` if the recorded offset is out of range.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60)?;
        offset.timestamp_opt(self.seconds, 0).single()
    }

    /// Parse a user-supplied date string into a timestamp.
    ///
    /// Accepted forms, tried in order: RFC 3339, `YYYY-MM-DD HH:MM:SS`
    /// (assumed UTC), `YYYY-MM-DD` (midnight UTC).
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::new(dt.timestamp(), dt.offset().local_minus_utc() / 60));
        }
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(Self::new(naive.and_utc().timestamp(), 0));
        }
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let naive = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
            return Ok(Self::new(naive.and_utc().timestamp(), 0));
        }
        Err(TypeError::InvalidTimestamp(s.to_string()))
    }

    /// Short date form (`YYYY-MM-DD`) for one-line listings.
    pub fn format_date(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => format!("@{}", self.seconds),
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.seconds, self.offset_minutes).cmp(&(other.seconds, other.offset_minutes))
    }
}

/// Author or committer identity attached to a commit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// When the action happened.
    pub when: Timestamp,
}

impl Signature {
    /// Create a new signature.
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: Timestamp) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
