//! Post dates
//!
//! Front matter dates are either a plain `YYYY-MM-DD` calendar date or an
//! ISO-8601 / RFC 3339 datetime. The source string is kept verbatim so the
//! generated artifact reproduces exactly what the author wrote.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

fn plain_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern is valid"))
}

#[derive(Debug, Clone, Copy)]
enum Moment {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    /// A datetime without an offset, read as UTC
    Naive(NaiveDateTime),
}

/// A parsed post date that remembers its source text
///
/// Dates compare by the instant they denote. A plain date denotes midnight UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PostDate {
    raw: String,
    moment: Moment,
}

impl PostDate {
    /// Parse a front matter date string
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let moment = if plain_date_pattern().is_match(trimmed) {
            Moment::Date(NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()?)
        } else if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            Moment::DateTime(dt)
        } else {
            let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
                .ok()?;
            Moment::Naive(naive)
        };

        Some(Self {
            raw: trimmed.to_string(),
            moment,
        })
    }

    /// The date exactly as written in the front matter
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The instant this date denotes, in UTC
    pub fn instant(&self) -> DateTime<Utc> {
        match self.moment {
            Moment::Date(d) => d.and_time(NaiveTime::default()).and_utc(),
            Moment::DateTime(dt) => dt.with_timezone(&Utc),
            Moment::Naive(n) => n.and_utc(),
        }
    }

    /// Seconds since the Unix epoch
    pub fn timestamp(&self) -> i64 {
        self.instant().timestamp()
    }

    /// Calendar date in the given UTC offset
    ///
    /// A plain date is taken to be midnight in that offset, so it never shifts.
    pub fn local_date(&self, offset_minutes: i32) -> NaiveDate {
        let offset = FixedOffset::east_opt(offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        match self.moment {
            Moment::Date(d) => d,
            Moment::DateTime(dt) => dt.with_timezone(&offset).date_naive(),
            Moment::Naive(n) => n.and_utc().with_timezone(&offset).date_naive(),
        }
    }

    /// Human-readable date, e.g. `Jan 4, 2024`
    pub fn format_display(&self, offset_minutes: i32) -> String {
        self.local_date(offset_minutes).format("%b %-d, %Y").to_string()
    }
}

impl PartialEq for PostDate {
    fn eq(&self, other: &Self) -> bool {
        self.instant() == other.instant()
    }
}

impl Eq for PostDate {}

impl PartialOrd for PostDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PostDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant().cmp(&other.instant())
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<PostDate> for String {
    fn from(date: PostDate) -> Self {
        date.raw
    }
}

impl TryFrom<String> for PostDate {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        PostDate::parse(&value).ok_or_else(|| format!("unparseable date {:?}", value))
    }
}
