//! # Temporal Types: Precision-Aware Timestamps
//!
//! Metadata sources rarely agree on how precise a date is: a publication
//! year, a month, a day, or a full instant. [`Timestamp`] accepts every shape
//! matched by [`TIMESTAMP_REGEX`], normalizes the instant to UTC and keeps
//! the precision it was given so that rendering round-trips.
//!
//! Inputs without an offset are taken as UTC. Inputs with an offset are
//! converted.
//!
//! The schema layer treats `date` and `date-time` as one format; this type
//! is the only temporal implementation and covers both.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

/// Pattern every timestamp string must match.
pub const TIMESTAMP_REGEX: &str =
    r"^\d{4}(-\d{2}(-\d{2}(T\d{2}:\d{2}:\d{2}(\.\d{1,6})?(Z|[+-]\d{2}:\d{2})?)?)?)?$";

static TIMESTAMP_COMPONENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<year>\d{4})(?:-(?P<month>\d{2})(?:-(?P<day>\d{2})",
        r"(?:T(?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})",
        r"(?:\.(?P<fraction>\d{1,6}))?(?P<offset>Z|[+-]\d{2}:\d{2})?)?)?)?$",
    ))
    .expect("valid regex")
});

/// How much of a timestamp is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPrecision {
    /// `YYYY`
    Year,
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM-DD`
    Day,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    Second,
    /// `YYYY-MM-DDTHH:MM:SS.ffffffZ`
    Microsecond,
}

/// A UTC instant together with the precision it was given at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp {
    instant: DateTime<Utc>,
    precision: TimestampPrecision,
}

impl Timestamp {
    /// Wrap a UTC instant at second precision.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self::with_precision(instant, TimestampPrecision::Second)
    }

    /// Wrap a UTC instant at the given precision.
    pub fn with_precision(instant: DateTime<Utc>, precision: TimestampPrecision) -> Self {
        Self { instant, precision }
    }

    /// Parse a timestamp string of any supported precision.
    ///
    /// # Errors
    ///
    /// Returns `TimestampError::PatternMismatch` if the string does not match
    /// [`TIMESTAMP_REGEX`], `TimestampError::OutOfRange` if its components do
    /// not form a valid date, time or offset.
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        let caps = TIMESTAMP_COMPONENTS
            .captures(value)
            .ok_or_else(|| TimestampError::PatternMismatch(value.to_string()))?;
        let out_of_range = |reason: &str| TimestampError::OutOfRange {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let year = component(&caps, "year").unwrap_or(0) as i32;
        let month = component(&caps, "month");
        let day = component(&caps, "day");
        let date = NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1))
            .ok_or_else(|| out_of_range("invalid calendar date"))?;

        let (time, precision) = match component(&caps, "hour") {
            None => {
                let precision = match (month, day) {
                    (None, _) => TimestampPrecision::Year,
                    (Some(_), None) => TimestampPrecision::Month,
                    (Some(_), Some(_)) => TimestampPrecision::Day,
                };
                (NaiveTime::MIN, precision)
            }
            Some(hour) => {
                let minute = component(&caps, "minute").unwrap_or(0);
                let second = component(&caps, "second").unwrap_or(0);
                let (micros, precision) = match caps.name("fraction") {
                    Some(fraction) => (
                        fraction_to_micros(fraction.as_str()),
                        TimestampPrecision::Microsecond,
                    ),
                    None => (0, TimestampPrecision::Second),
                };
                let time = NaiveTime::from_hms_micro_opt(hour, minute, second, micros)
                    .ok_or_else(|| out_of_range("invalid time of day"))?;
                (time, precision)
            }
        };

        let offset = match caps.name("offset").map(|m| m.as_str()) {
            None | Some("Z") => FixedOffset::east_opt(0),
            Some(offset) => parse_offset(offset),
        }
        .ok_or_else(|| out_of_range("invalid utc offset"))?;

        let instant = offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .ok_or_else(|| out_of_range("ambiguous local time"))?
            .with_timezone(&Utc);

        Ok(Self { instant, precision })
    }

    /// Access the UTC instant.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.instant
    }

    /// The precision this timestamp was given at.
    pub fn precision(&self) -> TimestampPrecision {
        self.precision
    }

    /// Render at the stored precision, always in UTC.
    pub fn to_iso8601(&self) -> String {
        let format = match self.precision {
            TimestampPrecision::Year => "%Y",
            TimestampPrecision::Month => "%Y-%m",
            TimestampPrecision::Day => "%Y-%m-%d",
            TimestampPrecision::Second => "%Y-%m-%dT%H:%M:%SZ",
            TimestampPrecision::Microsecond => "%Y-%m-%dT%H:%M:%S%.6fZ",
        };
        self.instant.format(format).to_string()
    }
}

fn component(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

fn fraction_to_micros(fraction: &str) -> u32 {
    let padded = format!("{fraction:0<6}");
    padded.parse().unwrap_or(0)
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let (hours, minutes) = offset.get(1..)?.split_once(':')?;
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    FixedOffset::east_opt(sign * seconds)
}

impl TryFrom<String> for Timestamp {
    type Error = TimestampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_iso8601()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}
