use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use time::{Date, Duration, Month, OffsetDateTime, Time, UtcOffset};

use super::eastern;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date format: {0:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),
}

/// Calendar date in US Eastern, no time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate(Date);

/// UTC instant of local midnight on a [`CivilDate`]; the stored form of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalInstant(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

pub fn parse_civil_date(s: &str) -> Result<CivilDate, DateError> {
    lazy_static! {
        static ref CIVIL_DATE_RE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
    }
    let invalid = || DateError::InvalidDateFormat(s.to_string());
    if !CIVIL_DATE_RE.is_match(s) {
        return Err(invalid());
    }

    let year: i32 = s[0..4].parse().map_err(|_| invalid())?;
    let month: u8 = s[5..7].parse().map_err(|_| invalid())?;
    let day: u8 = s[8..10].parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;
    let date = Date::from_calendar_date(year, month, day).map_err(|_| invalid())?;
    Ok(CivilDate(date))
}

pub fn to_canonical_instant(d: CivilDate) -> CanonicalInstant {
    let local_midnight = d.0.with_time(Time::MIDNIGHT);
    let offset = eastern::offset_for_date(d.0);
    CanonicalInstant(local_midnight.assume_offset(offset).to_offset(UtcOffset::UTC))
}

/// Reads the UTC calendar fields directly: local midnight is always 04:00 or
/// 05:00 UTC on the same day.
pub fn to_civil_date(t: CanonicalInstant) -> CivilDate {
    CivilDate(t.0.to_offset(UtcOffset::UTC).date())
}

impl CivilDate {
    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn date(self) -> Date {
        self.0
    }

    pub fn next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// `self` minus `days`, or `None` outside the representable range.
    pub fn days_before(self, days: u32) -> Option<Self> {
        self.0.checked_sub(Duration::days(days.into())).map(Self)
    }
}

impl CanonicalInstant {
    /// Wraps an instant read back from storage.
    pub fn from_stored(t: OffsetDateTime) -> Self {
        Self(t)
    }

    pub fn as_offset_date_time(self) -> OffsetDateTime {
        self.0
    }

    pub fn civil_date(self) -> CivilDate {
        to_civil_date(self)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Serialize for CivilDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CivilDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_civil_date(&s).map_err(serde::de::Error::custom)
    }
}
