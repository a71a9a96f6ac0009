use chrono::{Datelike, TimeZone, Utc};
use chrono_tz::America::New_York;
use time::{Date, Month, OffsetDateTime};

use super::{civil::CivilDate, eastern};

/// Source of "now". Injected so date-dependent views stay deterministic in tests.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.0
    }
}

/// Current calendar date in US Eastern, whatever the host timezone is.
///
/// Read from the America/New_York tz database; the fixed daylight-saving rule
/// is only used if the instant cannot be mapped.
pub fn today(clock: &dyn Clock) -> CivilDate {
    let now = clock.now_utc();
    zoned_date(now)
        .unwrap_or_else(|| CivilDate::from_date(now.to_offset(eastern::offset_at(now)).date()))
}

fn zoned_date(now: OffsetDateTime) -> Option<CivilDate> {
    let local = Utc
        .timestamp_opt(now.unix_timestamp(), now.nanosecond())
        .single()?
        .with_timezone(&New_York);
    let month = Month::try_from(u8::try_from(local.month()).ok()?).ok()?;
    let day = u8::try_from(local.day()).ok()?;
    Date::from_calendar_date(local.year(), month, day)
        .ok()
        .map(CivilDate::from_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn today_at(now: OffsetDateTime) -> String {
        today(&FixedClock(now)).to_string()
    }

    #[test]
    fn late_evening_eastern_is_still_the_previous_day() {
        // 23:30 EST on Jan 4th
        assert_eq!(today_at(datetime!(2024-01-05 04:30 UTC)), "2024-01-04");
        assert_eq!(today_at(datetime!(2024-01-05 05:00 UTC)), "2024-01-05");
    }

    #[test]
    fn summer_uses_daylight_offset() {
        assert_eq!(today_at(datetime!(2024-06-15 03:59 UTC)), "2024-06-14");
        assert_eq!(today_at(datetime!(2024-06-15 04:00 UTC)), "2024-06-15");
    }

    #[test]
    fn independent_of_input_offset() {
        let tokyo = datetime!(2024-06-15 09:00 +9);
        assert_eq!(today_at(tokyo), "2024-06-14");
    }

    #[test]
    fn tz_database_agrees_with_the_fixed_rule_today() {
        let mut now = datetime!(2024-01-01 00:00 UTC);
        while now < datetime!(2025-01-01 00:00 UTC) {
            let by_rule = now.to_offset(eastern::offset_at(now)).date();
            assert_eq!(zoned_date(now).map(CivilDate::date), Some(by_rule), "at {now}");
            now += time::Duration::minutes(30);
        }
    }

    #[test]
    fn historical_dates_follow_the_tz_database() {
        // DST began April 2nd in 2006, so 04:30 UTC on March 20th was 23:30 EST
        assert_eq!(today_at(datetime!(2006-03-20 04:30 UTC)), "2006-03-19");
    }

    #[test]
    fn system_clock_yields_a_date() {
        let d = today(&SystemClock);
        assert!(d.date().year() >= 2024);
    }
}
