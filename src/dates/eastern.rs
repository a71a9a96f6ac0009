//! US Eastern daylight-saving rule.
//!
//! Daylight time (UTC-4) runs from the second Sunday of March until the
//! first Sunday of November; everything else is standard time (UTC-5).

use time::{macros::offset, Date, Duration, Month, OffsetDateTime, Time, UtcOffset};

pub const STANDARD: UtcOffset = offset!(-5);
pub const DAYLIGHT: UtcOffset = offset!(-4);

/// Day of month of the first Sunday on or after the 1st of `month`.
fn first_sunday(year: i32, month: Month) -> u8 {
    // The 1st of March and November exists for every representable year.
    let first = Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN);
    let to_sunday = (7 - first.weekday().number_days_from_sunday()) % 7;
    1 + to_sunday
}

pub fn second_sunday_of_march(year: i32) -> u8 {
    first_sunday(year, Month::March) + 7
}

pub fn first_sunday_of_november(year: i32) -> u8 {
    first_sunday(year, Month::November)
}

/// Whether local midnight of `date` falls in daylight time.
///
/// Resolved from the calendar date alone, never from the current instant.
pub fn is_daylight_date(date: Date) -> bool {
    match date.month() {
        Month::April
        | Month::May
        | Month::June
        | Month::July
        | Month::August
        | Month::September
        | Month::October => true,
        Month::March => date.day() >= second_sunday_of_march(date.year()),
        Month::November => date.day() < first_sunday_of_november(date.year()),
        _ => false,
    }
}

pub fn offset_for_date(date: Date) -> UtcOffset {
    if is_daylight_date(date) {
        DAYLIGHT
    } else {
        STANDARD
    }
}

/// Offset in force at an arbitrary instant.
///
/// Clocks change at 02:00 local: 07:00 UTC in March, 06:00 UTC in November.
pub fn offset_at(instant: OffsetDateTime) -> UtcOffset {
    let utc = instant.to_offset(UtcOffset::UTC);
    let year = utc.year();
    let transition = |month, day: u8, hour: u8| {
        Date::from_calendar_date(year, month, day)
            .map(|d| d.with_time(Time::MIDNIGHT).assume_utc() + Duration::hours(hour.into()))
    };
    match (
        transition(Month::March, second_sunday_of_march(year), 7),
        transition(Month::November, first_sunday_of_november(year), 6),
    ) {
        (Ok(start), Ok(end)) if utc >= start && utc < end => DAYLIGHT,
        _ => STANDARD,
    }
}
