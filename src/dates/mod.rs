//! Civil dates in the US Eastern reference timezone and their stored form.

mod civil;
mod clock;
mod eastern;

pub use civil::{
    parse_civil_date, to_canonical_instant, to_civil_date, CanonicalInstant, CivilDate, DateError,
};
pub use clock::{today, Clock, FixedClock, SystemClock};
