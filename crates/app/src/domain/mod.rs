//! Apothecary Domain Concerns

use jiff::{Timestamp, civil::Date, tz::TimeZone};

pub mod carts;
pub mod catalog;
pub mod orders;
pub mod patients;

/// The UTC calendar day of `at`. Pricing and order numbering are both keyed on it.
#[must_use]
pub fn utc_date(at: Timestamp) -> Date {
    at.to_zoned(TimeZone::UTC).date()
}
