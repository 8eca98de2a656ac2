//! Order Numbers
//!
//! Public order identifiers of the form `ORD-YYYYMMDD-NNN`, where `NNN` is the 1-based
//! ordinal of the order within its UTC calendar day, zero padded to at least three
//! digits.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use thiserror::Error;

const PREFIX: &str = "ORD-";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    #[error("order number must look like ORD-YYYYMMDD-NNN: {0}")]
    Malformed(String),

    #[error("order number sequence must be at least 1")]
    ZeroSequence,
}

/// A date-scoped, sequential order number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Format the `sequence`th order number of `day`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::ZeroSequence`] when `sequence` is zero.
    pub fn format(day: Date, sequence: u32) -> Result<Self, OrderNumberError> {
        if sequence == 0 {
            return Err(OrderNumberError::ZeroSequence);
        }

        Ok(Self(format!(
            "{PREFIX}{}-{sequence:03}",
            day.strftime("%Y%m%d")
        )))
    }

    /// `LIKE` pattern matching every order number of `day`.
    #[must_use]
    pub fn day_pattern(day: Date) -> String {
        format!("{PREFIX}{}-%", day.strftime("%Y%m%d"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The calendar day this number belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::Malformed`] when the number cannot be parsed.
    pub fn day(&self) -> Result<Date, OrderNumberError> {
        self.parts().map(|(day, _)| day)
    }

    /// The ordinal of this order within its day.
    ///
    /// # Errors
    ///
    /// Returns [`OrderNumberError::Malformed`] when the number cannot be parsed.
    pub fn sequence(&self) -> Result<u32, OrderNumberError> {
        self.parts().map(|(_, sequence)| sequence)
    }

    fn parts(&self) -> Result<(Date, u32), OrderNumberError> {
        let malformed = || OrderNumberError::Malformed(self.0.clone());

        let rest = self.0.strip_prefix(PREFIX).ok_or_else(malformed)?;
        let (day, sequence) = rest.split_once('-').ok_or_else(malformed)?;

        if day.len() != 8 || !day.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        if sequence.len() < 3 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let day = Date::strptime("%Y%m%d", day).map_err(|_| malformed())?;
        let sequence: u32 = sequence.parse().map_err(|_| malformed())?;

        if sequence == 0 {
            return Err(OrderNumberError::ZeroSequence);
        }

        Ok((day, sequence))
    }
}

impl FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = Self(s.to_string());

        number.parts()?;

        Ok(number)
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_with_three_digit_padding() -> TestResult {
        let number = OrderNumber::format(date(2024, 1, 15), 1)?;

        assert_eq!(number.as_str(), "ORD-20240115-001");

        Ok(())
    }

    #[test]
    fn sequences_past_999_widen() -> TestResult {
        let number = OrderNumber::format(date(2024, 1, 15), 1234)?;

        assert_eq!(number.as_str(), "ORD-20240115-1234");
        assert_eq!(number.sequence()?, 1234);

        Ok(())
    }

    #[test]
    fn zero_sequence_is_rejected() {
        assert_eq!(
            OrderNumber::format(date(2024, 1, 15), 0),
            Err(OrderNumberError::ZeroSequence)
        );
    }

    #[test]
    fn parses_day_and_sequence() -> TestResult {
        let number: OrderNumber = "ORD-20260310-042".parse()?;

        assert_eq!(number.day()?, date(2026, 3, 10));
        assert_eq!(number.sequence()?, 42);

        Ok(())
    }

    #[test]
    fn rejects_malformed_numbers() {
        for input in [
            "",
            "ORD-",
            "ORD-2026031-001",
            "ORD-20260310-01",
            "ORD-20261310-001",
            "ord-20260310-001",
            "ORD-20260310-00a",
            "ORD-20260310001",
        ] {
            assert!(input.parse::<OrderNumber>().is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn day_pattern_matches_prefix() {
        assert_eq!(OrderNumber::day_pattern(date(2026, 3, 10)), "ORD-20260310-%");
    }
}
