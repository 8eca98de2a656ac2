//! Money
//!
//! Amounts are integer minor units (cents). Discounts are percentages with up to two
//! decimal places.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use sqlx::{Row, postgres::PgRow};
use thiserror::Error;

/// Errors raised by amount arithmetic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount overflow")]
    Overflow,

    #[error("discount percent {0} is outside 0..=100")]
    InvalidPercent(Decimal),

    #[error("invalid discount percent: {0}")]
    Parse(String),
}

/// A discount percentage in the range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal percentage.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidPercent`] when the value is outside `0..=100`.
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(MoneyError::InvalidPercent(value));
        }

        Ok(Self(value.normalize()))
    }

    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for DiscountPercent {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl FromStr for DiscountPercent {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| MoneyError::Parse(e.to_string()))?;

        Self::new(value)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Computed amounts for one priced line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineAmounts {
    /// `unit_price × quantity`
    pub gross: u64,
    pub discount: u64,
    /// `gross − discount`
    pub total: u64,
}

impl LineAmounts {
    /// Price a line. The discounted total is rounded half away from zero to whole
    /// minor units and the discount is whatever remains of the gross.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] when the gross does not fit in a `u64`.
    pub fn compute(
        unit_price: u64,
        quantity: u32,
        discount_percent: DiscountPercent,
    ) -> Result<Self, MoneyError> {
        let gross = unit_price
            .checked_mul(u64::from(quantity))
            .ok_or(MoneyError::Overflow)?;

        let remaining = Decimal::ONE_HUNDRED - discount_percent.as_decimal();

        let total = Decimal::from(gross)
            .checked_mul(remaining)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .ok_or(MoneyError::Overflow)?;

        Ok(Self {
            gross,
            discount: gross - total,
            total,
        })
    }
}

/// Order level totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub discount_amount: u64,
    pub tax_amount: u64,
    pub shipping_charges: u64,
    pub total_amount: u64,
}

impl OrderTotals {
    /// Sum line amounts. Tax and shipping are not charged.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] when a sum does not fit in a `u64`.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = &'a LineAmounts>,
    {
        let mut subtotal: u64 = 0;
        let mut discount_amount: u64 = 0;

        for line in lines {
            subtotal = subtotal
                .checked_add(line.gross)
                .ok_or(MoneyError::Overflow)?;

            discount_amount = discount_amount
                .checked_add(line.discount)
                .ok_or(MoneyError::Overflow)?;
        }

        let tax_amount = 0;
        let shipping_charges = 0;

        let total_amount = (subtotal - discount_amount)
            .checked_add(tax_amount)
            .and_then(|v| v.checked_add(shipping_charges))
            .ok_or(MoneyError::Overflow)?;

        Ok(Self {
            subtotal,
            discount_amount,
            tax_amount,
            shipping_charges,
            total_amount,
        })
    }
}

/// Convert a `u64` amount into a `BIGINT` bind value.
pub(crate) fn to_minor_i64(amount: u64, column: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert a `u32` quantity into an `INTEGER` bind value.
pub(crate) fn to_quantity_i32(quantity: u32, column: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_quantity(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let quantity_i32: i32 = row.try_get(col)?;

    u32::try_from(quantity_i32).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_percent(row: &PgRow, col: &str) -> Result<DiscountPercent, sqlx::Error> {
    let percent: Decimal = row.try_get(col)?;

    DiscountPercent::new(percent).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn percent(value: &str) -> Result<DiscountPercent, MoneyError> {
        value.parse()
    }

    #[test]
    fn line_without_discount_is_gross() -> TestResult {
        let line = LineAmounts::compute(500, 1, DiscountPercent::ZERO)?;

        assert_eq!(line.gross, 500);
        assert_eq!(line.discount, 0);
        assert_eq!(line.total, 500);

        Ok(())
    }

    #[test]
    fn line_discount_is_applied_to_gross() -> TestResult {
        let line = LineAmounts::compute(1000, 2, percent("10")?)?;

        assert_eq!(line.gross, 2000);
        assert_eq!(line.discount, 200);
        assert_eq!(line.total, 1800);

        Ok(())
    }

    #[test]
    fn line_total_rounds_half_away_from_zero() -> TestResult {
        // 333 × 0.875 = 291.375
        let line = LineAmounts::compute(333, 1, percent("12.5")?)?;
        assert_eq!(line.total, 291);
        assert_eq!(line.discount, 42);

        // 5 × 0.5 = 2.5
        let half = LineAmounts::compute(5, 1, percent("50")?)?;
        assert_eq!(half.total, 3);
        assert_eq!(half.discount, 2);

        Ok(())
    }

    #[test]
    fn line_law_holds_for_fractional_percents() -> TestResult {
        for value in ["0", "0.01", "7.25", "33.33", "99.99", "100"] {
            let discount = percent(value)?;

            for (price, quantity) in [(1, 1), (199, 3), (12_345, 7), (99_999, 250)] {
                let line = LineAmounts::compute(price, quantity, discount)?;

                assert_eq!(line.gross, price * u64::from(quantity));
                assert_eq!(line.total, line.gross - line.discount);
            }
        }

        Ok(())
    }

    #[test]
    fn full_discount_makes_line_free() -> TestResult {
        let line = LineAmounts::compute(1234, 3, percent("100")?)?;

        assert_eq!(line.total, 0);
        assert_eq!(line.discount, 3702);

        Ok(())
    }

    #[test]
    fn gross_overflow_is_reported() {
        let result = LineAmounts::compute(u64::MAX, 2, DiscountPercent::ZERO);

        assert_eq!(result, Err(MoneyError::Overflow));
    }

    #[test]
    fn order_totals_sum_lines() -> TestResult {
        let lines = [
            LineAmounts::compute(1000, 2, percent("10")?)?,
            LineAmounts::compute(500, 1, DiscountPercent::ZERO)?,
        ];

        let totals = OrderTotals::from_lines(&lines)?;

        assert_eq!(totals.subtotal, 2500);
        assert_eq!(totals.discount_amount, 200);
        assert_eq!(totals.tax_amount, 0);
        assert_eq!(totals.shipping_charges, 0);
        assert_eq!(totals.total_amount, 2300);

        Ok(())
    }

    #[test]
    fn order_totals_match_sum_of_line_totals() -> TestResult {
        let lines = [
            LineAmounts::compute(333, 1, percent("12.5")?)?,
            LineAmounts::compute(5, 1, percent("50")?)?,
            LineAmounts::compute(1999, 4, percent("3.3")?)?,
        ];

        let totals = OrderTotals::from_lines(&lines)?;
        let line_totals: u64 = lines.iter().map(|l| l.total).sum();

        assert_eq!(totals.total_amount, line_totals);
        assert_eq!(
            totals.total_amount,
            totals.subtotal - totals.discount_amount + totals.tax_amount + totals.shipping_charges
        );

        Ok(())
    }

    #[test]
    fn empty_order_totals_are_zero() -> TestResult {
        let lines: [LineAmounts; 0] = [];
        let totals = OrderTotals::from_lines(&lines)?;

        assert_eq!(totals, OrderTotals::default());

        Ok(())
    }

    #[test]
    fn discount_percent_rejects_out_of_range() {
        assert!(percent("-0.01").is_err());
        assert!(percent("100.01").is_err());
        assert!(percent("0").is_ok());
        assert!(percent("100").is_ok());
    }

    #[test]
    fn discount_percent_parses_and_displays() -> TestResult {
        let parsed = percent("12.50")?;

        assert_eq!(parsed.to_string(), "12.5");
        assert!("abc".parse::<DiscountPercent>().is_err());

        Ok(())
    }
}
