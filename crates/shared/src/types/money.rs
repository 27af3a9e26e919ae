//! Invoice amounts stored in minor currency units.
//!
//! Forms submit amounts in major units (`12.50`); storage keeps integer
//! cents (`1250`). Conversion goes through `rust_decimal::Decimal`, never
//! through floating point.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minor units per major unit.
const MINOR_PER_MAJOR: i64 = 100;

/// Errors converting a major-unit amount into cents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount does not fit into 64-bit cents.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// An amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    /// Converts a major-unit amount to cents, rounding half away from zero
    /// at the third decimal place.
    pub fn from_major(amount: Decimal) -> Result<Self, MoneyError> {
        let scaled = amount
            .checked_mul(Decimal::from(MINOR_PER_MAJOR))
            .ok_or(MoneyError::OutOfRange(amount))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        scaled
            .to_i64()
            .map(Self)
            .ok_or(MoneyError::OutOfRange(amount))
    }

    /// Returns the amount in major units with two decimal places.
    #[must_use]
    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the raw number of cents.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_major())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(12.50), 1250)]
    #[case(dec!(1), 100)]
    #[case(dec!(0.01), 1)]
    #[case(dec!(0.005), 1)]
    #[case(dec!(0.004), 0)]
    #[case(dec!(157.95), 15795)]
    fn test_from_major(#[case] major: Decimal, #[case] cents: i64) {
        assert_eq!(Cents::from_major(major).unwrap(), Cents(cents));
    }

    #[test]
    fn test_from_major_out_of_range() {
        assert!(matches!(
            Cents::from_major(Decimal::MAX),
            Err(MoneyError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_to_major_and_display() {
        assert_eq!(Cents(15795).to_major(), dec!(157.95));
        assert_eq!(Cents(15795).to_string(), "157.95");
        assert_eq!(Cents(100).to_string(), "1.00");
    }
}
