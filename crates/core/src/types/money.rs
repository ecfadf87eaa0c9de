//! Fixed-point money with two decimal places.
//!
//! Every monetary column in the schema is `decimal(11,2)`. Arithmetic on them
//! rounds half-up (midpoint away from zero) to two places after each step, so
//! `10.005` becomes `10.01` and `0.125` becomes `0.13`.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept for money.
pub const MONEY_SCALE: u32 = 2;

/// Round a decimal to two places using round-half-up.
///
/// The result always carries a scale of exactly two, so `5` becomes `5.00`.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// A monetary amount, always rounded to two decimal places.
///
/// Construction goes through [`round2`], so an `Amount` can never hold a
/// third decimal digit. Addition rounds again, which is a no-op for two
/// rounded operands but keeps the rounding step explicit.
///
/// ```
/// use northwind_core::Amount;
/// use rust_decimal::Decimal;
///
/// let price = Amount::new(Decimal::new(10_005, 3)); // 10.005
/// assert_eq!(price.to_string(), "10.01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero, with a scale of two (`0.00`).
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// Create an amount, rounding half-up to two decimal places.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        Self(round2(value))
    }

    /// Create an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, MONEY_SCALE))
    }

    /// Price times quantity for one order line.
    ///
    /// Both factors are rounded to two places before multiplying and the
    /// product is rounded again. Rounding an integer quantity is a no-op.
    #[must_use]
    pub fn line(unit_price: Decimal, quantity: i32) -> Self {
        Self::new(round2(unit_price) * round2(Decimal::from(quantity)))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(10.005)), dec!(10.01));
        assert_eq!(round2(dec!(3.333)), dec!(3.33));
        assert_eq!(round2(dec!(5.005)), dec!(5.01));
    }

    #[test]
    fn test_round2_negative_midpoint_away_from_zero() {
        assert_eq!(round2(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn test_round2_pads_scale() {
        assert_eq!(round2(dec!(5)).to_string(), "5.00");
        assert_eq!(round2(dec!(1.5)).to_string(), "1.50");
    }

    #[test]
    fn test_zero_displays_two_places() {
        assert_eq!(Amount::ZERO.to_string(), "0.00");
        assert!(Amount::ZERO.is_zero());
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    #[test]
    fn test_line_rounds_price_before_multiplying() {
        // 10.005 rounds to 10.01 first; unrounded it would give 20.01
        assert_eq!(Amount::line(dec!(10.005), 2), Amount::from_cents(2002));
        assert_eq!(Amount::line(dec!(3.333), 1), Amount::from_cents(333));
    }

    #[test]
    fn test_sum_of_amounts() {
        let total: Amount = [Amount::from_cents(2002), Amount::from_cents(333)]
            .into_iter()
            .sum();
        assert_eq!(total.to_string(), "23.35");
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Amount = core::iter::empty().sum();
        assert_eq!(total.to_string(), "0.00");
    }

    #[test]
    fn test_serde_uses_decimal_string_and_rounds_on_read() {
        let json = serde_json::to_string(&Amount::from_cents(2836)).unwrap();
        assert_eq!(json, "\"28.36\"");

        let parsed: Amount = serde_json::from_str("\"5.005\"").unwrap();
        assert_eq!(parsed, Amount::from_cents(501));
    }
}
