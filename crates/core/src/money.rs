//! Currency-tagged fixed-point amounts and rounding helpers.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::constants::{MONEY_SCALE, QUANTITY_THRESHOLD, QUOTE_SCALE, SHARE_SCALE};

/// Rounds an amount to the minor currency unit, half away from zero.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a share count to share precision.
pub fn round_shares(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SHARE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a per-share figure (cost per share, dividend per share).
pub fn round_quote(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QUOTE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold =
        Decimal::from_str_radix(QUANTITY_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}

/// An amount in a specific currency, always held at minor-unit precision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Money {
            amount: round_amount(amount),
            currency: currency.to_string(),
        }
    }

    pub fn zero(currency: &str) -> Self {
        Money {
            amount: Decimal::ZERO,
            currency: currency.to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Sums amounts of one currency, starting from zero.
    pub fn sum<'a>(currency: &str, values: impl IntoIterator<Item = &'a Money>) -> Money {
        values
            .into_iter()
            .fold(Money::zero(currency), |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

impl Add<&Money> for Money {
    type Output = Money;

    fn add(self, rhs: &Money) -> Money {
        debug_assert_eq!(self.currency, rhs.currency, "adding amounts of different currencies");
        Money {
            amount: self.amount + rhs.amount,
            currency: self.currency,
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self + &rhs
    }
}

impl Sub<&Money> for Money {
    type Output = Money;

    fn sub(self, rhs: &Money) -> Money {
        debug_assert_eq!(self.currency, rhs.currency, "subtracting amounts of different currencies");
        Money {
            amount: self.amount - rhs.amount,
            currency: self.currency,
        }
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        self - &rhs
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money {
            amount: -self.amount,
            currency: self.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec!(433.395), "EUR").amount, dec!(433.40));
        assert_eq!(Money::new(dec!(-433.395), "EUR").amount, dec!(-433.40));
        assert_eq!(Money::new(dec!(433.394), "EUR").amount, dec!(433.39));
    }

    #[test]
    fn test_arithmetic_keeps_currency() {
        let a = Money::new(dec!(10.50), "USD");
        let b = Money::new(dec!(0.25), "USD");
        assert_eq!((a.clone() + &b).amount, dec!(10.75));
        assert_eq!((a.clone() - b).amount, dec!(10.25));
        assert_eq!((-a).amount, dec!(-10.50));
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total = Money::sum("EUR", std::iter::empty());
        assert!(total.is_zero());
        assert_eq!(total.currency, "EUR");
    }

    #[test]
    fn test_share_rounding() {
        assert_eq!(round_shares(dec!(1.123456785)), dec!(1.12345679));
        assert!(!is_quantity_significant(&dec!(0.000000001)));
        assert!(is_quantity_significant(&dec!(0.00000001)));
    }
}
