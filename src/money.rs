use rust_decimal::Decimal;
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

/// Represents a unit value or a cost.
///
/// The amount is held as an exact decimal, so summing many
/// quantity × unit value products never drifts. The [`Display`]
/// implementation rounds to 2 decimal places.
///
/// ```
/// # use std::str::FromStr;
/// # use matreport::Money;
/// let unit = Money::from_str("2.50").unwrap();
/// assert_eq!(unit.checked_mul(3).unwrap().to_string(), "7.50");
/// ```
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Money(Decimal);

impl Money {
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns `self + rhs`, or `None` if the sum is out of range.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Returns `self × quantity`, or `None` if the product is out of range.
    #[must_use]
    pub fn checked_mul(self, quantity: u64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", two_places(self.0))
    }
}

impl FromStr for Money {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|e| anyhow::anyhow!("invalid amount {s:?}: {e}"))?;
        Ok(Self(amount))
    }
}

/// Rounds half to even at 2 decimal places and keeps trailing zeros.
pub(crate) fn two_places(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded
}
