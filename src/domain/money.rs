use crate::error::RegistryError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A non-negative amount of money in rupees.
///
/// Wraps `rust_decimal::Decimal` so fees and payments can never go below
/// zero once they enter the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest single amount accepted: one billion rupees. Keeps every sum
    /// of stored amounts far below `Decimal::MAX`, so addition cannot
    /// overflow.
    pub const MAX: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    pub fn new(value: Decimal) -> Result<Self, RegistryError> {
        if value < Decimal::ZERO {
            Err(RegistryError::validation("Amount must not be negative"))
        } else if value > Self::MAX.0 {
            Err(RegistryError::validation(format!(
                "Amount cannot exceed {}",
                Self::MAX
            )))
        } else {
            Ok(Self(value))
        }
    }

    /// Builds an amount from whole rupees.
    pub const fn rupees(value: u32) -> Self {
        Self(Decimal::from_parts(value, 0, 0, false, 0))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// What is left of `self` once `paid` is subtracted, floored at zero.
    pub fn remaining_after(self, paid: Amount) -> Amount {
        if paid.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - paid.0)
        }
    }

    /// Drops trailing zeros so `150.00` renders as `150`.
    pub fn normalized(self) -> Decimal {
        self.0.normalize()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = RegistryError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
