//! Exact rational numbers over arbitrary precision integers
//!
//! Unit scales are kept as [`Fraction`]s so composing units never loses
//! precision. They only become floats at the very last step of a conversion.

use std::{
    fmt::Display,
    ops::{Div, Mul},
    str::FromStr,
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An exact rational number
///
/// The denominator is always positive and the fraction is always in lowest
/// terms, so two equal values are also structurally equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

/// Error when a fraction cannot be created or parsed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Denominator cannot be zero")]
    ZeroDenominator,

    #[error("Invalid fraction format (cannot parse '{0}')")]
    Invalid(String),
}

impl Fraction {
    /// Creates a new normalized fraction
    ///
    /// The sign is moved to the numerator and both terms are divided by their
    /// greatest common divisor.
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, FormatError> {
        let mut numerator = numerator.into();
        let mut denominator = denominator.into();
        if denominator.is_zero() {
            return Err(FormatError::ZeroDenominator);
        }
        if denominator.is_negative() {
            numerator = -numerator;
            denominator = -denominator;
        }
        let gcd = numerator.abs().gcd(&denominator);
        if !gcd.is_one() {
            numerator /= &gcd;
            denominator /= &gcd;
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// `n/1`
    pub fn from_integer(integer: impl Into<BigInt>) -> Self {
        Self {
            numerator: integer.into(),
            denominator: BigInt::one(),
        }
    }

    /// `1/1`
    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// `10^power`, or its reciprocal when `power` is negative
    ///
    /// ```
    /// # use unitcore::fraction::Fraction;
    /// assert_eq!(Fraction::power_of_ten(-3).to_string(), "1/1000");
    /// assert_eq!(Fraction::power_of_ten(2).to_string(), "100/1");
    /// ```
    pub fn power_of_ten(power: i32) -> Self {
        let magnitude = power_of_ten(power.unsigned_abs());
        if power < 0 {
            Self {
                numerator: BigInt::one(),
                denominator: magnitude,
            }
        } else {
            Self::from_integer(magnitude)
        }
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_one(&self) -> bool {
        self.numerator.is_one() && self.denominator.is_one()
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    /// Reciprocal, [`None`] for zero
    pub fn recip(&self) -> Option<Self> {
        Self::new(self.denominator.clone(), self.numerator.clone()).ok()
    }

    /// Division that returns [`None`] instead of panicking on a zero divisor
    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        Self::new(
            &self.numerator * &rhs.denominator,
            &self.denominator * &rhs.numerator,
        )
        .ok()
    }

    /// Product of all the fractions, `1/1` when empty
    pub fn product<'a>(fractions: impl IntoIterator<Item = &'a Fraction>) -> Self {
        fractions
            .into_iter()
            .fold(Self::one(), |acc, fraction| &acc * fraction)
    }

    /// Converts to a float
    ///
    /// Each term is converted on its own, so precision is lost when the terms
    /// are too large for an `f64` even if their ratio is not.
    pub fn to_f64(&self) -> f64 {
        let numerator = self.numerator.to_f64().unwrap_or(f64::NAN);
        let denominator = self.denominator.to_f64().unwrap_or(f64::NAN);
        numerator / denominator
    }
}

/// `10^power`
pub fn power_of_ten(power: u32) -> BigInt {
    BigInt::from(10u32).pow(power)
}

/// `2^power`
pub fn power_of_two(power: u32) -> BigInt {
    BigInt::from(2u32).pow(power)
}

static FRACTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(?:[/.][0-9]+)?$").expect("valid fraction regex"));

impl FromStr for Fraction {
    type Err = FormatError;

    /// Parses one of three formats: `5`, `5/2` or `5.2`, with an optional
    /// leading `-`.
    ///
    /// Decimals are converted without going through a float, `5.25` is
    /// `525/100` reduced.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !FRACTION_RE.is_match(text) {
            return Err(FormatError::Invalid(text.to_string()));
        }
        let invalid = |_| FormatError::Invalid(text.to_string());
        if let Some((numerator, denominator)) = text.split_once('/') {
            let numerator = numerator.parse::<BigInt>().map_err(invalid)?;
            let denominator = denominator.parse::<BigInt>().map_err(invalid)?;
            return Self::new(numerator, denominator);
        }
        if let Some((integer, decimals)) = text.split_once('.') {
            let numerator = format!("{integer}{decimals}")
                .parse::<BigInt>()
                .map_err(invalid)?;
            let places = u32::try_from(decimals.len())
                .map_err(|_| FormatError::Invalid(text.to_string()))?;
            return Self::new(numerator, power_of_ten(places));
        }
        Ok(Self::from_integer(text.parse::<BigInt>().map_err(invalid)?))
    }
}

impl Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl Mul for &Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Self) -> Fraction {
        Fraction::new(
            &self.numerator * &rhs.numerator,
            &self.denominator * &rhs.denominator,
        )
        .expect("product of positive denominators is not zero")
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Self) -> Fraction {
        &self * &rhs
    }
}

impl Div for &Fraction {
    type Output = Fraction;

    /// # Panics
    /// If `rhs` is zero. See [`Fraction::checked_div`].
    fn div(self, rhs: Self) -> Fraction {
        self.checked_div(rhs).expect("division by a zero fraction")
    }
}

impl Div for Fraction {
    type Output = Fraction;

    fn div(self, rhs: Self) -> Fraction {
        &self / &rhs
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl Serialize for Fraction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
