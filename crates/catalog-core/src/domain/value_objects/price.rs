//! Price value object.
//!
//! A price is a non-negative fixed-point amount with exactly two decimal
//! places and at most ten significant digits, matching `NUMERIC(10,2)`.
//!
//! On the wire (HTTP bodies and cache entries) a price travels as a JSON
//! number, i.e. a binary float. Decoding parses the float's shortest
//! decimal representation and rescales it to two places, so every value
//! that fits `NUMERIC(10,2)` survives the trip unchanged. Inputs with more
//! than two significant decimals are rejected rather than rounded.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for price validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must not be negative: {0}")]
    Negative(Decimal),

    #[error("price must have at most {max} decimal places: {value}", max = Price::SCALE)]
    TooManyDecimals { value: Decimal },

    #[error("price exceeds the maximum of {max}: {value}", max = Price::max())]
    TooLarge { value: Decimal },

    #[error("not a decimal number: {0}")]
    Unparseable(String),
}

/// Price value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places.
    pub const SCALE: u32 = 2;
    /// Total number of significant digits.
    pub const PRECISION: u32 = 10;

    /// Creates a price after validating sign, scale and magnitude.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        if amount.normalize().scale() > Self::SCALE {
            return Err(PriceError::TooManyDecimals { value: amount });
        }
        if amount > Self::max() {
            return Err(PriceError::TooLarge { value: amount });
        }

        let mut amount = amount;
        amount.rescale(Self::SCALE);
        Ok(Self(amount))
    }

    /// Largest representable price, `99999999.99`.
    #[must_use]
    pub fn max() -> Decimal {
        Decimal::new(9_999_999_999, Self::SCALE)
    }

    /// Zero.
    #[must_use]
    pub fn zero() -> Self {
        Self(Decimal::new(0, Self::SCALE))
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount as a binary float, the form used on the wire.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    fn from_f64(value: f64) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(&value.to_string())
            .map_err(|_| PriceError::Unparseable(value.to_string()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Unparseable(s.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a non-negative decimal number with at most two decimal places")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Price::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Price::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Price::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}
