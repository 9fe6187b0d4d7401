use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------        Price        ---------------------------------------------------------
/// A non-negative money amount, stored as an exact decimal. The hosted service returns prices as JSON numbers.
///
/// Deserializing goes through [`Price::new`], so a negative amount is rejected wherever it comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("'{0}' is not a valid price")]
    NotANumber(String),
    #[error("Prices cannot be negative: {0}")]
    Negative(String),
}

impl Price {
    pub fn new(value: Decimal) -> Result<Self, PriceParseError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PriceParseError::Negative(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Formats the price the way the storefront shows it to customers, e.g. `99,90`.
    pub fn to_brl_string(&self) -> String {
        format!("{:.2}", self.0.round_dp(2)).replace('.', ",")
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceParseError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl From<u32> for Price {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    /// Accepts both `99.90` and `99,90`, since admins type prices with a decimal comma.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(',', ".");
        if normalized.is_empty() {
            return Err(PriceParseError::NotANumber(s.to_string()));
        }
        let value = Decimal::from_str(&normalized).map_err(|_| PriceParseError::NotANumber(s.to_string()))?;
        Self::new(value)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R$ {}", self.to_brl_string())
    }
}
