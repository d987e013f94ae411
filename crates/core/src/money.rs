//! Money
//!
//! Amounts are carried as `i64` minor units (centavos) everywhere inside the
//! crate and only become [`Money`] at the edges, for totals and display.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use thiserror::Error;

/// Currency of every amount handled by the register.
pub type Currency = iso::Currency;

/// Number of minor digits for the register currency.
const MINOR_DIGITS: u32 = 2;

/// Errors raised while converting or parsing monetary amounts.
#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    /// The text is not a decimal amount.
    #[error("monto inválido: {input}")]
    Invalid {
        /// Text as typed.
        input: String,

        /// Decimal parser failure.
        #[source]
        source: rust_decimal::Error,
    },

    /// Negative amounts are not accepted.
    #[error("el monto no puede ser negativo")]
    Negative,

    /// The amount does not fit in minor units.
    #[error("monto fuera de rango")]
    OutOfRange,
}

/// The register currency (Mexican peso).
#[must_use]
pub fn currency() -> &'static Currency {
    iso::MXN
}

/// Build a [`Money`] value in the register currency from minor units.
#[must_use]
pub fn money(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, currency())
}

/// Format minor units for display, e.g. `$1,234.50`.
#[must_use]
pub fn format_minor(minor: i64) -> String {
    money(minor).to_string()
}

/// Convert a decimal amount into minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] if the amount does not fit in `i64`
/// minor units.
pub fn decimal_to_minor(amount: Decimal) -> Result<i64, AmountError> {
    let rounded =
        amount.round_dp_with_strategy(MINOR_DIGITS, RoundingStrategy::MidpointAwayFromZero);

    rounded
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.to_i64())
        .ok_or(AmountError::OutOfRange)
}

/// Convert minor units back into a decimal amount with two places.
#[must_use]
pub fn minor_to_decimal(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_DIGITS)
}

/// Parse an amount typed by a cashier: `30`, `30.5`, `$1,030.50`.
///
/// # Errors
///
/// Returns an [`AmountError`] for malformed, negative or oversized input.
pub fn parse_amount(text: &str) -> Result<i64, AmountError> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let amount = Decimal::from_str(&cleaned).map_err(|source| AmountError::Invalid {
        input: text.trim().to_string(),
        source,
    })?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative);
    }

    decimal_to_minor(amount)
}

/// Serde adapter: minor units stored as a decimal string (`"10.50"`).
///
/// Deserialisation accepts JSON strings and numbers alike, since the backend
/// sends `DECIMAL` columns as strings.
pub mod decimal_str {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::{decimal_to_minor, minor_to_decimal};

    /// Serialise minor units as a decimal string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(minor: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&minor_to_decimal(*minor).to_string())
    }

    /// Deserialise a decimal string or number into minor units.
    ///
    /// # Errors
    ///
    /// Fails on non-decimal input or amounts outside `i64` minor units.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;

        decimal_to_minor(amount).map_err(D::Error::custom)
    }

    /// Optional variant for nullable amounts.
    pub mod option {
        use rust_decimal::Decimal;
        use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

        use super::super::{decimal_to_minor, minor_to_decimal};

        /// Serialise optional minor units as a decimal string or `null`.
        ///
        /// # Errors
        ///
        /// Propagates serializer errors.
        pub fn serialize<S: Serializer>(
            minor: &Option<i64>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match minor {
                Some(minor) => serializer.serialize_str(&minor_to_decimal(*minor).to_string()),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialise an optional decimal string or number into minor units.
        ///
        /// # Errors
        ///
        /// Fails on non-decimal input or amounts outside `i64` minor units.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<i64>, D::Error> {
            Option::<Decimal>::deserialize(deserializer)?
                .map(|amount| decimal_to_minor(amount).map_err(D::Error::custom))
                .transpose()
        }
    }
}

/// Serde adapter: minor units written as a JSON number (`30.5`).
///
/// Used on outgoing sale requests only; the value is produced from an exact
/// decimal, so no binary float arithmetic ever touches it.
pub mod decimal_number {
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Serializer, ser::Error as _};

    use super::minor_to_decimal;

    /// Serialise minor units as a JSON number.
    ///
    /// # Errors
    ///
    /// Fails if the amount cannot be represented as a JSON number.
    pub fn serialize<S: Serializer>(minor: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        let number = minor_to_decimal(*minor)
            .to_f64()
            .ok_or_else(|| S::Error::custom("amount is not representable as a number"))?;

        serializer.serialize_f64(number)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Priced {
        #[serde(with = "decimal_str")]
        price: i64,

        #[serde(with = "decimal_str::option", default)]
        wholesale: Option<i64>,
    }

    #[test]
    fn decimal_to_minor_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(decimal_to_minor(Decimal::from_str("10.005")?)?, 1001);
        assert_eq!(decimal_to_minor(Decimal::from_str("10.004")?)?, 1000);
        assert_eq!(decimal_to_minor(Decimal::from_str("3")?)?, 300);

        Ok(())
    }

    #[test]
    fn parse_amount_accepts_cashier_input() -> TestResult {
        assert_eq!(parse_amount("30")?, 30_00);
        assert_eq!(parse_amount(" 30.5 ")?, 30_50);
        assert_eq!(parse_amount("$1,030.50")?, 1_030_50);

        Ok(())
    }

    #[test]
    fn parse_amount_rejects_bad_input() {
        assert_eq!(parse_amount("-5"), Err(AmountError::Negative));
        assert!(matches!(parse_amount("cinco"), Err(AmountError::Invalid { .. })));
    }

    #[test]
    fn prices_decode_from_strings_and_numbers() -> TestResult {
        let from_string: Priced = serde_json::from_str(r#"{"price":"10.50","wholesale":null}"#)?;
        let from_number: Priced = serde_json::from_str(r#"{"price":10.5,"wholesale":8}"#)?;

        assert_eq!(from_string, Priced { price: 10_50, wholesale: None });
        assert_eq!(from_number, Priced { price: 10_50, wholesale: Some(8_00) });

        Ok(())
    }

    #[test]
    fn prices_encode_as_exact_decimal_strings() -> TestResult {
        let json = serde_json::to_string(&Priced { price: 10_50, wholesale: Some(8_00) })?;

        assert_eq!(json, r#"{"price":"10.50","wholesale":"8.00"}"#);

        Ok(())
    }

    #[test]
    fn formats_in_pesos() {
        assert!(format_minor(5_00).contains("5.00"));
    }
}
