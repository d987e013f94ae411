//! Pricing

use rusty_money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartLine,
    money::{Currency, money},
};

/// Errors that can occur while pricing cart lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An amount left the representable range.
    #[error("el importe excede el rango permitido")]
    Overflow,
}

/// Pricing tier applied to every line of a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    /// Retail (counter) prices
    #[default]
    Retail,

    /// Wholesale prices, where the product defines one
    Wholesale,
}

/// Cart totals under one sale type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    subtotal: i64,
    discount: i64,
    total: i64,
}

impl Totals {
    /// Sum of unit price times quantity over all lines, in minor units.
    pub fn subtotal_minor(&self) -> i64 {
        self.subtotal
    }

    /// Sum of applied line discounts, in minor units.
    pub fn discount_minor(&self) -> i64 {
        self.discount
    }

    /// Amount due, in minor units.
    pub fn total_minor(&self) -> i64 {
        self.total
    }

    /// Sum of unit price times quantity over all lines.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        money(self.subtotal)
    }

    /// Sum of applied line discounts.
    pub fn discount(&self) -> Money<'static, Currency> {
        money(self.discount)
    }

    /// Amount due.
    pub fn total(&self) -> Money<'static, Currency> {
        money(self.total)
    }
}

/// Calculates the totals of a list of cart lines.
///
/// Each line contributes `unit price × quantity`; its discount is a flat
/// amount, capped at that line's own subtotal so no line (and therefore no
/// total) ever goes negative.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: an intermediate amount left the `i64` range.
pub fn compute_totals(lines: &[CartLine], sale_type: SaleType) -> Result<Totals, PricingError> {
    let (subtotal, discount) =
        lines
            .iter()
            .try_fold((0_i64, 0_i64), |(subtotal, discount), line| {
                let line_subtotal = line.subtotal(sale_type)?;
                let line_discount = line.applied_discount(sale_type)?;

                Ok::<_, PricingError>((
                    subtotal
                        .checked_add(line_subtotal)
                        .ok_or(PricingError::Overflow)?,
                    discount
                        .checked_add(line_discount)
                        .ok_or(PricingError::Overflow)?,
                ))
            })?;

    let total = subtotal
        .checked_sub(discount)
        .ok_or(PricingError::Overflow)?;

    Ok(Totals {
        subtotal,
        discount,
        total,
    })
}
