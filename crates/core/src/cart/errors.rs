//! Cart errors.

use thiserror::Error;

use crate::pricing::PricingError;

/// Rejections raised by cart mutations. A rejected mutation leaves the cart
/// untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds the known stock.
    #[error("Stock insuficiente. Disponible: {available}")]
    StockInsufficient {
        /// Stock reported by the product snapshot
        available: i64,
    },

    /// The product has no stock at all.
    #[error("\"{name}\" sin stock disponible")]
    OutOfStock {
        /// Product name
        name: String,
    },

    /// No line at the given index.
    #[error("No existe la línea {} del carrito", .0 + 1)]
    LineNotFound(usize),

    /// The discount is larger than the line it applies to.
    #[error("El descuento excede el importe de la línea {}", .index + 1)]
    DiscountExceedsLine {
        /// Line index
        index: usize,

        /// Line subtotal at the current sale type, in minor units
        line_subtotal: i64,
    },

    /// Discounts are flat, non-negative amounts.
    #[error("El descuento no puede ser negativo")]
    NegativeDiscount,

    /// Amount arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}
