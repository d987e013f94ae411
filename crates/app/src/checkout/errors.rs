//! Controller errors.

use thiserror::Error;
use till::{
    cart::CartError,
    checkout::CheckoutError,
    pricing::PricingError,
};

use crate::{
    api::ApiError, notifications::NotificationLevel, scanner::CameraError,
    storage::StorageError,
};

/// Everything a register operation can be refused for.
///
/// The `Display` text is what the cashier sees.
#[derive(Debug, Error)]
pub enum PosError {
    /// Cart mutation refused.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Sale not ready to send.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Amount arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// No product carries the scanned code.
    #[error("Producto con código {0} no encontrado")]
    ProductNotFound(String),

    /// The product is retired.
    #[error("El producto \"{0}\" no está activo")]
    ProductInactive(String),

    /// Product lookup failed.
    #[error("Error al buscar productos: {0}")]
    ProductLookup(#[source] ApiError),

    /// Customer lookup failed.
    #[error("Error al buscar clientes: {0}")]
    CustomerLookup(#[source] ApiError),

    /// The sale service refused the sale or could not be reached. The
    /// message is the server's, untouched.
    #[error("{0}")]
    CheckoutFailed(#[source] ApiError),

    /// The scanner could not be opened.
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// The sale in progress could not be saved.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PosError {
    /// How loudly to report this error.
    pub fn level(&self) -> NotificationLevel {
        match self {
            Self::Cart(
                CartError::StockInsufficient { .. }
                | CartError::LineNotFound(_)
                | CartError::DiscountExceedsLine { .. }
                | CartError::NegativeDiscount,
            )
            | Self::Checkout(CheckoutError::EmptyCart)
            | Self::ProductNotFound(_)
            | Self::Storage(StorageError::StaleWrite { .. }) => NotificationLevel::Warning,

            _ => NotificationLevel::Error,
        }
    }
}
