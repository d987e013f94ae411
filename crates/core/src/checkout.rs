//! Checkout
//!
//! Turns a cart and the cashier's payment details into the one-shot sale
//! request sent to the backend.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::Cart,
    customers::CustomerId,
    money::{decimal_number, format_minor},
    pricing::{PricingError, SaleType},
    products::ProductId,
};

/// Errors that prevent a checkout request from being built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to sell.
    #[error("El carrito está vacío")]
    EmptyCart,

    /// The tendered amount does not cover the total.
    #[error(
        "El monto pagado es insuficiente. Total: {}, pagado: {}",
        format_minor(*.total),
        format_minor(*.paid)
    )]
    InsufficientPayment {
        /// Amount due, in minor units
        total: i64,

        /// Amount tendered, in minor units
        paid: i64,
    },

    /// Amount arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash
    #[default]
    Cash,

    /// Debit or credit card
    Card,

    /// Bank transfer
    Transfer,

    /// Store credit
    Credit,
}

impl PaymentMethod {
    /// Wire name of the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Transfer => "transfer",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unrecognised payment method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("método de pago desconocido: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" | "efectivo" => Ok(Self::Cash),
            "card" | "tarjeta" => Ok(Self::Card),
            "transfer" | "transferencia" => Ok(Self::Transfer),
            "credit" | "credito" | "crédito" => Ok(Self::Credit),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Payment status reported with the sale. The register only records paid
/// sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Fully paid at the counter
    #[default]
    Paid,
}

/// Payment details entered by the cashier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Payment {
    /// Payment method
    pub method: PaymentMethod,

    /// Amount tendered, in minor units; `None` means exact payment.
    pub tendered: Option<i64>,
}

/// One sold product in a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    /// Product id
    pub product_id: ProductId,

    /// Units sold
    pub quantity: u32,

    /// Flat discount for the whole line
    #[serde(with = "decimal_number")]
    pub discount_amount: i64,
}

/// Sale creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Customer id, or `null` for walk-in
    pub customer_id: Option<CustomerId>,

    /// Pricing tier
    pub sale_type: SaleType,

    /// Sold products
    pub items: Vec<CheckoutItem>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Payment status
    pub payment_status: PaymentStatus,

    /// Amount tendered
    #[serde(with = "decimal_number")]
    pub paid_amount: i64,

    /// Cashier notes, `null` when blank
    pub notes: Option<String>,
}

/// A validated checkout, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCheckout {
    /// Request body for the sale service
    pub request: CheckoutRequest,

    /// Amount due, in minor units
    pub total: i64,

    /// Amount tendered, in minor units
    pub paid: i64,

    /// Change owed to the customer, in minor units
    pub change: i64,
}

/// Validate the cart and payment and build the sale request.
///
/// The paid amount defaults to the total when nothing was tendered. Line
/// discounts are sent as applied, i.e. capped at each line's subtotal.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::InsufficientPayment`]: tendered amount below total.
/// - [`CheckoutError::Pricing`]: amount arithmetic overflowed.
pub fn prepare_checkout(cart: &Cart, payment: Payment) -> Result<PreparedCheckout, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let sale_type = cart.sale_type();
    let total = cart.totals()?.total_minor();
    let paid = payment.tendered.unwrap_or(total);

    if paid < total {
        return Err(CheckoutError::InsufficientPayment { total, paid });
    }

    let items = cart
        .lines()
        .iter()
        .map(|line| {
            Ok(CheckoutItem {
                product_id: line.product().id,
                quantity: line.quantity(),
                discount_amount: line.applied_discount(sale_type)?,
            })
        })
        .collect::<Result<Vec<_>, PricingError>>()?;

    let notes = Some(cart.notes().trim())
        .filter(|notes| !notes.is_empty())
        .map(str::to_string);

    Ok(PreparedCheckout {
        request: CheckoutRequest {
            customer_id: cart.customer().map(|customer| customer.id),
            sale_type,
            items,
            payment_method: payment.method,
            payment_status: PaymentStatus::Paid,
            paid_amount: paid,
            notes,
        },
        total,
        paid,
        change: paid - total,
    })
}
