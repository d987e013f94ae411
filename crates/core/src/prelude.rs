//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, QuantityChange},
    checkout::{
        CheckoutError, CheckoutItem, CheckoutRequest, Payment, PaymentMethod, PaymentStatus,
        PreparedCheckout, prepare_checkout,
    },
    customers::{Customer, CustomerId, CustomerType},
    ids::RecordId,
    money::{AmountError, format_minor, parse_amount},
    pricing::{PricingError, SaleType, Totals, compute_totals},
    products::{ProductId, ProductSnapshot},
    scan::{ScanEvent, ScanGuard},
};
