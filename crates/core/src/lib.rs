//! Till
//!
//! Point-of-sale cart domain for the liquor store register: product and
//! customer snapshots, the cart aggregate with its stock ceilings, totals
//! under retail and wholesale pricing, checkout request construction and
//! barcode scan de-duplication.

pub mod cart;
pub mod checkout;
pub mod customers;
pub mod ids;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod scan;

#[cfg(test)]
pub(crate) mod fixtures;
