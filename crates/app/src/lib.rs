//! Register application layer: the cart/checkout controller and the ports it
//! talks to.

pub mod api;
pub mod auth;
pub mod checkout;
pub mod context;
pub mod customers;
pub mod notifications;
pub mod products;
pub mod sales;
pub mod scanner;
pub mod storage;

#[cfg(test)]
mod test;
