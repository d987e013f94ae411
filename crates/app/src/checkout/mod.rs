//! Cart/checkout controller

mod controller;
mod errors;

pub use controller::*;
pub use errors::PosError;
