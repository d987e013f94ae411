//! Customer lookup

mod service;

pub use service::*;
