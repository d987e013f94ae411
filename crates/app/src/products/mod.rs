//! Product lookup

mod service;

pub use service::*;
