//! Test helpers.

mod helpers;

pub(crate) use context::*;
pub(crate) use helpers::*;
