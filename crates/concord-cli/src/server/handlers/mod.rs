//! API request handlers.

mod validate;

pub use validate::*;
