//! SQL generation: tokens, dialects, formatting, and clause builders.

pub mod builder;
pub mod dialect;
pub mod ident;
pub mod token;
pub mod value;
