//! Engine module for `declarg`.
//! See the `declarg` crate root for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;

pub use api::*;
pub use model::*;
pub use parser::{ConfigError, ErrorKind, Messages, ParseError, ParsedResult, Placeholders};

#[cfg(any(test, feature = "unit_test"))]
pub use parser::InMemoryInterface;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
