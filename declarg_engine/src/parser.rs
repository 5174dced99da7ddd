mod base;
mod convert;
mod error;
mod interface;
mod messages;
mod printer;
mod resolve;
mod result;
#[cfg(any(test, feature = "unit_test"))]
mod util;

pub(crate) use self::base::*;
pub(crate) use self::convert::{items, validate, Rejection};
pub(crate) use self::interface::*;
pub(crate) use self::printer::*;

pub use self::error::*;
pub use self::messages::Messages;
pub use self::result::ParsedResult;

#[cfg(any(test, feature = "unit_test"))]
pub use self::util::InMemoryInterface;
