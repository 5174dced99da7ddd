mod config;
mod core;
mod parameter;
mod registry;

pub use self::config::*;
pub use self::core::*;
pub use self::parameter::*;
pub use self::registry::*;
