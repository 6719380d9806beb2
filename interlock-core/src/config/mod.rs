//! Configuration types and parser
//!
//! The firmware embeds `interlock.toml` and parses it at boot with
//! [`parse_config`]. Anything missing keeps its default.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
