//! Board-agnostic core logic for the interlock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Debounced digital inputs and analog sampling traits
//! - Timed condition waiting (the only suspension primitive)
//! - Challenge procedures and their step evaluator
//! - Password attempt and lockout state machine
//! - Feedback events and the effect cues that render them
//! - Configuration types and the embedded TOML parser
//! - Operator console parsing (menu choice, line input)

#![no_std]
#![deny(unsafe_code)]

pub mod access;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod input;
pub mod procedure;
pub mod time;
pub mod waiter;

#[cfg(test)]
pub(crate) mod testing;

pub use error::InterlockError;
