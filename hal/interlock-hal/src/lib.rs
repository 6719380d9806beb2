//! Interlock Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the interlock core drives its
//! operator feedback through. Chip-specific HALs implement them, so the
//! effect sequencing in `interlock-core` stays testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  interlock-core / interlock-firmware      │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  interlock-hal (this crate - traits)      │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌────────────────┐
//!             │ interlock-hal- │
//!             │     rp2040     │
//!             └────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs (RGB indicator LED)
//! - [`tone::ToneOutput`] - Square-wave buzzer
//! - [`matrix::PixelMatrix`] - Addressable 5x5 LED matrix

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod matrix;
pub mod tone;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use matrix::{PixelMatrix, Rgb, MATRIX_PIXELS};
pub use tone::ToneOutput;
