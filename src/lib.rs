//! Drive addressable RGB LED strips and panels, and share them between producers by priority.
//!
//! - [`pixel`]: colors, HSL, dimming, and wire byte order.
//! - [`pixel_buffer`]: a pixel sequence with wraparound rotation.
//! - [`led2d`]: a row-major [`PixelMatrix`](led2d::PixelMatrix) with 2D scrolling, panel
//!   wiring geometry in [`led2d::layout`], and the [`LedMatrix`](led2d::LedMatrix) device.
//! - [`led_strip`]: driver timing profiles, the [`Transmit`](led_strip::Transmit) hardware
//!   boundary, and the [`LedStrip`](led_strip::LedStrip) device.
//! - [`display`]: the [`DisplayController`](display::DisplayController) /
//!   [`DisplayGuard`](display::DisplayGuard) priority arbiter.
//!
//! # Glossary
//!
//! - **Physical (wire) order:** the order LEDs are addressed along the single data wire, as installed.
//! - **Canonical order:** row-major order with a top-left origin, independent of wiring.
//!   Every frame in this crate is in canonical order; the device remaps it when transmitting.
//! - **Serpentine wiring:** alternate rows (or columns) run in opposite directions.
//! - **Guard:** a producer's non-blocking claim on a shared display.
//! - **Winner:** the highest-priority live guard (earliest attached among equals); the only
//!   guard whose frames reach the device.
#![cfg_attr(not(feature = "host"), no_std)]

#[macro_use]
mod fmt;

pub mod display;
mod error;
pub mod led2d;
pub mod led_strip;
#[cfg(feature = "host")]
pub mod led_strip_host;
pub mod pixel;
pub mod pixel_buffer;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
