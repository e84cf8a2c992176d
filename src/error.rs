//! Crate-wide error type.

use derive_more::{Display, Error};

/// Errors returned by buffers, devices, and the display controller.
///
/// Arbitration losses are not errors: a guard that does not hold the
/// display gets `Ok(false)` from [`DisplayGuard::show`](crate::display::DisplayGuard::show).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// More pixels were requested than the fixed capacity can hold.
    #[display("requested {requested} pixels but capacity is {capacity}")]
    CapacityExceeded {
        /// Number of pixels asked for.
        requested: usize,
        /// Compile-time capacity.
        capacity: usize,
    },

    /// The controller's live-guard set is full.
    #[display("too many live display guards (max {max})")]
    TooManyGuards {
        /// Maximum number of simultaneously live guards.
        max: usize,
    },

    /// A driver timing cannot be expressed at the transmitter's clock rate.
    #[display("driver timing cannot be represented at this clock rate")]
    UnsupportedTiming,

    /// The transmitter failed to send a frame.
    #[display("LED transmission failed")]
    Transmit,
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
