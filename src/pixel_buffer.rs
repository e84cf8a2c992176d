//! A module for [`PixelBuffer`], a fixed-capacity pixel sequence with wraparound rotation.
//!
//! Rotation and fill are bulk operations meant for animation loops, so they
//! never fail: out-of-range indices are clamped to the last pixel and rotation
//! counts wrap around the window. The rotation is an in-place cycle-leader
//! (juggling) rotation, so it always permutes pixels and never loses or
//! duplicates one.
//!
//! # Example
//!
//! ```rust
//! use led_envoy::pixel::Pixel;
//! use led_envoy::pixel_buffer::PixelBuffer;
//!
//! # fn main() -> led_envoy::Result<()> {
//! let mut buffer = PixelBuffer::<4>::from_slice(&[
//!     Pixel::new(0, 0, 0),
//!     Pixel::new(1, 1, 1),
//!     Pixel::new(2, 2, 2),
//!     Pixel::new(3, 3, 3),
//! ])?;
//!
//! buffer.shift_up(1);
//! assert_eq!(buffer[0], Pixel::new(3, 3, 3));
//! assert_eq!(buffer[1], Pixel::new(0, 0, 0));
//! # Ok(())
//! # }
//! ```

use core::ops::{Deref, DerefMut};

use heapless::Vec;

use crate::pixel::Pixel;
use crate::{Error, Result};

/// Ordered, resizable sequence of at most `N` pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer<const N: usize> {
    pixels: Vec<Pixel, N>,
}

impl<const N: usize> PixelBuffer<N> {
    /// Maximum number of pixels.
    pub const CAPACITY: usize = N;

    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { pixels: Vec::new() }
    }

    /// Create a buffer of `len` pixels set to `color`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `len > N`.
    pub fn filled(len: usize, color: Pixel) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.resize(len, color)?;
        Ok(buffer)
    }

    /// Create a buffer holding a copy of `pixels`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `pixels.len() > N`.
    pub fn from_slice(pixels: &[Pixel]) -> Result<Self> {
        Vec::from_slice(pixels)
            .map(|pixels| Self { pixels })
            .map_err(|()| capacity_error::<N>(pixels.len()))
    }

    /// Grow or shrink to `len` pixels; new pixels are set to `color`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `len > N`.
    pub fn resize(&mut self, len: usize, color: Pixel) -> Result<()> {
        self.pixels
            .resize(len, color)
            .map_err(|()| capacity_error::<N>(len))
    }

    /// Append one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the buffer is full.
    pub fn push(&mut self, color: Pixel) -> Result<()> {
        let requested = self.pixels.len().saturating_add(1);
        self.pixels
            .push(color)
            .map_err(|_| capacity_error::<N>(requested))
    }

    /// Rotate the inclusive window between `from` and `to` by `count` positions.
    ///
    /// When `from < to` the contents move toward higher indices (the pixel at
    /// `to` wraps around to `from`). When `from > to` they move toward lower
    /// indices. Indices past the end are clamped to the last pixel and `count`
    /// wraps modulo the window length. Empty buffers and single-pixel windows
    /// are left unchanged.
    pub fn rotate(&mut self, from: usize, to: usize, count: usize) {
        let Some(last) = self.pixels.len().checked_sub(1) else {
            return;
        };
        let (from, to) = (from.min(last), to.min(last));
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        let window = &mut self.pixels[start..=end];
        let len = window.len();
        let count = count % len;
        if count == 0 {
            return;
        }
        let toward_start = if from > to { count } else { len - count };
        juggle_left(window, toward_start);
    }

    /// Rotate the whole buffer `count` positions toward higher indices.
    pub fn shift_up(&mut self, count: usize) {
        self.rotate(0, usize::MAX, count);
    }

    /// Rotate the whole buffer `count` positions toward lower indices.
    pub fn shift_down(&mut self, count: usize) {
        self.rotate(usize::MAX, 0, count);
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Pixel) {
        self.pixels.fill(color);
    }

    /// Set the pixels in the inclusive range between `from` and `to` to `color`.
    ///
    /// The bounds may be given in either order. A range starting past the
    /// end does nothing; a range ending past the end stops at the last pixel.
    pub fn fill_range(&mut self, color: Pixel, from: usize, to: usize) {
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        let Some(last) = self.pixels.len().checked_sub(1) else {
            return;
        };
        if start > last {
            return;
        }
        self.pixels[start..=end.min(last)].fill(color);
    }

    /// Borrow the pixels as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Pixel] {
        &self.pixels
    }
}

impl<const N: usize> Deref for PixelBuffer<N> {
    type Target = [Pixel];

    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl<const N: usize> DerefMut for PixelBuffer<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

impl<const N: usize> AsRef<[Pixel]> for PixelBuffer<N> {
    fn as_ref(&self) -> &[Pixel] {
        &self.pixels
    }
}

const fn capacity_error<const N: usize>(requested: usize) -> Error {
    Error::CapacityExceeded {
        requested,
        capacity: N,
    }
}

const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

/// Cycle-leader left rotation: `gcd(len, count)` cycles, one move per element.
///
/// `count` must be in `1..window.len()`.
fn juggle_left(window: &mut [Pixel], count: usize) {
    let len = window.len();
    for cycle_start in 0..gcd(len, count) {
        let held = window[cycle_start];
        let mut current = cycle_start;
        loop {
            let mut next = current + count;
            if next >= len {
                next -= len;
            }
            if next == cycle_start {
                break;
            }
            window[current] = window[next];
            current = next;
        }
        window[current] = held;
    }
}
