#![cfg(feature = "host")]
//! Host-side stand-ins for LED hardware, for tests and desktop experiments.
//!
//! [`RecordingTransmitter`] plugs into an [`LedStrip`](crate::led_strip::LedStrip)
//! and keeps every byte frame it is asked to send. [`RecordingDisplay`] is a
//! whole [`PixelDisplay`] that keeps every pixel frame and counts shutdowns.

use std::sync::{Mutex, PoisonError};

use crate::display::PixelDisplay;
use crate::led_strip::Transmit;
use crate::pixel::Pixel;
use crate::{Error, Result};

/// A [`Transmit`] backend that records frames instead of driving a pin.
#[derive(Debug, Default)]
pub struct RecordingTransmitter {
    frames: Vec<Vec<u8>>,
    idle_waits: usize,
    failing: bool,
}

impl RecordingTransmitter {
    /// A transmitter that accepts every frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transmitter whose every transmission fails with [`Error::Transmit`].
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Every frame transmitted so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// How many times the caller waited for the line to go idle.
    #[must_use]
    pub const fn idle_waits(&self) -> usize {
        self.idle_waits
    }
}

impl Transmit for RecordingTransmitter {
    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        if self.failing {
            return Err(Error::Transmit);
        }
        self.frames.push(bytes.to_vec());
        Ok(())
    }

    fn block_until_idle(&mut self) -> Result<()> {
        self.idle_waits += 1;
        Ok(())
    }
}

/// A [`PixelDisplay`] that records frames. Safe to share between threads.
#[derive(Debug)]
pub struct RecordingDisplay {
    len: usize,
    frames: Mutex<Vec<Vec<Pixel>>>,
    shutdowns: Mutex<usize>,
}

impl RecordingDisplay {
    /// A display of `len` pixels.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            frames: Mutex::new(Vec::new()),
            shutdowns: Mutex::new(0),
        }
    }

    /// Every frame displayed so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<Vec<Pixel>> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent frame, if any.
    #[must_use]
    pub fn last_frame(&self) -> Option<Vec<Pixel>> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// How many times the display was shut down.
    #[must_use]
    pub fn shutdowns(&self) -> usize {
        *self.shutdowns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PixelDisplay for RecordingDisplay {
    fn display(&self, pixels: &[Pixel]) -> Result<()> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(pixels.to_vec());
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        *self.shutdowns.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(vec![Pixel::default(); self.len]);
        Ok(())
    }

    fn len(&self) -> usize {
        self.len
    }
}
