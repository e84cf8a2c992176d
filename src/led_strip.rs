//! A device abstraction for NeoPixel-style (WS2812) LED strips.
//!
//! An [`LedStrip`] owns a [`Transmit`] backend (the hardware bit encoder), a
//! [`LedLayout`] describing how the wire threads through the LEDs, the
//! driver's [`PixelFormat`], and a global brightness. Frames are given in
//! canonical (row-major) order; the strip remaps them to wire order, applies
//! brightness, and reorders channel bytes just before transmission.
//!
//! Transmissions are serialized by the strip's own lock, so the strip can be
//! shared by reference between execution contexts. The critical section is
//! held only while claiming or releasing that lock, never while a frame is on
//! the wire.
//!
//! # Example
//!
//! ```rust
//! use led_envoy::display::PixelDisplay;
//! use led_envoy::led_strip::{LedStrip, PixelDriver};
//! use led_envoy::led_strip_host::RecordingTransmitter;
//! use led_envoy::pixel::{Pixel, colors};
//!
//! # fn main() -> led_envoy::Result<()> {
//! let strip = LedStrip::<_, 8>::new(RecordingTransmitter::new(), 2, &PixelDriver::WS2812)?;
//! strip.set_brightness(127);
//! strip.display(&[colors::RED, Pixel::new(0, 0, 0)])?;
//!
//! // WS2812 wants green first; red at half brightness is 0x7F.
//! strip.with_transmitter(|transmitter| {
//!     assert_eq!(transmitter.frames()[0], [0, 0x7F, 0, 0, 0, 0]);
//! });
//! # Ok(())
//! # }
//! ```

pub mod spi_transmitter;

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use heapless::Vec;
use portable_atomic::{AtomicU8, Ordering};

use crate::display::PixelDisplay;
use crate::led2d::layout::LedLayout;
use crate::pixel::{BLACK, Pixel, PixelColor, PixelFormat};
use crate::{Error, Result};

/// Duration of the two voltage stages that encode one data bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitTiming {
    /// Time at the active level.
    pub first_stage: Duration,
    /// Time at the idle level.
    pub second_stage: Duration,
}

impl BitTiming {
    const fn from_nanos(first_stage: u64, second_stage: u64) -> Self {
        Self {
            first_stage: Duration::from_nanos(first_stage),
            second_stage: Duration::from_nanos(second_stage),
        }
    }

    /// Total time of one bit.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.first_stage.saturating_add(self.second_stage)
    }
}

/// Timing and byte-order profile of a single-wire LED driver chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelDriver {
    /// Channel byte order on the wire.
    pub format: PixelFormat,
    /// The first stage of each bit is high (and the line idles low).
    pub high_to_low: bool,
    /// Each byte is sent most significant bit first.
    pub msb_first: bool,
    /// Encoding of a 0 bit.
    pub bit0: BitTiming,
    /// Encoding of a 1 bit.
    pub bit1: BitTiming,
    /// Idle time that latches a frame.
    pub rest: Duration,
}

impl PixelDriver {
    /// WS2811 family.
    pub const WS2811: Self = Self::new(
        PixelFormat::Rgb,
        BitTiming::from_nanos(500, 2000),
        BitTiming::from_nanos(1200, 1300),
        Duration::from_micros(50),
    );

    /// WS2812 family.
    pub const WS2812: Self = Self::new(
        PixelFormat::Grb,
        BitTiming::from_nanos(300, 900),
        BitTiming::from_nanos(900, 300),
        Duration::from_micros(280),
    );

    /// WS2815.
    pub const WS2815: Self = Self::WS2812;

    /// SK6812.
    pub const SK6812: Self = Self::new(
        PixelFormat::Grb,
        BitTiming::from_nanos(300, 900),
        BitTiming::from_nanos(600, 600),
        Duration::from_micros(80),
    );

    /// UCS1903.
    pub const UCS1903: Self = Self::new(
        PixelFormat::Rgb,
        BitTiming::from_nanos(500, 800),
        BitTiming::from_nanos(800, 400),
        Duration::from_micros(24),
    );

    /// A high-to-low, MSB-first driver with the given format and timings.
    #[must_use]
    pub const fn new(format: PixelFormat, bit0: BitTiming, bit1: BitTiming, rest: Duration) -> Self {
        Self {
            format,
            high_to_low: true,
            msb_first: true,
            bit0,
            bit1,
            rest,
        }
    }
}

/// Hardware bit encoder: the boundary between this crate and a peripheral.
///
/// Implementations turn already-ordered pixel bytes into line timing.
pub trait Transmit {
    /// Start sending `bytes`, three per LED in wire order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transmit`] if the peripheral rejects the data.
    fn transmit(&mut self, bytes: &[u8]) -> Result<()>;

    /// Block until the last transmission has physically left the pin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transmit`] if the peripheral reports a failure.
    fn block_until_idle(&mut self) -> Result<()>;
}

/// An LED strip (or panel) of up to `N` LEDs behind a [`Transmit`] backend.
pub struct LedStrip<T, const N: usize> {
    transmitter: Mutex<CriticalSectionRawMutex, T>,
    layout: LedLayout,
    format: PixelFormat,
    brightness: AtomicU8,
}

impl<T: Transmit, const N: usize> LedStrip<T, N> {
    /// Create a strip of `len` LEDs wired first to last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `len > N`.
    pub fn new(transmitter: T, len: usize, driver: &PixelDriver) -> Result<Self> {
        Self::with_layout(transmitter, LedLayout::linear_h(len), driver)
    }

    /// Create a strip of `len` LEDs whose wire enters at the last pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `len > N`.
    pub fn reversed(transmitter: T, len: usize, driver: &PixelDriver) -> Result<Self> {
        Self::with_layout(transmitter, LedLayout::linear_h(len).flip_h(), driver)
    }

    /// Create a strip (or panel) with an explicit layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the layout has more than `N` LEDs.
    pub fn with_layout(transmitter: T, layout: LedLayout, driver: &PixelDriver) -> Result<Self> {
        let requested = layout
            .rows()
            .checked_mul(layout.columns())
            .unwrap_or(usize::MAX);
        if requested > N {
            return Err(Error::CapacityExceeded {
                requested,
                capacity: N,
            });
        }
        info!(
            "LedStrip: {} x {} LEDs",
            layout.rows(),
            layout.columns()
        );
        Ok(Self {
            transmitter: Mutex::new(transmitter),
            layout,
            format: driver.format,
            brightness: AtomicU8::new(u8::MAX),
        })
    }

    /// The layout this strip remaps frames through.
    #[must_use]
    pub const fn layout(&self) -> &LedLayout {
        &self.layout
    }

    /// Channel byte order on the wire.
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Current global brightness (255 is full).
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Relaxed)
    }

    /// Set global brightness, returning the previous value.
    ///
    /// Each channel is scaled by `channel * (brightness + 1) >> 8` at transmission.
    pub fn set_brightness(&self, brightness: u8) -> u8 {
        self.brightness.swap(brightness, Ordering::Relaxed)
    }

    /// Run `f` with exclusive access to the transmitter.
    ///
    /// Waits for any transmission in progress on another context to finish.
    pub fn with_transmitter<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.claim_transmitter())
    }

    fn claim_transmitter(&self) -> MutexGuard<'_, CriticalSectionRawMutex, T> {
        loop {
            if let Ok(transmitter) = self.transmitter.try_lock() {
                return transmitter;
            }
            #[cfg(feature = "host")]
            std::thread::yield_now();
            #[cfg(not(feature = "host"))]
            core::hint::spin_loop();
        }
    }

    /// Wire-order bytes for `pixels` (canonical order). Missing pixels are black.
    fn encode(&self, pixels: &[Pixel]) -> Vec<[u8; 3], N> {
        let brightness = self.brightness();
        (0..self.layout.len())
            .map(|physical_index| {
                let pixel = pixels
                    .get(self.layout.canonical_index(physical_index))
                    .copied()
                    .unwrap_or(BLACK);
                self.format.bytes(pixel.dim(brightness))
            })
            .collect()
    }

    fn send(&self, frame: &Vec<[u8; 3], N>) -> Result<()> {
        let bytes = frame.as_flattened();
        self.with_transmitter(|transmitter| {
            transmitter.transmit(bytes)?;
            transmitter.block_until_idle()
        })
        .inspect_err(|_| error!("LedStrip: transmission of {} bytes failed", bytes.len()))
    }
}

impl<T: Transmit, const N: usize> PixelDisplay for LedStrip<T, N> {
    fn display(&self, pixels: &[Pixel]) -> Result<()> {
        self.send(&self.encode(pixels))
    }

    fn shutdown(&self) -> Result<()> {
        info!("LedStrip: shutdown, blanking {} LEDs", self.layout.len());
        let frame: Vec<[u8; 3], N> = (0..self.layout.len()).map(|_| [0; 3]).collect();
        self.send(&frame)
    }

    fn len(&self) -> usize {
        self.layout.len()
    }
}
