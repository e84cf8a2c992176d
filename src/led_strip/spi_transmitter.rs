//! SPI backend: each LED bit becomes a short run of SPI bits at a known clock.
//!
//! At SPI clock `f` Hz a duration of `t` ns spans `round(t * f / 1e9)` SPI bits
//! (slots). A data bit is `slots(first_stage)` active slots followed by idle slots
//! up to `slots(first_stage + second_stage)`. After the frame,
//! `ceil(slots(rest) / 8)` idle bytes latch it. Patterns are packed back to back,
//! so bit 0 and bit 1 may have different lengths.
//!
//! For a WS2812 at 3.2 MHz one slot is 312.5 ns: a 0 bit is `1000` and a 1 bit
//! is `1110`, so each data byte becomes four SPI bytes.

use core::time::Duration;

use embedded_hal::spi::SpiBus;
use heapless::Vec;

use crate::led_strip::{BitTiming, PixelDriver, Transmit};
use crate::{Error, Result};

const CHUNK_LEN: usize = 64;

/// Longest bit pattern that fits the packer.
const MAX_SLOTS_PER_BIT: u32 = 8;

/// A data bit as `len` SPI bits, right aligned, first-sent bit highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pattern {
    bits: u8,
    len: u8,
}

impl Pattern {
    fn new(timing: BitTiming, frequency_hz: u32, high_to_low: bool) -> Result<Self> {
        let active = slots(timing.first_stage, frequency_hz);
        let total = slots(timing.period(), frequency_hz);
        if active == 0 || active >= total || total > MAX_SLOTS_PER_BIT {
            warn!(
                "SpiTransmitter: bit needs {} of {} slots at {} Hz",
                active,
                total,
                frequency_hz
            );
            return Err(Error::UnsupportedTiming);
        }
        let mask = (1_u32 << total) - 1;
        let ones = ((1_u32 << active) - 1) << (total - active);
        let bits = if high_to_low { ones } else { !ones & mask };
        Ok(Self {
            bits: u8::try_from(bits).map_err(|_| Error::UnsupportedTiming)?,
            len: u8::try_from(total).map_err(|_| Error::UnsupportedTiming)?,
        })
    }
}

fn slots(duration: Duration, frequency_hz: u32) -> u32 {
    let slots = (duration.as_nanos() * u128::from(frequency_hz) + 500_000_000) / 1_000_000_000;
    u32::try_from(slots).unwrap_or(u32::MAX)
}

/// [`Transmit`] over an `embedded-hal` [`SpiBus`] whose MOSI pin drives the LED data line.
///
/// The bus must be configured for `frequency_hz`; the transmitter only uses it
/// to compute bit patterns. MISO is ignored.
pub struct SpiTransmitter<SPI> {
    spi: SPI,
    bit0: Pattern,
    bit1: Pattern,
    msb_first: bool,
    idle: u8,
    reset_bytes: usize,
}

impl<SPI: SpiBus<u8>> SpiTransmitter<SPI> {
    /// Create a transmitter for `driver` on a bus clocked at `frequency_hz`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedTiming`] if a bit cannot be represented with
    /// at least one active and one idle slot in at most eight slots.
    pub fn new(spi: SPI, frequency_hz: u32, driver: &PixelDriver) -> Result<Self> {
        let bit0 = Pattern::new(driver.bit0, frequency_hz, driver.high_to_low)?;
        let bit1 = Pattern::new(driver.bit1, frequency_hz, driver.high_to_low)?;
        let reset_slots = slots(driver.rest, frequency_hz);
        let reset_bytes = usize::try_from(reset_slots.div_ceil(8)).unwrap_or(usize::MAX);
        debug!(
            "SpiTransmitter: {} Hz, bit0 {} slots, bit1 {} slots, reset {} bytes",
            frequency_hz,
            bit0.len,
            bit1.len,
            reset_bytes
        );
        Ok(Self {
            spi,
            bit0,
            bit1,
            msb_first: driver.msb_first,
            idle: if driver.high_to_low { 0x00 } else { 0xFF },
            reset_bytes,
        })
    }

    /// Give back the bus.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiBus<u8>> Transmit for SpiTransmitter<SPI> {
    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        let (bit0, bit1, msb_first, idle, reset_bytes) =
            (self.bit0, self.bit1, self.msb_first, self.idle, self.reset_bytes);
        let mut packer = Packer::new(&mut self.spi, idle);
        for &byte in bytes {
            for bit_index in 0..8 {
                let mask = if msb_first {
                    0x80 >> bit_index
                } else {
                    1 << bit_index
                };
                packer.push(if byte & mask == 0 { bit0 } else { bit1 })?;
            }
        }
        packer.pad()?;
        for _ in 0..reset_bytes {
            packer.push_byte(idle)?;
        }
        packer.flush()
    }

    fn block_until_idle(&mut self) -> Result<()> {
        self.spi.flush().map_err(|_| {
            error!("SpiTransmitter: flush failed");
            Error::Transmit
        })
    }
}

/// Packs variable-length patterns into bytes and writes them in chunks.
struct Packer<'a, SPI> {
    spi: &'a mut SPI,
    chunk: Vec<u8, CHUNK_LEN>,
    pending: u8,
    pending_len: u8,
    idle: u8,
}

impl<'a, SPI: SpiBus<u8>> Packer<'a, SPI> {
    const fn new(spi: &'a mut SPI, idle: u8) -> Self {
        Self {
            spi,
            chunk: Vec::new(),
            pending: 0,
            pending_len: 0,
            idle,
        }
    }

    fn push(&mut self, pattern: Pattern) -> Result<()> {
        for shift in (0..pattern.len).rev() {
            self.pending = (self.pending << 1) | ((pattern.bits >> shift) & 1);
            self.pending_len += 1;
            if self.pending_len == 8 {
                let byte = self.pending;
                self.pending = 0;
                self.pending_len = 0;
                self.push_byte(byte)?;
            }
        }
        Ok(())
    }

    /// Complete a partial byte with idle-level bits.
    fn pad(&mut self) -> Result<()> {
        if self.pending_len == 0 {
            return Ok(());
        }
        let missing = 8 - self.pending_len;
        let fill = self.idle >> self.pending_len;
        let byte = (self.pending << missing) | fill;
        self.pending = 0;
        self.pending_len = 0;
        self.push_byte(byte)
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        if self.chunk.is_full() {
            self.flush()?;
        }
        self.chunk.push(byte).map_err(|_| Error::Transmit)
    }

    fn flush(&mut self) -> Result<()> {
        if self.chunk.is_empty() {
            return Ok(());
        }
        self.spi.write(&self.chunk).map_err(|_| {
            error!("SpiTransmitter: write of {} bytes failed", self.chunk.len());
            Error::Transmit
        })?;
        self.chunk.clear();
        Ok(())
    }
}
