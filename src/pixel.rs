//! A module for single-pixel colors: packed values, HSL, dimming, and wire byte order.
//!
//! [`Pixel`] is the `smart_leds` [`RGB8`] type. The color math lives in the
//! [`PixelColor`] extension trait so it works on any `RGB8` you already have.
//!
//! # Example
//!
//! ```rust
//! use led_envoy::pixel::{Pixel, PixelColor, PixelFormat};
//!
//! let orange = Pixel::from_packed(0xFF_80_00);
//! assert_eq!(orange.hue(), 30);
//! assert_eq!(orange.dim(0), Pixel::new(0, 0, 0));
//! assert_eq!(PixelFormat::Grb.bytes(orange), [0x80, 0xFF, 0x00]);
//! ```

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

/// RGB color type from the `smart_leds` crate.
pub use smart_leds::RGB8;

/// One addressable RGB color cell.
pub type Pixel = RGB8;

/// All channels off.
pub const BLACK: Pixel = Pixel::new(0, 0, 0);

/// Color math on [`Pixel`].
///
/// All operations are pure integer arithmetic with no failure modes.
pub trait PixelColor: Sized {
    /// Build a pixel from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    #[must_use]
    fn from_packed(packed: u32) -> Self;

    /// Pack into `0xRRGGBB`.
    #[must_use]
    fn to_packed(self) -> u32;

    /// Smallest of the three channels.
    #[must_use]
    fn min_channel(self) -> u8;

    /// Largest of the three channels.
    #[must_use]
    fn max_channel(self) -> u8;

    /// Truncated mean of the three channels.
    #[must_use]
    fn avg_channel(self) -> u8;

    /// HSL luminance, `(min + max) / 2`.
    #[must_use]
    fn luminance(self) -> u8;

    /// HSL saturation in `0..=255`.
    #[must_use]
    fn saturation(self) -> u8;

    /// HSL hue in degrees, `0..360`.
    #[must_use]
    fn hue(self) -> u16;

    /// Build a pixel from HSL. `hue` is taken modulo 360.
    #[must_use]
    fn from_hsl(hue: u16, saturation: u8, luminance: u8) -> Self;

    /// Scale every channel by `(factor + 1) / 256`.
    ///
    /// `dim(0)` is black. `dim(255)` is the identity: `255 * 256 >> 8 == 255`.
    #[must_use]
    fn dim(self, factor: u8) -> Self;
}

impl PixelColor for Pixel {
    fn from_packed(packed: u32) -> Self {
        let [_, red, green, blue] = packed.to_be_bytes();
        Self::new(red, green, blue)
    }

    fn to_packed(self) -> u32 {
        u32::from_be_bytes([0, self.r, self.g, self.b])
    }

    fn min_channel(self) -> u8 {
        self.r.min(self.g).min(self.b)
    }

    fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    fn avg_channel(self) -> u8 {
        let sum = u16::from(self.r) + u16::from(self.g) + u16::from(self.b);
        narrow(i32::from(sum / 3))
    }

    fn luminance(self) -> u8 {
        let sum = u16::from(self.min_channel()) + u16::from(self.max_channel());
        narrow(i32::from(sum / 2))
    }

    fn saturation(self) -> u8 {
        let max = u32::from(self.max_channel());
        let min = u32::from(self.min_channel());
        let chroma = max - min;
        if chroma == 0 {
            return 0;
        }
        let divisor = if self.luminance() <= 127 {
            max + min
        } else {
            510 - max - min
        };
        narrow(i32::try_from(chroma * 255 / divisor).unwrap_or(255))
    }

    fn hue(self) -> u16 {
        let max = i32::from(self.max_channel());
        let min = i32::from(self.min_channel());
        let chroma = max - min;
        if chroma == 0 {
            return 0;
        }
        let (red, green, blue) = (i32::from(self.r), i32::from(self.g), i32::from(self.b));
        // Scaled by 10 so the sector fraction keeps one decimal before truncation.
        let degrees = if red == max {
            600 * (green - blue) / chroma / 10
        } else if green == max {
            600 * (blue - red) / chroma / 10 + 120
        } else {
            600 * (red - green) / chroma / 10 + 240
        };
        u16::try_from(degrees.rem_euclid(360)).unwrap_or(0)
    }

    fn from_hsl(hue: u16, saturation: u8, luminance: u8) -> Self {
        let hue = i32::from(hue % 360);
        let lum = i32::from(luminance);
        let chroma = (255 - (2 * lum - 255).abs()) * i32::from(saturation) / 254;
        // |((hue / 60) mod 2) - 1|, in ten-thousandths
        let x_aux = ((hue % 120) - 60).abs() * 10_000 / 60;
        let x = chroma * (10_000 - x_aux) / 10_000;
        let m = lum - chroma / 2;

        let (red, green, blue) = match hue {
            300.. => (chroma, 0, x),
            240.. => (x, 0, chroma),
            180.. => (0, x, chroma),
            120.. => (0, chroma, x),
            60.. => (x, chroma, 0),
            _ => (chroma, x, 0),
        };
        Self::new(narrow(red + m), narrow(green + m), narrow(blue + m))
    }

    fn dim(self, factor: u8) -> Self {
        Self::new(
            scale(self.r, factor),
            scale(self.g, factor),
            scale(self.b, factor),
        )
    }
}

/// `channel * (factor + 1) >> 8`, shared by [`PixelColor::dim`] and device brightness.
#[must_use]
pub const fn scale(channel: u8, factor: u8) -> u8 {
    ((channel as u16 * (factor as u16 + 1)) >> 8) as u8
}

fn narrow(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}

/// Order in which a driver expects the three channel bytes on the wire.
///
/// The first letter names the byte sent first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Red, blue, green.
    Rbg,
    /// Green, red, blue (WS2812 and most clones).
    Grb,
    /// Green, blue, red.
    Gbr,
    /// Blue, red, green.
    Brg,
    /// Blue, green, red.
    Bgr,
}

impl PixelFormat {
    /// The three bytes of `pixel` in transmission order.
    #[must_use]
    pub const fn bytes(self, pixel: Pixel) -> [u8; 3] {
        let Pixel { r, g, b } = pixel;
        match self {
            Self::Rgb => [r, g, b],
            Self::Rbg => [r, b, g],
            Self::Grb => [g, r, b],
            Self::Gbr => [g, b, r],
            Self::Brg => [b, r, g],
            Self::Bgr => [b, g, r],
        }
    }
}
