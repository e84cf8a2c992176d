//! A device abstraction for rectangular NeoPixel-style (WS2812) LED panel displays.
//!
//! Draw into a [`PixelMatrix`] in screen coordinates, then show it on an
//! [`LedMatrix`]. The matrix is always stored in canonical row-major order with
//! a top-left origin; the panel's [`LedLayout`] is applied only when the frame
//! is transmitted.
//!
//! [`PixelMatrix`] is also an [`embedded-graphics`](https://docs.rs/embedded-graphics)
//! `DrawTarget`, so shapes and text can be drawn into it directly.
//!
//! # Example
//!
//! ```rust
//! use led_envoy::display::PixelDisplay;
//! use led_envoy::led2d::{LedMatrix, layout::LedLayout};
//! use led_envoy::led_strip::PixelDriver;
//! use led_envoy::led_strip_host::RecordingTransmitter;
//! use led_envoy::pixel::{Pixel, colors};
//!
//! # fn main() -> led_envoy::Result<()> {
//! // A 2×3 panel wired as a snake starting top-left.
//! let panel = LedMatrix::<_, 6>::new(
//!     RecordingTransmitter::new(),
//!     LedLayout::serpentine_row_major(2, 3),
//!     &PixelDriver::UCS1903,
//! )?;
//!
//! let mut frame = panel.pixel_matrix(colors::BLACK)?;
//! *frame.at_mut(1, 2) = Pixel::new(9, 9, 9);
//! frame.scroll_left(1);
//! panel.display(frame.pixels())?;
//!
//! // (1, 1) is the fifth LED along the wire.
//! panel.with_transmitter(|transmitter| {
//!     assert_eq!(transmitter.frames()[0][12..15], [9, 9, 9]);
//! });
//! # Ok(())
//! # }
//! ```

pub mod layout;

use core::convert::Infallible;
use core::ops::Deref;

use embedded_graphics::Pixel as GraphicsPixel;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};

use crate::display::PixelDisplay;
use crate::led_strip::{LedStrip, PixelDriver, Transmit};
use crate::pixel::{BLACK, Pixel};
use crate::pixel_buffer::PixelBuffer;
use crate::{Error, Result};
use layout::LedLayout;

/// A `rows` × `columns` grid of pixels (at most `N`) in row-major order.
///
/// Unlike [`PixelBuffer`], only operations that keep rows intact are exposed.
/// Direct cell access panics on out-of-range coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelMatrix<const N: usize> {
    buffer: PixelBuffer<N>,
    rows: usize,
    columns: usize,
}

impl<const N: usize> PixelMatrix<N> {
    /// Create a `rows` × `columns` matrix filled with `color`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `rows * columns > N`.
    pub fn new(rows: usize, columns: usize, color: Pixel) -> Result<Self> {
        let len = rows.checked_mul(columns).ok_or(Error::CapacityExceeded {
            requested: usize::MAX,
            capacity: N,
        })?;
        Ok(Self {
            buffer: PixelBuffer::filled(len, color)?,
            rows,
            columns,
        })
    }

    /// Create a matrix from literal rows.
    ///
    /// The column count is the longest row; shorter rows are padded with black.
    ///
    /// ```rust
    /// use led_envoy::led2d::PixelMatrix;
    /// use led_envoy::pixel::{BLACK, colors};
    ///
    /// # fn main() -> led_envoy::Result<()> {
    /// let matrix = PixelMatrix::<6>::from_rows(&[&[colors::RED][..], &[colors::RED, colors::BLUE][..]])?;
    /// assert_eq!(matrix.column_count(), 2);
    /// assert_eq!(matrix.at(0, 1), BLACK);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the padded grid holds more than `N` pixels.
    pub fn from_rows<R: AsRef<[Pixel]>>(rows: &[R]) -> Result<Self> {
        let columns = rows
            .iter()
            .map(|row| row.as_ref().len())
            .max()
            .unwrap_or(0);
        let mut matrix = Self::new(rows.len(), columns, BLACK)?;
        for (row_index, row) in rows.iter().enumerate() {
            matrix.row_mut(row_index)[..row.as_ref().len()].copy_from_slice(row.as_ref());
        }
        Ok(matrix)
    }

    /// Number of rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.columns
    }

    /// Number of pixels, `rows * columns`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True for a matrix with no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    const fn index(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.rows && column < self.columns,
            "pixel coordinate out of bounds"
        );
        row * self.columns + column
    }

    /// The pixel at `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the matrix.
    #[must_use]
    pub fn at(&self, row: usize, column: usize) -> Pixel {
        self.buffer[self.index(row, column)]
    }

    /// Mutable access to the pixel at `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the matrix.
    pub fn at_mut(&mut self, row: usize, column: usize) -> &mut Pixel {
        let index = self.index(row, column);
        &mut self.buffer[index]
    }

    /// The pixel at `(row, column)`, or `None` outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<Pixel> {
        if row < self.rows && column < self.columns {
            self.buffer.get(row * self.columns + column).copied()
        } else {
            None
        }
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside the matrix.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Pixel] {
        assert!(row < self.rows, "row out of bounds");
        let start = row * self.columns;
        &self.buffer[start..start + self.columns]
    }

    fn row_mut(&mut self, row: usize) -> &mut [Pixel] {
        assert!(row < self.rows, "row out of bounds");
        let start = row * self.columns;
        &mut self.buffer[start..start + self.columns]
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Pixel) {
        self.buffer.fill(color);
    }

    /// Rotate every row `count` columns to the left; the first column wraps to the last.
    pub fn scroll_left(&mut self, count: usize) {
        if self.rows == 0 || self.columns < 2 {
            return;
        }
        let count = count % self.columns;
        for row in 0..self.rows {
            let first = row * self.columns;
            self.buffer.rotate(first + self.columns - 1, first, count);
        }
    }

    /// Rotate every row `count` columns to the right; the last column wraps to the first.
    pub fn scroll_right(&mut self, count: usize) {
        if self.rows == 0 || self.columns < 2 {
            return;
        }
        let count = count % self.columns;
        for row in 0..self.rows {
            let first = row * self.columns;
            self.buffer.rotate(first, first + self.columns - 1, count);
        }
    }

    /// Rotate whole rows `count` places up; the top row wraps to the bottom.
    pub fn scroll_up(&mut self, count: usize) {
        if self.rows < 2 || self.columns == 0 {
            return;
        }
        let count = (count % self.rows) * self.columns;
        self.buffer.rotate(self.len() - 1, 0, count);
    }

    /// Rotate whole rows `count` places down; the bottom row wraps to the top.
    pub fn scroll_down(&mut self, count: usize) {
        if self.rows < 2 || self.columns == 0 {
            return;
        }
        let count = (count % self.rows) * self.columns;
        self.buffer.rotate(0, self.len() - 1, count);
    }

    /// All pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.buffer
    }
}

impl<const N: usize> AsRef<[Pixel]> for PixelMatrix<N> {
    fn as_ref(&self) -> &[Pixel] {
        &self.buffer
    }
}

impl<const N: usize> OriginDimensions for PixelMatrix<N> {
    fn size(&self) -> Size {
        Size::new(
            u32::try_from(self.columns).unwrap_or(u32::MAX),
            u32::try_from(self.rows).unwrap_or(u32::MAX),
        )
    }
}

impl<const N: usize> DrawTarget for PixelMatrix<N> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = GraphicsPixel<Self::Color>>,
    {
        for GraphicsPixel(coord, color) in pixels {
            let (Ok(column), Ok(row)) = (usize::try_from(coord.x), usize::try_from(coord.y)) else {
                continue;
            };
            if row < self.rows && column < self.columns {
                *self.at_mut(row, column) = Pixel::new(color.r(), color.g(), color.b());
            }
        }
        Ok(())
    }
}

/// An LED panel: an [`LedStrip`] whose layout is a rectangle.
pub struct LedMatrix<T, const N: usize> {
    strip: LedStrip<T, N>,
}

impl<T: Transmit, const N: usize> LedMatrix<T, N> {
    /// Create a panel with the given wiring layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the layout has more than `N` LEDs.
    pub fn new(transmitter: T, layout: LedLayout, driver: &PixelDriver) -> Result<Self> {
        Ok(Self {
            strip: LedStrip::with_layout(transmitter, layout, driver)?,
        })
    }

    /// A matrix shaped like this panel, filled with `color`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the panel is larger than `N`
    /// (not possible for a constructed panel).
    pub fn pixel_matrix(&self, color: Pixel) -> Result<PixelMatrix<N>> {
        let layout = self.strip.layout();
        PixelMatrix::new(layout.rows(), layout.columns(), color)
    }
}

impl<T, const N: usize> Deref for LedMatrix<T, N> {
    type Target = LedStrip<T, N>;

    fn deref(&self) -> &Self::Target {
        &self.strip
    }
}

impl<T: Transmit, const N: usize> PixelDisplay for LedMatrix<T, N> {
    fn display(&self, pixels: &[Pixel]) -> Result<()> {
        self.strip.display(pixels)
    }

    fn shutdown(&self) -> Result<()> {
        self.strip.shutdown()
    }

    fn len(&self) -> usize {
        self.strip.len()
    }
}
