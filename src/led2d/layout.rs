//! Description of panel geometry and wiring, including dimensions (with examples).
//!
//! See [`LedLayout`] for examples including: linear strips,
//! serpentine panels, rotations, and flips.

/// Corner of the panel where the data wire enters (physical pixel 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirstPixel {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl FirstPixel {
    const fn is_right(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight)
    }

    const fn is_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight)
    }
}

/// Whether the wire runs along rows or along columns first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Arrangement {
    /// The wire finishes a whole row before moving to the next one.
    #[default]
    Rows,
    /// The wire finishes a whole column before moving to the next one.
    Columns,
}

/// Whether consecutive rows (or columns) alternate direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WiringStyle {
    /// Every other row (or column) runs backwards, so the wire zig-zags.
    Serpentine,
    /// Every row (or column) runs in the same direction.
    #[default]
    Linear,
}

/// How the single data wire threads through a rectangular panel.
///
/// The transforms ([`Self::rotate_cw`], [`Self::flip_h`], [`Self::flip_v`])
/// describe the same wire after the panel is physically turned or mirrored.
/// They change only which corner is first and which axis is primary;
/// the panel dimensions are tracked by [`LedLayout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Wiring {
    /// Corner holding physical pixel 0.
    pub first_pixel: FirstPixel,
    /// Primary traversal axis.
    pub arrangement: Arrangement,
    /// Serpentine or linear.
    pub style: WiringStyle,
}

impl Wiring {
    /// Top-left start, row by row, every row left to right.
    pub const CANONICAL: Self = Self::new(FirstPixel::TopLeft, Arrangement::Rows, WiringStyle::Linear);

    /// Create a wiring description.
    #[must_use]
    pub const fn new(first_pixel: FirstPixel, arrangement: Arrangement, style: WiringStyle) -> Self {
        Self {
            first_pixel,
            arrangement,
            style,
        }
    }

    /// Wiring after turning the panel a quarter turn clockwise.
    #[must_use]
    pub const fn rotate_cw(self) -> Self {
        let first_pixel = match self.first_pixel {
            FirstPixel::TopLeft => FirstPixel::TopRight,
            FirstPixel::TopRight => FirstPixel::BottomRight,
            FirstPixel::BottomRight => FirstPixel::BottomLeft,
            FirstPixel::BottomLeft => FirstPixel::TopLeft,
        };
        let arrangement = match self.arrangement {
            Arrangement::Rows => Arrangement::Columns,
            Arrangement::Columns => Arrangement::Rows,
        };
        Self::new(first_pixel, arrangement, self.style)
    }

    /// Wiring after turning the panel a quarter turn counter-clockwise.
    #[must_use]
    pub const fn rotate_ccw(self) -> Self {
        self.rotate_cw().rotate_cw().rotate_cw()
    }

    /// Wiring after turning the panel upside down.
    #[must_use]
    pub const fn rotate_180(self) -> Self {
        self.rotate_cw().rotate_cw()
    }

    /// Wiring after mirroring the panel left to right.
    #[must_use]
    pub const fn flip_h(self) -> Self {
        let first_pixel = match self.first_pixel {
            FirstPixel::TopLeft => FirstPixel::TopRight,
            FirstPixel::TopRight => FirstPixel::TopLeft,
            FirstPixel::BottomLeft => FirstPixel::BottomRight,
            FirstPixel::BottomRight => FirstPixel::BottomLeft,
        };
        Self::new(first_pixel, self.arrangement, self.style)
    }

    /// Wiring after mirroring the panel top to bottom.
    #[must_use]
    pub const fn flip_v(self) -> Self {
        let first_pixel = match self.first_pixel {
            FirstPixel::TopLeft => FirstPixel::BottomLeft,
            FirstPixel::BottomLeft => FirstPixel::TopLeft,
            FirstPixel::TopRight => FirstPixel::BottomRight,
            FirstPixel::BottomRight => FirstPixel::TopRight,
        };
        Self::new(first_pixel, self.arrangement, self.style)
    }
}

/// Description of panel geometry and wiring, including dimensions (with examples).
///
/// `LedLayout` defines how a rectangular `(row, column)` panel of LEDs maps to the linear
/// order of LEDs on a NeoPixel-style (WS2812) panel.
///
/// LedLayout lets you describe LED panel wiring once, then draw in canonical
/// row-major order without caring about LED strip order. The mapping is applied
/// per pixel only when a frame is transmitted.
///
/// Coordinates use a screen-style convention: `(0, 0)` is the top-left corner,
/// rows increase downward, and columns increase to the right. The canonical index
/// of `(row, column)` is `row * columns + column`.
///
/// Most users should start with one of the constructors below,
/// then apply transforms ([`Self::rotate_cw`], [`Self::flip_h`], etc.) if needed.
///
/// ## Constructing layouts
///
/// - [`serpentine_row_major`](Self::serpentine_row_major)
/// - [`serpentine_column_major`](Self::serpentine_column_major)
/// - [`linear_h`](Self::linear_h) / [`linear_v`](Self::linear_v)
/// - [`new`](Self::new) for any corner, axis, and style
///
/// ## Transforming layouts
///
/// - rotate: [`rotate_cw`](Self::rotate_cw), [`rotate_ccw`](Self::rotate_ccw), [`rotate_180`](Self::rotate_180)
/// - flip: [`flip_h`](Self::flip_h), [`flip_v`](Self::flip_v)
///
/// ## Contract
///
/// Index arguments must be in range. They are checked with `debug_assert!` only,
/// because the mapping runs once per pixel per frame.
///
/// # Example
///
/// Rotate a serpentine-wired 2×3 panel into a 3×2 layout:
///
/// ```rust
/// use led_envoy::led2d::layout::LedLayout;
///
/// const LAYOUT: LedLayout = LedLayout::serpentine_row_major(2, 3);
/// const ROTATED: LedLayout = LAYOUT.rotate_cw();
///
/// assert_eq!((ROTATED.rows(), ROTATED.columns()), (3, 2));
/// assert_eq!(LAYOUT.physical_to_logical(3), (1, 2));
/// assert_eq!(ROTATED.physical_to_logical(3), (2, 0));
/// ```
///
/// ```text
/// Serpentine 2×3 rotated to 3×2:
///
///   Before:              After:
///     LED0  LED1  LED2     LED5  LED0
///     LED5  LED4  LED3     LED4  LED1
///                          LED3  LED2
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedLayout {
    rows: usize,
    columns: usize,
    wiring: Wiring,
}

impl LedLayout {
    /// Create a layout of `rows` × `columns` with the given wiring.
    #[must_use]
    pub const fn new(rows: usize, columns: usize, wiring: Wiring) -> Self {
        Self {
            rows,
            columns,
            wiring,
        }
    }

    /// A single-row strip of `len` LEDs, wired left to right.
    #[must_use]
    pub const fn linear_h(len: usize) -> Self {
        Self::new(1, len, Wiring::CANONICAL)
    }

    /// A single-column strip of `len` LEDs, wired top to bottom.
    #[must_use]
    pub const fn linear_v(len: usize) -> Self {
        Self::new(
            len,
            1,
            Wiring::new(FirstPixel::TopLeft, Arrangement::Columns, WiringStyle::Linear),
        )
    }

    /// Rows starting top-left, alternating direction.
    ///
    /// ```text
    /// LED0  LED1  LED2
    /// LED5  LED4  LED3
    /// ```
    #[must_use]
    pub const fn serpentine_row_major(rows: usize, columns: usize) -> Self {
        Self::new(
            rows,
            columns,
            Wiring::new(FirstPixel::TopLeft, Arrangement::Rows, WiringStyle::Serpentine),
        )
    }

    /// Columns starting top-left, alternating direction.
    ///
    /// ```text
    /// LED0  LED3  LED4
    /// LED1  LED2  LED5
    /// ```
    #[must_use]
    pub const fn serpentine_column_major(rows: usize, columns: usize) -> Self {
        Self::new(
            rows,
            columns,
            Wiring::new(FirstPixel::TopLeft, Arrangement::Columns, WiringStyle::Serpentine),
        )
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of LEDs, saturating at `usize::MAX`.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// True for a layout with no LEDs.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wiring description.
    #[must_use]
    pub const fn wiring(&self) -> Wiring {
        self.wiring
    }

    // (primary count, secondary count, primary is far, secondary is far)
    const fn axes(&self) -> (usize, usize, bool, bool) {
        let first_pixel = self.wiring.first_pixel;
        match self.wiring.arrangement {
            Arrangement::Rows => (
                self.rows,
                self.columns,
                first_pixel.is_bottom(),
                first_pixel.is_right(),
            ),
            Arrangement::Columns => (
                self.columns,
                self.rows,
                first_pixel.is_right(),
                first_pixel.is_bottom(),
            ),
        }
    }

    const fn is_reversed(&self, primary_raw: usize) -> bool {
        matches!(self.wiring.style, WiringStyle::Serpentine) && primary_raw % 2 == 1
    }

    /// `(row, column)` of the LED at position `physical_index` along the wire.
    #[must_use]
    pub const fn physical_to_logical(&self, physical_index: usize) -> (usize, usize) {
        debug_assert!(physical_index < self.len(), "physical index out of bounds");
        let (primary_count, secondary_count, far_primary, far_secondary) = self.axes();

        let primary_raw = physical_index / secondary_count;
        let secondary_raw = physical_index % secondary_count;

        let secondary = if far_secondary != self.is_reversed(primary_raw) {
            secondary_count - 1 - secondary_raw
        } else {
            secondary_raw
        };
        let primary = if far_primary {
            primary_count - 1 - primary_raw
        } else {
            primary_raw
        };

        match self.wiring.arrangement {
            Arrangement::Rows => (primary, secondary),
            Arrangement::Columns => (secondary, primary),
        }
    }

    /// Position along the wire of the LED at `(row, column)`.
    #[must_use]
    pub const fn logical_to_physical(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.rows, "row out of bounds");
        debug_assert!(column < self.columns, "column out of bounds");
        let (primary_count, secondary_count, far_primary, far_secondary) = self.axes();
        let (primary, secondary) = match self.wiring.arrangement {
            Arrangement::Rows => (row, column),
            Arrangement::Columns => (column, row),
        };

        let primary_raw = if far_primary {
            primary_count - 1 - primary
        } else {
            primary
        };
        let secondary_raw = if far_secondary != self.is_reversed(primary_raw) {
            secondary_count - 1 - secondary
        } else {
            secondary
        };

        primary_raw * secondary_count + secondary_raw
    }

    /// Row-major index of the LED at `physical_index` along the wire.
    #[must_use]
    pub const fn canonical_index(&self, physical_index: usize) -> usize {
        let (row, column) = self.physical_to_logical(physical_index);
        row * self.columns + column
    }

    /// The same wire after turning the panel a quarter turn clockwise.
    ///
    /// Rows and columns swap.
    #[must_use]
    pub const fn rotate_cw(self) -> Self {
        Self::new(self.columns, self.rows, self.wiring.rotate_cw())
    }

    /// The same wire after turning the panel a quarter turn counter-clockwise.
    #[must_use]
    pub const fn rotate_ccw(self) -> Self {
        self.rotate_cw().rotate_cw().rotate_cw()
    }

    /// The same wire after turning the panel upside down.
    #[must_use]
    pub const fn rotate_180(self) -> Self {
        self.rotate_cw().rotate_cw()
    }

    /// The same wire after mirroring the panel left to right.
    #[must_use]
    pub const fn flip_h(self) -> Self {
        Self::new(self.rows, self.columns, self.wiring.flip_h())
    }

    /// The same wire after mirroring the panel top to bottom.
    #[must_use]
    pub const fn flip_v(self) -> Self {
        Self::new(self.rows, self.columns, self.wiring.flip_v())
    }
}
