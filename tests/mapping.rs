#![allow(missing_docs)]
//! Host-level tests for panel wiring geometry.

use led_envoy::led2d::layout::{Arrangement, FirstPixel, LedLayout, Wiring, WiringStyle};
use rstest::rstest;

use Arrangement::{Columns, Rows};
use FirstPixel::{BottomLeft, BottomRight, TopLeft, TopRight};
use WiringStyle::{Linear, Serpentine};

const CORNERS: [FirstPixel; 4] = [TopLeft, TopRight, BottomLeft, BottomRight];

fn every_wiring() -> impl Iterator<Item = Wiring> {
    CORNERS.into_iter().flat_map(|corner| {
        [Rows, Columns].into_iter().flat_map(move |arrangement| {
            [Serpentine, Linear]
                .into_iter()
                .map(move |style| Wiring::new(corner, arrangement, style))
        })
    })
}

fn every_layout() -> impl Iterator<Item = LedLayout> {
    (1..=5).flat_map(|rows| {
        (1..=5).flat_map(move |columns| {
            every_wiring().map(move |wiring| LedLayout::new(rows, columns, wiring))
        })
    })
}

// grid[row][column] is the wire position of that cell.
#[rstest]
#[case(TopLeft, Rows, Serpentine, [[0, 1, 2], [5, 4, 3], [6, 7, 8]])]
#[case(TopLeft, Rows, Linear, [[0, 1, 2], [3, 4, 5], [6, 7, 8]])]
#[case(TopRight, Rows, Serpentine, [[2, 1, 0], [3, 4, 5], [8, 7, 6]])]
#[case(TopRight, Rows, Linear, [[2, 1, 0], [5, 4, 3], [8, 7, 6]])]
#[case(BottomLeft, Rows, Serpentine, [[6, 7, 8], [5, 4, 3], [0, 1, 2]])]
#[case(BottomLeft, Rows, Linear, [[6, 7, 8], [3, 4, 5], [0, 1, 2]])]
#[case(BottomRight, Rows, Serpentine, [[8, 7, 6], [3, 4, 5], [2, 1, 0]])]
#[case(BottomRight, Rows, Linear, [[8, 7, 6], [5, 4, 3], [2, 1, 0]])]
#[case(TopLeft, Columns, Serpentine, [[0, 5, 6], [1, 4, 7], [2, 3, 8]])]
#[case(TopLeft, Columns, Linear, [[0, 3, 6], [1, 4, 7], [2, 5, 8]])]
#[case(TopRight, Columns, Serpentine, [[6, 5, 0], [7, 4, 1], [8, 3, 2]])]
#[case(TopRight, Columns, Linear, [[6, 3, 0], [7, 4, 1], [8, 5, 2]])]
#[case(BottomLeft, Columns, Serpentine, [[2, 3, 8], [1, 4, 7], [0, 5, 6]])]
#[case(BottomLeft, Columns, Linear, [[2, 5, 8], [1, 4, 7], [0, 3, 6]])]
#[case(BottomRight, Columns, Serpentine, [[8, 3, 2], [7, 4, 1], [6, 5, 0]])]
#[case(BottomRight, Columns, Linear, [[8, 5, 2], [7, 4, 1], [6, 3, 0]])]
fn square_panel_matches_wiring_diagram(
    #[case] first_pixel: FirstPixel,
    #[case] arrangement: Arrangement,
    #[case] style: WiringStyle,
    #[case] grid: [[usize; 3]; 3],
) {
    let layout = LedLayout::new(3, 3, Wiring::new(first_pixel, arrangement, style));
    for (row, cells) in grid.iter().enumerate() {
        for (column, &physical) in cells.iter().enumerate() {
            assert_eq!(layout.logical_to_physical(row, column), physical);
            assert_eq!(layout.physical_to_logical(physical), (row, column));
        }
    }
}

#[test]
fn mapping_is_a_bijection_for_every_shape() {
    for layout in every_layout() {
        let mut seen = vec![false; layout.len()];
        for physical in 0..layout.len() {
            let (row, column) = layout.physical_to_logical(physical);
            assert!(row < layout.rows() && column < layout.columns(), "{layout:?}");
            assert_eq!(layout.logical_to_physical(row, column), physical, "{layout:?}");

            let canonical = layout.canonical_index(physical);
            assert_eq!(canonical, row * layout.columns() + column);
            assert!(!seen[canonical], "{layout:?} repeats cell {canonical}");
            seen[canonical] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }
}

#[test]
fn canonical_wiring_is_the_identity() {
    let layout = LedLayout::new(3, 4, Wiring::CANONICAL);
    assert!((0..layout.len()).all(|index| layout.canonical_index(index) == index));
    assert_eq!(Wiring::default(), Wiring::CANONICAL);
}

#[test]
fn linear_constructors() {
    let horizontal = LedLayout::linear_h(5);
    assert_eq!((horizontal.rows(), horizontal.columns()), (1, 5));
    let cells: Vec<_> = (0..5).map(|i| horizontal.physical_to_logical(i)).collect();
    assert_eq!(cells, [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);

    let vertical = LedLayout::linear_v(5);
    assert_eq!((vertical.rows(), vertical.columns()), (5, 1));
    let cells: Vec<_> = (0..5).map(|i| vertical.physical_to_logical(i)).collect();
    assert_eq!(cells, [(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);

    assert!(LedLayout::linear_h(0).is_empty());
}

#[test]
fn serpentine_constructors() {
    let by_rows = LedLayout::serpentine_row_major(2, 3);
    let cells: Vec<_> = (0..6).map(|i| by_rows.physical_to_logical(i)).collect();
    assert_eq!(cells, [(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0)]);

    let by_columns = LedLayout::serpentine_column_major(2, 3);
    let cells: Vec<_> = (0..6).map(|i| by_columns.physical_to_logical(i)).collect();
    assert_eq!(cells, [(0, 0), (1, 0), (1, 1), (0, 1), (0, 2), (1, 2)]);
}

#[test]
fn serpentine_transforms_small_panel() {
    const SERPENTINE: LedLayout = LedLayout::serpentine_column_major(2, 3);
    let cells = |layout: LedLayout| -> Vec<(usize, usize)> {
        (0..layout.len()).map(|i| layout.physical_to_logical(i)).collect()
    };

    assert_eq!(
        cells(SERPENTINE.rotate_cw()),
        [(0, 1), (0, 0), (1, 0), (1, 1), (2, 1), (2, 0)]
    );
    assert_eq!(
        cells(SERPENTINE.rotate_180()),
        [(1, 2), (0, 2), (0, 1), (1, 1), (1, 0), (0, 0)]
    );
    assert_eq!(
        cells(SERPENTINE.rotate_ccw()),
        [(2, 0), (2, 1), (1, 1), (1, 0), (0, 0), (0, 1)]
    );
    assert_eq!(
        cells(SERPENTINE.flip_h()),
        [(0, 2), (1, 2), (1, 1), (0, 1), (0, 0), (1, 0)]
    );
    assert_eq!(
        cells(SERPENTINE.flip_v()),
        [(1, 0), (0, 0), (0, 1), (1, 1), (1, 2), (0, 2)]
    );
}

#[test]
fn transforms_move_every_led_with_the_panel() {
    for layout in every_layout() {
        let (rows, columns) = (layout.rows(), layout.columns());
        let turned = layout.rotate_cw();
        let mirrored = layout.flip_h();
        let upended = layout.flip_v();
        assert_eq!((turned.rows(), turned.columns()), (columns, rows));

        for physical in 0..layout.len() {
            let (row, column) = layout.physical_to_logical(physical);
            assert_eq!(turned.physical_to_logical(physical), (column, rows - 1 - row));
            assert_eq!(mirrored.physical_to_logical(physical), (row, columns - 1 - column));
            assert_eq!(upended.physical_to_logical(physical), (rows - 1 - row, column));
        }
    }
}

#[test]
fn transforms_undo_each_other() {
    for layout in every_layout() {
        assert_eq!(layout.rotate_cw().rotate_ccw(), layout);
        assert_eq!(layout.rotate_180().rotate_180(), layout);
        assert_eq!(layout.flip_h().flip_h(), layout);
        assert_eq!(layout.flip_v().flip_v(), layout);
        assert_eq!(layout.flip_h().flip_v(), layout.rotate_180());
    }
}
