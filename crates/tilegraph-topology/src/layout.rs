//! Rectangular map layouts.
//!
//! Generates the cell set for a fresh `rows` x `columns` map, roughly centred
//! on the origin. Hex rows zig-zag between the northeast and southeast
//! directions so each row stays level in world space.

use crate::{hex, square, GridTopology, LatticeCoord};

/// Cells of a `rows` x `columns` rectangle, row by row from the south-west.
pub fn rectangle(topology: GridTopology, rows: u32, columns: u32) -> Vec<LatticeCoord> {
    let rows = rows as i32;
    let columns = columns as i32;
    let mut cells = Vec::with_capacity((rows * columns).max(0) as usize);

    match topology {
        GridTopology::Hex => {
            let [north, northeast, southeast, south, southwest, northwest] = hex::DIRECTIONS;
            let southwest_shift = columns / 4 + i32::from(columns % 4 == 3);
            let mut row_start =
                south * (rows / 2) + southwest * southwest_shift + northwest * (columns / 4);
            for _ in 0..rows {
                for j in 0..columns {
                    cells.push(row_start + northeast * ((j + 1) / 2) + southeast * (j / 2));
                }
                row_start += north;
            }
        }
        GridTopology::Square => {
            let [north, east, _, _] = square::DIRECTIONS;
            let mut row_start = LatticeCoord::planar(-(columns / 2), -(rows / 2));
            for _ in 0..rows {
                for j in 0..columns {
                    cells.push(row_start + east * j);
                }
                row_start += north;
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rectangle_has_rows_times_columns_unique_cells() {
        for topology in [GridTopology::Hex, GridTopology::Square] {
            for (rows, columns) in [(1, 1), (3, 4), (5, 7), (8, 3)] {
                let cells = rectangle(topology, rows, columns);
                let unique: HashSet<_> = cells.iter().collect();
                assert_eq!(cells.len(), (rows * columns) as usize);
                assert_eq!(unique.len(), cells.len(), "{topology} {rows}x{columns}");
                assert!(cells.iter().all(|c| topology.validate(*c).is_ok()));
            }
        }
    }

    #[test]
    fn square_rectangle_is_centred() {
        let cells = rectangle(GridTopology::Square, 3, 3);
        assert_eq!(cells.first(), Some(&LatticeCoord::planar(-1, -1)));
        assert_eq!(cells.last(), Some(&LatticeCoord::planar(1, 1)));
    }

    #[test]
    fn hex_rows_are_level_in_world_space() {
        let cells = rectangle(GridTopology::Hex, 2, 6);
        let first_row = &cells[..6];
        for pair in first_row.windows(2) {
            let a = GridTopology::Hex.lattice_to_world(pair[0], 1.0);
            let b = GridTopology::Hex.lattice_to_world(pair[1], 1.0);
            assert!(b.x > a.x);
            assert!((b.z - a.z).abs() <= hex::COS_30 + 1e-4);
        }
    }

    #[test]
    fn empty_rectangle() {
        assert!(rectangle(GridTopology::Square, 0, 5).is_empty());
    }
}
