//! Collision module - placement tests, landing search, ghost projection and merging
//!
//! Rows are signed: a shape may hang above row 0 while it spawns. Columns either wrap
//! around the field width (`Topology::Cylinder`) or are bounded by the side walls.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::shapes::Shape;
use crate::types::CellState;

/// Row every mino spawns on
pub const SPAWN_ROW: i32 = 0;

/// Horizontal topology of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Columns wrap modulo the field width; the field is a horizontal cylinder
    #[default]
    Cylinder,
    /// Columns outside `[0, cols)` collide like walls
    Bounded,
}

impl Topology {
    /// Map a column onto the field, `None` when it falls outside a bounded field
    #[inline]
    pub fn resolve_col(self, col: i32, cols: usize) -> Option<usize> {
        if cols == 0 {
            return None;
        }
        match self {
            Topology::Cylinder => Some(col.rem_euclid(cols as i32) as usize),
            Topology::Bounded => {
                if col < 0 || col >= cols as i32 {
                    None
                } else {
                    Some(col as usize)
                }
            }
        }
    }

    /// Canonical anchor column: wrapped under Cylinder, unchanged under Bounded
    pub fn normalize_col(self, col: i32, cols: usize) -> i32 {
        match self {
            Topology::Cylinder if cols > 0 => col.rem_euclid(cols as i32),
            _ => col,
        }
    }

    /// Anchor columns worth trying for a shape `shape_cols` wide
    pub fn candidate_columns(self, shape_cols: usize, cols: usize) -> Range<i32> {
        match self {
            Topology::Cylinder => 0..cols as i32,
            Topology::Bounded if shape_cols <= cols => 0..(cols - shape_cols + 1) as i32,
            Topology::Bounded => 0..0,
        }
    }
}

/// Check whether every block of `shape` anchored at (row, col) fits on `field`.
///
/// Blocks above the top are allowed, blocks below the bottom are not, and every
/// on-grid block needs an Empty cell underneath it.
pub fn can_place(shape: &Shape, row: i32, col: i32, field: &Field, topology: Topology) -> bool {
    shape.blocks().all(|(dy, dx, _)| {
        let Some(target_col) = topology.resolve_col(col + dx as i32, field.cols()) else {
            return false;
        };
        let target_row = row + dy as i32;
        if target_row >= field.rows() as i32 {
            return false;
        }
        if target_row < 0 {
            return true;
        }
        field
            .get(target_row as usize, target_col)
            .is_some_and(|cell| cell.is_empty())
    })
}

/// Lowest row reachable by dropping straight down from (row, col).
///
/// The starting position is assumed valid; the result is never above `row`.
pub fn ghost_row(shape: &Shape, row: i32, col: i32, field: &Field, topology: Topology) -> i32 {
    let mut landing = row;
    while can_place(shape, landing + 1, col, field, topology) {
        landing += 1;
    }
    landing
}

/// Landing row of a shape dropped from the spawn row at `col`.
///
/// Returns `None` when the spawn position itself collides (a top-out).
pub fn find_landing_row(shape: &Shape, col: i32, field: &Field, topology: Topology) -> Option<i32> {
    if !can_place(shape, SPAWN_ROW, col, field, topology) {
        return None;
    }
    Some(ghost_row(shape, SPAWN_ROW, col, field, topology))
}

/// Copy of `field` with every block of `shape` written as a Fixed cell.
///
/// Cells outside the shape's footprint are untouched; blocks that fall off the grid
/// are dropped.
pub fn merge_shape_onto_field(
    field: &Field,
    shape: &Shape,
    row: i32,
    col: i32,
    topology: Topology,
) -> Field {
    let mut next = field.clone();
    for (dy, dx, cell) in shape.blocks() {
        let target_row = row + dy as i32;
        if target_row < 0 {
            continue;
        }
        if let Some(target_col) = topology.resolve_col(col + dx as i32, field.cols()) {
            next.set(target_row as usize, target_col, cell.with_state(CellState::Fixed));
        }
    }
    next
}

/// Field rows covered by a shape anchored at `row`, clipped to the grid
pub fn covered_rows(shape: &Shape, row: i32, field_rows: usize) -> Range<usize> {
    let start = row.max(0) as usize;
    let end = (row + shape.rows() as i32).clamp(0, field_rows as i32) as usize;
    start.min(end)..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::shape_for;
    use crate::types::{FieldDimensions, MinoType};

    fn empty(cols: usize, rows: usize) -> Field {
        Field::new(FieldDimensions::new(cols, rows))
    }

    #[test]
    fn test_can_place_allows_rows_above_top() {
        let field = empty(10, 20);
        let vertical_i = shape_for(MinoType::I, 1);

        assert!(can_place(&vertical_i, -3, 0, &field, Topology::Bounded));
        assert!(!can_place(&vertical_i, 17, 0, &field, Topology::Bounded));
        assert!(can_place(&vertical_i, 16, 0, &field, Topology::Bounded));
    }

    #[test]
    fn test_bounded_rejects_side_overhang() {
        let field = empty(10, 20);
        let o = shape_for(MinoType::O, 0);

        assert!(!can_place(&o, 0, -1, &field, Topology::Bounded));
        assert!(!can_place(&o, 0, 9, &field, Topology::Bounded));
        assert!(can_place(&o, 0, 8, &field, Topology::Bounded));
    }

    #[test]
    fn test_cylinder_wraps_columns() {
        let field = empty(10, 20).with_cell(5, 0, crate::types::Cell::mino(MinoType::T, CellState::Fixed));
        let o = shape_for(MinoType::O, 0);

        // Anchor at column 9 covers columns 9 and 0.
        assert!(can_place(&o, 0, 9, &field, Topology::Cylinder));
        assert!(!can_place(&o, 4, 9, &field, Topology::Cylinder));
        assert!(!can_place(&o, 4, -1, &field, Topology::Cylinder));
    }

    #[test]
    fn test_find_landing_row_on_empty_field() {
        let field = empty(10, 20);
        assert_eq!(
            find_landing_row(&shape_for(MinoType::O, 0), 4, &field, Topology::Bounded),
            Some(18)
        );
        assert_eq!(
            find_landing_row(&shape_for(MinoType::I, 1), 0, &field, Topology::Bounded),
            Some(16)
        );
    }

    #[test]
    fn test_find_landing_row_blocked_spawn() {
        let field = Field::from_ascii(&["....#.....", ".........."]).unwrap();
        assert_eq!(
            find_landing_row(&shape_for(MinoType::O, 0), 4, &field, Topology::Cylinder),
            None
        );
    }

    #[test]
    fn test_ghost_row_from_current_position() {
        let field = Field::from_ascii(&["....", "....", "....", "....", "#..."]).unwrap();
        let o = shape_for(MinoType::O, 0);

        assert_eq!(ghost_row(&o, 0, 0, &field, Topology::Bounded), 2);
        assert_eq!(ghost_row(&o, 1, 1, &field, Topology::Bounded), 3);
    }

    #[test]
    fn test_merge_writes_fixed_cells_only_in_footprint() {
        let field = empty(4, 4);
        let merged = merge_shape_onto_field(&field, &shape_for(MinoType::T, 0), 2, 3, Topology::Cylinder);

        assert_eq!(merged, Field::from_ascii(&["....", "....", "T...", "TT.T"]).unwrap());
        assert_eq!(merged.count_state(CellState::Fixed), 4);
    }

    #[test]
    fn test_covered_rows_clips() {
        let i = shape_for(MinoType::I, 1);
        assert_eq!(covered_rows(&i, -2, 20), 0..2);
        assert_eq!(covered_rows(&i, 16, 20), 16..20);
    }

    #[test]
    fn test_candidate_columns() {
        assert_eq!(Topology::Cylinder.candidate_columns(4, 10), 0..10);
        assert_eq!(Topology::Bounded.candidate_columns(4, 10), 0..7);
        assert_eq!(Topology::Bounded.candidate_columns(5, 4), 0..0);
    }
}
