//! Field module - the rows x cols cell grid
//!
//! A field is a flat row-major vector of cells with dimensions fixed at creation.
//! Coordinates: (row, col) where row 0 is the top and col 0 is the left edge.
//!
//! Every public transformation takes `&self` and returns a new `Field`, so a field
//! held by a game state is never mutated after the state is produced.

use std::fmt;

use crate::types::{Cell, CellColor, CellState, FieldDimensions, MinoType};

/// Playfield grid with flat storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    dims: FieldDimensions,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

/// The settled/locked playfield
pub type FixedField = Field;

/// Overlay grid derived from the active mino and its ghost
pub type FallingField = Field;

impl Field {
    /// Create a new empty field
    pub fn new(dims: FieldDimensions) -> Self {
        Self {
            dims,
            cells: vec![Cell::EMPTY; dims.area()],
        }
    }

    /// Parse a field from text rows, for tests and fixtures.
    ///
    /// `.` is Empty, `#` is a Ground block, a mino letter is a Fixed block of that mino.
    /// Returns `None` for an empty input, ragged rows, or unknown characters.
    pub fn from_ascii(rows: &[&str]) -> Option<Self> {
        let cols = rows.first()?.chars().count();
        if cols == 0 {
            return None;
        }

        let mut cells = Vec::with_capacity(cols * rows.len());
        for line in rows {
            if line.chars().count() != cols {
                return None;
            }
            for ch in line.chars() {
                let cell = match ch {
                    '.' => Cell::EMPTY,
                    '#' => Cell {
                        color: CellColor::Ground,
                        state: CellState::Fixed,
                    },
                    other => Cell::mino(
                        MinoType::from_str(&other.to_string())?,
                        CellState::Fixed,
                    ),
                };
                cells.push(cell);
            }
        }

        Some(Self {
            dims: FieldDimensions::new(cols, rows.len()),
            cells,
        })
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.dims.rows || col >= self.dims.cols {
            return None;
        }
        Some(row * self.dims.cols + col)
    }

    pub fn dimensions(&self) -> FieldDimensions {
        self.dims
    }

    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    /// Get cell at (row, col), `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Signed lookup; negative coordinates are out of bounds
    pub fn cell_at(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.get(row as usize, col as usize)
    }

    /// Copy of this field with one cell replaced. Out-of-bounds writes are ignored.
    pub fn with_cell(&self, row: usize, col: usize, cell: Cell) -> Self {
        let mut next = self.clone();
        next.set(row, col, cell);
        next
    }

    /// In-place write used while building a fresh field
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Cells of one row
    pub fn row(&self, row: usize) -> &[Cell] {
        if row >= self.dims.rows {
            return &[];
        }
        let start = row * self.dims.cols;
        &self.cells[start..start + self.dims.cols]
    }

    /// Check if a row has no Empty cell
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.dims.rows && self.row(row).iter().all(|cell| !cell.is_empty())
    }

    /// Check if a row has at least one non-Empty cell
    pub fn is_row_occupied(&self, row: usize) -> bool {
        self.row(row).iter().any(|cell| !cell.is_empty())
    }

    /// Indices of every full row, top to bottom
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.dims.rows).filter(|&r| self.is_row_full(r)).collect()
    }

    /// Copy with every non-Empty cell of the given rows switched to `state`
    pub fn mark_rows(&self, rows: &[usize], state: CellState) -> Self {
        let mut next = self.clone();
        let width = self.dims.cols;
        for &row in rows {
            if row >= self.dims.rows {
                continue;
            }
            for cell in &mut next.cells[row * width..(row + 1) * width] {
                if !cell.is_empty() {
                    *cell = cell.with_state(state);
                }
            }
        }
        next
    }

    /// Remove the given rows and pad the top with as many Empty rows.
    ///
    /// Uses a two-pointer pass from the bottom; height stays at `rows`.
    pub fn remove_rows(&self, rows: &[usize]) -> Self {
        let width = self.dims.cols;
        let mut next = Self::new(self.dims);
        let mut write_row = self.dims.rows;

        for read_row in (0..self.dims.rows).rev() {
            if rows.contains(&read_row) {
                continue;
            }
            write_row -= 1;
            let src = read_row * width;
            let dst = write_row * width;
            next.cells[dst..dst + width].copy_from_slice(&self.cells[src..src + width]);
        }

        next
    }

    /// Remove every full row; returns the compacted field and the cleared count.
    ///
    /// A field without full rows comes back unchanged.
    pub fn clear_full_rows(&self) -> (Self, usize) {
        let full = self.full_rows();
        if full.is_empty() {
            return (self.clone(), 0);
        }
        (self.remove_rows(&full), full.len())
    }

    /// Rotate every row circularly by `delta` columns.
    ///
    /// Positive deltas move content left: `next[c] = prev[(c + delta) mod cols]`.
    pub fn rotate_rows(&self, delta: i32) -> Self {
        let width = self.dims.cols;
        if width == 0 {
            return self.clone();
        }
        let shift = delta.rem_euclid(width as i32) as usize;
        if shift == 0 {
            return self.clone();
        }

        let mut next = self.clone();
        for row in 0..self.dims.rows {
            next.cells[row * width..(row + 1) * width].rotate_left(shift);
        }
        next
    }

    /// Stack height of a column: distance from the top filled cell to the bottom
    pub fn column_height(&self, col: usize) -> usize {
        (0..self.dims.rows)
            .find(|&row| self.get(row, col).is_some_and(|cell| !cell.is_empty()))
            .map_or(0, |row| self.dims.rows - row)
    }

    /// Number of cells in the given state
    pub fn count_state(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| cell.state == state).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy with a 2x2 Ground block centred on the bottom two rows
    pub fn seed_demo_block(&self) -> Self {
        let mut next = self.clone();
        let start_row = self.dims.rows.saturating_sub(2);
        let start_col = self.dims.cols.saturating_sub(2) / 2;
        let block = Cell {
            color: CellColor::Ground,
            state: CellState::Fixed,
        };
        for dy in 0..2 {
            for dx in 0..2 {
                next.set(start_row + dy, start_col + dx, block);
            }
        }
        next
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.dims.rows {
            for cell in self.row(row) {
                let ch = match (cell.state, cell.color) {
                    (CellState::Empty, _) => '.',
                    (CellState::Ghost, _) => ':',
                    (CellState::Deleting, _) => '=',
                    (_, CellColor::Mino(mino)) => mino.glyph(),
                    (_, CellColor::Ground) => '#',
                    (_, _) => '?',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(mino: MinoType) -> Cell {
        Cell::mino(mino, CellState::Fixed)
    }

    #[test]
    fn test_field_index_calculation() {
        let field = Field::new(FieldDimensions::new(10, 20));
        assert_eq!(field.index(0, 0), Some(0));
        assert_eq!(field.index(0, 9), Some(9));
        assert_eq!(field.index(1, 0), Some(10));
        assert_eq!(field.index(19, 9), Some(199));
        assert_eq!(field.index(0, 10), None);
        assert_eq!(field.index(20, 0), None);
        assert_eq!(field.cell_at(-1, 0), None);
    }

    #[test]
    fn test_with_cell_leaves_source_untouched() {
        let field = Field::new(FieldDimensions::new(4, 4));
        let next = field.with_cell(2, 1, fixed(MinoType::T));

        assert_eq!(field.get(2, 1), Some(Cell::EMPTY));
        assert_eq!(next.get(2, 1), Some(fixed(MinoType::T)));
    }

    #[test]
    fn test_remove_rows_pads_top() {
        let field = Field::from_ascii(&["I...", "..O.", "TTTT", ".S.."]).unwrap();
        let next = field.remove_rows(&[2]);

        assert_eq!(next, Field::from_ascii(&["....", "I...", "..O.", ".S.."]).unwrap());
        assert_eq!(next.rows(), 4);
    }

    #[test]
    fn test_clear_full_rows_noop_without_full_rows() {
        let field = Field::from_ascii(&["....", "I.I.", "ZZZ."]).unwrap();
        let (next, cleared) = field.clear_full_rows();

        assert_eq!(cleared, 0);
        assert_eq!(next, field);
    }

    #[test]
    fn test_rotate_rows_moves_content_left() {
        let field = Field::from_ascii(&["IO..", "...T"]).unwrap();

        assert_eq!(
            field.rotate_rows(1),
            Field::from_ascii(&["O..I", "..T."]).unwrap()
        );
        assert_eq!(
            field.rotate_rows(-1),
            Field::from_ascii(&[".IO.", "T..."]).unwrap()
        );
        assert_eq!(field.rotate_rows(4), field);
    }

    #[test]
    fn test_mark_rows_skips_empty_cells() {
        let field = Field::from_ascii(&["....", "LL.L"]).unwrap();
        let marked = field.mark_rows(&[1], CellState::Deleting);

        assert_eq!(marked.count_state(CellState::Deleting), 3);
        assert_eq!(marked.get(1, 2), Some(Cell::EMPTY));
    }

    #[test]
    fn test_column_height() {
        let field = Field::from_ascii(&["....", ".J..", ".J..", "JJ.."]).unwrap();

        assert_eq!(field.column_height(0), 1);
        assert_eq!(field.column_height(1), 3);
        assert_eq!(field.column_height(2), 0);
    }

    #[test]
    fn test_seed_demo_block() {
        let field = Field::new(FieldDimensions::new(10, 20)).seed_demo_block();

        assert_eq!(field.count_state(CellState::Fixed), 4);
        for (row, col) in [(18, 4), (18, 5), (19, 4), (19, 5)] {
            assert_eq!(field.get(row, col).unwrap().color, CellColor::Ground);
        }
    }

    #[test]
    fn test_from_ascii_rejects_ragged_rows() {
        assert!(Field::from_ascii(&["...", ".."]).is_none());
        assert!(Field::from_ascii(&[]).is_none());
        assert!(Field::from_ascii(&["..x"]).is_none());
    }

    #[test]
    fn test_display_roundtrip_glyphs() {
        let field = Field::from_ascii(&["#.", "IZ"]).unwrap();
        assert_eq!(field.to_string(), "#.\nIZ\n");
    }
}
