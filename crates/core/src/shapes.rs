//! Shapes module - canonical mino grids and the rotation transform
//!
//! Each mino has exactly one authored grid: its spawn orientation, cropped to a tight
//! bounding box. The other three orientations are derived by repeated clockwise
//! rotation, `result[y][x] = source[rows - 1 - x][y]`.

use crate::types::{Cell, CellState, MinoType};

/// Number of distinct rotation states
pub const ROTATIONS: i32 = 4;

/// Rectangular grid of cells describing one orientation of a mino
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    mino: MinoType,
    rows: usize,
    cols: usize,
    /// Row-major cells, mostly Empty
    cells: Vec<Cell>,
}

impl Shape {
    /// Spawn orientation of a mino
    pub fn base(mino: MinoType) -> Self {
        let pattern: &[&str] = match mino {
            MinoType::I => &["XXXX"],
            MinoType::O => &["XX", "XX"],
            MinoType::T => &[".X.", "XXX"],
            MinoType::S => &[".XX", "XX."],
            MinoType::Z => &["XX.", ".XX"],
            MinoType::J => &["X..", "XXX"],
            MinoType::L => &["..X", "XXX"],
        };

        let rows = pattern.len();
        let cols = pattern[0].len();
        let solid = Cell::mino(mino, CellState::Falling);
        let cells = pattern
            .iter()
            .flat_map(|line| line.bytes())
            .map(|b| if b == b'X' { solid } else { Cell::EMPTY })
            .collect();

        Self {
            mino,
            rows,
            cols,
            cells,
        }
    }

    pub fn mino(&self) -> MinoType {
        self.mino
    }

    /// Number of rows (height)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (width)
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, dy: usize, dx: usize) -> Option<Cell> {
        if dy >= self.rows || dx >= self.cols {
            return None;
        }
        Some(self.cells[dy * self.cols + dx])
    }

    /// Offsets `(dy, dx)` of every non-Empty cell with the cell itself
    pub fn blocks(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(i, cell)| (i / self.cols, i % self.cols, *cell))
    }

    /// Rotate 90° clockwise; a rows x cols grid becomes cols x rows
    pub fn rotate_cw(&self) -> Self {
        let rows = self.cols;
        let cols = self.rows;
        let mut cells = Vec::with_capacity(self.cells.len());
        for y in 0..rows {
            for x in 0..cols {
                cells.push(self.cells[(self.rows - 1 - x) * self.cols + y]);
            }
        }

        Self {
            mino: self.mino,
            rows,
            cols,
            cells,
        }
    }

    /// Column that centres this shape on a field of `field_cols`
    pub fn spawn_col(&self, field_cols: usize) -> i32 {
        (field_cols.saturating_sub(self.cols) / 2) as i32
    }
}

/// Normalize any integer rotation into `[0, 4)`
pub fn normalize_rotation(rotation: i32) -> i32 {
    rotation.rem_euclid(ROTATIONS)
}

/// Get the grid for a mino at a rotation; any integer rotation is accepted
pub fn shape_for(mino: MinoType, rotation: i32) -> Shape {
    let mut shape = Shape::base(mino);
    for _ in 0..normalize_rotation(rotation) {
        shape = shape.rotate_cw();
    }
    shape
}
