//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no I/O, usable by the simulation core, by
//! renderers that read state snapshots, and by input layers that emit commands.
//!
//! # Field Dimensions
//!
//! The default playfield is 10 columns by 20 rows:
//!
//! - **Columns**: indexed 0-9, left to right (wrapping when the field is a cylinder)
//! - **Rows**: indexed 0-19, top to bottom
//! - **Spawn row**: 0
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LINE_SCORES` | 0/40/100/300/1200 | Base points per clear, multiplied by level |
//! | `SOFT_DROP_POINTS_PER_CELL` | 1 | Points per soft-dropped cell |
//! | `HARD_DROP_POINTS_PER_CELL` | 2 | Points per hard-dropped cell |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines per level step |
//!
//! # Examples
//!
//! ```
//! use conveyor_tetris_types::{Cell, CellState, FieldDimensions, MinoType};
//!
//! let mino = MinoType::from_str("t").unwrap();
//! assert_eq!(mino, MinoType::T);
//!
//! let cell = Cell::mino(mino, CellState::Falling);
//! assert!(!cell.is_empty());
//! assert!(Cell::EMPTY.is_empty());
//!
//! let dims = FieldDimensions::default();
//! assert_eq!((dims.cols, dims.rows), (10, 20));
//! ```

/// Default field width in cells (10 columns)
pub const DEFAULT_COLS: usize = 10;

/// Default field height in cells (20 rows)
pub const DEFAULT_ROWS: usize = 20;

/// Gravity interval at level 1 in milliseconds (owned by the caller's timer)
pub const DEFAULT_GRAVITY_MS: u32 = 800;

/// Ticks the Deleting rows stay visible before compaction
pub const DEFAULT_LINE_CLEAR_DELAY_TICKS: u32 = 3;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines, multiplied by the current level:
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points awarded per cell of soft drop
pub const SOFT_DROP_POINTS_PER_CELL: u32 = 1;

/// Points awarded per cell of hard drop
pub const HARD_DROP_POINTS_PER_CELL: u32 = 2;

/// Cleared lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity intervals by level (milliseconds per row)
///
/// Index 0 = Level 1, last entry applies to every higher level.
pub const DROP_INTERVALS: [u32; 9] = [800, 650, 500, 400, 320, 250, 200, 160, 130];

/// Absolute minimum gravity interval (100ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: horizontal bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinoType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl MinoType {
    /// All seven kinds in canonical bag order.
    pub const ALL: [MinoType; 7] = [
        MinoType::I,
        MinoType::O,
        MinoType::T,
        MinoType::S,
        MinoType::Z,
        MinoType::J,
        MinoType::L,
    ];

    /// Parse mino type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use conveyor_tetris_types::MinoType;
    ///
    /// assert_eq!(MinoType::from_str("i"), Some(MinoType::I));
    /// assert_eq!(MinoType::from_str("O"), Some(MinoType::O));
    /// assert_eq!(MinoType::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "i" => Some(MinoType::I),
            "o" => Some(MinoType::O),
            "t" => Some(MinoType::T),
            "s" => Some(MinoType::S),
            "z" => Some(MinoType::Z),
            "j" => Some(MinoType::J),
            "l" => Some(MinoType::L),
            _ => None,
        }
    }

    /// Convert to uppercase letter
    pub fn as_str(&self) -> &'static str {
        match self {
            MinoType::I => "I",
            MinoType::O => "O",
            MinoType::T => "T",
            MinoType::S => "S",
            MinoType::Z => "Z",
            MinoType::J => "J",
            MinoType::L => "L",
        }
    }

    /// Single character used by ASCII dumps
    pub fn glyph(&self) -> char {
        match self {
            MinoType::I => 'I',
            MinoType::O => 'O',
            MinoType::T => 'T',
            MinoType::S => 'S',
            MinoType::Z => 'Z',
            MinoType::J => 'J',
            MinoType::L => 'L',
        }
    }
}

/// Lifecycle state of a single cell
///
/// - **Empty**: background, no block
/// - **Ghost**: landing preview of the active mino (overlay only)
/// - **Falling**: part of the active mino (overlay only)
/// - **Fixing**: reserved for a lock flash in the render layer
/// - **Fixed**: settled block in the fixed field
/// - **Deleting**: settled block in a row waiting out the line-clear delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    Empty,
    Ghost,
    Falling,
    Fixing,
    Fixed,
    Deleting,
}

/// Visual color tag of a cell
///
/// Renderers map these to concrete palettes; the engine only carries the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellColor {
    Background,
    Ground,
    Ghost,
    Mino(MinoType),
}

/// A cell on a field or shape grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub color: CellColor,
    pub state: CellState,
}

impl Cell {
    /// The one Empty cell. Empty never carries a color beyond background.
    pub const EMPTY: Cell = Cell {
        color: CellColor::Background,
        state: CellState::Empty,
    };

    /// A block of the given mino color
    pub const fn mino(mino: MinoType, state: CellState) -> Self {
        Self {
            color: CellColor::Mino(mino),
            state,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    /// Copy with a new state. Moving to Empty also resets the color.
    pub fn with_state(self, state: CellState) -> Self {
        if state == CellState::Empty {
            return Cell::EMPTY;
        }
        Self { state, ..self }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::EMPTY
    }
}

/// Field size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDimensions {
    pub cols: usize,
    pub rows: usize,
}

impl FieldDimensions {
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.cols * self.rows
    }
}

impl Default for FieldDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS)
    }
}

/// Game lifecycle phase
///
/// `Ready -> Playing -> GameOver`, with `Paused` as a side branch of `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GamePhase {
    Ready,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "pause",
            GamePhase::GameOver => "gameover",
        }
    }
}
