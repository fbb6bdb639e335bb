//! Scoring module - line clear, drop and level rules
//!
//! Classic table scoring: base points per clear size, multiplied by the level.
//! Levels start at 1 and advance every `LINES_PER_LEVEL` cleared lines.

use crate::types::{
    HARD_DROP_POINTS_PER_CELL, LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS_PER_CELL,
};

/// Calculate line clear score
/// lines: number of lines cleared (1-4)
/// level: current level (1-based)
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level.max(1))
}

/// Points for dropping `cells` rows, soft or hard
pub fn drop_score(cells: u32, hard: bool) -> u32 {
    let per_cell = if hard {
        HARD_DROP_POINTS_PER_CELL
    } else {
        SOFT_DROP_POINTS_PER_CELL
    };
    cells.saturating_mul(per_cell)
}

/// Level reached after clearing `lines` in total
pub fn level_for_lines(lines: u32) -> u32 {
    1 + lines / LINES_PER_LEVEL
}
