//! Evaluation module - field scoring heuristic and auto-placement search
//!
//! A candidate placement is scored on the field it would leave behind:
//!
//! 1. full rows are cleared virtually and counted
//! 2. column heights and holes are measured on the compacted field
//! 3. bumpiness sums adjacent height differences
//! 4. wells (columns walled in on both sides) earn a bonus when the rows of their
//!    open part are otherwise full
//! 5. weights switch by mode: holes or a tall stack disable the well bonus, a clean low
//!    stack disables the line-clear reward
//! 6. `score = cleared² · line_clear − holes · hole − bumpiness · surface
//!    − total_height · height + well_bonus`

use serde::{Deserialize, Serialize};

use crate::collision::{find_landing_row, merge_shape_onto_field, Topology};
use crate::field::Field;
use crate::shapes::{shape_for, ROTATIONS};
use crate::types::MinoType;

/// Heuristic weights, each independently tunable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationWeights {
    pub line_clear: f64,
    pub hole: f64,
    pub surface: f64,
    pub height: f64,
    pub well: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            line_clear: 120.0,
            hole: 45.0,
            surface: 4.0,
            height: 1.0,
            well: 30.0,
        }
    }
}

impl EvaluationWeights {
    pub fn is_finite(&self) -> bool {
        [self.line_clear, self.hole, self.surface, self.height, self.well]
            .iter()
            .all(|w| w.is_finite())
    }
}

/// Mode-switch and well thresholds.
///
/// The defaults are empirical, not tuned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeThresholds {
    /// Max column height at or above which the well bonus is suppressed
    pub clear_mode_height: usize,
    /// Max column height at or below which (with no holes) line clears are not rewarded
    pub stack_mode_height: usize,
    /// How much taller both neighbours must be for a column to count as a well
    pub well_wall_height: usize,
}

impl Default for ModeThresholds {
    fn default() -> Self {
        Self {
            clear_mode_height: 11,
            stack_mode_height: 10,
            well_wall_height: 2,
        }
    }
}

/// Measurements of a field after the virtual line clear
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetrics {
    pub cleared_lines: usize,
    pub heights: Vec<usize>,
    pub holes: usize,
    pub bumpiness: usize,
    pub total_height: usize,
    pub max_height: usize,
    /// Well bonus with the mode-adjusted weight already applied
    pub well_bonus: f64,
}

/// Best placement found for one mino
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub mino: MinoType,
    /// Normalized rotation in `[0, 4)`
    pub rotation: i32,
    pub col: i32,
    /// Landing row when dropped from the spawn row
    pub row: i32,
    pub score: f64,
}

/// Measure a hypothetical post-placement field
pub fn analyze_field(
    field: &Field,
    weights: &EvaluationWeights,
    thresholds: &ModeThresholds,
) -> FieldMetrics {
    let (field, cleared_lines) = field.clear_full_rows();
    let rows = field.rows();
    let cols = field.cols();

    let mut heights = vec![0usize; cols];
    let mut holes = 0usize;
    for (col, height) in heights.iter_mut().enumerate() {
        let mut block_seen = false;
        for row in 0..rows {
            let empty = field.get(row, col).is_some_and(|cell| cell.is_empty());
            if !empty {
                if !block_seen {
                    *height = rows - row;
                    block_seen = true;
                }
            } else if block_seen {
                holes += 1;
            }
        }
    }

    let bumpiness = heights
        .windows(2)
        .map(|pair| pair[0].abs_diff(pair[1]))
        .sum();
    let total_height = heights.iter().sum();
    let max_height = heights.iter().copied().max().unwrap_or(0);

    let adjusted = adjust_weights_for_mode(weights, thresholds, holes > 0, max_height);
    let well_bonus = well_bonus(&field, &heights, adjusted.well, thresholds.well_wall_height);

    FieldMetrics {
        cleared_lines,
        heights,
        holes,
        bumpiness,
        total_height,
        max_height,
        well_bonus,
    }
}

/// Scalar desirability of a field; higher is better
pub fn evaluate_field(field: &Field, weights: &EvaluationWeights, thresholds: &ModeThresholds) -> f64 {
    if field.rows() == 0 || field.cols() == 0 {
        return 0.0;
    }

    let metrics = analyze_field(field, weights, thresholds);
    let adjusted =
        adjust_weights_for_mode(weights, thresholds, metrics.holes > 0, metrics.max_height);
    let cleared = metrics.cleared_lines as f64;

    cleared * cleared * adjusted.line_clear
        - metrics.holes as f64 * adjusted.hole
        - metrics.bumpiness as f64 * adjusted.surface
        - metrics.total_height as f64 * adjusted.height
        + metrics.well_bonus
}

fn adjust_weights_for_mode(
    weights: &EvaluationWeights,
    thresholds: &ModeThresholds,
    has_holes: bool,
    max_height: usize,
) -> EvaluationWeights {
    let mut adjusted = *weights;

    let clear_mode = has_holes || max_height >= thresholds.clear_mode_height;
    let stack_mode = !has_holes && max_height <= thresholds.stack_mode_height;

    if clear_mode {
        adjusted.well = 0.0;
    }
    if stack_mode {
        adjusted.line_clear = 0.0;
    }

    adjusted
}

fn well_bonus(field: &Field, heights: &[usize], weight: f64, wall: usize) -> f64 {
    if weight == 0.0 {
        return 0.0;
    }

    let cols = heights.len();
    let mut total = 0.0;
    for col in 0..cols {
        let current = heights[col];
        // Side walls count as infinitely tall.
        let left = if col == 0 { usize::MAX } else { heights[col - 1] };
        let right = if col + 1 == cols { usize::MAX } else { heights[col + 1] };
        if left < current + wall || right < current + wall {
            continue;
        }

        let depth = open_depth(field, col);
        if depth == 0 {
            continue;
        }

        // Bottom `depth` rows; once full rows are cleared, only open-region rows can count.
        let full_rows = (field.rows().saturating_sub(depth)..field.rows())
            .filter(|&row| {
                field
                    .row(row)
                    .iter()
                    .enumerate()
                    .all(|(c, cell)| c == col || !cell.is_empty())
            })
            .count();
        if full_rows == 0 {
            continue;
        }

        total += (full_rows * depth) as f64 * weight;
    }

    total
}

/// Empty run from the top of a column down to its first block
fn open_depth(field: &Field, col: usize) -> usize {
    (0..field.rows())
        .take_while(|&row| field.get(row, col).is_some_and(|cell| cell.is_empty()))
        .count()
}

/// Search every rotation and column for the best placement of `mino`.
///
/// Scan order is rotation-major then column; ties keep the first candidate found.
/// Returns `None` when the mino cannot spawn anywhere.
pub fn evaluate_mino_candidate(
    field: &Field,
    mino: MinoType,
    topology: Topology,
    weights: &EvaluationWeights,
    thresholds: &ModeThresholds,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for rotation in 0..ROTATIONS {
        let shape = shape_for(mino, rotation);
        if shape.cols() == 0 || shape.rows() == 0 || shape.cols() > field.cols() {
            continue;
        }

        for col in topology.candidate_columns(shape.cols(), field.cols()) {
            let Some(row) = find_landing_row(&shape, col, field, topology) else {
                continue;
            };

            let merged = merge_shape_onto_field(field, &shape, row, col, topology);
            let score = evaluate_field(&merged, weights, thresholds);
            if best.map_or(true, |b| score > b.score) {
                best = Some(Candidate {
                    mino,
                    rotation,
                    col,
                    row,
                    score,
                });
            }
        }
    }

    best
}

/// Best candidate across several minos; returns the winning index into `minos`.
///
/// Ties keep the earliest mino.
pub fn best_candidate_among(
    field: &Field,
    minos: &[MinoType],
    topology: Topology,
    weights: &EvaluationWeights,
    thresholds: &ModeThresholds,
) -> Option<(usize, Candidate)> {
    let mut best: Option<(usize, Candidate)> = None;
    for (index, &mino) in minos.iter().enumerate() {
        let Some(candidate) = evaluate_mino_candidate(field, mino, topology, weights, thresholds)
        else {
            continue;
        };
        if best.map_or(true, |(_, b)| candidate.score > b.score) {
            best = Some((index, candidate));
        }
    }
    best
}
