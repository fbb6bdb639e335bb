//! Game state module - the authoritative state machine
//!
//! This module ties together the field, shape catalog, collision engine, heuristic,
//! next queue and scoring. Every public transition takes `&self` plus the engine
//! config and returns a new `GameState`; the input value is never modified.
//!
//! Phases: `Ready -> Playing -> GameOver`, with `Paused` as a side branch of
//! `Playing`. Only `Playing` advances: ticks, drops, shifts and holds are no-ops
//! in every other phase.

use arrayvec::ArrayVec;

use crate::collision::{can_place, covered_rows, ghost_row, merge_shape_onto_field, SPAWN_ROW};
use crate::config::{EngineConfig, SpawnPolicy};
use crate::evaluation::{best_candidate_among, evaluate_mino_candidate};
use crate::field::{FallingField, Field, FixedField};
use crate::rng::{NextQueue, Randomizer, SimpleRng};
use crate::scoring::{drop_score, level_for_lines, line_clear_score};
use crate::shapes::{normalize_rotation, shape_for, Shape};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, StatsSnapshot};
use crate::types::{Cell, CellColor, CellState, FieldDimensions, GamePhase, MinoType};

/// Most rows a single lock can fill
pub const MAX_CLEAR_ROWS: usize = 4;

const GHOST_CELL: Cell = Cell {
    color: CellColor::Ghost,
    state: CellState::Ghost,
};

/// Active falling mino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveMino {
    pub mino: MinoType,
    /// Normalized rotation in `[0, 4)`
    pub rotation: i32,
    /// Anchor row of the shape's top edge; may be negative while spawning
    pub row: i32,
    /// Anchor column of the shape's left edge
    pub col: i32,
}

impl ActiveMino {
    pub fn new(mino: MinoType, rotation: i32, row: i32, col: i32) -> Self {
        Self {
            mino,
            rotation: normalize_rotation(rotation),
            row,
            col,
        }
    }

    /// Shape for the current rotation
    pub fn shape(&self) -> Shape {
        shape_for(self.mino, self.rotation)
    }
}

/// Bootstrap inputs beyond the engine config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapOptions {
    /// Seed for the default randomizer
    pub seed: u32,
    /// Minos served before the first shuffled bag
    pub queue: Vec<MinoType>,
    /// Pre-built fixed field; must match the configured dimensions
    pub field: Option<Field>,
}

impl BootstrapOptions {
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_queue(mut self, queue: &[MinoType]) -> Self {
        self.queue = queue.to_vec();
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState<R: Randomizer = SimpleRng> {
    dims: FieldDimensions,
    fixed_field: FixedField,
    falling_field: FallingField,
    active: Option<ActiveMino>,
    next_queue: NextQueue<R>,
    held: Option<MinoType>,
    can_hold: bool,
    score: u32,
    lines: u32,
    level: u32,
    /// Number of minos locked so far
    mino_drops: u32,
    /// `mino_drops` at the moment of the first line clear
    first_clear_drop_count: Option<u32>,
    /// Cumulative ground shift, modulo the field width
    ground_shift: usize,
    /// Rows marked Deleting and waiting for compaction
    clearing_rows: ArrayVec<usize, MAX_CLEAR_ROWS>,
    clear_countdown: u32,
    phase: GamePhase,
}

impl GameState<SimpleRng> {
    /// Create a game driven by a seeded `SimpleRng`
    pub fn bootstrap(config: &EngineConfig, options: &BootstrapOptions) -> Self {
        Self::bootstrap_with_rng(config, options, SimpleRng::new(options.seed))
    }
}

impl<R: Randomizer> GameState<R> {
    /// Create a game with an injected randomizer and spawn the first mino.
    ///
    /// The phase is `Playing` when `config.auto_start` is set, `Ready` otherwise.
    /// A first spawn that collides ends the game immediately.
    pub fn bootstrap_with_rng(config: &EngineConfig, options: &BootstrapOptions, rng: R) -> Self {
        let dims = config.dimensions;
        let mut fixed_field = match &options.field {
            Some(field) if field.dimensions() == dims => field.clone(),
            _ => Field::new(dims),
        };
        if config.seed_demo_block {
            fixed_field = fixed_field.seed_demo_block();
        }

        let mut state = Self {
            dims,
            fixed_field,
            falling_field: Field::new(dims),
            active: None,
            next_queue: NextQueue::with_prefix(&options.queue, rng),
            held: None,
            can_hold: true,
            score: 0,
            lines: 0,
            level: 1,
            mino_drops: 0,
            first_clear_drop_count: None,
            ground_shift: 0,
            clearing_rows: ArrayVec::new(),
            clear_countdown: 0,
            phase: if config.auto_start {
                GamePhase::Playing
            } else {
                GamePhase::Ready
            },
        };
        state.spawn_next(config);
        state
    }

    /// Fresh game with the same config, continuing the randomizer sequence
    pub fn reset(&self, config: &EngineConfig) -> Self {
        Self::bootstrap_with_rng(
            config,
            &BootstrapOptions::default(),
            self.next_queue.rng().clone(),
        )
    }

    // ---- accessors ----

    pub fn dimensions(&self) -> FieldDimensions {
        self.dims
    }

    pub fn fixed_field(&self) -> &FixedField {
        &self.fixed_field
    }

    pub fn falling_field(&self) -> &FallingField {
        &self.falling_field
    }

    pub fn active(&self) -> Option<ActiveMino> {
        self.active
    }

    pub fn next_queue(&self) -> &NextQueue<R> {
        &self.next_queue
    }

    /// First `n` queued minos
    pub fn preview(&self, n: usize) -> Vec<MinoType> {
        self.next_queue.peek(n)
    }

    pub fn held(&self) -> Option<MinoType> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn mino_drops(&self) -> u32 {
        self.mino_drops
    }

    pub fn first_clear_drop_count(&self) -> Option<u32> {
        self.first_clear_drop_count
    }

    pub fn ground_shift(&self) -> usize {
        self.ground_shift
    }

    pub fn clearing_rows(&self) -> &[usize] {
        &self.clearing_rows
    }

    pub fn clear_countdown(&self) -> u32 {
        self.clear_countdown
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_clearing(&self) -> bool {
        !self.clearing_rows.is_empty()
    }

    /// Landing row of the active mino from its current position
    pub fn ghost_row(&self, config: &EngineConfig) -> Option<i32> {
        let active = self.active?;
        Some(ghost_row(
            &active.shape(),
            active.row,
            active.col,
            &self.fixed_field,
            config.topology,
        ))
    }

    /// Fixed field with the falling overlay painted on top
    pub fn composite_field(&self) -> Field {
        let mut composite = self.fixed_field.clone();
        for row in 0..self.dims.rows {
            for col in 0..self.dims.cols {
                if let Some(cell) = self.falling_field.get(row, col) {
                    if !cell.is_empty() {
                        composite.set(row, col, cell);
                    }
                }
            }
        }
        composite
    }

    /// Render-facing read model
    pub fn snapshot(&self, config: &EngineConfig, preview_len: usize) -> GameSnapshot {
        let grid = |field: &Field| -> Vec<Vec<Cell>> {
            (0..self.dims.rows).map(|row| field.row(row).to_vec()).collect()
        };

        GameSnapshot {
            cols: self.dims.cols,
            rows: self.dims.rows,
            board: grid(&self.fixed_field),
            overlay: grid(&self.falling_field),
            active: self.active.map(ActiveSnapshot::from),
            ghost_row: self.ghost_row(config),
            held: self.held,
            can_hold: self.can_hold,
            preview: self.preview(preview_len),
            ground_shift: self.ground_shift,
            clearing_rows: self.clearing_rows.to_vec(),
            clear_countdown: self.clear_countdown,
            phase: self.phase,
            game_over: self.is_game_over(),
            stats: StatsSnapshot {
                score: self.score,
                lines: self.lines,
                level: self.level,
                mino_drops: self.mino_drops,
                first_clear_drop_count: self.first_clear_drop_count,
            },
        }
    }

    // ---- phase transitions ----

    /// Ready -> Playing
    pub fn start(&self) -> Self {
        self.with_phase_change(GamePhase::Ready, GamePhase::Playing)
    }

    /// Playing -> Paused
    pub fn pause(&self) -> Self {
        self.with_phase_change(GamePhase::Playing, GamePhase::Paused)
    }

    /// Paused -> Playing
    pub fn resume(&self) -> Self {
        self.with_phase_change(GamePhase::Paused, GamePhase::Playing)
    }

    fn with_phase_change(&self, from: GamePhase, to: GamePhase) -> Self {
        let mut next = self.clone();
        if next.phase == from {
            next.phase = to;
        }
        next
    }

    // ---- gameplay transitions ----

    /// Advance one gravity step.
    ///
    /// In order: count down an in-progress line clear (compacting and spawning at
    /// zero), spawn when no mino is active, move the active mino down one row, or
    /// lock it when it is blocked.
    pub fn tick(&self, config: &EngineConfig) -> Self {
        if self.phase != GamePhase::Playing {
            return self.clone();
        }

        let mut next = self.clone();
        if next.is_clearing() {
            next.clear_countdown = next.clear_countdown.saturating_sub(1);
            if next.clear_countdown == 0 {
                next.finish_clear();
                next.spawn_next(config);
            }
            return next;
        }

        let Some(active) = next.active else {
            next.spawn_next(config);
            return next;
        };

        let shape = active.shape();
        if can_place(&shape, active.row + 1, active.col, &next.fixed_field, config.topology) {
            next.active = Some(ActiveMino {
                row: active.row + 1,
                ..active
            });
            next.refresh_falling_field(config);
        } else {
            next.lock_active(config);
        }
        next
    }

    /// Rotate the ground by `delta` cells, one unit step at a time.
    ///
    /// Positive deltas move the ground left. After each step a colliding active mino
    /// is pushed to the nearest free column in the direction the ground moved; when
    /// none exists within `cols` attempts the remaining steps are dropped.
    ///
    /// Deltas longer than one revolution are folded to one revolution plus the
    /// remainder, which keeps `ground_shift` equal to `delta mod cols`.
    pub fn shift_ground_by_cells(&self, config: &EngineConfig, delta: i32) -> Self {
        if self.phase != GamePhase::Playing || delta == 0 || self.dims.cols == 0 {
            return self.clone();
        }

        let step = delta.signum();
        let mut next = self.clone();
        for _ in 0..shift_steps(delta, self.dims.cols) {
            if !next.shift_ground_once(step, config) {
                break;
            }
        }
        next.refresh_falling_field(config);
        next
    }

    /// Soft drop by up to `cells` rows, stopping at the ghost row. Never locks.
    pub fn drop_active_mino(&self, config: &EngineConfig, cells: u32) -> Self {
        if self.phase != GamePhase::Playing || cells == 0 {
            return self.clone();
        }
        let Some(active) = self.active else {
            return self.clone();
        };

        let landing = ghost_row(
            &active.shape(),
            active.row,
            active.col,
            &self.fixed_field,
            config.topology,
        );
        let distance = (landing - active.row).max(0) as u32;
        let steps = cells.min(distance);
        if steps == 0 {
            return self.clone();
        }

        let mut next = self.clone();
        next.active = Some(ActiveMino {
            row: active.row + steps as i32,
            ..active
        });
        next.score = next.score.saturating_add(drop_score(steps, false));
        next.refresh_falling_field(config);
        next
    }

    /// Move the active mino to its ghost row and resolve the lock right away
    pub fn hard_drop(&self, config: &EngineConfig) -> Self {
        if self.phase != GamePhase::Playing {
            return self.clone();
        }
        let Some(active) = self.active else {
            return self.clone();
        };

        let landing = ghost_row(
            &active.shape(),
            active.row,
            active.col,
            &self.fixed_field,
            config.topology,
        );
        let distance = (landing - active.row).max(0) as u32;

        let mut next = self.clone();
        next.active = Some(ActiveMino {
            row: landing,
            ..active
        });
        next.score = next.score.saturating_add(drop_score(distance, true));
        next.lock_active(config);
        next
    }

    /// Swap the active mino with the held one, once per spawned mino.
    ///
    /// An empty hold takes the active mino and spawns the next from the queue.
    pub fn hold(&self, config: &EngineConfig) -> Self {
        if self.phase != GamePhase::Playing || !self.can_hold {
            return self.clone();
        }
        let Some(active) = self.active else {
            return self.clone();
        };

        let mut next = self.clone();
        next.active = None;
        match next.held.replace(active.mino) {
            Some(held) => {
                let (rotation, col) = next.placement_for(held, config);
                next.place_spawned(held, rotation, col, config);
            }
            None => next.spawn_next(config),
        }
        next.can_hold = false;
        next
    }

    // ---- internals ----

    /// Pull the next mino according to the spawn policy and place it on the spawn row
    fn spawn_next(&mut self, config: &EngineConfig) {
        if self.is_game_over() {
            return;
        }

        let (mino, rotation, col) = match config.spawn_policy {
            SpawnPolicy::Manual | SpawnPolicy::AutoPlace => {
                let mino = self.next_queue.pull_front();
                let (rotation, col) = self.placement_for(mino, config);
                (mino, rotation, col)
            }
            SpawnPolicy::AutoPick { window } => {
                let window = self.next_queue.peek(window);
                let picked = best_candidate_among(
                    &self.fixed_field,
                    &window,
                    config.topology,
                    &config.weights,
                    &config.thresholds,
                )
                .and_then(|(index, candidate)| {
                    self.next_queue
                        .remove_at(index)
                        .map(|mino| (mino, candidate.rotation, candidate.col))
                });
                match picked {
                    Some(placement) => placement,
                    None => {
                        let mino = self.next_queue.pull_front();
                        let (rotation, col) = self.default_placement(mino, config);
                        (mino, rotation, col)
                    }
                }
            }
        };

        self.place_spawned(mino, rotation, col, config);
    }

    /// Rotation and column a mino spawns with under the configured policy
    fn placement_for(&self, mino: MinoType, config: &EngineConfig) -> (i32, i32) {
        if config.spawn_policy == SpawnPolicy::Manual {
            return self.default_placement(mino, config);
        }
        match evaluate_mino_candidate(
            &self.fixed_field,
            mino,
            config.topology,
            &config.weights,
            &config.thresholds,
        ) {
            Some(candidate) => (candidate.rotation, candidate.col),
            None => self.default_placement(mino, config),
        }
    }

    /// Spawn orientation, centred column
    fn default_placement(&self, mino: MinoType, config: &EngineConfig) -> (i32, i32) {
        let shape = shape_for(mino, 0);
        let col = config
            .topology
            .normalize_col(shape.spawn_col(self.dims.cols), self.dims.cols);
        (0, col)
    }

    fn place_spawned(&mut self, mino: MinoType, rotation: i32, col: i32, config: &EngineConfig) {
        let candidate = ActiveMino::new(mino, rotation, SPAWN_ROW, col);
        if can_place(&candidate.shape(), SPAWN_ROW, col, &self.fixed_field, config.topology) {
            self.active = Some(candidate);
            self.can_hold = true;
        } else {
            self.active = None;
            self.phase = GamePhase::GameOver;
        }
        self.refresh_falling_field(config);
    }

    /// Merge the active mino into the fixed field and resolve the outcome
    fn lock_active(&mut self, config: &EngineConfig) {
        let Some(active) = self.active.take() else {
            return;
        };

        let shape = active.shape();
        self.fixed_field = merge_shape_onto_field(
            &self.fixed_field,
            &shape,
            active.row,
            active.col,
            config.topology,
        );
        self.mino_drops = self.mino_drops.saturating_add(1);

        if self.fixed_field.is_row_occupied(0) {
            self.phase = GamePhase::GameOver;
            self.refresh_falling_field(config);
            return;
        }

        let full: ArrayVec<usize, MAX_CLEAR_ROWS> =
            covered_rows(&shape, active.row, self.dims.rows)
                .filter(|&row| self.fixed_field.is_row_full(row))
                .collect();
        if full.is_empty() {
            self.spawn_next(config);
            return;
        }

        let cleared = full.len();
        self.lines = self.lines.saturating_add(cleared as u32);
        self.level = level_for_lines(self.lines);
        self.score = self
            .score
            .saturating_add(line_clear_score(cleared, self.level));
        if self.first_clear_drop_count.is_none() {
            self.first_clear_drop_count = Some(self.mino_drops);
        }

        if config.line_clear_delay_ticks == 0 {
            self.fixed_field = self.fixed_field.remove_rows(&full);
            self.spawn_next(config);
            return;
        }

        self.fixed_field = self.fixed_field.mark_rows(&full, CellState::Deleting);
        self.clearing_rows = full;
        self.clear_countdown = config.line_clear_delay_ticks;
        self.refresh_falling_field(config);
    }

    /// Compact the rows marked Deleting
    fn finish_clear(&mut self) {
        self.fixed_field = self.fixed_field.remove_rows(&self.clearing_rows);
        self.clearing_rows.clear();
        self.clear_countdown = 0;
    }

    /// One unit shift; returns false (leaving the state untouched) when the active
    /// mino cannot be pushed clear of the shifted ground
    fn shift_ground_once(&mut self, step: i32, config: &EngineConfig) -> bool {
        let cols = self.dims.cols;
        let shifted = self.fixed_field.rotate_rows(step);

        let active = match self.active {
            Some(active) => {
                let shape = active.shape();
                if can_place(&shape, active.row, active.col, &shifted, config.topology) {
                    Some(active)
                } else {
                    // Content moved by -step columns; follow it.
                    let pushed = (1..=cols as i32)
                        .map(|attempt| active.col - step * attempt)
                        .find(|&col| can_place(&shape, active.row, col, &shifted, config.topology));
                    match pushed {
                        Some(col) => Some(ActiveMino {
                            col: config.topology.normalize_col(col, cols),
                            ..active
                        }),
                        None => return false,
                    }
                }
            }
            None => None,
        };

        self.fixed_field = shifted;
        self.active = active;
        self.ground_shift = (self.ground_shift as i64 + step as i64).rem_euclid(cols as i64) as usize;
        true
    }

    /// Recompute the overlay from the active mino and its ghost
    fn refresh_falling_field(&mut self, config: &EngineConfig) {
        let mut overlay = Field::new(self.dims);
        if let Some(active) = self.active {
            let shape = active.shape();
            if config.show_ghost {
                let ghost = ghost_row(
                    &shape,
                    active.row,
                    active.col,
                    &self.fixed_field,
                    config.topology,
                );
                paint(&mut overlay, &shape, ghost, active.col, config, |_| GHOST_CELL);
            }
            paint(&mut overlay, &shape, active.row, active.col, config, |cell| {
                cell.with_state(CellState::Falling)
            });
        }
        self.falling_field = overlay;
    }
}

/// Unit steps for a shift of `delta`, capped below two revolutions
fn shift_steps(delta: i32, cols: usize) -> usize {
    let cells = delta.unsigned_abs() as usize;
    if cells > cols {
        cols + cells % cols
    } else {
        cells
    }
}

fn paint(
    overlay: &mut Field,
    shape: &Shape,
    row: i32,
    col: i32,
    config: &EngineConfig,
    cell_for: impl Fn(Cell) -> Cell,
) {
    for (dy, dx, cell) in shape.blocks() {
        let target_row = row + dy as i32;
        if target_row < 0 {
            continue;
        }
        if let Some(target_col) = config.topology.resolve_col(col + dx as i32, overlay.cols()) {
            overlay.set(target_row as usize, target_col, cell_for(cell));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Topology;
    use crate::rng::ScriptedRng;

    fn manual() -> EngineConfig {
        EngineConfig::default().with_spawn_policy(SpawnPolicy::Manual)
    }

    fn start_with(config: &EngineConfig, queue: &[MinoType]) -> GameState<ScriptedRng> {
        GameState::bootstrap_with_rng(
            config,
            &BootstrapOptions::default().with_queue(queue),
            ScriptedRng::identity(),
        )
    }

    fn bottom_row_with_gap(gap_col: usize) -> Field {
        let mut field = Field::new(FieldDimensions::new(10, 20));
        for col in (0..10).filter(|&c| c != gap_col) {
            field = field.with_cell(19, col, Cell::mino(MinoType::Z, CellState::Fixed));
        }
        field
    }

    #[test]
    fn test_bootstrap_spawns_front_mino_centred() {
        let state = start_with(&manual(), &[MinoType::O]);

        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.active(), Some(ActiveMino::new(MinoType::O, 0, 0, 4)));
        assert_eq!(state.level(), 1);
        assert_eq!(state.falling_field().count_state(CellState::Falling), 4);
        assert_eq!(state.falling_field().count_state(CellState::Ghost), 4);
        assert!(state.next_queue().len() >= 7);
    }

    #[test]
    fn test_ready_phase_ignores_ticks_until_start() {
        let config = EngineConfig {
            auto_start: false,
            ..manual()
        };
        let state = start_with(&config, &[MinoType::T]);

        assert_eq!(state.phase(), GamePhase::Ready);
        assert_eq!(state.tick(&config), state);

        let started = state.start();
        assert_eq!(started.phase(), GamePhase::Playing);
        assert_eq!(started.tick(&config).active().map(|a| a.row), Some(1));
    }

    #[test]
    fn test_tick_does_not_mutate_input() {
        let config = manual();
        let state = start_with(&config, &[MinoType::T]);
        let before = state.clone();
        let _ = state.tick(&config);
        assert_eq!(state, before);
    }

    #[test]
    fn test_o_locks_on_floor_and_next_spawns() {
        let config = manual();
        let mut state = start_with(&config, &[MinoType::O, MinoType::T]);
        for _ in 0..19 {
            state = state.tick(&config);
        }

        let fixed = state.fixed_field();
        assert_eq!(fixed.count_state(CellState::Fixed), 4);
        for (row, col) in [(18, 4), (18, 5), (19, 4), (19, 5)] {
            assert_eq!(fixed.get(row, col), Some(Cell::mino(MinoType::O, CellState::Fixed)));
        }
        assert_eq!(state.lines(), 0);
        assert_eq!(state.mino_drops(), 1);
        assert_eq!(state.active().map(|a| a.mino), Some(MinoType::T));
    }

    #[test]
    fn test_vertical_i_clear_waits_for_countdown() {
        let config = manual();
        let mut state = start_with(&config, &[MinoType::T]);
        state.fixed_field = bottom_row_with_gap(0);
        state.active = Some(ActiveMino::new(MinoType::I, 1, 16, 0));

        let locked = state.tick(&config);
        assert_eq!(locked.clearing_rows(), &[19]);
        assert_eq!(locked.clear_countdown(), 3);
        assert!(locked.active().is_none());
        assert_eq!(locked.fixed_field().count_state(CellState::Deleting), 10);
        assert_eq!(locked.lines(), 1);
        assert_eq!(locked.score(), 40);
        assert_eq!(locked.first_clear_drop_count(), Some(1));

        let waiting = locked.tick(&config).tick(&config);
        assert_eq!(waiting.clear_countdown(), 1);
        assert_eq!(waiting.fixed_field(), locked.fixed_field());

        let compacted = waiting.tick(&config);
        assert!(compacted.clearing_rows().is_empty());
        assert!(!compacted.fixed_field().is_row_occupied(0));
        assert_eq!(compacted.fixed_field().count_state(CellState::Fixed), 3);
        for row in 17..20 {
            assert_eq!(
                compacted.fixed_field().get(row, 0),
                Some(Cell::mino(MinoType::I, CellState::Fixed))
            );
        }
        // The prefix was spent at bootstrap; the canonical bag follows.
        assert_eq!(compacted.active().map(|a| a.mino), Some(MinoType::I));
    }

    #[test]
    fn test_clear_delay_ignores_drops_and_keeps_rows_through_shift() {
        let config = manual();
        let mut state = start_with(&config, &[MinoType::T]);
        state.fixed_field = bottom_row_with_gap(0);
        state.active = Some(ActiveMino::new(MinoType::I, 1, 16, 0));

        let locked = state.tick(&config);
        assert!(locked.is_clearing());
        assert_eq!(locked.drop_active_mino(&config, 3), locked);
        assert_eq!(locked.hard_drop(&config), locked);
        assert_eq!(locked.hold(&config), locked);

        let shifted = locked.shift_ground_by_cells(&config, 2);
        assert_eq!(shifted.clearing_rows(), &[19]);
        assert_eq!(shifted.clear_countdown(), locked.clear_countdown());
        assert_eq!(shifted.fixed_field().count_state(CellState::Deleting), 10);
        assert!(shifted.active().is_none());

        let compacted = shifted.tick(&config).tick(&config).tick(&config);
        assert!(compacted.clearing_rows().is_empty());
        assert_eq!(compacted.fixed_field().count_state(CellState::Deleting), 0);
        assert_eq!(compacted.fixed_field().count_state(CellState::Fixed), 3);
    }

    #[test]
    fn test_zero_delay_compacts_in_locking_tick() {
        let config = manual().with_line_clear_delay(0);
        let mut state = start_with(&config, &[MinoType::T]);
        state.fixed_field = bottom_row_with_gap(0);
        state.active = Some(ActiveMino::new(MinoType::I, 1, 16, 0));

        let next = state.tick(&config);
        assert!(next.clearing_rows().is_empty());
        assert_eq!(next.fixed_field().count_state(CellState::Fixed), 3);
        assert_eq!(next.lines(), 1);
        assert!(next.active().is_some());
    }

    #[test]
    fn test_lock_reaching_top_row_ends_game() {
        let config = manual();
        let mut state = start_with(&config, &[MinoType::O]);
        let mut field = Field::new(FieldDimensions::new(10, 20));
        for row in 2..20 {
            field = field.with_cell(row, 4, Cell::mino(MinoType::I, CellState::Fixed));
        }
        state.fixed_field = field;

        let over = state.tick(&config);
        assert!(over.is_game_over());
        assert!(over.active().is_none());
        assert_eq!(over.mino_drops(), 1);
        assert_eq!(over.tick(&config), over);
    }

    #[test]
    fn test_shift_rotates_ground_left() {
        let config = manual();
        let mut state = start_with(&config, &[MinoType::O]);
        state.fixed_field = bottom_row_with_gap(0);

        let shifted = state.shift_ground_by_cells(&config, 3);
        assert_eq!(shifted.ground_shift(), 3);
        assert_eq!(shifted.fixed_field(), &state.fixed_field().rotate_rows(3));
        assert_eq!(shifted.fixed_field().get(19, 7), Some(Cell::EMPTY));
        assert_eq!(shifted.active(), state.active());

        let back = shifted.shift_ground_by_cells(&config, -5);
        assert_eq!(back.ground_shift(), 8);
    }

    #[test]
    fn test_shift_pushes_active_mino_with_ground() {
        let config = manual();
        let mut state = start_with(&config, &[MinoType::O]);
        // Rows 0-1 are walls except the spawn footprint at columns 4-5.
        let mut field = Field::new(FieldDimensions::new(10, 20));
        for row in 0..2 {
            for col in (0..10).filter(|c| !(4..6).contains(c)) {
                field = field.with_cell(row, col, Cell::mino(MinoType::L, CellState::Fixed));
            }
        }
        state.fixed_field = field;

        let shifted = state.shift_ground_by_cells(&config, 2);
        assert_eq!(shifted.ground_shift(), 2);
        assert_eq!(shifted.active().map(|a| a.col), Some(2));

        let wrapped = state.shift_ground_by_cells(&config, -6);
        assert_eq!(wrapped.active().map(|a| a.col), Some(0));
    }

    #[test]
    fn test_shift_aborts_when_push_fails() {
        let config = manual().with_topology(Topology::Bounded);
        let mut state = start_with(&config, &[MinoType::O]);
        let mut field = Field::new(FieldDimensions::new(10, 20));
        for row in 0..2 {
            for col in (0..10).filter(|c| !(4..6).contains(c)) {
                field = field.with_cell(row, col, Cell::mino(MinoType::L, CellState::Fixed));
            }
        }
        state.fixed_field = field.clone();

        // The gap reaches the left wall after four steps; the fifth cannot be followed.
        let shifted = state.shift_ground_by_cells(&config, 7);
        assert_eq!(shifted.ground_shift(), 4);
        assert_eq!(shifted.fixed_field(), &field.rotate_rows(4));
        assert_eq!(shifted.active().map(|a| a.col), Some(0));
    }

    #[test]
    fn test_huge_shift_folds_to_one_revolution() {
        let config = manual();
        let mut state = start_with(&config, &[MinoType::O]);
        state.fixed_field = bottom_row_with_gap(0);

        let far = state.shift_ground_by_cells(&config, i32::MAX);
        assert_eq!(far.ground_shift(), 7);
        assert_eq!(far.fixed_field(), &state.fixed_field().rotate_rows(7));
        assert_eq!(far.active(), state.active());

        let far_back = state.shift_ground_by_cells(&config, i32::MIN);
        assert_eq!(far_back.ground_shift(), 2);
        assert_eq!(far_back.fixed_field(), &state.fixed_field().rotate_rows(2));
    }

    #[test]
    fn test_shift_steps_stay_below_two_revolutions() {
        assert_eq!(shift_steps(3, 10), 3);
        assert_eq!(shift_steps(-10, 10), 10);
        assert_eq!(shift_steps(23, 10), 13);
        assert_eq!(shift_steps(i32::MAX, 10), 17);
        assert_eq!(shift_steps(i32::MIN, 10), 18);
    }

    #[test]
    fn test_soft_drop_stops_at_ghost() {
        let config = manual();
        let state = start_with(&config, &[MinoType::O]);

        let dropped = state.drop_active_mino(&config, 5);
        assert_eq!(dropped.active().map(|a| a.row), Some(5));
        assert_eq!(dropped.score(), 5);

        let floored = dropped.drop_active_mino(&config, 100);
        assert_eq!(floored.active().map(|a| a.row), Some(18));
        assert_eq!(floored.mino_drops(), 0);
        assert_eq!(floored.drop_active_mino(&config, 1), floored);
    }

    #[test]
    fn test_hard_drop_locks_immediately() {
        let config = manual();
        let state = start_with(&config, &[MinoType::O, MinoType::I]);

        let dropped = state.hard_drop(&config);
        assert_eq!(dropped.mino_drops(), 1);
        assert_eq!(dropped.score(), 36);
        assert_eq!(dropped.fixed_field().count_state(CellState::Fixed), 4);
        assert_eq!(dropped.active().map(|a| a.mino), Some(MinoType::I));
    }

    #[test]
    fn test_hold_once_per_spawn() {
        let config = manual();
        let state = start_with(&config, &[MinoType::O, MinoType::T, MinoType::S]);

        let held = state.hold(&config);
        assert_eq!(held.held(), Some(MinoType::O));
        assert_eq!(held.active().map(|a| a.mino), Some(MinoType::T));
        assert!(!held.can_hold());
        assert_eq!(held.hold(&config), held);

        let after_lock = held.hard_drop(&config);
        assert!(after_lock.can_hold());
        let swapped = after_lock.hold(&config);
        assert_eq!(swapped.held(), Some(MinoType::S));
        assert_eq!(swapped.active(), Some(ActiveMino::new(MinoType::O, 0, 0, 4)));
    }

    #[test]
    fn test_pause_blocks_gameplay() {
        let config = manual();
        let state = start_with(&config, &[MinoType::O]);
        let paused = state.pause();

        assert_eq!(paused.phase(), GamePhase::Paused);
        assert_eq!(paused.tick(&config), paused);
        assert_eq!(paused.shift_ground_by_cells(&config, 2), paused);
        assert_eq!(paused.resume().phase(), GamePhase::Playing);
    }

    #[test]
    fn test_reset_clears_progress() {
        let config = manual();
        let state = start_with(&config, &[MinoType::O]).hard_drop(&config);
        let reset = state.reset(&config);

        assert_eq!(reset.score(), 0);
        assert_eq!(reset.mino_drops(), 0);
        assert_eq!(reset.fixed_field().count_state(CellState::Fixed), 0);
        assert!(reset.active().is_some());
    }

    #[test]
    fn test_auto_place_uses_heuristic_column() {
        let config = EngineConfig::default().with_topology(Topology::Bounded);
        let state = start_with(&config, &[MinoType::I]);

        // Flat against the wall beats the centred spawn.
        assert_eq!(state.active(), Some(ActiveMino::new(MinoType::I, 0, 0, 0)));
    }

    #[test]
    fn test_auto_pick_removes_chosen_mino() {
        let config = EngineConfig::default()
            .with_topology(Topology::Bounded)
            .with_spawn_policy(SpawnPolicy::AutoPick { window: 3 });
        let state = start_with(&config, &[MinoType::S, MinoType::Z, MinoType::I]);

        // S and Z leave holes or bumps on a flat floor; I lies flat.
        assert_eq!(state.active().map(|a| a.mino), Some(MinoType::I));
        assert_eq!(state.preview(2), vec![MinoType::S, MinoType::Z]);
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let config = manual();
        let field = Field::from_ascii(&[
            "....##....",
            "..........",
            "..........",
            "..........",
        ])
        .unwrap();
        let config = config.with_dimensions(10, 4);
        let state = GameState::bootstrap(
            &config,
            &BootstrapOptions::default()
                .with_queue(&[MinoType::O])
                .with_field(field),
        );

        assert!(state.is_game_over());
        assert!(state.active().is_none());
    }
}
