//! Engine - a validated configuration bound to the game state transitions
//!
//! `Engine` owns no game state. Callers keep the `GameState` values it returns and
//! feed them back in, one transition per call.

use conveyor_tetris_core::{
    BootstrapOptions, ConfigError, EngineConfig, GameSnapshot, GameState, Randomizer, SimpleRng,
};

use crate::command::Command;

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Bind a config after validating it
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        EngineConfig::from_json_str(json).map(|config| Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bootstrap(&self, options: &BootstrapOptions) -> GameState<SimpleRng> {
        GameState::bootstrap(&self.config, options)
    }

    pub fn bootstrap_with_rng<R: Randomizer>(
        &self,
        options: &BootstrapOptions,
        rng: R,
    ) -> GameState<R> {
        GameState::bootstrap_with_rng(&self.config, options, rng)
    }

    pub fn tick<R: Randomizer>(&self, state: &GameState<R>) -> GameState<R> {
        state.tick(&self.config)
    }

    pub fn shift_ground_by_cells<R: Randomizer>(
        &self,
        state: &GameState<R>,
        delta: i32,
    ) -> GameState<R> {
        state.shift_ground_by_cells(&self.config, delta)
    }

    pub fn drop_active_mino<R: Randomizer>(&self, state: &GameState<R>, cells: u32) -> GameState<R> {
        state.drop_active_mino(&self.config, cells)
    }

    pub fn hard_drop<R: Randomizer>(&self, state: &GameState<R>) -> GameState<R> {
        state.hard_drop(&self.config)
    }

    pub fn hold<R: Randomizer>(&self, state: &GameState<R>) -> GameState<R> {
        state.hold(&self.config)
    }

    pub fn start<R: Randomizer>(&self, state: &GameState<R>) -> GameState<R> {
        state.start()
    }

    pub fn reset<R: Randomizer>(&self, state: &GameState<R>) -> GameState<R> {
        state.reset(&self.config)
    }

    /// Dispatch one command
    pub fn apply<R: Randomizer>(&self, state: &GameState<R>, command: Command) -> GameState<R> {
        match command {
            Command::Tick => self.tick(state),
            Command::ShiftGround(delta) => self.shift_ground_by_cells(state, delta),
            Command::Drop(cells) => self.drop_active_mino(state, cells),
            Command::HardDrop => self.hard_drop(state),
            Command::Hold => self.hold(state),
            Command::Start => self.start(state),
            Command::Pause => state.pause(),
            Command::Resume => state.resume(),
            Command::Reset => self.reset(state),
        }
    }

    pub fn snapshot<R: Randomizer>(&self, state: &GameState<R>, preview_len: usize) -> GameSnapshot {
        state.snapshot(&self.config, preview_len)
    }

    /// Gravity interval the caller's timer should use for this state
    pub fn gravity_interval_ms<R: Randomizer>(&self, state: &GameState<R>) -> u32 {
        self.config.gravity_interval_for_level(state.level())
    }
}
