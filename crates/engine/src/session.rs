//! Session - current state plus bounded undo history
//!
//! States are immutable values, so undo is a stack of previous states.

use std::collections::VecDeque;

use conveyor_tetris_core::{BootstrapOptions, GameSnapshot, GameState, Randomizer, SimpleRng};

use crate::command::{Command, CommandParseError};
use crate::engine::Engine;

/// Previous states kept for undo
pub const HISTORY_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct Session<R: Randomizer = SimpleRng> {
    engine: Engine,
    state: GameState<R>,
    history: VecDeque<GameState<R>>,
}

impl Session<SimpleRng> {
    pub fn new(engine: Engine, options: &BootstrapOptions) -> Self {
        let state = engine.bootstrap(options);
        Self::from_state(engine, state)
    }
}

impl<R: Randomizer> Session<R> {
    pub fn with_rng(engine: Engine, options: &BootstrapOptions, rng: R) -> Self {
        let state = engine.bootstrap_with_rng(options, rng);
        Self::from_state(engine, state)
    }

    pub fn from_state(engine: Engine, state: GameState<R>) -> Self {
        Self {
            engine,
            state,
            history: VecDeque::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    /// Apply a command, remembering the previous state
    pub fn apply(&mut self, command: Command) -> &GameState<R> {
        let next = self.engine.apply(&self.state, command);
        let previous = std::mem::replace(&mut self.state, next);
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(previous);
        &self.state
    }

    /// Parse and apply a command in its text form
    pub fn apply_str(&mut self, command: &str) -> Result<&GameState<R>, CommandParseError> {
        let command: Command = command.parse()?;
        Ok(self.apply(command))
    }

    /// Restore the state before the last applied command; false when history is empty
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn snapshot(&self, preview_len: usize) -> GameSnapshot {
        self.engine.snapshot(&self.state, preview_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_tetris_types::MinoType;
    use conveyor_tetris_core::{EngineConfig, ScriptedRng, SpawnPolicy};

    fn session() -> Session<ScriptedRng> {
        let engine =
            Engine::new(EngineConfig::default().with_spawn_policy(SpawnPolicy::Manual)).unwrap();
        Session::with_rng(
            engine,
            &BootstrapOptions::default().with_queue(&[MinoType::O]),
            ScriptedRng::identity(),
        )
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut session = session();
        let initial = session.state().clone();

        session.apply(Command::Tick);
        session.apply(Command::HardDrop);
        assert_eq!(session.history_len(), 2);
        assert_eq!(session.state().mino_drops(), 1);

        assert!(session.undo());
        assert_eq!(session.state().active().map(|a| a.row), Some(1));
        assert!(session.undo());
        assert_eq!(session.state(), &initial);
        assert!(!session.undo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = session();
        for _ in 0..HISTORY_LIMIT + 10 {
            session.apply(Command::ShiftGround(1));
        }
        assert_eq!(session.history_len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_apply_str() {
        let mut session = session();
        let state = session.apply_str("shift:3").unwrap();
        assert_eq!(state.ground_shift(), 3);

        assert_eq!(
            session.apply_str("warp").unwrap_err(),
            CommandParseError::Unknown("warp".to_string())
        );
        assert_eq!(session.history_len(), 1);
    }
}
