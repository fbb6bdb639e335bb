//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains every rule of the conveyor falling-block game. It has
//! **zero dependencies** on rendering, input or I/O, making it:
//!
//! - **Deterministic**: the same randomizer and commands produce identical games
//! - **Immutable**: every transition returns a new [`GameState`]; old states stay valid
//!   for snapshots and undo
//! - **Portable**: runs headless, in a terminal, or behind any renderer
//!
//! # Module Structure
//!
//! - [`field`]: rows x cols cell grid with copy-on-write edits, compaction and rotation
//! - [`shapes`]: the seven base shapes and the clockwise rotation transform
//! - [`collision`]: placement tests, landing search, ghost projection and merging
//! - [`evaluation`]: field heuristic and auto-placement search
//! - [`rng`]: 7-bag next queue over an injectable randomizer
//! - [`scoring`]: line clear, drop and level rules
//! - [`config`]: engine configuration with JSON loading and validation
//! - [`game_state`]: the state machine (spawn, gravity, lock, clear delay, ground shift)
//! - [`snapshot`]: serializable read model for renderers
//!
//! # Game Rules
//!
//! - **Cylinder field**: columns wrap around, so the ground can be dragged forever
//! - **Ground shift**: the locked field scrolls sideways; the falling mino is pushed
//!   along instead of passing through blocks
//! - **Clear delay**: full rows flash as Deleting for a few ticks before compaction
//! - **Auto placement**: the heuristic chooses rotation and column for each spawn
//!
//! # Example
//!
//! ```
//! use conveyor_tetris_core::{BootstrapOptions, EngineConfig, GameState, SpawnPolicy};
//! use conveyor_tetris_core::types::MinoType;
//!
//! let config = EngineConfig::default().with_spawn_policy(SpawnPolicy::Manual);
//! let state = GameState::bootstrap(&config, &BootstrapOptions::seeded(7).with_queue(&[MinoType::O]));
//!
//! let next = state.tick(&config).shift_ground_by_cells(&config, 2);
//! assert_eq!(next.active().map(|a| a.row), Some(1));
//! assert_eq!(next.ground_shift(), 2);
//! assert_eq!(state.active().map(|a| a.row), Some(0));
//! ```

pub mod collision;
pub mod config;
pub mod evaluation;
pub mod field;
pub mod game_state;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;

pub use conveyor_tetris_types as types;

// Re-export commonly used types for convenience
pub use collision::{
    can_place, find_landing_row, ghost_row, merge_shape_onto_field, Topology, SPAWN_ROW,
};
pub use config::{ConfigError, EngineConfig, SpawnPolicy};
pub use evaluation::{
    analyze_field, best_candidate_among, evaluate_field, evaluate_mino_candidate, Candidate,
    EvaluationWeights, FieldMetrics, ModeThresholds,
};
pub use field::{FallingField, Field, FixedField};
pub use game_state::{ActiveMino, BootstrapOptions, GameState};
pub use rng::{NextQueue, Randomizer, ScriptedRng, SimpleRng, MIN_QUEUE_LEN};
pub use scoring::{drop_score, level_for_lines, line_clear_score};
pub use shapes::{shape_for, Shape};
pub use snapshot::{ActiveSnapshot, GameSnapshot, StatsSnapshot};
