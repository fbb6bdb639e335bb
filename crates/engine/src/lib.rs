//! Engine boundary - command dispatch and sessions over the core state machine
//!
//! - [`Engine`]: binds a validated [`EngineConfig`](conveyor_tetris_core::EngineConfig)
//!   and exposes one method per transition
//! - [`Command`]: discrete commands with a compact text form (`shift:-2`, `drop:3`)
//! - [`Session`]: current state plus a bounded undo history

pub mod command;
pub mod engine;
pub mod session;

pub use command::{Command, CommandParseError};
pub use engine::Engine;
pub use session::{Session, HISTORY_LIMIT};
