//! Conveyor Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so binaries, integration tests
//! and benches can use `conveyor_tetris::{core, engine, types}`.

pub use conveyor_tetris_core as core;
pub use conveyor_tetris_engine as engine;
pub use conveyor_tetris_types as types;
