//! Snapshot module - the serializable read model handed to renderers

use serde::{Deserialize, Serialize};

use crate::game_state::ActiveMino;
use crate::types::{Cell, GamePhase, MinoType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub mino: MinoType,
    pub rotation: i32,
    pub row: i32,
    pub col: i32,
}

impl From<ActiveMino> for ActiveSnapshot {
    fn from(value: ActiveMino) -> Self {
        Self {
            mino: value.mino,
            rotation: value.rotation,
            row: value.row,
            col: value.col,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub mino_drops: u32,
    pub first_clear_drop_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub cols: usize,
    pub rows: usize,
    /// Fixed field, row-major, row 0 on top
    pub board: Vec<Vec<Cell>>,
    /// Falling mino and ghost cells
    pub overlay: Vec<Vec<Cell>>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_row: Option<i32>,
    pub held: Option<MinoType>,
    pub can_hold: bool,
    pub preview: Vec<MinoType>,
    pub ground_shift: usize,
    pub clearing_rows: Vec<usize>,
    pub clear_countdown: u32,
    pub phase: GamePhase,
    pub game_over: bool,
    pub stats: StatsSnapshot,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Cell a renderer should draw at (row, col): overlay first, then the board
    pub fn visible_cell(&self, row: usize, col: usize) -> Option<Cell> {
        let overlay = *self.overlay.get(row)?.get(col)?;
        if !overlay.is_empty() {
            return Some(overlay);
        }
        self.board.get(row)?.get(col).copied()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, SpawnPolicy};
    use crate::game_state::{BootstrapOptions, GameState};
    use crate::types::CellState;

    fn snapshot() -> GameSnapshot {
        let config = EngineConfig::default().with_spawn_policy(SpawnPolicy::Manual);
        let state = GameState::bootstrap(
            &config,
            &BootstrapOptions::seeded(42).with_queue(&[MinoType::T]),
        );
        state.snapshot(&config, 5)
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let snap = snapshot();

        assert_eq!((snap.cols, snap.rows), (10, 20));
        assert_eq!(snap.board.len(), 20);
        assert!(snap.board.iter().all(|row| row.len() == 10));
        assert_eq!(
            snap.active,
            Some(ActiveSnapshot {
                mino: MinoType::T,
                rotation: 0,
                row: 0,
                col: 3
            })
        );
        assert_eq!(snap.ghost_row, Some(18));
        assert_eq!(snap.preview.len(), 5);
        assert_eq!(snap.stats.level, 1);
        assert!(snap.playable());
    }

    #[test]
    fn test_visible_cell_prefers_overlay() {
        let snap = snapshot();

        // T spawn orientation: .X. over XXX
        assert_eq!(
            snap.visible_cell(0, 4).map(|c| c.state),
            Some(CellState::Falling)
        );
        assert_eq!(snap.visible_cell(19, 4).map(|c| c.state), Some(CellState::Ghost));
        assert_eq!(snap.visible_cell(10, 0), Some(Cell::EMPTY));
        assert_eq!(snap.visible_cell(20, 0), None);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snap = snapshot();
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert_eq!(GameSnapshot::from_json(&json).unwrap(), snap);
    }
}
