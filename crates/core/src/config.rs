//! Config module - every tunable of the engine in one value
//!
//! An `EngineConfig` is threaded explicitly through each transition; there is no
//! process-wide configuration. Configs deserialize from JSON with every field
//! optional, falling back to the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::Topology;
use crate::evaluation::{EvaluationWeights, ModeThresholds};
use crate::rng::MIN_QUEUE_LEN;
use crate::types::{
    FieldDimensions, DEFAULT_GRAVITY_MS, DEFAULT_LINE_CLEAR_DELAY_TICKS, DROP_INTERVALS,
    DROP_INTERVAL_MIN_MS,
};

/// Smallest accepted field side; every shape must fit in any orientation
pub const MIN_FIELD_SIDE: usize = 4;

/// How a newly spawned mino is chosen and oriented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SpawnPolicy {
    /// Front of the queue, spawn orientation, centred column
    Manual,
    /// Front of the queue, rotation and column chosen by the heuristic
    #[default]
    AutoPlace,
    /// The heuristic also picks which of the first `window` queued minos to spawn
    AutoPick { window: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field must be at least {min}x{min} cells, got {cols}x{rows}")]
    FieldTooSmall { cols: usize, rows: usize, min: usize },
    #[error("gravity interval must be positive")]
    ZeroGravity,
    #[error("heuristic weights must be finite numbers")]
    NonFiniteWeights,
    #[error("auto-pick window must be within 1..={max}, got {window}")]
    PickWindow { window: usize, max: usize },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dimensions: FieldDimensions,
    pub topology: Topology,
    pub spawn_policy: SpawnPolicy,
    /// Base gravity interval; the caller's timer owns it, the engine only reports it
    pub gravity_interval_ms: u32,
    /// Per-level gravity intervals, index 0 = level 1. Empty means constant gravity.
    pub speed_curve: Vec<u32>,
    /// Ticks Deleting rows stay on the field before compaction
    pub line_clear_delay_ticks: u32,
    /// Project the ghost of the active mino into the falling overlay
    pub show_ghost: bool,
    /// Start with a 2x2 ground block on the bottom rows
    pub seed_demo_block: bool,
    /// Enter `Playing` straight from bootstrap instead of waiting in `Ready`
    pub auto_start: bool,
    pub weights: EvaluationWeights,
    pub thresholds: ModeThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimensions: FieldDimensions::default(),
            topology: Topology::default(),
            spawn_policy: SpawnPolicy::default(),
            gravity_interval_ms: DEFAULT_GRAVITY_MS,
            speed_curve: DROP_INTERVALS.to_vec(),
            line_clear_delay_ticks: DEFAULT_LINE_CLEAR_DELAY_TICKS,
            show_ghost: true,
            seed_demo_block: false,
            auto_start: true,
            weights: EvaluationWeights::default(),
            thresholds: ModeThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let FieldDimensions { cols, rows } = self.dimensions;
        if cols < MIN_FIELD_SIDE || rows < MIN_FIELD_SIDE {
            return Err(ConfigError::FieldTooSmall {
                cols,
                rows,
                min: MIN_FIELD_SIDE,
            });
        }
        if self.gravity_interval_ms == 0 {
            return Err(ConfigError::ZeroGravity);
        }
        if !self.weights.is_finite() {
            return Err(ConfigError::NonFiniteWeights);
        }
        if let SpawnPolicy::AutoPick { window } = self.spawn_policy {
            if window == 0 || window > MIN_QUEUE_LEN {
                return Err(ConfigError::PickWindow {
                    window,
                    max: MIN_QUEUE_LEN,
                });
            }
        }
        Ok(())
    }

    /// Gravity interval for a level (1-based), floored at `DROP_INTERVAL_MIN_MS`
    pub fn gravity_interval_for_level(&self, level: u32) -> u32 {
        let interval = match self.speed_curve.len() {
            0 => self.gravity_interval_ms,
            len => {
                let idx = (level.max(1) - 1) as usize;
                self.speed_curve[idx.min(len - 1)]
            }
        };
        interval.max(DROP_INTERVAL_MIN_MS)
    }

    /// Builder-style helpers used by tests and the runner
    pub fn with_dimensions(mut self, cols: usize, rows: usize) -> Self {
        self.dimensions = FieldDimensions::new(cols, rows);
        self
    }

    pub fn with_spawn_policy(mut self, spawn_policy: SpawnPolicy) -> Self {
        self.spawn_policy = spawn_policy;
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_line_clear_delay(mut self, ticks: u32) -> Self {
        self.line_clear_delay_ticks = ticks;
        self
    }
}
