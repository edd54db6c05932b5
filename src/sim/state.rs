//! Round state and the read-only views handed to hosts
//!
//! Everything a renderer needs after a tick is in [`Snapshot`].

use serde::{Deserialize, Serialize};

use super::obstacles::{Obstacle, ObstacleVariant};
use crate::Position;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for a start signal; no obstacles, score pinned at 0
    #[default]
    Idle,
    /// Obstacles spawning and advancing, avatar movable
    Running,
}

/// Phase, score and clock of the current round
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    /// Obstacles passed this round
    pub score: u64,
    /// Seconds since the round started (0 while idle)
    ///
    /// Accumulated in f64 so thousands of frame deltas don't drift.
    pub elapsed_time: f64,
    /// Rounds started this session
    pub round_index: u32,
}

impl RoundState {
    pub fn idle() -> Self {
        Self::default()
    }

    /// A fresh running round following this one
    pub fn started(&self) -> Self {
        Self {
            phase: RoundPhase::Running,
            score: 0,
            elapsed_time: 0.0,
            round_index: self.round_index + 1,
        }
    }

    /// Back to idle, keeping the session round count
    pub fn stopped(&self) -> Self {
        Self {
            phase: RoundPhase::Idle,
            score: 0,
            elapsed_time: 0.0,
            round_index: self.round_index,
        }
    }

    /// A collision ends this round and begins the next one in the same tick
    pub fn on_collision(&self) -> Self {
        self.started()
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }
}

/// Things that happened during a tick (for sound/FX layers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    RoundStopped { round: u32, score: u64 },
    ObstacleSpawned { id: u32, variant: ObstacleVariant },
    ObstaclePassed { id: u32 },
    DifficultyIncreased { spawn_interval: f32 },
    /// The avatar hit an obstacle; `score` is the final score of the ended round
    Collision { id: u32, score: u64 },
}

/// Render-facing view of one obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub position: Position,
    pub variant: ObstacleVariant,
}

impl From<&Obstacle> for ObstacleView {
    fn from(obstacle: &Obstacle) -> Self {
        Self {
            id: obstacle.id,
            position: obstacle.position,
            variant: obstacle.variant,
        }
    }
}

/// Everything a renderer draws after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub score: u64,
    pub round_index: u32,
    pub elapsed_time: f32,
    pub avatar: Position,
    /// Live obstacles in spawn order
    pub obstacles: Vec<ObstacleView>,
}
