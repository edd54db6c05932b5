//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame delta only
//! - Injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod avatar;
pub mod collision;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use avatar::{Avatar, MoveInput};
pub use collision::{collides, first_hit, within_reach};
pub use obstacles::{
    Obstacle, ObstacleRegistry, ObstacleVariant, RandomSource, ScriptedSource, Spawn, SpawnTimers,
};
pub use state::{GameEvent, ObstacleView, RoundPhase, RoundState, Snapshot};
pub use tick::{Round, TickInput, tick};
