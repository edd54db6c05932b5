//! Obstacle lifecycle: spawning, advancing, reaping and the difficulty ramp
//!
//! Obstacles are axis-aligned cubes that spawn far down the lane (-z) and
//! travel toward the player (+z). Anything past the despawn depth is reaped
//! and reported back to the round as "passed".

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Position;
use crate::config::SimConfig;
use crate::consts::TIME_EPSILON;

/// Source of uniform samples in [0, 1) for spawn placement
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl RandomSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed sequence of samples, wrapping at the end
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f32>) -> Self {
        debug_assert!(!values.is_empty(), "scripted source needs at least one value");
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f32 {
        let Some(&value) = self.values.get(self.cursor % self.values.len().max(1)) else {
            return 0.0;
        };
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

/// Cosmetic obstacle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleVariant {
    #[default]
    A,
    B,
    C,
}

impl ObstacleVariant {
    pub const ALL: [Self; 3] = [Self::A, Self::B, Self::C];

    /// Pick a variant from relative weights using a sample in [0, 1)
    pub fn pick(weights: &[u32; 3], sample: f32) -> Self {
        let total: u32 = weights.iter().sum();
        debug_assert!(total > 0, "variant distribution is empty");

        let target = sample * total as f32;
        let mut cumulative = 0.0;
        let mut last_nonzero = ObstacleVariant::A;
        for (variant, &weight) in Self::ALL.iter().zip(weights) {
            if weight == 0 {
                continue;
            }
            cumulative += weight as f32;
            last_nonzero = *variant;
            if target < cumulative {
                return *variant;
            }
        }
        last_nonzero
    }
}

/// A live obstacle cube
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub position: Position,
    pub half_extent: f32,
    pub variant: ObstacleVariant,
}

/// Spawn clock and difficulty ramp state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    /// Round time at which the next obstacle is due
    pub next_spawn_time: f32,
    /// Seconds shaved off the base spawn interval
    pub spawn_interval_reduction: f32,
    /// Score that must be exceeded for the next ramp step
    pub difficulty_threshold: u64,
}

impl SpawnTimers {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            next_spawn_time: config.base_spawn_interval,
            spawn_interval_reduction: 0.0,
            difficulty_threshold: config.difficulty_threshold_increment,
        }
    }

    /// Current gap between spawns
    pub fn spawn_interval(&self, config: &SimConfig) -> f32 {
        config.base_spawn_interval - self.spawn_interval_reduction
    }
}

/// Result of a spawn decision that produced an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub obstacle: Obstacle,
    /// The difficulty ramp stepped during this decision
    pub ramped: bool,
}

/// Owns all live obstacles (in spawn order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    timers: SpawnTimers,
    /// Next obstacle ID (unique across rounds)
    next_id: u32,
}

impl ObstacleRegistry {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            obstacles: Vec::new(),
            timers: SpawnTimers::new(config),
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn timers(&self) -> &SpawnTimers {
        &self.timers
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Spawn one obstacle if the spawn clock has come due.
    ///
    /// Never spawns more than one per call; a long frame only pushes the
    /// next spawn time forward from `elapsed`. A clock within `TIME_EPSILON`
    /// of the due time counts as due.
    pub fn spawn_if_due(
        &mut self,
        elapsed: f32,
        score: u64,
        config: &SimConfig,
        rng: &mut impl RandomSource,
    ) -> Option<Spawn> {
        if elapsed + TIME_EPSILON < self.timers.next_spawn_time {
            return None;
        }

        let ramped = self.difficulty_ramp(score, config);

        let span = config.spawn_bound_right - config.spawn_bound_left;
        let x = config.spawn_bound_left + rng.next_unit() * span;
        let variant = ObstacleVariant::pick(&config.variant_weights, rng.next_unit());

        let obstacle = Obstacle {
            id: self.next_id,
            position: Vec3::new(x, config.spawn_height, config.spawn_depth),
            half_extent: config.obstacle_half_extent,
            variant,
        };
        self.next_id += 1;
        self.obstacles.push(obstacle);

        self.timers.next_spawn_time = elapsed + self.timers.spawn_interval(config);

        log::debug!(
            "Spawned obstacle {} ({:?}) at x={:.2}, next spawn at {:.2}s",
            obstacle.id,
            obstacle.variant,
            x,
            self.timers.next_spawn_time
        );

        Some(Spawn { obstacle, ramped })
    }

    /// Move every obstacle toward the player, then remove and return the
    /// ones that crossed the despawn depth.
    pub fn advance_and_reap(&mut self, dt: f32, elapsed: f32, config: &SimConfig) -> Vec<Obstacle> {
        let speed = config.base_obstacle_speed + config.obstacle_acceleration * elapsed;
        let dz = speed * dt;

        for obstacle in &mut self.obstacles {
            obstacle.position.z += dz;
            debug_assert!(
                obstacle.position.is_finite(),
                "obstacle {} position is NaN",
                obstacle.id
            );
        }

        // Advance first, compact after: no removal while iterating
        let mut passed = Vec::new();
        self.obstacles.retain(|o| {
            if o.position.z > config.despawn_depth {
                passed.push(*o);
                false
            } else {
                true
            }
        });

        if !passed.is_empty() {
            log::debug!("Reaped {} passed obstacle(s)", passed.len());
        }

        passed
    }

    /// Step the spawn interval reduction once if `score` is past the threshold.
    ///
    /// Returns true if a step was taken.
    pub fn difficulty_ramp(&mut self, score: u64, config: &SimConfig) -> bool {
        if score <= self.timers.difficulty_threshold {
            return false;
        }

        let timers = &mut self.timers;
        timers.spawn_interval_reduction = (timers.spawn_interval_reduction + config.difficulty_step)
            .min(config.max_spawn_interval_reduction);
        timers.difficulty_threshold += config.difficulty_threshold_increment;

        log::info!(
            "Difficulty up: spawn interval {:.2}s, next threshold {}",
            timers.spawn_interval(config),
            timers.difficulty_threshold
        );
        true
    }

    /// Drop every obstacle and rewind the spawn clock
    pub fn reset(&mut self, config: &SimConfig) {
        self.obstacles.clear();
        self.timers = SpawnTimers::new(config);
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, position: Vec3, config: &SimConfig) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            position,
            half_extent: config.obstacle_half_extent,
            variant: ObstacleVariant::A,
        });
        id
    }
}
