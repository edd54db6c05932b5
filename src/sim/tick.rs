//! Round controller and per-frame tick
//!
//! Core game loop that advances a round deterministically. The host calls
//! [`tick`] once per frame with the frame delta and held inputs, then reads
//! a [`Snapshot`] to draw.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::avatar::{Avatar, MoveInput};
use super::collision::first_hit;
use super::obstacles::{Obstacle, ObstacleRegistry, RandomSource};
use super::state::{GameEvent, ObstacleView, RoundPhase, RoundState, Snapshot};
use crate::config::{ConfigError, SimConfig};
use crate::sanitize_dt;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held direction keys
    pub movement: MoveInput,
    /// Start/stop toggle (edge-triggered; clear after one tick)
    pub start: bool,
}

/// One simulation instance: config, round state, avatar, obstacles
#[derive(Debug, Clone)]
pub struct Round<R: RandomSource = Pcg32> {
    config: SimConfig,
    state: RoundState,
    avatar: Avatar,
    obstacles: ObstacleRegistry,
    /// Events from the most recent tick
    events: Vec<GameEvent>,
    rng: R,
}

impl Round<Pcg32> {
    /// Create an idle round with a seeded RNG
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Round<R> {
    /// Create an idle round drawing spawn samples from `rng`
    pub fn with_rng(config: SimConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            avatar: Avatar::new(&config),
            obstacles: ObstacleRegistry::new(&config),
            state: RoundState::idle(),
            events: Vec::new(),
            config,
            rng,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.obstacles.obstacles()
    }

    pub fn registry(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            score: self.state.score,
            round_index: self.state.round_index,
            elapsed_time: self.state.elapsed_time as f32,
            avatar: self.avatar.position,
            obstacles: self.obstacles().iter().map(ObstacleView::from).collect(),
        }
    }

    /// Idle -> Running
    fn start(&mut self) {
        self.state = self.state.started();
        self.reset_world();
        log::info!("Round {} started", self.state.round_index);
        self.events.push(GameEvent::RoundStarted {
            round: self.state.round_index,
        });
    }

    /// Running -> Idle
    fn stop(&mut self) {
        let finished = self.state;
        self.state = finished.stopped();
        self.reset_world();
        log::info!("Round {} stopped at score {}", finished.round_index, finished.score);
        self.events.push(GameEvent::RoundStopped {
            round: finished.round_index,
            score: finished.score,
        });
    }

    /// End the round on a hit and begin the next one in the same tick
    fn on_collision(&mut self, obstacle_id: u32) {
        let finished = self.state;
        log::info!(
            "Round {} ended by obstacle {} at score {} ({:.1}s)",
            finished.round_index,
            obstacle_id,
            finished.score,
            finished.elapsed_time
        );
        self.events.push(GameEvent::Collision {
            id: obstacle_id,
            score: finished.score,
        });
        self.state = finished.on_collision();
        self.reset_world();
        self.events.push(GameEvent::RoundStarted {
            round: self.state.round_index,
        });
    }

    fn reset_world(&mut self) {
        self.avatar.reset(&self.config);
        self.obstacles.reset(&self.config);
    }

    fn step_running(&mut self, movement: &MoveInput, dt: f32) {
        self.state.elapsed_time += f64::from(dt);
        let elapsed = self.state.elapsed_time as f32;

        self.avatar.apply_input(dt, movement, &self.config);

        if let Some(spawn) = self
            .obstacles
            .spawn_if_due(elapsed, self.state.score, &self.config, &mut self.rng)
        {
            if spawn.ramped {
                self.events.push(GameEvent::DifficultyIncreased {
                    spawn_interval: self.obstacles.timers().spawn_interval(&self.config),
                });
            }
            self.events.push(GameEvent::ObstacleSpawned {
                id: spawn.obstacle.id,
                variant: spawn.obstacle.variant,
            });
        }

        let passed = self.obstacles.advance_and_reap(dt, elapsed, &self.config);
        for obstacle in &passed {
            self.state.score += 1;
            self.events.push(GameEvent::ObstaclePassed { id: obstacle.id });
        }

        // First hit in spawn order wins; the rest are not checked this frame
        if let Some(id) = first_hit(&self.avatar, self.obstacles.obstacles()).map(|o| o.id) {
            self.on_collision(id);
        }
    }
}

/// Advance the round by one frame
pub fn tick<R: RandomSource>(round: &mut Round<R>, input: &TickInput, dt: f32) {
    let dt = sanitize_dt(dt);
    round.events.clear();

    if input.start {
        match round.state.phase {
            RoundPhase::Idle => round.start(),
            RoundPhase::Running => round.stop(),
        }
    }

    match round.state.phase {
        RoundPhase::Idle => {
            // Clock stays at zero so the next round starts fresh
            round.state.score = 0;
            round.state.elapsed_time = 0.0;
        }
        RoundPhase::Running => round.step_running(&input.movement, dt),
    }
}
