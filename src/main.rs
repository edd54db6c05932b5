//! Cube Dodge headless driver
//!
//! Runs the simulation with a simple dodging autopilot and prints one JSON
//! snapshot per simulated second. Useful for balancing configs without a
//! renderer attached.
//!
//! Usage: cube-dodge [--preset easy|normal|hard] [--config FILE] [--seconds N] [--seed N]

use std::process::ExitCode;

use cube_dodge::consts::*;
use cube_dodge::sim::{GameEvent, MoveInput, Round, RoundPhase, TickInput, tick};
use cube_dodge::{ConfigError, DifficultyPreset, SimConfig};

/// Host frame time (a 50 Hz display, so substeps don't line up with frames)
const FRAME_DT: f32 = 1.0 / 50.0;

#[derive(Debug)]
struct Options {
    preset: Option<DifficultyPreset>,
    config_path: Option<String>,
    seconds: f32,
    seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            preset: None,
            config_path: None,
            seconds: 60.0,
            seed: 1,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--preset" => {
                let v = value("--preset")?;
                let preset =
                    DifficultyPreset::from_str(&v).ok_or_else(|| format!("unknown preset `{v}`"))?;
                opts.preset = Some(preset);
            }
            "--config" => opts.config_path = Some(value("--config")?),
            "--seconds" => {
                let v = value("--seconds")?;
                opts.seconds = v.parse().map_err(|_| format!("bad --seconds `{v}`"))?;
            }
            "--seed" => {
                let v = value("--seed")?;
                opts.seed = v.parse().map_err(|_| format!("bad --seed `{v}`"))?;
            }
            other => return Err(format!("unknown argument `{other}`")),
        }
    }
    Ok(opts)
}

fn load_config(opts: &Options) -> Result<SimConfig, ConfigError> {
    let mut config = match &opts.config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(preset) = opts.preset {
        config.apply_preset(preset);
    }
    config.validate()?;
    Ok(config)
}

/// Sidestep the nearest obstacle bearing down on the avatar's lane
fn autopilot(round: &Round) -> MoveInput {
    let avatar = round.avatar().position;
    let config = round.config();
    let lane = round.avatar().radius + config.obstacle_half_extent + 0.5;

    let threat = round
        .obstacles()
        .iter()
        .filter(|o| o.position.z < avatar.z + config.obstacle_half_extent)
        .filter(|o| (o.position.x - avatar.x).abs() < lane)
        .max_by(|a, b| a.position.z.total_cmp(&b.position.z));

    match threat {
        Some(o) => {
            // Dodge toward the wider side of the lane
            let go_right = if avatar.x > config.lateral_bound - lane {
                false
            } else if avatar.x < -config.lateral_bound + lane {
                true
            } else {
                o.position.x <= avatar.x
            };
            MoveInput {
                left: !go_right,
                right: go_right,
                ..Default::default()
            }
        }
        None => MoveInput {
            left: avatar.x > 0.5,
            right: avatar.x < -0.5,
            ..Default::default()
        },
    }
}

fn run(opts: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(opts)?;
    let mut round = Round::new(config, opts.seed)?;

    log::info!(
        "Cube Dodge headless run: preset {}, seed {}, {:.0}s",
        opts.preset.unwrap_or_default().as_str(),
        opts.seed,
        opts.seconds
    );

    let mut input = TickInput {
        start: true,
        ..Default::default()
    };
    let mut accumulator = 0.0;
    let mut sim_time = 0.0;
    let mut next_report = 0.0;
    let mut collisions = 0u32;
    let mut best_score = 0u64;

    while sim_time < opts.seconds {
        accumulator += FRAME_DT.min(0.1);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if round.phase() == RoundPhase::Running {
                input.movement = autopilot(&round);
            }
            tick(&mut round, &input, SIM_DT);
            accumulator -= SIM_DT;
            sim_time += SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.start = false;

            for event in round.events() {
                if let GameEvent::Collision { score, .. } = *event {
                    collisions += 1;
                    best_score = best_score.max(score);
                }
            }
        }

        if sim_time >= next_report {
            println!("{}", serde_json::to_string(&round.snapshot())?);
            next_report += 1.0;
        }
    }

    // Stop the live round so its score is reported too
    tick(
        &mut round,
        &TickInput {
            start: true,
            ..Default::default()
        },
        0.0,
    );
    for event in round.events() {
        if let GameEvent::RoundStopped { score, .. } = *event {
            best_score = best_score.max(score);
        }
    }

    let rounds = round.state().round_index;
    log::info!("Finished: {collisions} collision(s), {rounds} round(s), best score {best_score}");
    let summary = serde_json::json!({
        "rounds": rounds,
        "collisions": collisions,
        "best_score": best_score,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            log::error!("{e}");
            eprintln!(
                "usage: cube-dodge [--preset easy|normal|hard] [--config FILE] [--seconds N] [--seed N]"
            );
            return ExitCode::FAILURE;
        }
    };

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
