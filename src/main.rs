//! Runner Sim headless entry point
//!
//! Drives the engine with a fixed 16.6ms step and a simple jumping autopilot,
//! feeding dodge points back as score. Useful for balancing and replaying
//! seeds without a renderer.

use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;

use runner_sim::consts::{FRAME_MS, PLAYER_SIZE, PLAYER_X};
use runner_sim::frames;
use runner_sim::sim::{Aabb, Enemy, EngineState, GameEvent, TickInput, tick};
use runner_sim::{EngineConfig, Profile};

#[derive(Debug, Parser)]
#[command(name = "runner-sim", about = "Headless endless-runner difficulty simulation")]
struct Args {
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated seconds before stopping
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Start directly at this level
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Balance preset (desktop or mobile)
    #[arg(long, default_value = "desktop", value_parser = parse_profile)]
    profile: Profile,
    /// JSON tuning file; its `profile` field replaces --profile
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn parse_profile(s: &str) -> Result<Profile, String> {
    Profile::from_str(s).ok_or_else(|| format!("unknown profile '{}'", s))
}

/// Jumping player that hops over ground enemies
struct Autopilot {
    y: f32,
    vy: f32,
    ground_y: f32,
    gravity: f32,
    jump_power: f32,
    airtime: f32,
    jumps: u32,
}

impl Autopilot {
    fn new(config: &EngineConfig) -> Self {
        let ground_y = config.world.ground_y();
        Self {
            y: ground_y - PLAYER_SIZE,
            vy: 0.0,
            ground_y,
            gravity: config.spawn.gravity,
            jump_power: config.spawn.jump_power,
            airtime: config.spawn.airtime_frames(),
            jumps: 0,
        }
    }

    fn bounds(&self) -> Aabb {
        Aabb {
            pos: Vec2::new(PLAYER_X, self.y),
            size: Vec2::splat(PLAYER_SIZE),
        }
    }

    fn on_ground(&self) -> bool {
        self.y >= self.ground_y - PLAYER_SIZE
    }

    fn update(&mut self, enemies: &[Enemy], dt: f32) {
        let f = frames(dt);
        if self.on_ground() && self.threat_ahead(enemies) {
            self.vy = self.jump_power;
            self.jumps += 1;
        }

        self.vy += self.gravity * f;
        self.y += self.vy * f;
        if self.on_ground() {
            self.y = self.ground_y - PLAYER_SIZE;
            self.vy = 0.0;
        }
    }

    /// A ground enemy reaches the player within a third of a jump
    fn threat_ahead(&self, enemies: &[Enemy]) -> bool {
        let front = PLAYER_X + PLAYER_SIZE;
        enemies
            .iter()
            .filter(|e| !e.is_flying() && !e.flags.passed)
            .any(|e| {
                let gap = e.pos.x - front;
                let speed = e.vel.x.abs().max(f32::EPSILON);
                gap >= 0.0 && gap / speed < self.airtime * 0.3
            })
    }
}

fn load_config(args: &Args) -> Result<EngineConfig, String> {
    let Some(path) = &args.config else {
        return Ok(EngineConfig::for_profile(args.profile));
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("reading {}: {}", path.display(), e))?;
    EngineConfig::from_json(&json).map_err(|e| format!("{}: {}", path.display(), e))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Runner Sim starting (seed {}, {}s, level {})",
        args.seed,
        args.seconds,
        args.level
    );

    let mut pilot = Autopilot::new(&config);
    let mut state = EngineState::new(config, args.seed);
    let mut score = state.start_at_level(args.level);

    let total_ticks = (args.seconds.max(0.0) * 1000.0 / FRAME_MS).round() as u64;
    let mut ticks_run = 0;
    for _ in 0..total_ticks {
        pilot.update(&state.enemies, FRAME_MS);
        let input = TickInput {
            player: pilot.bounds(),
            score,
        };

        for event in tick(&mut state, &input, FRAME_MS) {
            match event {
                GameEvent::EnemyPassed { points, .. } => score += u64::from(points),
                GameEvent::EnemyCollided { archetype, contact, .. } => {
                    log::info!(
                        "Hit by {} at ({:.0}, {:.0})",
                        archetype.as_str(),
                        contact.x,
                        contact.y
                    );
                }
                GameEvent::LevelChanged { level, announce } => {
                    if announce {
                        log::info!("Level up: {}", level);
                    }
                }
                GameEvent::SpecialAbility { id, kind, .. } => {
                    log::debug!("Enemy {} used {}", id, kind.as_str());
                }
            }
        }
        ticks_run += 1;

        if state.is_over() {
            break;
        }
    }

    let stats = state.stats;
    println!("seed:       {}", args.seed);
    println!("outcome:    {}", if state.is_over() { "hit" } else { "survived" });
    println!("time:       {:.1}s ({} ticks)", stats.play_time_ms / 1000.0, ticks_run);
    println!("level:      {}", state.level());
    println!("score:      {}", score);
    println!("spawned:    {} (+{} minions)", stats.enemies_spawned, stats.minions_spawned);
    println!("dodged:     {}", stats.enemies_dodged);
    println!("jumps:      {}", pilot.jumps);
    ExitCode::SUCCESS
}
