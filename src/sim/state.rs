//! Engine session state
//!
//! Everything one run needs lives in [`EngineState`]: controllers built from an
//! immutable [`EngineConfig`], the live enemy list and a seeded RNG. Two
//! sessions with the same config, seed, inputs and `dt` sequence stay
//! identical.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::archetype::{Archetype, BehaviorKind};
use super::collision::CollisionJudge;
use super::difficulty::{DifficultyController, DifficultyState};
use super::enemy::Enemy;
use super::scoring::ComboTracker;
use super::selector::EnemyTypeSelector;
use super::spawn::SpawnScheduler;
use crate::tuning::EngineConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Enemies move and spawn
    Running,
    /// Player was hit; ticks are ignored until `reset`
    GameOver,
}

/// Discrete notifications for scoring, audio and effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Enemy moved past the player; fires once per enemy
    EnemyPassed {
        id: u32,
        archetype: Archetype,
        points: u32,
    },
    /// Enemy hit the player; the run is over
    EnemyCollided {
        id: u32,
        archetype: Archetype,
        contact: Vec2,
    },
    LevelChanged {
        level: u32,
        /// Whether a level-up cue should play
        announce: bool,
    },
    SpecialAbility {
        id: u32,
        kind: BehaviorKind,
        position: Vec2,
    },
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub enemies_spawned: u32,
    pub minions_spawned: u32,
    pub enemies_dodged: u32,
    pub collisions: u32,
    pub play_time_ms: f64,
}

/// Complete engine session
#[derive(Debug, Clone)]
pub struct EngineState {
    pub config: EngineConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub stats: RunStats,
    pub controller: DifficultyController,
    pub selector: EnemyTypeSelector,
    pub scheduler: SpawnScheduler,
    pub judge: CollisionJudge,
    pub combo: ComboTracker,
    pub rng: Pcg32,
    /// Next entity ID
    pub(super) next_id: u32,
}

impl EngineState {
    /// Create a session; the config is expected to be validated already
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        log::info!(
            "New session (seed {}, profile {})",
            seed,
            config.profile.as_str()
        );
        Self {
            controller: DifficultyController::new(config.difficulty.clone()),
            selector: EnemyTypeSelector::new(config.selection.clone()),
            scheduler: SpawnScheduler::new(config.spawn.clone()),
            judge: CollisionJudge::new(config.collision.clone()),
            combo: ComboTracker::new(config.scoring.clone()),
            config,
            seed,
            phase: GamePhase::Running,
            enemies: Vec::new(),
            stats: RunStats::default(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn difficulty(&self) -> DifficultyState {
        self.controller.state()
    }

    pub fn level(&self) -> u32 {
        self.controller.level()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Drop every enemy and zero all timers; the RNG stream continues
    pub fn reset(&mut self) {
        self.enemies.clear();
        self.controller.reset();
        self.scheduler.reset();
        self.combo.reset();
        self.stats = RunStats::default();
        self.phase = GamePhase::Running;
        self.next_id = 1;
        log::info!("Session reset");
    }

    /// Reset and return the score that puts the controller at `level`
    ///
    /// The controller only follows the score fed into `tick`, so the caller
    /// must start counting from the returned value.
    pub fn start_at_level(&mut self, level: u32) -> u64 {
        self.reset();
        let score = u64::from(level.max(1) - 1) * self.config.difficulty.score_per_level;
        self.controller.update(score, &mut Vec::new());
        log::info!("Starting at level {}", self.controller.level());
        score
    }

    /// End the run: enemies are discarded and spawn timers zeroed
    pub(super) fn finish(&mut self) {
        self.phase = GamePhase::GameOver;
        self.enemies.clear();
        self.scheduler.reset();
        self.combo.reset();
        log::info!(
            "Game over at level {} after {:.1}s ({} dodged)",
            self.controller.level(),
            self.stats.play_time_ms / 1000.0,
            self.stats.enemies_dodged
        );
    }
}
