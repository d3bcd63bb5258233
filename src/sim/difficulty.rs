//! Score-driven difficulty
//!
//! Level is `floor(score / 100) + 1`. The first levels come straight from the
//! tier table; past the table the infinite tier extrapolates.

use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::consts::FRAME_MS;
use crate::tuning::DifficultyTuning;

/// Current difficulty snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub level: u32,
    /// Scroll speed in px per reference frame
    pub speed: f32,
    /// Spawn cadence in reference frames
    pub spawn_rate: f32,
    /// Enemies per spawn wave
    pub multi_spawn: u32,
}

impl DifficultyState {
    pub fn spawn_interval_ms(&self) -> f32 {
        self.spawn_rate * FRAME_MS
    }
}

/// Resolve the state for any level from the table and infinite tier
pub fn state_for_level(tuning: &DifficultyTuning, level: u32) -> DifficultyState {
    let level = level.max(1);
    let table_size = tuning.tiers.len() as u32;

    if level <= table_size {
        let tier = &tuning.tiers[(level - 1) as usize];
        return DifficultyState {
            level,
            speed: tier.speed,
            spawn_rate: tier.spawn_rate,
            multi_spawn: tier.multi_spawn,
        };
    }

    let inf = &tuning.infinite;
    let excess = (level - table_size) as f32;

    let mut speed = inf.speed + excess * inf.speed_increment;
    let spawn_rate =
        (inf.spawn_rate - excess * inf.spawn_rate_decrement).max(tuning.min_spawn_rate);
    let multi_spawn_raw = (inf.multi_spawn_base + excess * inf.multi_spawn_increment).floor();
    let mut multi_spawn = (multi_spawn_raw as u32).min(inf.max_multi_spawn);

    if level > tuning.extreme_level {
        speed += (level - tuning.extreme_level) as f32 * tuning.extreme_speed_step;
        multi_spawn = (multi_spawn + 1).min(tuning.extreme_multi_spawn_cap);
    }

    DifficultyState {
        level,
        speed,
        spawn_rate,
        multi_spawn,
    }
}

/// Tracks the current level and raises level-change notifications
#[derive(Debug, Clone)]
pub struct DifficultyController {
    tuning: DifficultyTuning,
    state: DifficultyState,
}

impl DifficultyController {
    pub fn new(tuning: DifficultyTuning) -> Self {
        let state = state_for_level(&tuning, 1);
        Self { tuning, state }
    }

    pub fn state(&self) -> DifficultyState {
        self.state
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn level_for_score(&self, score: u64) -> u32 {
        let step = self.tuning.score_per_level.max(1);
        u32::try_from(score / step)
            .unwrap_or(u32::MAX - 1)
            .saturating_add(1)
    }

    /// Display name of a table tier, `None` once in the infinite tier
    pub fn tier_name(&self, level: u32) -> Option<&str> {
        let index = level.checked_sub(1)? as usize;
        self.tuning.tiers.get(index).map(|t| t.name.as_str())
    }

    /// Whether a level-up cue should play (throttled at extreme levels)
    pub fn should_announce(&self, level: u32) -> bool {
        let every = self.tuning.announce_every.max(1);
        level <= self.tuning.announce_up_to || level % every == 0
    }

    /// Recompute difficulty for `score`, pushing `LevelChanged` on a new level
    pub fn update(&mut self, score: u64, events: &mut Vec<GameEvent>) -> DifficultyState {
        let level = self.level_for_score(score);
        if level != self.state.level {
            self.state = state_for_level(&self.tuning, level);
            let announce = self.should_announce(level);
            log::info!(
                "Level {} ({}): speed={:.2} spawn_interval={:.0}ms multi_spawn={}",
                level,
                self.tier_name(level).unwrap_or("∞"),
                self.state.speed,
                self.state.spawn_interval_ms(),
                self.state.multi_spawn
            );
            events.push(GameEvent::LevelChanged { level, announce });
        }
        self.state
    }

    /// Back to level 1
    pub fn reset(&mut self) {
        self.state = state_for_level(&self.tuning, 1);
    }
}
