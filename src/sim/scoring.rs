//! Combo and points for dodged enemies

use serde::{Deserialize, Serialize};

use crate::tuning::ScoringTuning;

/// Consecutive-dodge combo and its multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboTracker {
    tuning: ScoringTuning,
    combo: u32,
    multiplier: u32,
}

impl ComboTracker {
    pub fn new(tuning: ScoringTuning) -> Self {
        Self {
            tuning,
            combo: 0,
            multiplier: 1,
        }
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Points per dodge before multipliers; shrinks past the reduction level
    pub fn base_points(&self, level: u32) -> u32 {
        let t = &self.tuning;
        if level > t.reduction_start_level {
            let step = t.reduction_step_levels.max(1);
            let cut = (level - t.reduction_start_level) / step;
            t.base_points.saturating_sub(cut).max(t.min_points)
        } else {
            t.base_points
        }
    }

    /// Extra reward for crowded waves
    pub fn wave_bonus(&self, multi_spawn: u32) -> f64 {
        1.0 + multi_spawn.saturating_sub(1) as f64 * self.tuning.wave_bonus as f64
    }

    /// Register one dodge and return the points it earned
    pub fn register_pass(&mut self, level: u32, multi_spawn: u32) -> u32 {
        let t = &self.tuning;
        self.combo += 1;
        let step = t.combo_step.max(1);
        if self.combo >= step {
            self.multiplier = (1 + self.combo / step).min(t.max_multiplier);
        }

        let points =
            self.base_points(level) as f64 * self.multiplier as f64 * self.wave_bonus(multi_spawn);
        points.floor() as u32
    }

    pub fn reset(&mut self) {
        self.combo = 0;
        self.multiplier = 1;
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(ScoringTuning::default())
    }
}
