//! Live enemy instances
//!
//! One record type for every archetype. Behavior-specific timers and latches
//! live in the [`BehaviorState`] tagged union.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::archetype::{Archetype, ArchetypeConfig, BehaviorKind};
use super::collision::Aabb;

/// Difficulty and lifecycle flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnemyFlags {
    pub is_flying: bool,
    pub is_advanced: bool,
    pub is_nightmare: bool,
    pub is_hell: bool,
    /// Already scored as dodged; never re-fires
    pub passed: bool,
    /// Spawned by a broodmother rather than the scheduler
    pub is_minion: bool,
}

/// Temporary demon buff; reverted when `age_ms` reaches `ends_at_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metamorphosis {
    pub ends_at_ms: f32,
    pub base_size: Vec2,
    pub base_vel_x: f32,
}

/// Per-behavior mutable state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    #[default]
    Ground,
    Flying,
    Erratic {
        timer_ms: f32,
    },
    Charging {
        is_charging: bool,
    },
    Heavy,
    Defensive {
        armor: u32,
    },
    Aggressive {
        boosted: bool,
    },
    Magical {
        mana: u32,
    },
    Spawner {
        timer_ms: f32,
    },
    Demon {
        timer_ms: f32,
        buff: Option<Metamorphosis>,
    },
}

impl BehaviorState {
    /// Fresh state for a behavior kind (stats filled in by `configure`)
    pub fn initial(kind: BehaviorKind) -> Self {
        match kind {
            BehaviorKind::Ground => BehaviorState::Ground,
            BehaviorKind::Flying => BehaviorState::Flying,
            BehaviorKind::Erratic => BehaviorState::Erratic { timer_ms: 0.0 },
            BehaviorKind::Charging => BehaviorState::Charging { is_charging: false },
            BehaviorKind::Heavy => BehaviorState::Heavy,
            BehaviorKind::Defensive => BehaviorState::Defensive { armor: 0 },
            BehaviorKind::Aggressive => BehaviorState::Aggressive { boosted: false },
            BehaviorKind::Magical => BehaviorState::Magical { mana: 0 },
            BehaviorKind::Spawner => BehaviorState::Spawner { timer_ms: 0.0 },
            BehaviorKind::Demon => BehaviorState::Demon {
                timer_ms: 0.0,
                buff: None,
            },
        }
    }
}

/// Hover target for airborne enemies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hover {
    /// Preferred y of the enemy's center
    pub preferred_y: f32,
    pub wobble_phase: f32,
}

/// A live enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: Archetype,
    pub behavior: BehaviorKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// px per reference frame; x is negative (moving left)
    pub vel: Vec2,
    /// Speed magnitude that behaviors re-roll or boost from
    pub base_speed: f32,
    pub health: u32,
    pub frame_rate: f32,
    pub flags: EnemyFlags,
    pub state: BehaviorState,
    pub hover: Option<Hover>,
    /// Time alive (ms)
    pub age_ms: f32,
}

impl Enemy {
    /// Unconfigured enemy standing on the ground at `x`
    pub fn new(
        id: u32,
        archetype: Archetype,
        config: &ArchetypeConfig,
        x: f32,
        ground_y: f32,
        base_size: f32,
        speed: f32,
    ) -> Self {
        let size = Vec2::splat(base_size * config.size_scale);
        let base_speed = speed * config.speed_scale;
        Self {
            id,
            archetype,
            behavior: config.behavior,
            pos: Vec2::new(x, ground_y - size.y),
            size,
            vel: Vec2::new(-base_speed, 0.0),
            base_speed,
            health: config.health,
            frame_rate: config.frame_rate,
            flags: EnemyFlags {
                is_flying: config.flying,
                ..Default::default()
            },
            state: BehaviorState::initial(config.behavior),
            hover: None,
            age_ms: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.flags.is_flying
    }

    /// Multiply both current and base speed
    pub fn scale_speed(&mut self, factor: f32) {
        self.vel.x *= factor;
        self.base_speed *= factor;
    }

    /// Clamp speed magnitude to `max`
    pub fn cap_speed(&mut self, max: f32) {
        if self.vel.x.abs() > max {
            self.vel.x = -max;
        }
        self.base_speed = self.base_speed.min(max);
    }

    /// Stand on the ground line
    pub fn clamp_to_ground(&mut self, ground_y: f32) {
        self.pos.y = ground_y - self.size.y;
    }

    /// Fully past the left edge
    pub fn is_offscreen(&self, margin: f32) -> bool {
        self.pos.x + self.size.x < -margin
    }

    /// Demon buff currently active
    pub fn is_metamorphosed(&self) -> bool {
        matches!(self.state, BehaviorState::Demon { buff: Some(_), .. })
    }
}
