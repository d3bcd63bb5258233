//! Enemy archetypes and difficulty bands
//!
//! Archetypes are pure data: a name, a band, and an immutable
//! [`ArchetypeConfig`]. Behavior is looked up from [`BehaviorKind`].

use serde::{Deserialize, Serialize};

/// Behavior strategy discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviorKind {
    #[default]
    Ground,
    Flying,
    Erratic,
    Charging,
    Heavy,
    Defensive,
    Aggressive,
    Magical,
    Spawner,
    Demon,
}

impl BehaviorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::Ground => "ground",
            BehaviorKind::Flying => "flying",
            BehaviorKind::Erratic => "erratic",
            BehaviorKind::Charging => "charging",
            BehaviorKind::Heavy => "heavy",
            BehaviorKind::Defensive => "defensive",
            BehaviorKind::Aggressive => "aggressive",
            BehaviorKind::Magical => "magical",
            BehaviorKind::Spawner => "spawner",
            BehaviorKind::Demon => "demon",
        }
    }
}

/// Level-range grouping used for weighted selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Band {
    Basic,
    Intermediate,
    Advanced,
    Extreme,
}

impl Band {
    /// Hard-coded roster, used when the config omits a band
    pub fn default_members(&self) -> &'static [Archetype] {
        use Archetype::*;
        match self {
            Band::Basic => &[Meepo, Ghost, Mad, Spoon],
            Band::Intermediate => &[Boss, Ghost02, Glad, Sad],
            Band::Advanced => &[Bat, Bloodthirsty, Necromancer],
            Band::Extreme => &[Broodmother, Tb],
        }
    }
}

/// Named enemy template
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    // Basic
    Meepo,
    Ghost,
    Mad,
    Spoon,
    // Intermediate
    Boss,
    Ghost02,
    Glad,
    Sad,
    // Advanced
    Bat,
    Bloodthirsty,
    Necromancer,
    // Extreme
    Broodmother,
    Tb,
}

impl Archetype {
    pub const ALL: [Archetype; 13] = [
        Archetype::Meepo,
        Archetype::Ghost,
        Archetype::Mad,
        Archetype::Spoon,
        Archetype::Boss,
        Archetype::Ghost02,
        Archetype::Glad,
        Archetype::Sad,
        Archetype::Bat,
        Archetype::Bloodthirsty,
        Archetype::Necromancer,
        Archetype::Broodmother,
        Archetype::Tb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Meepo => "meepo",
            Archetype::Ghost => "ghost",
            Archetype::Mad => "mad",
            Archetype::Spoon => "spoon",
            Archetype::Boss => "boss",
            Archetype::Ghost02 => "ghost02",
            Archetype::Glad => "glad",
            Archetype::Sad => "sad",
            Archetype::Bat => "bat",
            Archetype::Bloodthirsty => "bloodthirsty",
            Archetype::Necromancer => "necromancer",
            Archetype::Broodmother => "broodmother",
            Archetype::Tb => "tb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// Band this archetype belongs to in the default roster
    pub fn band(&self) -> Band {
        match self {
            Archetype::Meepo | Archetype::Ghost | Archetype::Mad | Archetype::Spoon => Band::Basic,
            Archetype::Boss | Archetype::Ghost02 | Archetype::Glad | Archetype::Sad => {
                Band::Intermediate
            }
            Archetype::Bat | Archetype::Bloodthirsty | Archetype::Necromancer => Band::Advanced,
            Archetype::Broodmother | Archetype::Tb => Band::Extreme,
        }
    }

    /// Built-in stats, used when the config has no entry for this archetype
    pub fn default_config(&self) -> ArchetypeConfig {
        use BehaviorKind::*;
        let (size_scale, speed_scale, health, behavior, frame_rate, flying, grows) = match self {
            Archetype::Meepo => (1.0, 1.0, 1, Ground, 10.0, false, false),
            Archetype::Ghost => (0.9, 1.1, 1, Flying, 12.0, true, false),
            Archetype::Mad => (0.85, 1.0, 1, Erratic, 10.0, false, false),
            Archetype::Spoon => (0.8, 1.05, 1, Ground, 15.0, false, false),
            Archetype::Boss => (1.3, 0.8, 3, Heavy, 8.0, false, true),
            Archetype::Ghost02 => (0.9, 1.15, 1, Flying, 12.0, true, false),
            Archetype::Glad => (1.0, 1.1, 2, Aggressive, 10.0, false, false),
            Archetype::Sad => (1.0, 1.0, 2, Defensive, 8.0, false, false),
            Archetype::Bat => (0.8, 1.25, 1, Flying, 15.0, true, false),
            Archetype::Bloodthirsty => (1.0, 1.1, 2, Charging, 12.0, false, false),
            Archetype::Necromancer => (1.1, 0.9, 3, Magical, 8.0, true, true),
            Archetype::Broodmother => (1.4, 0.75, 5, Spawner, 10.0, false, true),
            Archetype::Tb => (1.2, 1.0, 4, Demon, 10.0, false, true),
        };
        ArchetypeConfig {
            size_scale,
            speed_scale,
            health,
            behavior,
            frame_rate,
            flying,
            grows,
        }
    }
}

/// Immutable per-archetype record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    /// Multiplier on the base enemy size
    pub size_scale: f32,
    /// Multiplier on the level speed
    pub speed_scale: f32,
    pub health: u32,
    pub behavior: BehaviorKind,
    /// Animation frames per second (for the renderer)
    pub frame_rate: f32,
    /// Airborne archetype (hovers instead of walking the ground)
    #[serde(default)]
    pub flying: bool,
    /// Receives the nightmare/hell size bonus
    #[serde(default)]
    pub grows: bool,
}
