//! Data-driven game balance
//!
//! Every empirically tuned constant lives here so it can be overridden from
//! JSON. A partial document fills the gaps from the preset of the profile it
//! names, or from the desktop preset when it names none.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::archetype::{Archetype, ArchetypeConfig, Band};

/// Configuration loading/validation failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("difficulty table has no tiers")]
    EmptyDifficultyTable,
    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// Device profile presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Profile {
    #[default]
    Desktop,
    Mobile,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Desktop => "Desktop",
            Profile::Mobile => "Mobile",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" | "pc" => Some(Profile::Desktop),
            "mobile" | "touch" => Some(Profile::Mobile),
            _ => None,
        }
    }

    /// Level-1 scroll speed (px per reference frame)
    pub fn base_speed(&self) -> f32 {
        match self {
            Profile::Desktop => 5.0,
            Profile::Mobile => 4.0,
        }
    }

    /// Distance from the bottom of the screen to the ground line
    pub fn ground_offset(&self) -> f32 {
        match self {
            Profile::Desktop => 50.0,
            Profile::Mobile => 40.0,
        }
    }

    /// Player jump impulse (negative is up)
    pub fn jump_power(&self) -> f32 {
        match self {
            Profile::Desktop => -16.0,
            Profile::Mobile => -14.0,
        }
    }
}

/// Playfield geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
    pub ground_offset: f32,
    /// Enemy edge length before archetype scaling
    pub enemy_base_size: f32,
    /// How far past the left edge an enemy travels before removal
    pub offscreen_margin: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self::for_profile(Profile::Desktop)
    }
}

impl WorldTuning {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            width: 1500.0,
            height: 500.0,
            ground_offset: profile.ground_offset(),
            enemy_base_size: 90.0,
            offscreen_margin: 50.0,
        }
    }

    /// Y coordinate of the ground line
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_offset
    }
}

/// One row of the finite difficulty table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub speed: f32,
    /// Spawn cadence in reference frames
    pub spawn_rate: f32,
    pub multi_spawn: u32,
    #[serde(default)]
    pub name: String,
}

/// Extrapolation parameters once the finite table is exhausted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfiniteTier {
    pub speed: f32,
    pub speed_increment: f32,
    pub spawn_rate: f32,
    pub spawn_rate_decrement: f32,
    pub multi_spawn_base: f32,
    pub multi_spawn_increment: f32,
    pub max_multi_spawn: u32,
}

impl Default for InfiniteTier {
    fn default() -> Self {
        Self {
            speed: 12.5,
            speed_increment: 0.3,
            spawn_rate: 40.0,
            spawn_rate_decrement: 1.5,
            multi_spawn_base: 4.0,
            multi_spawn_increment: 0.1,
            max_multi_spawn: 7,
        }
    }
}

/// Level table and the rules that extend it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub tiers: Vec<DifficultyTier>,
    pub infinite: InfiniteTier,
    pub score_per_level: u64,
    pub min_spawn_rate: f32,
    /// Past this level speed and wave size get an extra push
    pub extreme_level: u32,
    pub extreme_speed_step: f32,
    pub extreme_multi_spawn_cap: u32,
    /// Level-up cues fire for every level up to this one...
    pub announce_up_to: u32,
    /// ...and then only on multiples of this
    pub announce_every: u32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self::for_profile(Profile::Desktop)
    }
}

const TIER_TABLE: [(f32, f32, u32, &str); 16] = [
    (5.0, 140.0, 1, "Beginner"),
    (5.5, 132.0, 1, "Easy"),
    (6.0, 124.0, 1, "Normal"),
    (6.5, 116.0, 1, "Hard"),
    (7.0, 108.0, 2, "Expert"),
    (7.5, 100.0, 2, "Insane"),
    (8.0, 94.0, 2, "Brutal"),
    (8.5, 88.0, 2, "Savage"),
    (9.0, 82.0, 3, "Nightmare"),
    (9.5, 76.0, 3, "Hellish"),
    (10.0, 70.0, 3, "Infernal"),
    (10.5, 64.0, 3, "Abyssal"),
    (11.0, 58.0, 3, "Apocalyptic"),
    (11.5, 52.0, 4, "Legendary"),
    (12.0, 46.0, 4, "Mythic"),
    (12.5, 40.0, 4, "Godlike"),
];

impl DifficultyTuning {
    pub fn for_profile(profile: Profile) -> Self {
        let scale = profile.base_speed() / Profile::Desktop.base_speed();
        let tiers = TIER_TABLE
            .iter()
            .map(|&(speed, spawn_rate, multi_spawn, name)| DifficultyTier {
                speed: speed * scale,
                spawn_rate,
                multi_spawn,
                name: name.to_string(),
            })
            .collect();
        let mut infinite = InfiniteTier::default();
        infinite.speed *= scale;
        infinite.speed_increment *= scale;

        Self {
            tiers,
            infinite,
            score_per_level: 100,
            min_spawn_rate: 20.0,
            extreme_level: 50,
            extreme_speed_step: 0.2,
            extreme_multi_spawn_cap: 8,
            announce_up_to: 20,
            announce_every: 5,
        }
    }
}

/// Weight applied to every member of a band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandWeight {
    pub band: Band,
    pub weight: f32,
}

/// Candidate pool for a level range; rules are checked in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRule {
    /// Inclusive upper level bound, `None` matches everything
    pub up_to_level: Option<u32>,
    pub pools: Vec<BandWeight>,
}

/// Band rosters and level-dependent weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionTuning {
    pub bands: BTreeMap<Band, Vec<Archetype>>,
    pub rules: Vec<SelectionRule>,
}

impl Default for SelectionTuning {
    fn default() -> Self {
        let bands = [Band::Basic, Band::Intermediate, Band::Advanced, Band::Extreme]
            .into_iter()
            .map(|band| (band, band.default_members().to_vec()))
            .collect();

        let rule = |up_to_level, pools: &[(Band, f32)]| SelectionRule {
            up_to_level,
            pools: pools
                .iter()
                .map(|&(band, weight)| BandWeight { band, weight })
                .collect(),
        };

        Self {
            bands,
            rules: vec![
                rule(Some(5), &[(Band::Basic, 1.0)]),
                rule(Some(10), &[(Band::Basic, 0.15), (Band::Intermediate, 0.10)]),
                rule(Some(15), &[(Band::Intermediate, 0.20), (Band::Advanced, 0.13)]),
                rule(Some(20), &[(Band::Advanced, 0.25), (Band::Extreme, 0.125)]),
                rule(None, &[(Band::Advanced, 0.15), (Band::Extreme, 0.425)]),
            ],
        }
    }
}

impl SelectionTuning {
    /// Roster for a band, falling back to the built-in list when missing or empty
    pub fn members(&self, band: Band) -> &[Archetype] {
        match self.bands.get(&band) {
            Some(members) if !members.is_empty() => members.as_slice(),
            _ => {
                log::debug!("No roster configured for {:?}, using defaults", band);
                band.default_members()
            }
        }
    }

    /// First rule whose level bound covers `level`
    pub fn rule_for(&self, level: u32) -> Option<&SelectionRule> {
        self.rules
            .iter()
            .find(|r| r.up_to_level.is_none_or(|max| level <= max))
    }
}

/// Per-behavior constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorTuning {
    // Flying
    pub flying_speed: f32,
    pub flying_settle: f32,
    pub flying_band_min: f32,
    pub flying_band_max: f32,
    pub wobble_amplitude: f32,
    /// Radians per millisecond
    pub wobble_frequency: f32,
    // Erratic
    pub erratic_interval_ms: f32,
    pub erratic_min: f32,
    pub erratic_max: f32,
    // Charging
    pub charge_range: f32,
    pub charge_speed: f32,
    // Heavy
    pub heavy_resistance: f32,
    pub heavy_min_speed_ratio: f32,
    // Defensive
    pub defensive_armor: u32,
    pub defensive_speed: f32,
    // Aggressive
    pub aggressive_range: f32,
    pub aggressive_boost_min: f32,
    pub aggressive_boost_max: f32,
    // Magical
    pub magical_mana: u32,
    pub magical_chance: f32,
    // Spawner
    pub spawn_cooldown_ms: f32,
    pub spawn_live_cap: usize,
    // Demon
    pub demon_interval_ms: f32,
    pub demon_duration_ms: f32,
    pub demon_size: f32,
    pub demon_speed: f32,
    // Difficulty bands
    pub advanced_level: u32,
    pub nightmare_level: u32,
    pub hell_level: u32,
    pub advanced_speed: f32,
    pub nightmare_speed: f32,
    pub hell_speed: f32,
    pub nightmare_size: f32,
    pub hell_size: f32,
}

impl Default for BehaviorTuning {
    fn default() -> Self {
        Self {
            flying_speed: 1.5,
            flying_settle: 5.0,
            flying_band_min: 0.6,
            flying_band_max: 0.7,
            wobble_amplitude: 0.4,
            wobble_frequency: 0.004,

            erratic_interval_ms: 150.0,
            erratic_min: 0.8,
            erratic_max: 1.3,

            charge_range: 200.0,
            charge_speed: 1.8,

            heavy_resistance: 0.998,
            heavy_min_speed_ratio: 0.5,

            defensive_armor: 2,
            defensive_speed: 0.8,

            aggressive_range: 300.0,
            aggressive_boost_min: 1.1,
            aggressive_boost_max: 1.2,

            magical_mana: 3,
            magical_chance: 0.002,

            spawn_cooldown_ms: 2000.0,
            spawn_live_cap: 8,

            demon_interval_ms: 5000.0,
            demon_duration_ms: 3000.0,
            demon_size: 1.3,
            demon_speed: 1.5,

            advanced_level: 6,
            nightmare_level: 10,
            hell_level: 15,
            advanced_speed: 1.05,
            nightmare_speed: 1.15,
            hell_speed: 1.25,
            nightmare_size: 1.10,
            hell_size: 1.05,
        }
    }
}

/// Spawn cadence and placement constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub initial_interval_ms: f32,
    pub base_interval_ms: f32,
    pub min_interval_ms: f32,
    // Three-piece interval reduction
    pub gentle_level: u32,
    pub gentle_step: f32,
    pub moderate_level: u32,
    pub moderate_base: f32,
    pub moderate_step: f32,
    pub aggressive_base: f32,
    pub aggressive_step: f32,
    // Random jitter band
    pub jitter_high_level: u32,
    pub jitter_base: f32,
    pub jitter_base_high: f32,
    pub jitter_per_level: f32,
    pub jitter_min: f32,
    // Effective interval shrink
    pub shrink_start_level: u32,
    pub shrink_per_level: f32,
    pub shrink_max: f32,
    // Spacing
    pub min_distance_multiplier: f32,
    pub spacing_gentle: f32,
    pub spacing_moderate: f32,
    pub spacing_aggressive: f32,
    pub conflict_push: f32,
    pub ground_spacing: f32,
    pub flying_spacing: f32,
    pub flying_jitter: f32,
    pub formation_offset: f32,
    // Speed boost
    pub speed_boost_level: u32,
    pub speed_boost_per_level: f32,
    pub max_speed_multiplier: f32,
    // Player jump model for the feasibility spacing
    pub gravity: f32,
    pub jump_power: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self::for_profile(Profile::Desktop)
    }
}

impl SpawnTuning {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            initial_interval_ms: 1000.0,
            base_interval_ms: 1200.0,
            min_interval_ms: 400.0,
            gentle_level: 5,
            gentle_step: 20.0,
            moderate_level: 10,
            moderate_base: 100.0,
            moderate_step: 40.0,
            aggressive_base: 300.0,
            aggressive_step: 30.0,
            jitter_high_level: 15,
            jitter_base: 800.0,
            jitter_base_high: 300.0,
            jitter_per_level: 15.0,
            jitter_min: 200.0,
            shrink_start_level: 8,
            shrink_per_level: 0.03,
            shrink_max: 0.5,
            min_distance_multiplier: 4.0,
            spacing_gentle: 2.0,
            spacing_moderate: 1.5,
            spacing_aggressive: 1.2,
            conflict_push: 6.0,
            ground_spacing: 2.5,
            flying_spacing: 4.0,
            flying_jitter: 15.0,
            formation_offset: 4.0,
            speed_boost_level: 10,
            speed_boost_per_level: 0.015,
            max_speed_multiplier: 2.5,
            gravity: 1.1,
            jump_power: profile.jump_power(),
        }
    }

    /// Frames the player spends airborne on a full jump
    pub fn airtime_frames(&self) -> f32 {
        if self.gravity <= 0.0 {
            return 0.0;
        }
        2.0 * self.jump_power.abs() / self.gravity
    }
}

/// Hitbox padding and tolerance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    pub player_pad_min: f32,
    pub player_pad_ratio: f32,
    pub enemy_pad_min: f32,
    pub enemy_pad_ratio: f32,
    pub base_tolerance: f32,
    pub min_tolerance: f32,
    pub tolerance_decay: f32,
    pub tolerance_start_level: u32,
    pub exact_level: u32,
    pub exact_tolerance: f32,
    pub strict_level: u32,
    pub strict_enemy_factor: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            player_pad_min: 18.0,
            player_pad_ratio: 0.12,
            enemy_pad_min: 8.0,
            enemy_pad_ratio: 0.15,
            base_tolerance: 8.0,
            min_tolerance: 2.0,
            tolerance_decay: 0.5,
            tolerance_start_level: 10,
            exact_level: 20,
            exact_tolerance: 1.0,
            strict_level: 15,
            strict_enemy_factor: 0.5,
        }
    }
}

/// Points awarded for dodging enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub base_points: u32,
    pub min_points: u32,
    pub reduction_start_level: u32,
    pub reduction_step_levels: u32,
    pub combo_step: u32,
    pub max_multiplier: u32,
    pub wave_bonus: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            base_points: 10,
            min_points: 5,
            reduction_start_level: 20,
            reduction_step_levels: 5,
            combo_step: 5,
            max_multiplier: 5,
            wave_bonus: 0.3,
        }
    }
}

/// Complete immutable engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub profile: Profile,
    pub world: WorldTuning,
    pub difficulty: DifficultyTuning,
    pub selection: SelectionTuning,
    pub archetypes: BTreeMap<Archetype, ArchetypeConfig>,
    pub behavior: BehaviorTuning,
    pub spawn: SpawnTuning,
    pub collision: CollisionTuning,
    pub scoring: ScoringTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Desktop)
    }
}

impl EngineConfig {
    /// Built-in configuration for a device profile
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            world: WorldTuning::for_profile(profile),
            difficulty: DifficultyTuning::for_profile(profile),
            selection: SelectionTuning::default(),
            archetypes: Archetype::ALL
                .into_iter()
                .map(|a| (a, a.default_config()))
                .collect(),
            behavior: BehaviorTuning::default(),
            spawn: SpawnTuning::for_profile(profile),
            collision: CollisionTuning::default(),
            scoring: ScoringTuning::default(),
        }
    }

    /// Parse and validate a JSON document
    ///
    /// The document is layered over the preset named by its `profile` field
    /// (desktop when absent), so omitted fields follow that profile.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        let profile = match document.get("profile") {
            Some(value) => Profile::deserialize(value)?,
            None => Profile::Desktop,
        };
        let mut merged = serde_json::to_value(Self::for_profile(profile))?;
        overlay(&mut merged, document);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stats for an archetype, falling back to the built-in record
    pub fn archetype(&self, archetype: Archetype) -> ArchetypeConfig {
        match self.archetypes.get(&archetype) {
            Some(config) => *config,
            None => {
                log::debug!("No config for {}, using defaults", archetype.as_str());
                archetype.default_config()
            }
        }
    }

    /// Reject configurations the simulation cannot run on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty.tiers.is_empty() {
            log::warn!("Rejecting config: empty difficulty table");
            return Err(ConfigError::EmptyDifficultyTable);
        }

        let positive = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("world.enemy_base_size", self.world.enemy_base_size),
            ("spawn.min_interval_ms", self.spawn.min_interval_ms),
            ("behavior.erratic_interval_ms", self.behavior.erratic_interval_ms),
            ("behavior.spawn_cooldown_ms", self.behavior.spawn_cooldown_ms),
            ("behavior.demon_interval_ms", self.behavior.demon_interval_ms),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                log::warn!("Rejecting {} = {} (must be positive)", field, value);
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let non_negative = [
            ("difficulty.min_spawn_rate", self.difficulty.min_spawn_rate),
            ("spawn.gravity", self.spawn.gravity),
            ("collision.base_tolerance", self.collision.base_tolerance),
            ("behavior.heavy_resistance", self.behavior.heavy_resistance),
            ("behavior.magical_chance", self.behavior.magical_chance),
            ("behavior.flying_band_min", self.behavior.flying_band_min),
            ("behavior.flying_band_max", self.behavior.flying_band_max),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                log::warn!("Rejecting {} = {} (must not be negative)", field, value);
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        if self.behavior.flying_band_min > self.behavior.flying_band_max {
            log::warn!(
                "Rejecting flying band [{}, {}]: min above max",
                self.behavior.flying_band_min,
                self.behavior.flying_band_max
            );
            return Err(ConfigError::InvalidValue {
                field: "behavior.flying_band_min",
                value: self.behavior.flying_band_min,
            });
        }

        for (i, tier) in self.difficulty.tiers.iter().enumerate() {
            if !tier.speed.is_finite() || tier.speed < 0.0 {
                log::warn!("Tier {} has invalid speed {}", i + 1, tier.speed);
                return Err(ConfigError::InvalidValue {
                    field: "difficulty.tiers.speed",
                    value: tier.speed,
                });
            }
        }

        Ok(())
    }
}

/// Recursively copy `patch` over `base`; objects merge, everything else replaces
fn overlay(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
