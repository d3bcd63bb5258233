//! Spawn cadence and wave placement
//!
//! The scheduler is a millisecond accumulator. When it expires and the right
//! edge has room, a wave of `multi_spawn` enemies is built and the next
//! interval is re-rolled. Placement never puts a ground and a flying enemy of
//! the same wave closer than `player_width * conflict_push * level_multiplier`.

use rand::Rng;

use super::archetype::Archetype;
use super::behavior;
use super::collision::Aabb;
use super::difficulty::DifficultyState;
use super::enemy::Enemy;
use super::selector::EnemyTypeSelector;
use crate::tuning::{EngineConfig, SpawnTuning};

/// Everything a wave needs from the running session
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub config: &'a EngineConfig,
    pub selector: &'a EnemyTypeSelector,
    pub difficulty: DifficultyState,
    pub player: Aabb,
    pub live: &'a [Enemy],
}

/// Build one configured enemy at `x` for the current difficulty
pub fn create_enemy<R: Rng + ?Sized>(
    id: u32,
    archetype: Archetype,
    x: f32,
    ctx: &SpawnContext<'_>,
    rng: &mut R,
) -> Enemy {
    let config = ctx.config.archetype(archetype);
    let world = &ctx.config.world;
    let ground_y = world.ground_y();
    let mut enemy = Enemy::new(
        id,
        archetype,
        &config,
        x,
        ground_y,
        world.enemy_base_size,
        ctx.difficulty.speed,
    );
    behavior::configure(
        &mut enemy,
        &config,
        ctx.difficulty.level,
        ground_y,
        &ctx.config.behavior,
        rng,
    );
    enemy
}

/// Timer-driven wave spawner
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    tuning: SpawnTuning,
    timer_ms: f32,
    interval_ms: f32,
}

impl SpawnScheduler {
    pub fn new(tuning: SpawnTuning) -> Self {
        let interval_ms = tuning.initial_interval_ms;
        Self {
            tuning,
            timer_ms: 0.0,
            interval_ms,
        }
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Spacing multiplier: generous early, tighter later
    pub fn level_multiplier(&self, level: u32) -> f32 {
        let t = &self.tuning;
        if level <= t.gentle_level {
            t.spacing_gentle
        } else if level <= t.moderate_level {
            t.spacing_moderate
        } else {
            t.spacing_aggressive
        }
    }

    /// Rolled interval shortened further at high levels
    pub fn effective_interval(&self, level: u32) -> f32 {
        let t = &self.tuning;
        if level > t.shrink_start_level {
            let shrink =
                ((level - t.shrink_start_level) as f32 * t.shrink_per_level).min(t.shrink_max);
            self.interval_ms * (1.0 - shrink)
        } else {
            self.interval_ms
        }
    }

    /// Draw the next interval for `level`
    pub fn roll_interval<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> f32 {
        let t = &self.tuning;
        let l = level as f32;

        let reduction = if level <= t.gentle_level {
            l * t.gentle_step
        } else if level <= t.moderate_level {
            t.moderate_base + (level - t.gentle_level) as f32 * t.moderate_step
        } else {
            t.aggressive_base + (level - t.moderate_level) as f32 * t.aggressive_step
        };

        let jitter_base = if level > t.jitter_high_level {
            t.jitter_base_high
        } else {
            t.jitter_base
        };
        let variation = (jitter_base - l * t.jitter_per_level).max(t.jitter_min);

        let interval = t.base_interval_ms - reduction + (rng.random::<f32>() * variation).floor();
        interval.max(t.min_interval_ms)
    }

    /// Minimum gap between the right edge and the last spawned enemy
    pub fn min_distance(&self, player_width: f32, level: u32) -> f32 {
        player_width * self.tuning.min_distance_multiplier * self.level_multiplier(level)
    }

    /// Whether the right edge is clear enough for a new wave
    pub fn has_room(&self, ctx: &SpawnContext<'_>) -> bool {
        let Some(last) = ctx.live.iter().rev().find(|e| !e.flags.is_minion) else {
            return true;
        };
        let edge = ctx.config.world.width;
        last.pos.x < edge - self.min_distance(ctx.player.size.x, ctx.difficulty.level)
    }

    /// Advance the timer; returns the enemies of a wave if one is released
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        ctx: &SpawnContext<'_>,
        next_id: &mut u32,
        rng: &mut R,
    ) -> Vec<Enemy> {
        if dt <= 0.0 {
            return Vec::new();
        }

        let level = ctx.difficulty.level;
        self.timer_ms += dt;
        if self.timer_ms < self.effective_interval(level) {
            return Vec::new();
        }

        if !self.has_room(ctx) {
            log::debug!("Spawn deferred at level {}: right edge occupied", level);
            return Vec::new();
        }

        self.timer_ms = 0.0;
        self.interval_ms = self.roll_interval(level, rng);
        let wave = self.place_wave(ctx, next_id, rng);
        log::debug!(
            "Spawned wave of {} at level {} (next in {:.0}ms)",
            wave.len(),
            level,
            self.interval_ms
        );
        wave
    }

    /// Pick, configure and position one wave
    pub fn place_wave<R: Rng + ?Sized>(
        &self,
        ctx: &SpawnContext<'_>,
        next_id: &mut u32,
        rng: &mut R,
    ) -> Vec<Enemy> {
        let t = &self.tuning;
        let config = ctx.config;
        let level = ctx.difficulty.level;
        let speed = ctx.difficulty.speed;
        let player_width = ctx.player.size.x;
        let lm = self.level_multiplier(level);

        let ground_y = config.world.ground_y();
        let band_lo = ground_y * config.behavior.flying_band_min;
        let band_hi = ground_y * config.behavior.flying_band_max;
        let safe_jump = speed * t.airtime_frames();
        let conflict_gap = player_width * t.conflict_push * lm;

        let count = ctx.difficulty.multi_spawn.max(1) as usize;
        let mut wave: Vec<Enemy> = Vec::with_capacity(count);
        let mut has_ground = false;
        let mut has_flying = false;
        let mut max_x = config.world.width;

        for i in 0..count {
            let archetype = ctx.selector.pick(level, rng);
            let flying = config.archetype(archetype).flying;

            let x = match wave.last() {
                None => config.world.width,
                Some(prev) => {
                    let mixed = has_ground && has_flying;
                    let conflict = (flying && has_ground) || (!flying && has_flying);
                    if mixed || conflict {
                        max_x + conflict_gap
                    } else {
                        let lane = if flying { t.flying_spacing } else { t.ground_spacing };
                        prev.pos.x + safe_jump.max(player_width * lane)
                    }
                }
            };

            let id = *next_id;
            *next_id = next_id.wrapping_add(1);
            let mut enemy = create_enemy(id, archetype, x, ctx, rng);

            if enemy.is_flying() {
                let jitter = (rng.random::<f32>() * 2.0 - 1.0) * t.flying_jitter;
                let bottom = (enemy.pos.y + enemy.size.y + jitter).clamp(band_lo, band_hi);
                enemy.pos.y = bottom - enemy.size.y;
                if let Some(hover) = enemy.hover.as_mut() {
                    hover.preferred_y = enemy.pos.y + enemy.size.y * 0.5;
                }
            } else {
                // Staggered for the spawn frame; the ground clamp settles it
                enemy.pos.y -= (i % 2) as f32 * t.formation_offset;
            }

            if level > t.speed_boost_level {
                let boost = 1.0 + (level - t.speed_boost_level) as f32 * t.speed_boost_per_level;
                enemy.scale_speed(boost);
            }
            enemy.cap_speed(speed * t.max_speed_multiplier);

            has_flying |= flying;
            has_ground |= !flying;
            max_x = max_x.max(enemy.pos.x);
            wave.push(enemy);
        }
        wave
    }

    /// Back to a fresh timer
    pub fn reset(&mut self) {
        self.timer_ms = 0.0;
        self.interval_ms = self.tuning.initial_interval_ms;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::sim::difficulty::state_for_level;

    fn player() -> Aabb {
        Aabb::new(30.0, 320.0, 130.0, 130.0)
    }

    fn setup() -> (EngineConfig, EnemyTypeSelector, SpawnScheduler) {
        let config = EngineConfig::default();
        let selector = EnemyTypeSelector::new(config.selection.clone());
        let scheduler = SpawnScheduler::new(config.spawn.clone());
        (config, selector, scheduler)
    }

    fn ctx<'a>(
        config: &'a EngineConfig,
        selector: &'a EnemyTypeSelector,
        difficulty: DifficultyState,
        live: &'a [Enemy],
    ) -> SpawnContext<'a> {
        SpawnContext {
            config,
            selector,
            difficulty,
            player: player(),
            live,
        }
    }

    #[test]
    fn test_first_wave_after_initial_interval() {
        let (config, selector, mut scheduler) = setup();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut id = 0;
        let difficulty = state_for_level(&config.difficulty, 1);
        let c = ctx(&config, &selector, difficulty, &[]);

        assert!(scheduler.tick(999.0, &c, &mut id, &mut rng).is_empty());
        let wave = scheduler.tick(1.0, &c, &mut id, &mut rng);
        assert_eq!(wave.len(), 1);
        assert_eq!(wave[0].pos.x, config.world.width);
        assert_eq!(scheduler.timer_ms(), 0.0);
        assert_eq!(id, 1);
    }

    #[test]
    fn test_zero_dt_keeps_timer() {
        let (config, selector, mut scheduler) = setup();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut id = 0;
        let c = ctx(&config, &selector, state_for_level(&config.difficulty, 1), &[]);
        scheduler.tick(500.0, &c, &mut id, &mut rng);
        for _ in 0..10 {
            assert!(scheduler.tick(0.0, &c, &mut id, &mut rng).is_empty());
        }
        assert_eq!(scheduler.timer_ms(), 500.0);
    }

    #[test]
    fn test_refuses_when_edge_occupied() {
        let (config, selector, mut scheduler) = setup();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut id = 10;
        let difficulty = state_for_level(&config.difficulty, 1);

        let blocker = {
            let c = ctx(&config, &selector, difficulty, &[]);
            create_enemy(0, Archetype::Meepo, config.world.width - 10.0, &c, &mut rng)
        };
        let mut live = vec![blocker];

        let c = ctx(&config, &selector, difficulty, &live);
        assert!(scheduler.tick(2000.0, &c, &mut id, &mut rng).is_empty());
        // Timer kept so the wave retries next tick
        assert_eq!(scheduler.timer_ms(), 2000.0);

        // minDistance at level 1: 130 * 4 * 2.0 = 1040
        live[0].pos.x = config.world.width - 1041.0;
        let c = ctx(&config, &selector, difficulty, &live);
        assert_eq!(scheduler.tick(16.6, &c, &mut id, &mut rng).len(), 1);
    }

    #[test]
    fn test_level_multiplier_steps() {
        let (_, _, scheduler) = setup();
        assert_eq!(scheduler.level_multiplier(1), 2.0);
        assert_eq!(scheduler.level_multiplier(5), 2.0);
        assert_eq!(scheduler.level_multiplier(6), 1.5);
        assert_eq!(scheduler.level_multiplier(10), 1.5);
        assert_eq!(scheduler.level_multiplier(11), 1.2);
    }

    #[test]
    fn test_effective_interval_shrinks() {
        let (_, _, scheduler) = setup();
        assert_eq!(scheduler.effective_interval(8), 1000.0);
        assert!((scheduler.effective_interval(20) - 640.0).abs() < 1e-3);
        assert!((scheduler.effective_interval(100) - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_initial_timer() {
        let (config, selector, mut scheduler) = setup();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut id = 0;
        let c = ctx(&config, &selector, state_for_level(&config.difficulty, 1), &[]);
        scheduler.tick(1000.0, &c, &mut id, &mut rng);
        scheduler.tick(300.0, &c, &mut id, &mut rng);
        scheduler.reset();
        assert_eq!(scheduler.timer_ms(), 0.0);
        assert_eq!(scheduler.interval_ms(), 1000.0);
    }

    #[test]
    fn test_speed_boost_capped() {
        let (config, selector, scheduler) = setup();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut id = 0;
        let difficulty = state_for_level(&config.difficulty, 120);
        let c = ctx(&config, &selector, difficulty, &[]);
        for _ in 0..20 {
            for enemy in scheduler.place_wave(&c, &mut id, &mut rng) {
                assert!(-enemy.vel.x <= difficulty.speed * 2.5 + 1e-3);
            }
        }
    }

    #[test]
    fn test_homogeneous_ground_spacing() {
        let (mut config, _, scheduler) = setup();
        config.selection.rules = vec![crate::tuning::SelectionRule {
            up_to_level: None,
            pools: vec![crate::tuning::BandWeight {
                band: crate::sim::archetype::Band::Basic,
                weight: 1.0,
            }],
        }];
        config
            .selection
            .bands
            .insert(crate::sim::archetype::Band::Basic, vec![Archetype::Meepo]);
        let selector = EnemyTypeSelector::new(config.selection.clone());
        let mut rng = Pcg32::seed_from_u64(6);
        let mut id = 0;
        let mut difficulty = state_for_level(&config.difficulty, 3);
        difficulty.multi_spawn = 3;
        let c = ctx(&config, &selector, difficulty, &[]);

        let wave = scheduler.place_wave(&c, &mut id, &mut rng);
        assert_eq!(wave.len(), 3);
        let gap = (difficulty.speed * config.spawn.airtime_frames()).max(130.0 * 2.5);
        for pair in wave.windows(2) {
            assert!((pair[1].pos.x - pair[0].pos.x - gap).abs() < 1e-3);
        }
        // Formation offset on the second enemy
        assert_eq!(wave[1].pos.y, wave[0].pos.y - config.spawn.formation_offset);
    }

    proptest! {
        #[test]
        fn prop_interval_bounds(level in 1u32..300, seed in any::<u64>()) {
            let (config, _, scheduler) = setup();
            let mut rng = Pcg32::seed_from_u64(seed);
            let interval = scheduler.roll_interval(level, &mut rng);
            prop_assert!(interval >= config.spawn.min_interval_ms);
            prop_assert!(interval <= config.spawn.base_interval_ms + config.spawn.jitter_base);
        }

        #[test]
        fn prop_mixed_waves_keep_conflict_gap(
            level in 1u32..80,
            count in 2u32..8,
            seed in any::<u64>(),
        ) {
            let (config, selector, scheduler) = setup();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut id = 0;
            let mut difficulty = state_for_level(&config.difficulty, level);
            difficulty.multi_spawn = count;
            let c = ctx(&config, &selector, difficulty, &[]);

            let wave = scheduler.place_wave(&c, &mut id, &mut rng);
            let min_gap = 130.0 * config.spawn.conflict_push * scheduler.level_multiplier(level);
            for (i, a) in wave.iter().enumerate() {
                for b in &wave[i + 1..] {
                    prop_assert!(b.pos.x >= a.pos.x);
                    if a.is_flying() != b.is_flying() {
                        prop_assert!((b.pos.x - a.pos.x).abs() >= min_gap - 1e-3);
                    }
                }
            }
        }

        #[test]
        fn prop_flying_stays_in_band(seed in any::<u64>(), level in 1u32..60) {
            let (config, selector, scheduler) = setup();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut id = 0;
            let mut difficulty = state_for_level(&config.difficulty, level);
            difficulty.multi_spawn = 6;
            let c = ctx(&config, &selector, difficulty, &[]);
            let g = config.world.ground_y();
            for enemy in scheduler.place_wave(&c, &mut id, &mut rng) {
                if enemy.is_flying() {
                    let bottom = enemy.pos.y + enemy.size.y;
                    prop_assert!(bottom >= g * 0.6 - 1e-3 && bottom <= g * 0.7 + 1e-3);
                }
            }
        }
    }
}
