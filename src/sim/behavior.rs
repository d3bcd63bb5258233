//! Per-archetype behavior strategies
//!
//! `configure` applies spawn-time stats (difficulty band multipliers, armor,
//! mana, hover height). `update` advances one tick and reports at most one
//! triggered special ability. All timers advance by the caller's `dt`, so a
//! fixed `dt` sequence and seeded RNG replay exactly.

use std::f32::consts::TAU;

use rand::Rng;

use super::archetype::{ArchetypeConfig, BehaviorKind};
use super::collision::Aabb;
use super::enemy::{BehaviorState, Enemy, Hover, Metamorphosis};
use crate::frames;
use crate::tuning::BehaviorTuning;

/// What an enemy can see of the world during its update
#[derive(Debug, Clone, Copy)]
pub struct BehaviorContext {
    pub player: Aabb,
    pub ground_y: f32,
    /// Live enemies including this one
    pub live_enemies: usize,
}

#[inline]
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

/// Apply spawn-time setup for `level`
pub fn configure<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    config: &ArchetypeConfig,
    level: u32,
    ground_y: f32,
    tuning: &BehaviorTuning,
    rng: &mut R,
) {
    let t = tuning;

    // Difficulty bands stack
    enemy.flags.is_advanced = level > t.advanced_level;
    enemy.flags.is_nightmare = level > t.nightmare_level;
    enemy.flags.is_hell = level > t.hell_level;

    let mut speed = 1.0;
    let mut size = 1.0;
    if enemy.flags.is_advanced {
        speed *= t.advanced_speed;
    }
    if enemy.flags.is_nightmare {
        speed *= t.nightmare_speed;
        if config.grows {
            size *= t.nightmare_size;
        }
    }
    if enemy.flags.is_hell {
        speed *= t.hell_speed;
        if config.grows {
            size *= t.hell_size;
        }
    }
    enemy.scale_speed(speed);
    enemy.size *= size;

    match enemy.behavior {
        BehaviorKind::Defensive => {
            enemy.state = BehaviorState::Defensive {
                armor: t.defensive_armor,
            };
            enemy.scale_speed(t.defensive_speed);
        }
        BehaviorKind::Magical => {
            enemy.state = BehaviorState::Magical {
                mana: t.magical_mana,
            };
        }
        _ => {}
    }

    if enemy.is_flying() {
        let lo = ground_y * t.flying_band_min;
        let hi = ground_y * t.flying_band_max;
        let flying_height = uniform(rng, lo, hi);
        enemy.pos.y = flying_height - enemy.size.y;
        enemy.hover = Some(Hover {
            preferred_y: enemy.pos.y + enemy.size.y * 0.5,
            wobble_phase: rng.random::<f32>() * TAU,
        });
    } else {
        enemy.clamp_to_ground(ground_y);
    }
}

/// Advance one enemy by `dt` ms; returns the ability it triggered, if any
pub fn update<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    dt: f32,
    ctx: &BehaviorContext,
    tuning: &BehaviorTuning,
    rng: &mut R,
) -> Option<BehaviorKind> {
    if dt <= 0.0 {
        return None;
    }

    let t = tuning;
    let f = frames(dt);
    enemy.age_ms += dt;
    let player_dx = (enemy.pos.x - ctx.player.pos.x).abs();

    let ability = match &mut enemy.state {
        BehaviorState::Ground | BehaviorState::Flying | BehaviorState::Defensive { .. } => None,

        BehaviorState::Erratic { timer_ms } => {
            *timer_ms += dt;
            if *timer_ms >= t.erratic_interval_ms {
                *timer_ms = 0.0;
                enemy.vel.x = -enemy.base_speed * uniform(rng, t.erratic_min, t.erratic_max);
            }
            None
        }

        BehaviorState::Charging { is_charging } => {
            if !*is_charging && player_dx < t.charge_range {
                *is_charging = true;
                enemy.vel.x *= t.charge_speed;
            }
            None
        }

        BehaviorState::Heavy => {
            enemy.vel.x *= t.heavy_resistance.powf(f);
            let floor = enemy.base_speed * t.heavy_min_speed_ratio;
            if -enemy.vel.x < floor {
                enemy.vel.x = -floor;
            }
            None
        }

        BehaviorState::Aggressive { boosted } => {
            if !*boosted && player_dx < t.aggressive_range {
                *boosted = true;
                enemy.vel.x *= uniform(rng, t.aggressive_boost_min, t.aggressive_boost_max);
            }
            None
        }

        BehaviorState::Magical { mana } => {
            if *mana > 0 && rng.random::<f32>() < t.magical_chance {
                *mana -= 1;
                Some(BehaviorKind::Magical)
            } else {
                None
            }
        }

        BehaviorState::Spawner { timer_ms } => {
            *timer_ms += dt;
            if *timer_ms >= t.spawn_cooldown_ms && ctx.live_enemies < t.spawn_live_cap {
                *timer_ms = 0.0;
                Some(BehaviorKind::Spawner)
            } else {
                None
            }
        }

        BehaviorState::Demon { timer_ms, buff } => match *buff {
            Some(active) => {
                if enemy.age_ms >= active.ends_at_ms {
                    enemy.size = active.base_size;
                    enemy.vel.x = active.base_vel_x;
                    *buff = None;
                }
                None
            }
            None => {
                *timer_ms += dt;
                if *timer_ms >= t.demon_interval_ms {
                    *timer_ms = 0.0;
                    *buff = Some(Metamorphosis {
                        ends_at_ms: enemy.age_ms + t.demon_duration_ms,
                        base_size: enemy.size,
                        base_vel_x: enemy.vel.x,
                    });
                    enemy.size *= t.demon_size;
                    enemy.vel.x *= t.demon_speed;
                    Some(BehaviorKind::Demon)
                } else {
                    None
                }
            }
        },
    };

    enemy.pos.x += enemy.vel.x * f;

    if let Some(hover) = enemy.hover.as_mut() {
        let center = enemy.pos.y + enemy.size.y * 0.5;
        let delta = hover.preferred_y - center;
        enemy.vel.y = if delta.abs() > t.flying_settle {
            t.flying_speed.min(delta.abs() / f) * delta.signum()
        } else {
            0.0
        };
        enemy.pos.y += enemy.vel.y * f;

        hover.wobble_phase = (hover.wobble_phase + t.wobble_frequency * dt) % TAU;
        enemy.pos.x += hover.wobble_phase.sin() * t.wobble_amplitude * f;
    }

    if !enemy.is_flying() {
        enemy.clamp_to_ground(ctx.ground_y);
    }

    if let Some(kind) = ability {
        log::debug!(
            "Enemy {} ({}) triggered {}",
            enemy.id,
            enemy.archetype.as_str(),
            kind.as_str()
        );
    }
    ability
}
