//! Per-frame engine update
//!
//! Order within one tick:
//! 1. difficulty follows the caller's score
//! 2. the spawn scheduler may release a wave
//! 3. every enemy runs its behavior, then is checked for passing the player,
//!    leaving the screen and colliding
//! 4. broodmothers that triggered this tick drop a minion

use glam::Vec2;

use super::archetype::{Band, BehaviorKind};
use super::behavior::{self, BehaviorContext};
use super::collision::Aabb;
use super::spawn::{SpawnContext, create_enemy};
use super::state::{EngineState, GameEvent, GamePhase};

/// Collaborator inputs for a single tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Player bounds this frame
    pub player: Aabb,
    /// Cumulative score, owned by the caller
    pub score: u64,
}

/// Advance the engine by `dt` ms and return the events raised
pub fn tick(state: &mut EngineState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase == GamePhase::GameOver {
        return events;
    }

    let difficulty = state.controller.update(input.score, &mut events);
    let level = difficulty.level;
    if dt > 0.0 {
        state.stats.play_time_ms += f64::from(dt);
    }

    // Spawn
    let wave = {
        let ctx = SpawnContext {
            config: &state.config,
            selector: &state.selector,
            difficulty,
            player: input.player,
            live: &state.enemies,
        };
        state
            .scheduler
            .tick(dt, &ctx, &mut state.next_id, &mut state.rng)
    };
    state.stats.enemies_spawned += wave.len() as u32;
    state.enemies.extend(wave);

    // Enemies
    let ctx = BehaviorContext {
        player: input.player,
        ground_y: state.config.world.ground_y(),
        live_enemies: state.enemies.len(),
    };
    let margin = state.config.world.offscreen_margin;
    let mut brood_drops: Vec<Aabb> = Vec::new();
    let mut collided = false;

    state.enemies.retain_mut(|enemy| {
        if collided {
            return true;
        }

        let ability = behavior::update(enemy, dt, &ctx, &state.config.behavior, &mut state.rng);
        if let Some(kind) = ability {
            if kind == BehaviorKind::Spawner {
                brood_drops.push(enemy.bounds());
            }
            events.push(GameEvent::SpecialAbility {
                id: enemy.id,
                kind,
                position: enemy.bounds().center(),
            });
        }

        if !enemy.flags.passed && enemy.pos.x < input.player.pos.x {
            enemy.flags.passed = true;
            let points = state.combo.register_pass(level, difficulty.multi_spawn);
            state.stats.enemies_dodged += 1;
            events.push(GameEvent::EnemyPassed {
                id: enemy.id,
                archetype: enemy.archetype,
                points,
            });
        }

        if enemy.is_offscreen(margin) {
            return false;
        }

        let hit = state.judge.test(&input.player, &enemy.bounds(), level);
        if hit.hit {
            collided = true;
            state.stats.collisions += 1;
            events.push(GameEvent::EnemyCollided {
                id: enemy.id,
                archetype: enemy.archetype,
                contact: hit.point,
            });
            return false;
        }
        true
    });

    if collided {
        state.finish();
        return events;
    }

    // Minions
    let cap = state.config.behavior.spawn_live_cap;
    let mut minions = Vec::new();
    for brood in brood_drops {
        if state.enemies.len() + minions.len() >= cap {
            log::debug!("Minion skipped: {} enemies live", state.enemies.len() + minions.len());
            break;
        }
        let ctx = SpawnContext {
            config: &state.config,
            selector: &state.selector,
            difficulty,
            player: input.player,
            live: &state.enemies,
        };
        let config = &state.config;
        let archetype =
            state
                .selector
                .pick_ground(Band::Basic, |a| config.archetype(a).flying, &mut state.rng);
        let id = state.next_id;
        state.next_id = state.next_id.wrapping_add(1);
        let mut minion = create_enemy(id, archetype, brood.max().x, &ctx, &mut state.rng);
        minion.flags.is_minion = true;
        minions.push(minion);
    }
    state.stats.minions_spawned += minions.len() as u32;
    state.enemies.extend(minions);

    events
}

/// Player box standing on the ground at the default position
pub fn grounded_player(state: &EngineState) -> Aabb {
    let size = Vec2::splat(crate::consts::PLAYER_SIZE);
    let ground_y = state.config.world.ground_y();
    Aabb {
        pos: Vec2::new(crate::consts::PLAYER_X, ground_y - size.y),
        size,
    }
}
