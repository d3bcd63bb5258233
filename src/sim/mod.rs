//! Deterministic simulation module
//!
//! All engine logic lives here. It must stay pure and deterministic:
//! - Time only advances by the caller's `dt` (ms)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod archetype;
pub mod behavior;
pub mod collision;
pub mod difficulty;
pub mod enemy;
pub mod scoring;
pub mod selector;
pub mod spawn;
pub mod state;
pub mod tick;

pub use archetype::{Archetype, ArchetypeConfig, Band, BehaviorKind};
pub use behavior::BehaviorContext;
pub use collision::{Aabb, CollisionJudge, CollisionResult};
pub use difficulty::{DifficultyController, DifficultyState, state_for_level};
pub use enemy::{BehaviorState, Enemy, EnemyFlags};
pub use scoring::ComboTracker;
pub use selector::{EnemyTypeSelector, weighted_pick};
pub use spawn::{SpawnContext, SpawnScheduler};
pub use state::{EngineState, GameEvent, GamePhase, RunStats};
pub use tick::{TickInput, grounded_player, tick};
