//! Runner Sim - difficulty and enemy behavior engine for an endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, selection, behaviors, spawning, collisions)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{ConfigError, EngineConfig, Profile};

/// Game configuration constants
pub mod consts {
    /// Reference frame length in ms; per-frame speeds are authored at ~60 Hz
    pub const FRAME_MS: f32 = 16.6;
    /// Default player box used by the headless runner
    pub const PLAYER_SIZE: f32 = 130.0;
    pub const PLAYER_X: f32 = 30.0;
}

/// Convert a millisecond delta into reference frames
#[inline]
pub fn frames(dt_ms: f32) -> f32 {
    dt_ms / consts::FRAME_MS
}
