//! Player/enemy hit detection
//!
//! Boxes are shrunk before the overlap test: generous padding plus a
//! tolerance margin at low levels, near pixel-exact hitboxes at high levels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::CollisionTuning;

/// Axis-aligned box, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Shrink every side by `inset` (per axis); may produce an empty box
    pub fn shrink(&self, inset: Vec2) -> Self {
        Self {
            pos: self.pos + inset,
            size: self.size - inset * 2.0,
        }
    }

    /// Strict overlap: touching edges do not count, empty boxes never overlap
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_max.x > b_min.x && a_min.x < b_max.x && a_max.y > b_min.y && a_min.y < b_max.y
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Midpoint between both box centers (for impact effects)
    pub point: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
        }
    }
}

/// Level-aware hitbox judge
#[derive(Debug, Clone)]
pub struct CollisionJudge {
    tuning: CollisionTuning,
}

impl CollisionJudge {
    pub fn new(tuning: CollisionTuning) -> Self {
        Self { tuning }
    }

    /// Extra forgiveness margin around the player
    pub fn tolerance(&self, level: u32) -> f32 {
        let t = &self.tuning;
        if level > t.exact_level {
            return t.exact_tolerance;
        }
        if level > t.tolerance_start_level {
            let decay = (level - t.tolerance_start_level) as f32 * t.tolerance_decay;
            return (t.base_tolerance - decay).max(t.min_tolerance);
        }
        t.base_tolerance
    }

    /// Fraction of the enemy padding that still applies
    pub fn enemy_pad_factor(&self, level: u32) -> f32 {
        if level > self.tuning.strict_level {
            self.tuning.strict_enemy_factor
        } else {
            1.0
        }
    }

    pub fn player_pad(&self, size: Vec2) -> Vec2 {
        let t = &self.tuning;
        (size * t.player_pad_ratio).max(Vec2::splat(t.player_pad_min))
    }

    pub fn enemy_pad(&self, size: Vec2) -> Vec2 {
        let t = &self.tuning;
        (size * t.enemy_pad_ratio).max(Vec2::splat(t.enemy_pad_min))
    }

    /// Player hitbox after padding and tolerance
    pub fn player_hitbox(&self, player: &Aabb, level: u32) -> Aabb {
        player.shrink(self.player_pad(player.size) + Vec2::splat(self.tolerance(level)))
    }

    /// Enemy hitbox after (possibly halved) padding
    pub fn enemy_hitbox(&self, enemy: &Aabb, level: u32) -> Aabb {
        enemy.shrink(self.enemy_pad(enemy.size) * self.enemy_pad_factor(level))
    }

    /// Test player against enemy at the given level
    pub fn test(&self, player: &Aabb, enemy: &Aabb, level: u32) -> CollisionResult {
        let player_box = self.player_hitbox(player, level);
        let enemy_box = self.enemy_hitbox(enemy, level);

        if !player_box.intersects(&enemy_box) {
            return CollisionResult::miss();
        }

        CollisionResult {
            hit: true,
            point: (player.center() + enemy.center()) * 0.5,
        }
    }
}

impl Default for CollisionJudge {
    fn default() -> Self {
        Self::new(CollisionTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn judge() -> CollisionJudge {
        CollisionJudge::default()
    }

    #[test]
    fn test_tolerance_schedule() {
        let j = judge();
        assert_eq!(j.tolerance(1), 8.0);
        assert_eq!(j.tolerance(10), 8.0);
        assert_eq!(j.tolerance(12), 7.0);
        assert_eq!(j.tolerance(20), 3.0);
        assert_eq!(j.tolerance(21), 1.0);
        assert_eq!(j.tolerance(25), 1.0);
    }

    #[test]
    fn test_enemy_pad_halved_past_strict_level() {
        let j = judge();
        assert_eq!(j.enemy_pad_factor(15), 1.0);
        assert_eq!(j.enemy_pad_factor(16), 0.5);
        assert_eq!(j.enemy_pad_factor(25), 0.5);
    }

    #[test]
    fn test_pads_respect_minimums() {
        let j = judge();
        assert_eq!(j.player_pad(Vec2::splat(130.0)), Vec2::splat(18.0));
        assert_eq!(j.player_pad(Vec2::splat(200.0)), Vec2::splat(24.0));
        assert_eq!(j.enemy_pad(Vec2::splat(40.0)), Vec2::splat(8.0));
        assert!((j.enemy_pad(Vec2::splat(90.0)).x - 13.5).abs() < 1e-4);
    }

    #[test]
    fn test_near_miss_forgiven_at_low_level() {
        let j = judge();
        let player = Aabb::new(30.0, 320.0, 130.0, 130.0);
        // Enemy box grazes the player's right edge by 20px
        let enemy = Aabb::new(140.0, 360.0, 90.0, 90.0);
        assert!(player.intersects(&enemy));
        assert!(!j.test(&player, &enemy, 1).hit);
    }

    #[test]
    fn test_same_graze_is_fatal_at_high_level() {
        let j = judge();
        let player = Aabb::new(30.0, 320.0, 130.0, 130.0);
        // Player right hitbox edge at level 25: 160 - 18 - 1 = 141
        // Enemy left hitbox edge: 130 + 6.75 = 136.75
        let enemy = Aabb::new(130.0, 360.0, 90.0, 90.0);
        assert!(!j.test(&player, &enemy, 1).hit);
        assert!(j.test(&player, &enemy, 25).hit);
    }

    #[test]
    fn test_contact_point_between_centers() {
        let j = judge();
        let player = Aabb::new(0.0, 0.0, 130.0, 130.0);
        let enemy = Aabb::new(40.0, 40.0, 90.0, 90.0);
        let result = j.test(&player, &enemy, 5);
        assert!(result.hit);
        assert_eq!(result.point, Vec2::new(75.0, 75.0));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    proptest! {
        #[test]
        fn prop_identical_boxes_always_hit(
            level in 1u32..200,
            x in -500.0f32..1500.0,
            y in 0.0f32..400.0,
            size in 90.0f32..200.0,
        ) {
            let b = Aabb::new(x, y, size, size);
            prop_assert!(judge().test(&b, &b, level).hit);
        }

        #[test]
        fn prop_separated_boxes_never_hit(
            level in 1u32..200,
            gap in 0.0f32..500.0,
            w in 20.0f32..200.0,
            h in 20.0f32..200.0,
            vertical in any::<bool>(),
        ) {
            let j = judge();
            let player = Aabb::new(100.0, 100.0, 130.0, 130.0);
            // Any separation beyond zero is already more than tolerance + pad away
            let enemy = if vertical {
                Aabb::new(100.0, player.max().y + gap, w, h)
            } else {
                Aabb::new(player.max().x + gap, 100.0, w, h)
            };
            prop_assert!(!j.test(&player, &enemy, level).hit);
        }
    }
}
