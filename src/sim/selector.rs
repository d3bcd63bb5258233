//! Level-dependent archetype selection
//!
//! Adjacent bands overlap as the level rises. Candidates keep declaration
//! order (rule order, then roster order) so equal weights resolve by
//! configuration, not by chance.

use rand::Rng;

use super::archetype::{Archetype, Band};
use crate::tuning::SelectionTuning;

/// Weighted pick over `(item, weight)` pairs
///
/// Draws `r` in `[0, total)` and walks the list subtracting weights. The last
/// item is returned if floating-point error leaves `r` past the end. Returns
/// `None` only for an empty list.
pub fn weighted_pick<T: Copy, R: Rng + ?Sized>(items: &[(T, f32)], rng: &mut R) -> Option<T> {
    let (last, _) = *items.last()?;
    let total: f32 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return Some(last);
    }

    let mut r = rng.random::<f32>() * total;
    for &(item, weight) in items {
        let weight = weight.max(0.0);
        if r < weight {
            return Some(item);
        }
        r -= weight;
    }
    Some(last)
}

/// Picks archetypes for spawn waves
#[derive(Debug, Clone)]
pub struct EnemyTypeSelector {
    tuning: SelectionTuning,
}

impl EnemyTypeSelector {
    pub fn new(tuning: SelectionTuning) -> Self {
        Self { tuning }
    }

    /// Weighted candidate list for a level
    pub fn candidates(&self, level: u32) -> Vec<(Archetype, f32)> {
        let Some(rule) = self.tuning.rule_for(level) else {
            return Vec::new();
        };
        rule.pools
            .iter()
            .flat_map(|pool| {
                self.tuning
                    .members(pool.band)
                    .iter()
                    .map(move |&a| (a, pool.weight))
            })
            .collect()
    }

    /// Pick one archetype for `level`
    pub fn pick<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> Archetype {
        let candidates = self.candidates(level);
        weighted_pick(&candidates, rng).unwrap_or_else(|| {
            log::debug!("Empty candidate pool at level {}, using fallback", level);
            Self::fallback()
        })
    }

    /// Pick among non-flying members of a band (used for minions)
    pub fn pick_ground<R: Rng + ?Sized>(
        &self,
        band: Band,
        is_flying: impl Fn(Archetype) -> bool,
        rng: &mut R,
    ) -> Archetype {
        let ground: Vec<_> = self
            .tuning
            .members(band)
            .iter()
            .filter(|&&a| !is_flying(a))
            .map(|&a| (a, 1.0))
            .collect();
        weighted_pick(&ground, rng).unwrap_or_else(Self::fallback)
    }

    /// Last archetype of the built-in Basic roster
    pub fn fallback() -> Archetype {
        Band::Basic
            .default_members()
            .last()
            .copied()
            .unwrap_or(Archetype::Meepo)
    }
}
