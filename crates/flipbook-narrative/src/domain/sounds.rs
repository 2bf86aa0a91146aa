//! Sound selection.
//!
//! Which clip accompanies a page arrival is data: a page-turn clip with a
//! play chance, and a set of ambient character clips with their own chance.
//! All randomness flows through [`DeterministicRng`].

use flipbook_core::effect::SoundCategory;
use flipbook_core::id::ClipId;
use flipbook_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

use super::manifest::ManifestError;

fn always() -> f64 {
    1.0
}

/// Clips played on ordinary page arrivals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoundBoard {
    /// Paper rustle.
    pub page_turn: ClipId,
    /// Probability the page-turn clip plays on arrival.
    #[serde(default = "always")]
    pub page_turn_chance: f64,
    /// Ambient character variants.
    #[serde(default)]
    pub ambient: Vec<ClipId>,
    /// Probability an ambient clip plays when the page-turn roll misses.
    #[serde(default)]
    pub ambient_chance: f64,
}

impl SoundBoard {
    /// A board that always plays `page_turn` and has no ambient clips.
    #[must_use]
    pub fn page_turn_only(page_turn: ClipId) -> Self {
        Self {
            page_turn,
            page_turn_chance: 1.0,
            ambient: Vec::new(),
            ambient_chance: 0.0,
        }
    }

    /// Picks at most one clip for an ordinary arrival.
    ///
    /// The page-turn clip is rolled first; only when it misses is an ambient
    /// clip rolled, and then picked uniformly among the variants.
    pub fn arrival_cue(&self, rng: &mut dyn DeterministicRng) -> Option<(ClipId, SoundCategory)> {
        if chance(rng, self.page_turn_chance) {
            return Some((self.page_turn.clone(), SoundCategory::PageTurn));
        }
        if self.ambient.is_empty() || !chance(rng, self.ambient_chance) {
            return None;
        }
        pick_uniform(rng, &self.ambient).map(|clip| (clip.clone(), SoundCategory::Ambient))
    }

    /// Checks that the chances are probabilities.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::InvalidChance` for a value outside `[0, 1]`
    /// and `ManifestError::NoAmbientClips` for a positive ambient chance with
    /// no variants.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (field, value) in [
            ("page_turn_chance", self.page_turn_chance),
            ("ambient_chance", self.ambient_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ManifestError::InvalidChance { field, value });
            }
        }
        if self.ambient_chance > 0.0 && self.ambient.is_empty() {
            return Err(ManifestError::NoAmbientClips);
        }
        Ok(())
    }
}

/// Draws once from `rng` and returns the option whose cumulative weight
/// first exceeds the draw. Weights need not sum to one; the remaining mass
/// up to 1.0 selects nothing.
pub fn weighted_choice<'a, T>(
    rng: &mut dyn DeterministicRng,
    options: &'a [(T, f64)],
) -> Option<&'a T> {
    let draw = rng.next_f64();
    let mut cumulative = 0.0;
    for (option, weight) in options {
        cumulative += weight.max(0.0);
        if draw < cumulative {
            return Some(option);
        }
    }
    None
}

/// True with the given probability.
pub fn chance(rng: &mut dyn DeterministicRng, probability: f64) -> bool {
    weighted_choice(rng, &[((), probability)]).is_some()
}

/// Picks one item with equal probability.
pub fn pick_uniform<'a, T>(rng: &mut dyn DeterministicRng, items: &'a [T]) -> Option<&'a T> {
    let last = u32::try_from(items.len().checked_sub(1)?).unwrap_or(u32::MAX);
    let index = rng.next_u32_range(0, last) as usize;
    items.get(index)
}
