//! Scripted randomness for sound-roll tests.

use std::collections::VecDeque;

use flipbook_core::rng::DeterministicRng;

/// Randomness that always lands low: every page-turn and ambient chance
/// roll hits and every variant pick takes the first clip in the list.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// Plays back chance rolls and clip picks in the order a test lists them.
///
/// Drawing more than was scripted panics, as does a pick outside the range
/// the caller asked for.
#[derive(Debug, Default)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    picks: VecDeque<u32>,
}

impl ScriptedRng {
    /// Scripts the chance rolls, each in `[0, 1)`.
    #[must_use]
    pub fn rolls(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            picks: VecDeque::new(),
        }
    }

    /// Scripts the clip picks that follow the rolls.
    #[must_use]
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = u32>) -> Self {
        self.picks.extend(picks);
        self
    }
}

impl DeterministicRng for ScriptedRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let pick = self.picks.pop_front().expect("no clip pick left in the script");
        assert!((min..=max).contains(&pick), "pick {pick} outside {min}..={max}");
        pick
    }

    fn next_f64(&mut self) -> f64 {
        self.rolls.pop_front().expect("no chance roll left in the script")
    }
}
