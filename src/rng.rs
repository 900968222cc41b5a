//! Color sources for new tiles.
//!
//! Board construction and refill draw colors through the [`ColorSource`]
//! trait so a game can run on a seeded generator while tests supply an
//! exact sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::grid::Color;

/// Supplies the color of each newly created tile.
pub trait ColorSource {
    /// Returns a color among the first `count` palette entries.
    fn next_color(&mut self, count: usize) -> Color;
}

/// Uniformly random colors backed by a `SmallRng`.
#[derive(Clone, Debug)]
pub struct RandomColors {
    rng: SmallRng,
}

impl RandomColors {
    /// A reproducible source: the same seed always yields the same colors.
    pub fn seeded(seed: u64) -> Self {
        RandomColors {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        RandomColors {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self, count: usize) -> Color {
        Color::from_index(self.rng.gen_range(0..count))
    }
}

/// Replays a fixed list of colors, wrapping around at the end.
///
/// Colors beyond the requested `count` are folded back into range so a
/// script written for a larger palette still honors the configured count.
#[derive(Clone, Debug)]
pub struct ScriptedColors {
    sequence: Vec<Color>,
    cursor: usize,
}

impl ScriptedColors {
    /// # Panics
    /// Panics if `sequence` is empty.
    pub fn new(sequence: Vec<Color>) -> Self {
        assert!(!sequence.is_empty(), "scripted color sequence must not be empty");
        ScriptedColors { sequence, cursor: 0 }
    }

    /// Builds a script from color letters such as `"RGBR"`.
    pub fn from_chars(letters: &str) -> Result<Self, String> {
        let sequence = letters
            .chars()
            .map(|c| Color::from_char(c).ok_or_else(|| format!("Unrecognized color '{}'", c)))
            .collect::<Result<Vec<_>, _>>()?;
        if sequence.is_empty() {
            return Err("Color script must not be empty".to_string());
        }
        Ok(ScriptedColors::new(sequence))
    }
}

impl ColorSource for ScriptedColors {
    fn next_color(&mut self, count: usize) -> Color {
        let color = self.sequence[self.cursor % self.sequence.len()];
        self.cursor += 1;
        Color::from_index(color.index() % count)
    }
}
