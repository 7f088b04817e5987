use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for bit-string genome
/// generation and mutation.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitConfig {
    /// Number of bits in a genome.
    pub length: NonZeroUsize,
    /// Chance that a bit is set in a founder genome.
    pub initial_one_chance: f32,
    /// Chance that a child is mutated at all.
    pub mutation_chance: f32,
    /// Chance of each bit being flipped during mutation.
    pub flip_chance: f32,
}

impl Default for BitConfig {
    /// 32 bits, half of them set initially,
    /// with every child mutated at a 2% flip rate.
    ///
    /// # Examples
    /// ```
    /// use oxispawn_bits::BitConfig;
    ///
    /// let config = BitConfig {
    ///     // Specify some values here...
    ///     flip_chance: 0.1,
    ///     // Default the rest...
    ///     ..BitConfig::default()
    /// };
    /// assert_eq!(config.length.get(), 32);
    /// ```
    fn default() -> BitConfig {
        BitConfig {
            // SAFETY: 32 is a valid NonZeroUsize.
            length: unsafe { NonZeroUsize::new_unchecked(32) },
            initial_one_chance: 0.5,
            mutation_chance: 1.0,
            flip_chance: 0.02,
        }
    }
}
