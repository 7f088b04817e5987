use crate::BitConfig;

use oxispawn::{Genome, GenomeKey};
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// A fixed-length string of bits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BitGenome {
    key: GenomeKey,
    bits: Vec<bool>,
    fitness: f32,
}

impl BitGenome {
    /// Creates a genome from explicit bits, with zero fitness.
    ///
    /// # Examples
    /// ```
    /// use oxispawn_bits::BitGenome;
    ///
    /// let genome = BitGenome::from_bits(3, vec![true, true, false]);
    /// assert_eq!(genome.ones(), 2);
    /// assert_eq!(genome.to_string(), "#3 [110]");
    /// ```
    pub fn from_bits(key: GenomeKey, bits: Vec<bool>) -> BitGenome {
        BitGenome {
            key,
            bits,
            fitness: 0.0,
        }
    }

    /// Returns the genome's key.
    pub fn key(&self) -> GenomeKey {
        self.key
    }

    /// Returns the genome's bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns whether the genome has no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the number of set bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Returns the fraction of positions in which two genomes
    /// differ. Positions present in only one genome count
    /// as differences.
    ///
    /// # Examples
    /// ```
    /// use oxispawn_bits::BitGenome;
    ///
    /// let a = BitGenome::from_bits(1, vec![true, false, true, true]);
    /// let b = BitGenome::from_bits(2, vec![true, true, true, false]);
    /// assert_eq!(a.distance(&b), 0.5);
    /// assert_eq!(a.distance(&a), 0.0);
    /// ```
    pub fn distance(&self, other: &BitGenome) -> f32 {
        let longest = self.len().max(other.len());
        if longest == 0 {
            return 0.0;
        }
        let common_differences = self
            .bits
            .iter()
            .zip(&other.bits)
            .filter(|(a, b)| a != b)
            .count();
        let unmatched = self.len().abs_diff(other.len());
        (common_differences + unmatched) as f32 / longest as f32
    }
}

impl Genome for BitGenome {
    type Config = BitConfig;

    fn create<R: Rng + ?Sized>(key: GenomeKey, config: &BitConfig, rng: &mut R) -> BitGenome {
        BitGenome::from_bits(
            key,
            (0..config.length.get())
                .map(|_| rng.gen::<f32>() < config.initial_one_chance)
                .collect(),
        )
    }

    /// Uniform crossover: each bit is inherited from
    /// either parent with equal probability. Trailing
    /// bits of the longer parent are kept as-is.
    fn crossover<R: Rng + ?Sized>(
        &self,
        other: &BitGenome,
        key: GenomeKey,
        _: &BitConfig,
        rng: &mut R,
    ) -> BitGenome {
        let (longer, shorter) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let bits = longer
            .bits
            .iter()
            .enumerate()
            .map(|(i, bit)| match shorter.bits.get(i) {
                Some(other_bit) if rng.gen::<bool>() => *other_bit,
                _ => *bit,
            })
            .collect();
        BitGenome::from_bits(key, bits)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, config: &BitConfig, rng: &mut R) {
        if rng.gen::<f32>() >= config.mutation_chance {
            return;
        }
        for bit in &mut self.bits {
            if rng.gen::<f32>() < config.flip_chance {
                *bit = !*bit;
            }
        }
    }

    fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }
}

impl fmt::Display for BitGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [", self.key)?;
        for bit in &self.bits {
            write!(f, "{}", if *bit { '1' } else { '0' })?;
        }
        write!(f, "]")
    }
}
