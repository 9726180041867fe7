//! # Allele Alphabets
//!
//! An [`Alphabet`] declares the legal values of a gene and how to sample one
//! uniformly. It is a tagged variant rather than a trait object so that the
//! operators can branch on the alphabet kind where semantics differ (a
//! permutation alphabet needs order-preserving crossover and swap mutation).
//!
//! ```rust
//! use chromoga::genome::Alphabet;
//! use chromoga::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! let bits = Alphabet::<u8>::binary();
//! assert_eq!(bits.size(), Some(2));
//! assert!(bits.contains(&bits.sample(&mut rng)));
//!
//! let weights = Alphabet::range(-1.0_f64, 1.0).unwrap();
//! assert_eq!(weights.size(), None);
//! ```

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use rand::distributions::uniform::SampleUniform;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Attempts made to draw a value different from the current one out of a
/// range alphabet before giving up.
const MAX_EXCLUSION_ATTEMPTS: usize = 64;

/// Element type of an alphabet.
///
/// Implemented for every primitive integer and float type. `key` gives the
/// value a hashable identity (floats use their bit pattern), which the
/// fitness cache and permutation bookkeeping rely on.
pub trait Allele:
    Clone + Debug + PartialEq + PartialOrd + SampleUniform + Send + Sync + 'static
{
    type Key: Eq + Hash + Clone + Debug + Send + Sync;

    fn key(&self) -> Self::Key;

    /// Number of values in the inclusive range `low..=high`, or `None` when
    /// the range is continuous (or too large to count).
    fn range_size(low: &Self, high: &Self) -> Option<usize>;

    fn to_f64(&self) -> f64;

    /// Converts back from `f64`, rounding and saturating for integer types.
    fn from_f64(value: f64) -> Self;

    fn is_finite(&self) -> bool {
        true
    }
}

macro_rules! integer_allele {
    ($($t:ty),*) => {$(
        impl Allele for $t {
            type Key = $t;

            fn key(&self) -> Self::Key {
                *self
            }

            fn range_size(low: &Self, high: &Self) -> Option<usize> {
                usize::try_from((*high as i128) - (*low as i128) + 1).ok()
            }

            fn to_f64(&self) -> f64 {
                *self as f64
            }

            fn from_f64(value: f64) -> Self {
                value.round() as $t
            }
        }
    )*};
}

integer_allele!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Allele for f64 {
    type Key = u64;

    fn key(&self) -> Self::Key {
        self.to_bits()
    }

    fn range_size(_low: &Self, _high: &Self) -> Option<usize> {
        None
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Allele for f32 {
    type Key = u32;

    fn key(&self) -> Self::Key {
        self.to_bits()
    }

    fn range_size(_low: &Self, _high: &Self) -> Option<usize> {
        None
    }

    fn to_f64(&self) -> f64 {
        *self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }
}

/// The set of legal values for a gene.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Alphabet<T> {
    /// A finite set of distinct values.
    Discrete(Vec<T>),
    /// An inclusive numeric range. Integer ranges are finite, float ranges
    /// are continuous.
    Range { low: T, high: T },
    /// Values that must appear at most once per chromosome.
    Permutation(Vec<T>),
}

impl<T: Allele> Alphabet<T> {
    /// Creates a discrete alphabet. The values must be non-empty and distinct.
    pub fn discrete(values: Vec<T>) -> Result<Self> {
        let alphabet = Alphabet::Discrete(values);
        alphabet.validate()?;
        Ok(alphabet)
    }

    /// Creates an inclusive range alphabet. Bounds must be finite and ordered.
    pub fn range(low: T, high: T) -> Result<Self> {
        let alphabet = Alphabet::Range { low, high };
        alphabet.validate()?;
        Ok(alphabet)
    }

    /// Creates a permutation alphabet. The values must be non-empty and
    /// distinct.
    pub fn permutation(values: Vec<T>) -> Result<Self> {
        let alphabet = Alphabet::Permutation(values);
        alphabet.validate()?;
        Ok(alphabet)
    }

    /// Checks the invariants a directly constructed variant might violate.
    pub fn validate(&self) -> Result<()> {
        match self {
            Alphabet::Discrete(values) | Alphabet::Permutation(values) => {
                if values.is_empty() {
                    return Err(GeneticError::Configuration(
                        "Alphabet must contain at least one value".to_string(),
                    ));
                }
                if let Some(value) = values.iter().find(|v| !v.is_finite()) {
                    return Err(GeneticError::Configuration(format!(
                        "Alphabet value {:?} is not finite",
                        value
                    )));
                }
                let mut seen = HashSet::with_capacity(values.len());
                if let Some(duplicate) = values.iter().find(|v| !seen.insert(v.key())) {
                    return Err(GeneticError::Configuration(format!(
                        "Alphabet contains duplicate value {:?}",
                        duplicate
                    )));
                }
                Ok(())
            }
            Alphabet::Range { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(GeneticError::Configuration(format!(
                        "Range bounds must be finite, got {:?}..={:?}",
                        low, high
                    )));
                }
                if low > high {
                    return Err(GeneticError::Configuration(format!(
                        "Range lower bound {:?} exceeds upper bound {:?}",
                        low, high
                    )));
                }
                Ok(())
            }
        }
    }

    /// Number of legal values, `None` for continuous ranges.
    pub fn size(&self) -> Option<usize> {
        match self {
            Alphabet::Discrete(values) | Alphabet::Permutation(values) => Some(values.len()),
            Alphabet::Range { low, high } => T::range_size(low, high),
        }
    }

    pub fn is_permutation(&self) -> bool {
        matches!(self, Alphabet::Permutation(_))
    }

    /// Returns the bounds of a range alphabet.
    pub fn bounds(&self) -> Option<(&T, &T)> {
        match self {
            Alphabet::Range { low, high } => Some((low, high)),
            _ => None,
        }
    }

    /// Returns the enumerated values of a discrete or permutation alphabet.
    pub fn values(&self) -> Option<&[T]> {
        match self {
            Alphabet::Discrete(values) | Alphabet::Permutation(values) => Some(values),
            Alphabet::Range { .. } => None,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        match self {
            Alphabet::Discrete(values) | Alphabet::Permutation(values) => {
                values.iter().any(|v| v == value)
            }
            Alphabet::Range { low, high } => value.is_finite() && low <= value && value <= high,
        }
    }

    /// Draws a uniformly random legal value.
    pub fn sample(&self, rng: &mut RandomNumberGenerator) -> T {
        match self {
            Alphabet::Discrete(values) | Alphabet::Permutation(values) => {
                values[rng.gen_index(values.len())].clone()
            }
            Alphabet::Range { low, high } => rng.gen_range(low.clone()..=high.clone()),
        }
    }

    /// Draws a uniformly random legal value different from `current`.
    ///
    /// Returns `None` when no other value exists (a single-valued alphabet).
    pub fn sample_excluding(&self, current: &T, rng: &mut RandomNumberGenerator) -> Option<T> {
        match self {
            Alphabet::Discrete(values) | Alphabet::Permutation(values) => {
                let position = values.iter().position(|v| v == current);
                match position {
                    None => Some(self.sample(rng)),
                    Some(_) if values.len() < 2 => None,
                    Some(position) => {
                        let mut index = rng.gen_index(values.len() - 1);
                        if index >= position {
                            index += 1;
                        }
                        Some(values[index].clone())
                    }
                }
            }
            Alphabet::Range { .. } => {
                if self.size() == Some(1) {
                    return None;
                }
                (0..MAX_EXCLUSION_ATTEMPTS)
                    .map(|_| self.sample(rng))
                    .find(|candidate| candidate != current)
            }
        }
    }

    /// Draws `length` distinct values in random order.
    pub(crate) fn sample_distinct(
        &self,
        length: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Option<Vec<T>> {
        let values = self.values()?;
        if length > values.len() {
            return None;
        }
        let mut shuffled = values.to_vec();
        shuffled.shuffle(rng);
        shuffled.truncate(length);
        Some(shuffled)
    }
}

impl Alphabet<u8> {
    /// The biallelic alphabet `{0, 1}`.
    pub fn binary() -> Self {
        Alphabet::Discrete(vec![0, 1])
    }
}

impl Alphabet<usize> {
    /// A permutation alphabet over `0..n`.
    pub fn indices(n: usize) -> Result<Self> {
        Alphabet::permutation((0..n).collect())
    }
}
