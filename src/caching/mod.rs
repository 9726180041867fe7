//! # Caching Module
//!
//! Value-keyed memoization of fitness evaluations. Two chromosomes with equal
//! genes share one cache entry, so duplicates produced by selection or by
//! unapplied crossover are scored once.
//!
//! The cache is owned by the evaluator and only touched between parallel
//! batches, so it needs no locking.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A trait for values that can be used as fitness cache keys.
///
/// Values that would receive the same fitness score must produce the same
/// key.
pub trait CacheKey {
    /// The type of the cache key.
    type Key: Eq + Hash + Clone + Debug + Send + Sync;

    /// Generates a cache key for this value.
    fn cache_key(&self) -> Self::Key;
}

/// How long cached fitness values live.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheType {
    /// Every candidate is scored independently, even when an equal chromosome
    /// was already scored.
    Disabled,
    /// Equal chromosomes within one generation are scored once.
    #[default]
    Generation,
    /// The cache persists for the whole run.
    Run,
}

/// A fitness cache with hit/miss counters.
#[derive(Debug, Clone)]
pub struct FitnessCache<K>
where
    K: Eq + Hash,
{
    entries: HashMap<K, f64>,
    hits: usize,
    misses: usize,
}

impl<K> FitnessCache<K>
where
    K: Eq + Hash,
{
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Gets a cached fitness value if available, counting the lookup.
    pub fn get(&mut self, key: &K) -> Option<f64> {
        match self.entries.get(key) {
            Some(score) => {
                self.hits += 1;
                Some(*score)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts a fitness value into the cache.
    pub fn insert(&mut self, key: K, score: f64) {
        self.entries.insert(key, score);
    }

    /// Clears the cache. The counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of cached fitness evaluations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl<K> Default for FitnessCache<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
