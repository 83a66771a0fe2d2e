//! Strategy-hint cache: remembers which fallback strategy last succeeded for
//! a (language, content-length bucket) pair.
//!
//! Length is a coarse proxy for similarity, so a hint never skips regex
//! extraction. It only lets a similar input skip the statistics estimate
//! after minimal structure won, which costs no extracted facts.

use moka::sync::Cache;
use serde::{Deserialize, Serialize};

use crate::scanner::language_detect::Language;

/// Fallback strategies, in default attempt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    RegexExtraction,
    ContentStatistics,
    MinimalStructure,
}

impl FallbackStrategy {
    pub const ORDER: [FallbackStrategy; 3] = [
        FallbackStrategy::RegexExtraction,
        FallbackStrategy::ContentStatistics,
        FallbackStrategy::MinimalStructure,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RegexExtraction => "regex_extraction",
            Self::ContentStatistics => "content_statistics",
            Self::MinimalStructure => "minimal_structure",
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            Self::RegexExtraction => 0.5,
            Self::ContentStatistics => 0.3,
            Self::MinimalStructure => 0.1,
        }
    }
}

type HintKey = (Language, u32);

/// Power-of-two size bucket: 0, 1, 2-3, 4-7, ...
fn size_bucket(len: usize) -> u32 {
    usize::BITS - len.leading_zeros()
}

/// Concurrent hint cache (moka, TinyLFU admission).
#[derive(Clone)]
pub struct StrategyHints {
    inner: Cache<HintKey, FallbackStrategy>,
}

impl StrategyHints {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, language: Language, content_len: usize) -> Option<FallbackStrategy> {
        self.inner.get(&(language, size_bucket(content_len)))
    }

    pub fn remember(&self, language: Language, content_len: usize, strategy: FallbackStrategy) {
        self.inner.insert((language, size_bucket(content_len)), strategy);
    }

    /// Attempt order. Regex extraction always runs first.
    pub fn order(&self, language: Language, content_len: usize) -> Vec<FallbackStrategy> {
        match self.get(language, content_len) {
            Some(FallbackStrategy::MinimalStructure) => {
                vec![FallbackStrategy::RegexExtraction, FallbackStrategy::MinimalStructure]
            }
            _ => FallbackStrategy::ORDER.to_vec(),
        }
    }
}

impl Default for StrategyHints {
    fn default() -> Self {
        Self::new(1_024)
    }
}

impl std::fmt::Debug for StrategyHints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyHints")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}
