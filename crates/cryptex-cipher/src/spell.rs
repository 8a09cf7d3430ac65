//! Pronounceability Heuristic
//!
//! A word reads fluently when vowels interrupt its consonant chains:
//! `crptgrph` is hard to say, `cryptography` is not. The checker counts
//! every symbol that extends a run of non-vowels past a tolerance.

use serde::{Deserialize, Serialize};

/// Consonant-run spell checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellChecker {
    /// Symbols that end a consonant run
    pub vowels: String,
    /// Punctuation and whitespace that also end a run
    pub excludes: String,
    /// Longest run that is not counted
    pub consonant_tolerance: usize,
}

impl Default for SpellChecker {
    fn default() -> Self {
        Self {
            vowels: "aeiouy".into(),
            excludes: " .;,:-+*/?!%&$_\n\t\r".into(),
            consonant_tolerance: 3,
        }
    }
}

impl SpellChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vowels(mut self, vowels: impl Into<String>) -> Self {
        self.vowels = vowels.into();
        self
    }

    pub fn with_excludes(mut self, excludes: impl Into<String>) -> Self {
        self.excludes = excludes.into();
        self
    }

    pub fn with_consonant_tolerance(mut self, tolerance: usize) -> Self {
        self.consonant_tolerance = tolerance;
        self
    }

    /// Number of symbols that sit beyond the tolerance inside a consonant
    /// run. A run of length `t + k` contributes `k`, not 1.
    pub fn possible_mistakes(&self, text: &str) -> usize {
        let mut mistakes = 0;
        let mut consecutive = 0;

        for c in text.to_lowercase().chars() {
            if self.vowels.contains(c) || self.excludes.contains(c) {
                consecutive = 0;
            } else {
                consecutive += 1;
            }

            if consecutive > self.consonant_tolerance {
                mistakes += 1;
            }
        }

        mistakes
    }
}
