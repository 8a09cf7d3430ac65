//! Brute-Force Cracking and Candidate Ranking
//!
//! Any cipher whose key space can be enumerated implements [`Crackable`].
//! The decryptions it produces are wrapped in [`Candidate`]s and pushed
//! through a [`RankingPipeline`] of scoring stages:
//!
//! ```text
//! crack() ──► Semantic (binary penalty, ascending) ──► Frequency (hits, descending)
//! ```
//!
//! Each stage starts every candidate from zero errors and sorts stably,
//! so a later stage only reorders what the earlier stage left tied.

use crate::alphabet::fold_case;
use crate::config::CryptexConfig;
use crate::spell::SpellChecker;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Most common English letters, used as the default frequency target
pub const DEFAULT_FREQUENCY_TARGETS: &str = "etaoinshr";

/// A scored decryption hypothesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    text: String,
    errors: usize,
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), errors: 0 }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn add_errors(&mut self, errors: usize) {
        self.errors += errors;
    }

    /// Mistakes `spell_checker` finds in this candidate. Does not touch
    /// the stored error count.
    pub fn estimated_errors(&self, spell_checker: &SpellChecker) -> usize {
        spell_checker.possible_mistakes(&self.text)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}", self.text, self.errors)
    }
}

// ═══════════════════════════════════════════════════════════
// RANKING
// ═══════════════════════════════════════════════════════════

/// One scoring pass over an ordered list of texts
#[derive(Debug, Clone, Copy)]
pub enum RankingStage<'a> {
    /// One error for any text with possible mistakes; fewest errors first
    Semantic(&'a SpellChecker),
    /// One point per occurrence of each target symbol; most points first
    Frequency(&'a str),
}

impl<'a> RankingStage<'a> {
    pub fn score(&self, text: &str) -> usize {
        match self {
            RankingStage::Semantic(spell_checker) => {
                usize::from(spell_checker.possible_mistakes(text) > 0)
            }
            RankingStage::Frequency(targets) => {
                targets.chars().map(|target| occurrences(text, target)).sum()
            }
        }
    }

    /// Score fresh candidates for `texts` and sort them. Ties keep the
    /// input order.
    pub fn rank(&self, texts: Vec<String>) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = texts
            .into_iter()
            .map(|text| {
                let mut candidate = Candidate::new(text);
                candidate.add_errors(self.score(candidate.text()));
                candidate
            })
            .collect();

        match self {
            RankingStage::Semantic(_) => candidates.sort_by_key(|c| c.errors),
            RankingStage::Frequency(_) => candidates.sort_by(|a, b| b.errors.cmp(&a.errors)),
        }
        candidates
    }

    pub fn name(&self) -> &'static str {
        match self {
            RankingStage::Semantic(_) => "semantic",
            RankingStage::Frequency(_) => "frequency",
        }
    }
}

/// Ordered sequence of ranking stages
#[derive(Debug, Clone, Default)]
pub struct RankingPipeline<'a> {
    stages: Vec<RankingStage<'a>>,
}

impl<'a> RankingPipeline<'a> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn then(mut self, stage: RankingStage<'a>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[RankingStage<'a>] {
        &self.stages
    }

    /// Run every stage in order. The returned candidates carry the scores
    /// of the last stage; with no stages they keep the input order and
    /// zero errors.
    pub fn rank(&self, texts: Vec<String>) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = texts.into_iter().map(Candidate::new).collect();

        for stage in &self.stages {
            let texts = candidates.into_iter().map(Candidate::into_text).collect();
            candidates = stage.rank(texts);
            debug!(stage = stage.name(), count = candidates.len(), "ranking stage applied");
        }

        candidates
    }

    pub fn rank_texts(&self, texts: Vec<String>) -> Vec<String> {
        self.rank(texts).into_iter().map(Candidate::into_text).collect()
    }
}

/// Case-insensitive count of `target` in `text`
fn occurrences(text: &str, target: char) -> usize {
    let target = fold_case(target);
    text.chars().filter(|&c| fold_case(c) == target).count()
}

// ═══════════════════════════════════════════════════════════
// CRACKABLE
// ═══════════════════════════════════════════════════════════

/// A cipher whose whole key space can be enumerated
pub trait Crackable {
    /// Every keyed decryption of `ciphertext`, in the cipher's key order
    fn crack(&self, ciphertext: &str) -> Result<Vec<String>>;

    /// Brute force ranked by pronounceability
    fn semantic_analysis(&self, ciphertext: &str, spell_checker: &SpellChecker) -> Result<Vec<String>> {
        let pipeline = RankingPipeline::new().then(RankingStage::Semantic(spell_checker));
        Ok(pipeline.rank_texts(self.crack(ciphertext)?))
    }

    /// Brute force ranked by how often `target_chars` occur
    fn frequency_analysis(&self, ciphertext: &str, target_chars: &str) -> Result<Vec<String>> {
        let pipeline = RankingPipeline::new().then(RankingStage::Frequency(target_chars));
        Ok(pipeline.rank_texts(self.crack(ciphertext)?))
    }

    /// Semantic ranking refined by a frequency pass over its ordering
    fn analyse(
        &self,
        ciphertext: &str,
        spell_checker: &SpellChecker,
        target_chars: &str,
    ) -> Result<Vec<String>> {
        let pipeline = RankingPipeline::new()
            .then(RankingStage::Semantic(spell_checker))
            .then(RankingStage::Frequency(target_chars));
        Ok(pipeline.rank_texts(self.crack(ciphertext)?))
    }
}

// ═══════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════

/// Which stages the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Plain brute force order
    #[serde(alias = "none")]
    BruteForce,
    Semantic,
    Frequency,
    /// Semantic, then frequency
    #[default]
    Combined,
}

impl Strategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bruteforce" | "brute-force" | "none" => Some(Strategy::BruteForce),
            "semantic" => Some(Strategy::Semantic),
            "frequency" => Some(Strategy::Frequency),
            "combined" | "analyse" | "analyze" => Some(Strategy::Combined),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::BruteForce => "bruteforce",
            Strategy::Semantic => "semantic",
            Strategy::Frequency => "frequency",
            Strategy::Combined => "combined",
        }
    }
}

/// Runs a configured ranking strategy against any [`Crackable`]
#[derive(Debug, Clone)]
pub struct CrackingEngine {
    spell_checker: SpellChecker,
    frequency_targets: String,
    strategy: Strategy,
}

impl Default for CrackingEngine {
    fn default() -> Self {
        Self {
            spell_checker: SpellChecker::default(),
            frequency_targets: DEFAULT_FREQUENCY_TARGETS.into(),
            strategy: Strategy::default(),
        }
    }
}

impl CrackingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CryptexConfig) -> Self {
        Self {
            spell_checker: config.spell_checker.clone(),
            frequency_targets: config.frequency_targets.clone(),
            strategy: config.strategy,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_spell_checker(mut self, spell_checker: SpellChecker) -> Self {
        self.spell_checker = spell_checker;
        self
    }

    pub fn with_frequency_targets(mut self, targets: impl Into<String>) -> Self {
        self.frequency_targets = targets.into();
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn spell_checker(&self) -> &SpellChecker {
        &self.spell_checker
    }

    pub fn frequency_targets(&self) -> &str {
        &self.frequency_targets
    }

    pub fn pipeline(&self) -> RankingPipeline<'_> {
        let semantic = RankingStage::Semantic(&self.spell_checker);
        let frequency = RankingStage::Frequency(&self.frequency_targets);

        match self.strategy {
            Strategy::BruteForce => RankingPipeline::new(),
            Strategy::Semantic => RankingPipeline::new().then(semantic),
            Strategy::Frequency => RankingPipeline::new().then(frequency),
            Strategy::Combined => RankingPipeline::new().then(semantic).then(frequency),
        }
    }

    /// Brute-force `ciphertext` and rank the candidates
    pub fn rank(&self, cipher: &dyn Crackable, ciphertext: &str) -> Result<Vec<Candidate>> {
        let texts = cipher.crack(ciphertext)?;
        debug!(strategy = self.strategy.name(), candidates = texts.len(), "ranking brute force output");
        Ok(self.pipeline().rank(texts))
    }

    /// Highest ranked candidate, if the cipher produced any
    pub fn best(&self, cipher: &dyn Crackable, ciphertext: &str) -> Result<Option<Candidate>> {
        Ok(self.rank(cipher, ciphertext)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AffineCipher, Cipher};

    /// Fixed brute-force output, for checking ordering rules in isolation
    struct Fixed(Vec<&'static str>);

    impl Crackable for Fixed {
        fn crack(&self, _ciphertext: &str) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    const DICKENS: &str = "it was the best of times, it was the worst of times, \
                           it was the age of wisdom, it was the age of foolishness";

    #[test]
    fn test_candidate_basics() {
        let mut candidate = Candidate::new("crptgrph");
        assert_eq!(candidate.errors(), 0);
        candidate.add_errors(2);
        candidate.add_errors(1);
        assert_eq!(candidate.errors(), 3);
        assert_eq!(candidate.to_string(), "crptgrph; 3");
        assert_eq!(candidate.estimated_errors(&SpellChecker::default()), 5);
        assert_eq!(candidate.errors(), 3);
    }

    #[test]
    fn test_semantic_is_binary_and_stable() {
        let cracker = Fixed(vec!["bcdfgh", "abc", "xyzzy", "hello"]);
        let ranked = cracker.semantic_analysis("", &SpellChecker::default()).unwrap();
        assert_eq!(ranked, vec!["abc", "xyzzy", "hello", "bcdfgh"]);
    }

    #[test]
    fn test_frequency_descending_and_stable() {
        let cracker = Fixed(vec!["zzz", "eee", "TEA", "ezz", "qqq"]);
        let ranked = cracker.frequency_analysis("", "et").unwrap();
        assert_eq!(ranked, vec!["eee", "TEA", "ezz", "zzz", "qqq"]);
    }

    #[test]
    fn test_frequency_folds_targets_like_alphabets() {
        // 'İ' lowercases to "i\u{307}"; folding keeps the first char
        assert_eq!(RankingStage::Frequency("İ").score("Iii x"), 3);
        assert_eq!(RankingStage::Frequency("E").score("eEe"), 3);
    }

    #[test]
    fn test_analyse_refines_semantic_order() {
        let cracker = Fixed(vec!["bcdfgh", "abc"]);
        assert_eq!(cracker.frequency_analysis("", "et").unwrap(), vec!["bcdfgh", "abc"]);
        assert_eq!(
            cracker.analyse("", &SpellChecker::default(), "et").unwrap(),
            vec!["abc", "bcdfgh"]
        );
    }

    #[test]
    fn test_empty_brute_force_ranks_empty() {
        let cracker = Fixed(vec![]);
        assert!(cracker.semantic_analysis("", &SpellChecker::default()).unwrap().is_empty());
        assert!(cracker.frequency_analysis("", "e").unwrap().is_empty());
        assert!(cracker.analyse("", &SpellChecker::default(), "e").unwrap().is_empty());
    }

    #[test]
    fn test_pipeline_scores_come_from_last_stage() {
        let checker = SpellChecker::default();
        let pipeline = RankingPipeline::new()
            .then(RankingStage::Semantic(&checker))
            .then(RankingStage::Frequency("e"));
        let ranked = pipeline.rank(vec!["bcdfgh".into(), "eve".into()]);
        assert_eq!(ranked[0].text(), "eve");
        assert_eq!(ranked[0].errors(), 2);
        assert_eq!(ranked[1].errors(), 0);

        let unranked = RankingPipeline::new().rank(vec!["b".into(), "a".into()]);
        assert_eq!(unranked, vec![Candidate::new("b"), Candidate::new("a")]);
    }

    #[test]
    fn test_semantic_finds_caesar_plaintext() {
        let cipher = AffineCipher::caesar(3);
        let plaintext = "cryptography is fun";
        let ciphertext = cipher.encrypt(plaintext).unwrap();
        assert_eq!(ciphertext, "fubswrjudskb lv ixq");

        let ranked = cipher.semantic_analysis(&ciphertext, &SpellChecker::default()).unwrap();
        let plain_pos = ranked.iter().position(|t| t == plaintext).unwrap();
        let decoy_pos = ranked.iter().position(|t| t == &ciphertext).unwrap();
        assert!(plain_pos < decoy_pos);
    }

    #[test]
    fn test_frequency_finds_caesar_plaintext() {
        let cipher = AffineCipher::caesar(7);
        let ciphertext = cipher.encrypt(DICKENS).unwrap();
        let ranked = cipher.frequency_analysis(&ciphertext, DEFAULT_FREQUENCY_TARGETS).unwrap();
        assert_eq!(ranked[0], DICKENS);
    }

    #[test]
    fn test_analyse_finds_affine_plaintext() {
        let cipher = AffineCipher::new(5, 8).unwrap();
        let ciphertext = cipher.encrypt(DICKENS).unwrap();
        let ranked = cipher
            .analyse(&ciphertext, &SpellChecker::default(), DEFAULT_FREQUENCY_TARGETS)
            .unwrap();
        assert_eq!(ranked.len(), 26 * 27);
        assert_eq!(ranked[0], DICKENS);
    }

    #[test]
    fn test_engine_strategies() {
        let cipher = AffineCipher::caesar(19);
        let plaintext = "Meet me near the old harbour at seven.";
        let ciphertext = cipher.encrypt(plaintext).unwrap();

        let engine = CrackingEngine::new();
        assert_eq!(engine.strategy(), Strategy::Combined);
        let best = engine.best(&cipher, &ciphertext).unwrap().unwrap();
        assert_eq!(best.text(), plaintext);

        let raw = engine
            .clone()
            .with_strategy(Strategy::BruteForce)
            .rank(&cipher, &ciphertext)
            .unwrap();
        assert_eq!(raw.len(), 27);
        assert_eq!(raw[0].text(), ciphertext);
        assert!(raw.iter().all(|c| c.errors() == 0));
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::from_name("none"), Some(Strategy::BruteForce));
        assert_eq!(Strategy::from_name("Analyse"), Some(Strategy::Combined));
        assert_eq!(Strategy::from_name("bogus"), None);
        assert_eq!(serde_json::to_string(&Strategy::Semantic).unwrap(), "\"semantic\"");
    }
}
