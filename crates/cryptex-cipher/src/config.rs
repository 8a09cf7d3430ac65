//! Configuration
//!
//! Stored as JSON at `~/.config/cryptex/config.json`. Every field is
//! optional; anything left out keeps its default.

use crate::alphabet::Alphabet;
use crate::cracker::{Strategy, DEFAULT_FREQUENCY_TARGETS};
use crate::spell::SpellChecker;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptexConfig {
    /// Alphabet used by every cipher
    pub alphabet: Alphabet,

    /// Settings for the semantic ranking stage
    pub spell_checker: SpellChecker,

    /// Characters counted by the frequency ranking stage
    pub frequency_targets: String,

    /// Ranking stages run by `crack`
    pub strategy: Strategy,
}

impl Default for CryptexConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::english(),
            spell_checker: SpellChecker::default(),
            frequency_targets: DEFAULT_FREQUENCY_TARGETS.into(),
            strategy: Strategy::default(),
        }
    }
}

impl CryptexConfig {
    /// `<config dir>/cryptex/config.json`, if the platform has a config dir
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cryptex").join("config.json"))
    }

    /// Load from `path`; the file must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from `path`, or the default location when `None`.
    /// A missing file yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_location() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        Self::load(&path)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;

        // Write to temp file first, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = CryptexConfig::load_or_default(Some(&dir.path().join("nope.json"))).unwrap();
        assert_eq!(config, CryptexConfig::default());
        assert_eq!(config.alphabet.len(), 26);
        assert_eq!(config.strategy, Strategy::Combined);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"alphabet": "ABCDE", "strategy": "none", "spell_checker": {"consonant_tolerance": 2}}"#,
        )
        .unwrap();

        let config = CryptexConfig::load(&path).unwrap();
        assert_eq!(config.alphabet.to_string(), "abcde");
        assert_eq!(config.strategy, Strategy::BruteForce);
        assert_eq!(config.spell_checker.consonant_tolerance, 2);
        assert_eq!(config.spell_checker.vowels, "aeiouy");
        assert_eq!(config.frequency_targets, DEFAULT_FREQUENCY_TARGETS);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = CryptexConfig {
            alphabet: Alphabet::ascii(),
            frequency_targets: "eta".into(),
            strategy: Strategy::Frequency,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = CryptexConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(CryptexConfig::load(&path), Err(Error::Config(_))));

        // duplicate symbols are rejected by the alphabet
        std::fs::write(&path, r#"{"alphabet": "abca"}"#).unwrap();
        assert!(matches!(CryptexConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_requires_file() {
        let dir = TempDir::new().unwrap();
        let result = CryptexConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
