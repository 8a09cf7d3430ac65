//! Cryptex: classical ciphers and brute-force cryptanalysis
//!
//! Affine-family substitution ciphers, the Vigenère tableau cipher,
//! a few keyless transcoders, and an engine that enumerates every key
//! of a cipher and ranks the resulting plaintext candidates.
//!
//! # Modules
//! - `alphabet` - Ordered, case-folded symbol sets
//! - `affine` - Affine, Caesar and Atbash over one shared transform
//! - `vigenere` - Polyalphabetic tableau cipher
//! - `encodings` - Morse and fixed-radix transcoders
//! - `spell` - Pronounceability heuristic
//! - `cracker` - Candidates, ranking stages, cracking engine
//! - `analysis` - Character frequency, n-graphs, index of coincidence
//! - `config` - JSON configuration
//!
//! ```text
//!  ciphertext ──► Crackable::crack ──► [Candidate; N]
//!                                          │
//!                      ┌───────────────────┴───────────────────┐
//!                      ▼                                       ▼
//!             RankingStage::Semantic  ─────────►  RankingStage::Frequency
//!              (SpellChecker, asc)                 (target chars, desc)
//! ```

pub mod alphabet;
pub mod affine;
pub mod vigenere;
pub mod encodings;
pub mod spell;
pub mod cracker;
pub mod analysis;
pub mod config;

pub use alphabet::Alphabet;
pub use affine::{AffineCipher, KeyScheme};
pub use vigenere::VigenereCipher;
pub use encodings::{Base, Morse};
pub use spell::SpellChecker;
pub use cracker::{Candidate, Crackable, CrackingEngine, RankingPipeline, RankingStage, Strategy};
pub use analysis::{character_frequency, n_graph, FrequencyAnalysis};
pub use config::CryptexConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("'a' must be coprime with alphabet length 'm': a = {a}; m = {m}")]
    CipherKey { a: i64, m: usize },

    #[error("Invalid cipher state: {0}")]
    CipherState(String),

    #[error("Key is locked: {0}")]
    KeyLocked(String),

    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Text transform capability shared by every cipher and transcoder.
///
/// Implementations are pure: the input text is never stored, so one
/// configured cipher can be used for any number of messages.
pub trait Cipher {
    fn encrypt(&self, text: &str) -> Result<String>;

    fn decrypt(&self, text: &str) -> Result<String>;
}

/// Keyed ciphers, as named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherType {
    // Substitution
    Affine,
    Caesar,
    Atbash,

    // Polyalphabetic
    Vigenere,
}

impl CipherType {
    pub fn name(&self) -> &'static str {
        match self {
            CipherType::Affine => "Affine Cipher",
            CipherType::Caesar => "Caesar Cipher",
            CipherType::Atbash => "Atbash Cipher",
            CipherType::Vigenere => "Vigenère Cipher",
        }
    }

    /// Parse a command-line style name (`"caesar"`, `"vigenere"`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "affine" => Some(CipherType::Affine),
            "caesar" | "cesar" | "shift" => Some(CipherType::Caesar),
            "atbash" | "mirror" => Some(CipherType::Atbash),
            "vigenere" => Some(CipherType::Vigenere),
            _ => None,
        }
    }

    /// Key scheme whose key space brute force sweeps; `None` when the keys
    /// cannot be enumerated
    pub fn brute_force_scheme(&self) -> Option<KeyScheme> {
        match self {
            CipherType::Affine => Some(KeyScheme::Affine { a: 1, b: 0 }),
            CipherType::Caesar => Some(KeyScheme::Caesar { shift: 0 }),
            CipherType::Atbash => Some(KeyScheme::Atbash),
            CipherType::Vigenere => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_key_message() {
        let err = Error::CipherKey { a: 4, m: 26 };
        assert_eq!(
            err.to_string(),
            "'a' must be coprime with alphabet length 'm': a = 4; m = 26"
        );
    }

    #[test]
    fn test_cipher_type_lookup() {
        assert_eq!(CipherType::from_name("Caesar"), Some(CipherType::Caesar));
        assert_eq!(CipherType::from_name("mirror"), Some(CipherType::Atbash));
        assert_eq!(CipherType::from_name("morse"), None);
        assert_eq!(CipherType::from_name("enigma"), None);
    }

    #[test]
    fn test_brute_force_schemes() {
        assert_eq!(CipherType::Atbash.brute_force_scheme(), Some(KeyScheme::Atbash));
        assert_eq!(
            CipherType::Caesar.brute_force_scheme(),
            Some(KeyScheme::Caesar { shift: 0 })
        );
        assert!(CipherType::Affine.brute_force_scheme().is_some());
        assert_eq!(CipherType::Vigenere.brute_force_scheme(), None);
    }
}
