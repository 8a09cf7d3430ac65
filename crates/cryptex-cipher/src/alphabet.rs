//! Cipher Alphabets
//!
//! An alphabet is the ordered symbol set a substitution cipher works over.
//! Symbols are stored lowercase; lookups fold the query first, so `'Q'`
//! and `'q'` share one position.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const ENGLISH: &str = "abcdefghijklmnopqrstuvwxyz";

/// Ordered, duplicate-free, case-folded symbol sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a string of symbols.
    ///
    /// Symbols are folded to lowercase. Two symbols that fold to the same
    /// character are rejected, as is any repeated symbol.
    pub fn new(symbols: &str) -> Result<Self> {
        let mut folded = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            let c = fold_case(c);
            if folded.contains(&c) {
                return Err(Error::InvalidAlphabet(format!("duplicate symbol {:?}", c)));
            }
            folded.push(c);
        }
        Ok(Self { symbols: folded })
    }

    /// The 26-letter lowercase Latin alphabet
    pub fn english() -> Self {
        Self { symbols: ENGLISH.chars().collect() }
    }

    /// All 128 ASCII code points, minus the uppercase letters that fold
    /// onto their lowercase counterparts.
    ///
    /// Uppercase letters can encrypt to punctuation or control characters,
    /// which have no case. Such a letter decrypts to its lowercase form, so
    /// only lowercase text round-trips exactly over this alphabet.
    pub fn ascii() -> Self {
        Self {
            symbols: (0u8..128)
                .filter(|b| !b.is_ascii_uppercase())
                .map(char::from)
                .collect(),
        }
    }

    /// Alphabet length `m`
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Position of `symbol`, ignoring case
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        let symbol = fold_case(symbol);
        self.symbols.iter().position(|&c| c == symbol)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index_of(symbol).is_some()
    }

    pub fn symbol_at(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Length of the alphabet, or `CipherState` when there is nothing to
    /// substitute with.
    pub fn modulus(&self) -> Result<usize> {
        if self.symbols.is_empty() {
            return Err(Error::CipherState("alphabet is empty".into()));
        }
        Ok(self.symbols.len())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Alphabet {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.to_string()
    }
}

/// Lowercase form of a single symbol
pub fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Give `c` the case of `template`. A caseless `c` stays as it is.
pub fn match_case(c: char, template: char) -> char {
    if template.is_uppercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else {
        c
    }
}
