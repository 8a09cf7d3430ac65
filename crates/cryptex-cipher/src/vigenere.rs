//! Vigenère Cipher
//!
//! Polyalphabetic substitution over an `m×m` tableau whose row `i` is the
//! alphabet Caesar-shifted by `i`. A repeating keyword picks the row for
//! each symbol; symbols outside the alphabet are copied through and do
//! not use up a keyword position.

use crate::alphabet::{fold_case, match_case, Alphabet};
use crate::{affine, Cipher, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VigenereCipher {
    alphabet: Alphabet,
    keyword: String,
}

impl VigenereCipher {
    /// Vigenère over the English alphabet
    pub fn new(keyword: &str) -> Self {
        Self::with_alphabet(Alphabet::english(), keyword)
    }

    pub fn with_alphabet(alphabet: Alphabet, keyword: &str) -> Self {
        let mut cipher = Self { alphabet, keyword: String::new() };
        cipher.set_keyword(keyword);
        cipher
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Store `keyword` folded to lowercase, keeping only alphabet symbols
    pub fn set_keyword(&mut self, keyword: &str) {
        self.keyword = keyword
            .chars()
            .map(fold_case)
            .filter(|&c| self.alphabet.contains(c))
            .collect();
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Replace the alphabet. The stored keyword is not re-filtered.
    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        self.alphabet = alphabet;
    }

    /// The shift tableau: row `i` is the alphabet encrypted with Caesar shift `i`
    pub fn tableau(&self) -> Result<Vec<Vec<char>>> {
        let m = self.alphabet.modulus()?;
        let plain = self.alphabet.to_string();

        (0..m as i64)
            .map(|shift| {
                affine::encrypt(&plain, &self.alphabet, 1, shift).map(|row| row.chars().collect())
            })
            .collect()
    }

    /// Walk `text` with the keyword. `step` maps (text position, keyword
    /// position) to the output position. A keyword symbol missing from the
    /// alphabet copies the text symbol but still uses up its slot.
    fn apply<F>(&self, text: &str, step: F) -> Result<String>
    where
        F: Fn(usize, usize) -> usize,
    {
        self.alphabet.modulus()?;
        if self.keyword.is_empty() {
            return Err(Error::CipherState("vigenere keyword is empty".into()));
        }

        let key: Vec<char> = self.keyword.chars().collect();
        let mut key_idx = 0;
        let mut out = String::with_capacity(text.len());

        for c in text.chars() {
            let Some(col) = self.alphabet.index_of(c) else {
                out.push(c);
                continue;
            };

            let row = self.alphabet.index_of(key[key_idx % key.len()]);
            key_idx += 1;

            match row.and_then(|row| self.alphabet.symbol_at(step(col, row))) {
                Some(s) => out.push(match_case(s, c)),
                None => out.push(c),
            }
        }

        Ok(out)
    }
}

impl Cipher for VigenereCipher {
    fn encrypt(&self, text: &str) -> Result<String> {
        let tableau = self.tableau()?;
        let alphabet = &self.alphabet;
        self.apply(text, |col, row| {
            alphabet.index_of(tableau[col][row]).unwrap_or(col)
        })
    }

    /// Inverts the tableau by scanning rows for the first `j` with
    /// `tableau[j][row] == ciphertext symbol`.
    fn decrypt(&self, text: &str) -> Result<String> {
        let tableau = self.tableau()?;
        let alphabet = &self.alphabet;
        self.apply(text, |col, row| {
            let Some(symbol) = alphabet.symbol_at(col) else {
                return col;
            };
            tableau
                .iter()
                .position(|line| line[row] == symbol)
                .unwrap_or(col)
        })
    }
}
