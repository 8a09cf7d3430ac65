//! Affine Cipher Family
//!
//! `C(x) = (a·x + b) mod m` over an [`Alphabet`] of length `m`.
//! Caesar (`a = 1`) and Atbash (`a = b = m - 1`) are not separate
//! algorithms here; they are [`KeyScheme`] variants that pin part of the
//! key and share the same transform.

use crate::alphabet::{match_case, Alphabet};
use crate::cracker::Crackable;
use crate::{Cipher, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Emitted in place of alphabet symbols when a key has no modular inverse
pub const UNDECIPHERABLE: char = '\u{FFFD}';

/// Key material of an affine-family cipher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum KeyScheme {
    /// Free coefficients `a` and `b`
    Affine { a: i64, b: i64 },
    /// `a` fixed to 1, `b` is the shift
    Caesar { shift: i64 },
    /// Both coefficients fixed to `m - 1`
    Atbash,
}

impl KeyScheme {
    /// Effective `(a, b)` for an alphabet of length `m`
    pub fn keys(&self, m: usize) -> (i64, i64) {
        match *self {
            KeyScheme::Affine { a, b } => (a, b),
            KeyScheme::Caesar { shift } => (1, shift),
            KeyScheme::Atbash => {
                let k = m as i64 - 1;
                (k, k)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeyScheme::Affine { .. } => "affine",
            KeyScheme::Caesar { .. } => "caesar",
            KeyScheme::Atbash => "atbash",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// MODULAR ARITHMETIC
// ═══════════════════════════════════════════════════════════

pub fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

/// `gcd(a, m) == 1`, with `a` reduced modulo `m` first
pub fn is_coprime(a: i64, m: usize) -> bool {
    if m == 0 {
        return false;
    }
    let m = m as i64;
    gcd(a.rem_euclid(m), m) == 1
}

/// Smallest `i` in `[0, m]` with `(a·i) mod m == 1`.
///
/// Every residue is congruent to 0 modulo 1, so a one-symbol alphabet
/// gets the inverse 0.
pub fn mod_inverse(a: i64, m: usize) -> Option<i64> {
    if m == 0 {
        return None;
    }
    if m == 1 {
        return Some(0);
    }
    let m = m as i64;
    let a = a.rem_euclid(m);
    (0..=m).find(|i| (a * i).rem_euclid(m) == 1)
}

// ═══════════════════════════════════════════════════════════
// TRANSFORM
// ═══════════════════════════════════════════════════════════

/// Replace each alphabet symbol by the symbol at `map(position)`.
///
/// Symbols outside the alphabet pass through untouched. A `None` from
/// `map` yields [`UNDECIPHERABLE`].
fn substitute<F>(text: &str, alphabet: &Alphabet, map: F) -> String
where
    F: Fn(i64) -> Option<i64>,
{
    text.chars()
        .map(|c| match alphabet.index_of(c) {
            None => c,
            Some(x) => match map(x as i64).and_then(|y| alphabet.symbol_at(y as usize)) {
                Some(s) => match_case(s, c),
                None => UNDECIPHERABLE,
            },
        })
        .collect()
}

/// Encrypt with `(a, b)`. Output symbols take the case of their input
/// symbol; when the output symbol has no case, the case is lost.
pub fn encrypt(text: &str, alphabet: &Alphabet, a: i64, b: i64) -> Result<String> {
    let m = alphabet.modulus()? as i64;
    let (a, b) = (a.rem_euclid(m), b.rem_euclid(m));
    Ok(substitute(text, alphabet, |x| Some((a * x + b).rem_euclid(m))))
}

/// Decrypt with `(a, b)`. Fails with [`Error::CipherKey`] when `a` has no
/// inverse modulo `m`.
pub fn decrypt(text: &str, alphabet: &Alphabet, a: i64, b: i64) -> Result<String> {
    let m = alphabet.modulus()?;
    let a_inv = mod_inverse(a, m).ok_or(Error::CipherKey { a, m })?;
    let m = m as i64;
    let b = b.rem_euclid(m);
    Ok(substitute(text, alphabet, |y| Some((a_inv * (y - b + m)).rem_euclid(m))))
}

/// Decrypt without requiring an invertible `a`.
///
/// When no inverse exists every alphabet symbol becomes [`UNDECIPHERABLE`]
/// instead of failing; brute force relies on this to sweep all `a`.
pub fn decrypt_unchecked(text: &str, alphabet: &Alphabet, a: i64, b: i64) -> Result<String> {
    let m = alphabet.modulus()?;
    let a_inv = mod_inverse(a, m);
    let m = m as i64;
    let b = b.rem_euclid(m);
    Ok(substitute(text, alphabet, |y| {
        a_inv.map(|inv| (inv * (y - b + m)).rem_euclid(m))
    }))
}

// ═══════════════════════════════════════════════════════════
// CIPHER
// ═══════════════════════════════════════════════════════════

/// Affine, Caesar or Atbash cipher over a configurable alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffineCipher {
    alphabet: Alphabet,
    scheme: KeyScheme,
}

impl AffineCipher {
    /// Affine cipher over the English alphabet; `a` must be coprime with 26
    pub fn new(a: i64, b: i64) -> Result<Self> {
        Self::with_alphabet(Alphabet::english(), a, b)
    }

    /// Affine cipher over `alphabet`; `a` must be coprime with its length
    pub fn with_alphabet(alphabet: Alphabet, a: i64, b: i64) -> Result<Self> {
        let mut cipher = Self {
            alphabet,
            scheme: KeyScheme::Affine { a: 1, b: 0 },
        };
        cipher.set_secure_keys(a, b)?;
        Ok(cipher)
    }

    /// Build from an arbitrary scheme without validating the coefficients
    pub fn from_scheme(alphabet: Alphabet, scheme: KeyScheme) -> Self {
        Self { alphabet, scheme }
    }

    pub fn caesar(shift: i64) -> Self {
        Self::from_scheme(Alphabet::english(), KeyScheme::Caesar { shift })
    }

    pub fn atbash() -> Self {
        Self::from_scheme(Alphabet::english(), KeyScheme::Atbash)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Replace the alphabet. Atbash keys follow the new length.
    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        self.alphabet = alphabet;
    }

    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    /// Alphabet length
    pub fn m(&self) -> usize {
        self.alphabet.len()
    }

    /// Effective `(a, b)` under the current alphabet
    pub fn keys(&self) -> (i64, i64) {
        self.scheme.keys(self.m())
    }

    pub fn a(&self) -> i64 {
        self.keys().0
    }

    pub fn b(&self) -> i64 {
        self.keys().1
    }

    /// Last shift set on a Caesar cipher
    pub fn shift(&self) -> Option<i64> {
        match self.scheme {
            KeyScheme::Caesar { shift } => Some(shift),
            _ => None,
        }
    }

    pub fn set_shift(&mut self, shift: i64) -> Result<()> {
        match self.scheme {
            KeyScheme::Caesar { .. } => {
                self.scheme = KeyScheme::Caesar { shift };
                Ok(())
            }
            other => Err(self.locked(format!("{} cipher has no shift", other.name()))),
        }
    }

    /// Set `(a, b)` after checking that `a` is coprime with `m`
    pub fn set_secure_keys(&mut self, a: i64, b: i64) -> Result<()> {
        let m = self.alphabet.modulus()?;
        if !is_coprime(a, m) {
            return Err(Error::CipherKey { a, m });
        }
        self.set_keys_unchecked(a, b)
    }

    /// Set `(a, b)` without the coprimality check.
    ///
    /// Decryption under a non-coprime `a` is undefined: [`Cipher::decrypt`]
    /// rejects it when no inverse exists. Preset schemes still refuse keys
    /// outside their lock.
    pub fn set_keys_unchecked(&mut self, a: i64, b: i64) -> Result<()> {
        match self.scheme {
            KeyScheme::Affine { .. } => {
                self.scheme = KeyScheme::Affine { a, b };
                Ok(())
            }
            KeyScheme::Caesar { .. } if a == 1 => {
                self.scheme = KeyScheme::Caesar { shift: b };
                Ok(())
            }
            KeyScheme::Caesar { .. } => {
                Err(self.locked(format!("caesar requires a = 1, got a = {}", a)))
            }
            KeyScheme::Atbash => {
                let (k, _) = self.keys();
                Err(self.locked(format!("atbash keys are fixed to ({k}, {k})")))
            }
        }
    }

    fn locked(&self, reason: String) -> Error {
        warn!(scheme = self.scheme.name(), "rejected key change: {}", reason);
        Error::KeyLocked(reason)
    }

    fn decrypt_unchecked(&self, text: &str) -> Result<String> {
        let (a, b) = self.keys();
        decrypt_unchecked(text, &self.alphabet, a, b)
    }
}

impl Default for AffineCipher {
    fn default() -> Self {
        Self::from_scheme(Alphabet::english(), KeyScheme::Affine { a: 1, b: 0 })
    }
}

impl Cipher for AffineCipher {
    fn encrypt(&self, text: &str) -> Result<String> {
        let (a, b) = self.keys();
        encrypt(text, &self.alphabet, a, b)
    }

    fn decrypt(&self, text: &str) -> Result<String> {
        let (a, b) = self.keys();
        decrypt(text, &self.alphabet, a, b)
    }
}

impl Crackable for AffineCipher {
    /// Every keyed decryption of `ciphertext`.
    ///
    /// - affine: `a` in `[0, m)`, `b` in `[0, m]`, row-major, `m·(m+1)` texts
    /// - caesar: shift in `[0, m]`, `m+1` texts
    /// - atbash: the single fixed-key decryption
    ///
    /// The inclusive upper bounds repeat the `b = 0` / `shift = 0` text.
    fn crack(&self, ciphertext: &str) -> Result<Vec<String>> {
        let m = self.alphabet.modulus()?;

        let candidates = match self.scheme {
            KeyScheme::Affine { .. } => {
                let mut scratch = self.clone();
                let mut out = Vec::with_capacity(m * (m + 1));
                for a in 0..m as i64 {
                    for b in 0..=m as i64 {
                        scratch.set_keys_unchecked(a, b)?;
                        out.push(scratch.decrypt_unchecked(ciphertext)?);
                    }
                }
                out
            }
            KeyScheme::Caesar { .. } => {
                let mut scratch = Self::from_scheme(self.alphabet.clone(), KeyScheme::Caesar { shift: 0 });
                let mut out = Vec::with_capacity(m + 1);
                for shift in 0..=m as i64 {
                    scratch.set_shift(shift)?;
                    out.push(scratch.decrypt(ciphertext)?);
                }
                out
            }
            KeyScheme::Atbash => vec![self.decrypt(ciphertext)?],
        };

        debug!(scheme = self.scheme.name(), m, count = candidates.len(), "brute force complete");
        Ok(candidates)
    }
}
