//! Keyless Transcoders
//!
//! Morse code and fixed-radix byte encodings (binary, hex, base-N).
//! They share the [`Cipher`] shape with the keyed ciphers so callers can
//! chain them freely.

use crate::alphabet::fold_case;
use crate::{Cipher, Error, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

const MORSE_TABLE: [(char, &str); 37] = [
    ('a', ".-"), ('b', "-..."), ('c', "-.-."), ('d', "-.."),
    ('e', "."), ('f', "..-."), ('g', "--."), ('h', "...."),
    ('i', ".."), ('j', ".---"), ('k', "-.-"), ('l', ".-.."),
    ('m', "--"), ('n', "-."), ('o', "---"), ('p', ".--."),
    ('q', "--.-"), ('r', ".-."), ('s', "..."), ('t', "-"),
    ('u', "..-"), ('v', "...-"), ('w', ".--"), ('x', "-..-"),
    ('y', "-.--"), ('z', "--.."),
    ('0', "-----"), ('1', ".----"), ('2', "..---"),
    ('3', "...--"), ('4', "....-"), ('5', "....."),
    ('6', "-...."), ('7', "--..."), ('8', "---.."),
    ('9', "----."),
    (' ', "/"),
];

lazy_static! {
    static ref TO_MORSE: HashMap<char, &'static str> = MORSE_TABLE.iter().copied().collect();
    static ref FROM_MORSE: HashMap<&'static str, char> =
        MORSE_TABLE.iter().map(|&(c, code)| (code, c)).collect();
}

// ═══════════════════════════════════════════════════════════
// MORSE CODE
// ═══════════════════════════════════════════════════════════

/// International Morse code; a word gap is written as `/`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Morse;

impl Cipher for Morse {
    /// Symbols without a Morse code are dropped
    fn encrypt(&self, text: &str) -> Result<String> {
        Ok(text
            .chars()
            .filter_map(|c| TO_MORSE.get(&fold_case(c)).copied())
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn decrypt(&self, text: &str) -> Result<String> {
        text.split_whitespace()
            .map(|code| {
                FROM_MORSE
                    .get(code)
                    .copied()
                    .ok_or_else(|| Error::DecodingFailed(format!("Unknown morse: {}", code)))
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════
// BASE-N
// ═══════════════════════════════════════════════════════════

/// Writes every UTF-8 byte as a zero-padded number in `radix`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base {
    radix: u32,
    digits: usize,
}

impl Base {
    /// Radix must be in `2..=36`
    pub fn new(radix: u32) -> Result<Self> {
        if !(2..=36).contains(&radix) {
            return Err(Error::InvalidInput(format!("radix must be in 2..=36, got {}", radix)));
        }
        let digits = (8.0 / f64::from(radix).log2()).ceil() as usize;
        Ok(Self { radix, digits })
    }

    pub fn binary() -> Self {
        Self { radix: 2, digits: 8 }
    }

    pub fn hexadecimal() -> Self {
        Self { radix: 16, digits: 2 }
    }

    pub fn radix(&self) -> u32 {
        self.radix
    }

    /// Digits needed for one byte
    pub fn digits(&self) -> usize {
        self.digits
    }

    fn encode_byte(&self, byte: u8, out: &mut String) {
        let mut buf = vec!['0'; self.digits];
        let mut value = u32::from(byte);
        for slot in buf.iter_mut().rev() {
            // value % radix < radix <= 36, always a valid digit
            *slot = char::from_digit(value % self.radix, self.radix).unwrap_or('0');
            value /= self.radix;
        }
        out.extend(buf);
    }
}

impl Cipher for Base {
    fn encrypt(&self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len() * self.digits);
        for byte in text.bytes() {
            self.encode_byte(byte, &mut out);
        }
        Ok(out)
    }

    /// Whitespace between groups is ignored
    fn decrypt(&self, text: &str) -> Result<String> {
        let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() % self.digits != 0 {
            return Err(Error::DecodingFailed(format!(
                "Base{}: length {} is not a multiple of {}",
                self.radix,
                digits.len(),
                self.digits
            )));
        }

        let bytes = digits
            .chunks(self.digits)
            .map(|chunk| {
                let group: String = chunk.iter().collect();
                // from_str_radix alone would also take a leading sign
                Some(&group)
                    .filter(|g| g.chars().all(|c| c.is_digit(self.radix)))
                    .and_then(|g| u32::from_str_radix(g, self.radix).ok())
                    .and_then(|value| u8::try_from(value).ok())
                    .ok_or_else(|| Error::DecodingFailed(format!("Base{}: invalid group {}", self.radix, group)))
            })
            .collect::<Result<Vec<u8>>>()?;

        String::from_utf8(bytes)
            .map_err(|e| Error::DecodingFailed(format!("Base{}: {}", self.radix, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morse() {
        let encoded = Morse.encrypt("SOS").unwrap();
        assert_eq!(encoded, "... --- ...");

        let decoded = Morse.decrypt("... --- ...").unwrap();
        assert_eq!(decoded, "sos");
    }

    #[test]
    fn test_morse_words_and_digits() {
        let encoded = Morse.encrypt("Hi 2, you!").unwrap();
        assert_eq!(encoded, ".... .. / ..--- / -.-- --- ..-");
        assert_eq!(Morse.decrypt(&encoded).unwrap(), "hi 2 you");
    }

    #[test]
    fn test_morse_unknown_code() {
        assert!(matches!(Morse.decrypt("... ------- ..."), Err(Error::DecodingFailed(_))));
    }

    #[test]
    fn test_binary() {
        let encoded = Base::binary().encrypt("Hi").unwrap();
        assert_eq!(encoded, "0100100001101001");

        let decoded = Base::binary().decrypt("01001000 01101001").unwrap();
        assert_eq!(decoded, "Hi");
    }

    #[test]
    fn test_hexadecimal() {
        let hex = Base::hexadecimal();
        assert_eq!(hex.encrypt("Hi!").unwrap(), "486921");
        assert_eq!(hex.decrypt("486921").unwrap(), "Hi!");
        assert_eq!(Base::new(16).unwrap(), hex);
    }

    #[test]
    fn test_digit_widths() {
        assert_eq!(Base::new(2).unwrap().digits(), 8);
        assert_eq!(Base::new(3).unwrap().digits(), 6);
        assert_eq!(Base::new(8).unwrap().digits(), 3);
        assert_eq!(Base::new(10).unwrap().digits(), 3);
        assert_eq!(Base::new(36).unwrap().digits(), 2);
    }

    #[test]
    fn test_base_round_trip_unicode() {
        for radix in [3, 7, 10, 36] {
            let base = Base::new(radix).unwrap();
            let encoded = base.encrypt("Zürich, 1291").unwrap();
            assert_eq!(base.decrypt(&encoded).unwrap(), "Zürich, 1291", "radix {radix}");
        }
    }

    #[test]
    fn test_base_rejects_bad_input() {
        assert!(matches!(Base::new(1), Err(Error::InvalidInput(_))));
        assert!(matches!(Base::new(37), Err(Error::InvalidInput(_))));

        let hex = Base::hexadecimal();
        assert!(matches!(hex.decrypt("486"), Err(Error::DecodingFailed(_))));
        assert!(matches!(hex.decrypt("zz"), Err(Error::DecodingFailed(_))));
        assert!(matches!(hex.decrypt("+1+2"), Err(Error::DecodingFailed(_))));
        assert!(matches!(Base::binary().decrypt("+1111111"), Err(Error::DecodingFailed(_))));
        // 999 does not fit in a byte
        assert!(Base::new(10).unwrap().decrypt("999").is_err());
        // lone continuation byte is not UTF-8
        assert!(hex.decrypt("80").is_err());
    }
}
