//! Splits OCR-glued compounds ("Mohonkesediaan") back into two words.
//!
//! A token is only split when both halves are known words; otherwise it is
//! left exactly as it was. Whitespace between tokens is preserved.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::dictionary::Dictionary;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\S+").unwrap();
}

pub const DEFAULT_MIN_LEN: usize = 8;
pub const DEFAULT_MIN_PIECE: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct WordBreaker<'a> {
    dictionary: &'a Dictionary,
    min_len: usize,
    min_piece: usize,
}

impl<'a> WordBreaker<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            dictionary,
            min_len: DEFAULT_MIN_LEN,
            min_piece: DEFAULT_MIN_PIECE,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn with_min_piece(mut self, min_piece: usize) -> Self {
        self.min_piece = min_piece.max(1);
        self
    }

    pub fn break_words(&self, text: &str) -> String {
        TOKEN
            .replace_all(text, |caps: &Captures| self.break_token(&caps[0]))
            .into_owned()
    }

    /// Split one token, keeping leading/trailing punctuation in place.
    pub fn break_token(&self, token: &str) -> String {
        let start = token
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| i);
        let end = token
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, c)| i + c.len_utf8());
        let (Some(start), Some(end)) = (start, end) else {
            return token.to_string();
        };

        let core = &token[start..end];
        match self.split(core) {
            Some((left, right)) => format!("{}{} {}{}", &token[..start], left, right, &token[end..]),
            None => token.to_string(),
        }
    }

    fn split<'t>(&self, core: &'t str) -> Option<(&'t str, &'t str)> {
        if !core.chars().all(char::is_alphabetic) {
            return None;
        }
        let len = core.chars().count();
        if len < self.min_len || self.dictionary.is_known(core) {
            return None;
        }

        let boundaries: Vec<usize> = core.char_indices().map(|(i, _)| i).collect();
        // longest prefix first
        for pieces in (self.min_piece..=len.saturating_sub(self.min_piece)).rev() {
            let at = boundaries[pieces];
            let (left, right) = core.split_at(at);
            if self.dictionary.is_known(left) && self.dictionary.is_known(right) {
                return Some((left, right));
            }
        }
        None
    }
}

/// [`WordBreaker`] with default thresholds.
pub fn break_words(dictionary: &Dictionary, text: &str) -> String {
    WordBreaker::new(dictionary).break_words(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_glued_phrase() {
        let dict = Dictionary::builtin();
        assert_eq!(
            break_words(&dict, "Mohonkesediaan menerima praktekkerja"),
            "Mohon kesediaan menerima praktek kerja"
        );
    }

    #[test]
    fn test_keeps_punctuation_and_spacing() {
        let dict = Dictionary::builtin();
        assert_eq!(break_words(&dict, "(suratundangan),  x"), "(surat undangan),  x");
    }

    #[test]
    fn test_unexplained_tokens_untouched() {
        let dict = Dictionary::builtin();
        for token in ["Sidoarjokota", "1931/PAN.PA", "HM2.1.4", "kesediaan", "undangan"] {
            assert_eq!(break_words(&dict, token), token);
        }
    }

    #[test]
    fn test_min_len() {
        let dict = Dictionary::builtin();
        assert_eq!(break_words(&dict, "dandari"), "dandari");
        assert_eq!(
            WordBreaker::new(&dict).with_min_len(6).break_words("dandari"),
            "dan dari"
        );
    }
}
