//! Body summary: the subject line ("Perihal"/"Hal"), an opening phrase, or
//! the first substantial line of the letter.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::cascade::{Cascade, Hit, Rule, fallback_line};
use crate::dictionary::Dictionary;

lazy_static! {
    static ref PERIHAL: Regex = Regex::new(r"(?i)\b(?:Perihal|Hal)[ \t]*[:：]\s*([^\n]+)").unwrap();
    static ref OPENING_PHRASE: Regex = Regex::new(
        r"(?i)\b((?:Sehubungan dengan|Berdasarkan|Bersama ini|Dengan ini|Menindaklanjuti)\b[^\n]*)"
    )
    .unwrap();
}

/// Greeting fragments that must never be taken as a body.
const STOPWORDS: &[&str] = &["dengan hormat", "assalamu", "wassalam", "yth.", "kepada yth"];

pub const LINE_FALLBACK: &str = "line_fallback";

#[derive(Debug, Clone)]
pub struct BodyExtractor {
    cascade: Cascade,
    boilerplate: Vec<String>,
    min_words: usize,
}

impl BodyExtractor {
    pub fn new(dict: &Dictionary, min_words: usize) -> Self {
        let cascade = Cascade::new(
            "body_summary",
            vec![
                Rule::new("perihal", &PERIHAL),
                Rule::new("opening_phrase", &OPENING_PHRASE),
            ],
        )
        .with_stopwords(STOPWORDS);
        Self {
            cascade,
            boilerplate: dict.boilerplate_tokens().to_vec(),
            min_words,
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        let mut names = self.cascade.rule_names();
        names.push(LINE_FALLBACK);
        names
    }

    pub fn extract(&self, text: &str) -> Option<Hit> {
        if let Some(hit) = self.cascade.run(text) {
            return Some(hit);
        }
        let line = fallback_line(text, self.min_words, &self.boilerplate)?;
        debug!("body_summary: line fallback {:?}", line);
        Some(Hit {
            rule: LINE_FALLBACK,
            value: line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> BodyExtractor {
        BodyExtractor::new(&Dictionary::builtin(), 5)
    }

    #[test]
    fn test_perihal_same_line() {
        let hit = extractor()
            .extract("Nomor : 12\nPerihal : Mohon kesediaan menerima praktek kerja\nLampiran : -")
            .unwrap();
        assert_eq!(hit.rule, "perihal");
        assert_eq!(hit.value, "Mohon kesediaan menerima praktek kerja");
    }

    #[test]
    fn test_hal_on_next_line() {
        let hit = extractor().extract("Hal :\nUndangan Rapat Koordinasi\n").unwrap();
        assert_eq!(hit.value, "Undangan Rapat Koordinasi");
    }

    #[test]
    fn test_greeting_is_not_a_body() {
        let text = "Hal : Dengan hormat,\nSehubungan dengan kegiatan magang mahasiswa kami";
        let hit = extractor().extract(text).unwrap();
        assert_eq!(hit.rule, "opening_phrase");
        assert_eq!(hit.value, "Sehubungan dengan kegiatan magang mahasiswa kami");
    }

    #[test]
    fn test_line_fallback() {
        let text = "PENGADILAN AGAMA\nKepada Yth. Bapak Ketua di tempat\nrapat evaluasi kinerja triwulan ketiga tahun ini";
        let hit = extractor().extract(text).unwrap();
        assert_eq!(hit.rule, LINE_FALLBACK);
        assert_eq!(hit.value, "rapat evaluasi kinerja triwulan ketiga tahun ini");
    }

    #[test]
    fn test_nothing_usable() {
        assert!(extractor().extract("").is_none());
        assert!(extractor().extract("12 34 56 78 90 11").is_none());
    }
}
