//! Accuracy of the machine reading against the human-corrected record.
//!
//! A field score is `similarity * 70 + word_overlap * 30`, rounded to two
//! decimals, where `similarity` is the LCS ratio over normalised characters
//! and `word_overlap` the share of initial words still present after editing.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::record::NOT_FOUND;

const SIMILARITY_WEIGHT: f64 = 70.0;
const OVERLAP_WEIGHT: f64 = 30.0;

/// Fields scored by [`score_record`] when the caller has no list of its own.
pub const SCORED_FIELDS: &[&str] = &[
    "letter_number",
    "classification_code",
    "date",
    "sender",
    "recipient",
    "body_summary",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAccuracy {
    pub field: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentAccuracy {
    /// Scored fields only; sentinel initial values are left out.
    pub fields: Vec<FieldAccuracy>,
    pub overall: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_sentinel(value: &str) -> bool {
    value.trim() == NOT_FOUND
}

/// NFKC, lowercase, single spaces. The sentinel normalises to empty.
fn normalize(value: &str) -> String {
    if is_sentinel(value) {
        return String::new();
    }
    let folded: String = value.nfkc().collect::<String>().to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `2 * LCS / (len_a + len_b)` over characters.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    2.0 * lcs_len(&a, &b) as f64 / (a.len() + b.len()) as f64
}

/// Share of `initial` words that also appear somewhere in `edited`.
pub fn word_overlap(initial: &str, edited: &str) -> f64 {
    let words: Vec<&str> = initial.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let edited: HashSet<&str> = edited.split_whitespace().collect();
    let kept = words.iter().filter(|w| edited.contains(*w)).count();
    kept as f64 / words.len() as f64
}

/// Score in `[0, 100]`. Both empty is 100, exactly one empty is 0.
pub fn field_accuracy(initial: &str, edited: &str) -> f64 {
    let initial = normalize(initial);
    let edited = normalize(edited);
    match (initial.is_empty(), edited.is_empty()) {
        (true, true) => 100.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => round2(
            similarity(&initial, &edited) * SIMILARITY_WEIGHT
                + word_overlap(&initial, &edited) * OVERLAP_WEIGHT,
        ),
    }
}

/// Mean over `(field, initial, edited)` triples whose initial value is not the sentinel.
/// Nothing to score gives `0.0`.
pub fn document_accuracy<S: AsRef<str>>(fields: &[(S, S, S)]) -> DocumentAccuracy {
    let scored: Vec<FieldAccuracy> = fields
        .iter()
        .filter(|(_, initial, _)| !is_sentinel(initial.as_ref()))
        .map(|(field, initial, edited)| FieldAccuracy {
            field: field.as_ref().to_string(),
            score: field_accuracy(initial.as_ref(), edited.as_ref()),
        })
        .collect();

    let overall = if scored.is_empty() {
        0.0
    } else {
        round2(scored.iter().map(|f| f.score).sum::<f64>() / scored.len() as f64)
    };
    DocumentAccuracy {
        fields: scored,
        overall,
    }
}

/// Score a persisted record holding `initial_<field>` and `<field>` keys.
/// Fields without an `initial_` entry were never read and are skipped.
pub fn score_record(record: &BTreeMap<String, String>, fields: &[&str]) -> DocumentAccuracy {
    let triples: Vec<(&str, &str, &str)> = fields
        .iter()
        .filter_map(|field| {
            let initial = record.get(&format!("initial_{field}"))?;
            let edited = record.get(*field).map_or("", String::as_str);
            Some((*field, initial.as_str(), edited))
        })
        .collect();
    document_accuracy(&triples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(field_accuracy("", ""), 100.0);
        assert_eq!(field_accuracy("abc", ""), 0.0);
        assert_eq!(field_accuracy("", "abc"), 0.0);
        assert_eq!(field_accuracy("abc", "Not found"), 0.0);
    }

    #[test]
    fn test_identical_after_normalisation() {
        assert_eq!(field_accuracy("Surat Undangan Rapat", "Surat Undangan Rapat"), 100.0);
        assert_eq!(field_accuracy("SURAT  undangan", "surat undangan"), 100.0);
        // fullwidth forms fold under NFKC
        assert_eq!(field_accuracy("ＨＫ.2.6", "HK.2.6"), 100.0);
    }

    #[test]
    fn test_partial_edit() {
        let score = field_accuracy("Surat Undangan Rapat", "Undangan Rapat Pimpinan");
        assert!(score > 40.0 && score < 90.0, "score {score}");
        assert_eq!(word_overlap("a b c", "b c d"), 2.0 / 3.0);
    }

    #[test]
    fn test_sentinel_excluded_from_document() {
        let doc = document_accuracy(&[
            ("sender", "Not found", "Ketua PA"),
            ("body_summary", "Undangan", "Undangan"),
            ("date", "2024-10-12", ""),
        ]);
        assert_eq!(doc.fields.len(), 2);
        assert_eq!(doc.overall, 50.0);
    }

    #[test]
    fn test_empty_document() {
        let doc = document_accuracy::<&str>(&[]);
        assert_eq!(doc.overall, 0.0);
        assert!(doc.fields.is_empty());
    }

    #[test]
    fn test_score_record() {
        let mut record = BTreeMap::new();
        record.insert("initial_sender".to_string(), "Ketua".to_string());
        record.insert("sender".to_string(), "Ketua".to_string());
        record.insert("initial_recipient".to_string(), "Not found".to_string());
        record.insert("recipient".to_string(), "Panitera".to_string());
        let doc = score_record(&record, SCORED_FIELDS);
        assert_eq!(doc.fields, vec![FieldAccuracy { field: "sender".into(), score: 100.0 }]);
        assert_eq!(doc.overall, 100.0);
    }
}
