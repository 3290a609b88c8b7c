//! Letter-number ("Nomor surat") reconstruction.
//!
//! A registration number such as `1931/PAN.PA.W15-A12/HM2.1.4/X/2024` is
//! pulled out of noisy text by an ordered list of patterns. The first pattern
//! that matches wins; its captures are normalised and re-assembled into one
//! canonical string. Anything less than a complete set of components is
//! reported as absent.

use std::fmt;

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::fields::cascade::alternation;
use crate::normalize::normalize_structural;
use crate::record::FieldValue;

/// The twelve accepted month numerals.
pub const ROMAN_MONTHS: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

lazy_static! {
    // Typo-tolerant single-label recovery, only tried when the cascade is exhausted.
    static ref LAST_RESORT: Regex = Regex::new(r"(?i)Nomnor\s*[:.\-]?\s*([^/\n]+)").unwrap();
    static ref LEADING_DIGITS: Regex = Regex::new(r"^\(?(\d+)").unwrap();
}

/// How the capture groups of a [`NumberPattern`] map onto components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// seq, office prefix, classification, month, year; fixed office from the dictionary.
    Prefixed,
    /// seq, office prefix, office code, classification, month, year.
    Captured,
    /// seq, classification, month, year; prefix and office from the dictionary.
    Anchored,
    /// seq only.
    LabelOnly,
}

/// One entry of the cascade.
#[derive(Debug, Clone)]
pub struct NumberPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub layout: Layout,
}

/// Intermediate pieces of a letter number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LetterNumberComponents {
    pub sequence_number: Option<String>,
    pub office_code_part1: Option<String>,
    pub office_code_fixed: Option<String>,
    pub classification_code: Option<String>,
    pub month_roman: Option<String>,
    pub year: Option<String>,
}

impl LetterNumberComponents {
    /// Canonical `seq/part1.office/class/month/year`, or `None` unless every part is present.
    pub fn canonical(&self) -> Option<String> {
        let seq = self.sequence_number.as_deref()?;
        let month = self.month_roman.as_deref()?;
        let year = self.year.as_deref()?;
        let part1 = self.office_code_part1.as_deref()?.trim_end_matches('.');
        let office = self.office_code_fixed.as_deref()?;
        let class = self.classification_code.as_deref()?;
        if part1.is_empty() {
            return None;
        }
        Some(format!("{seq}/{part1}.{office}/{class}/{month}/{year}"))
    }

    fn any_present(&self) -> bool {
        self.sequence_number.is_some()
            || self.office_code_part1.is_some()
            || self.classification_code.is_some()
            || self.month_roman.is_some()
            || self.year.is_some()
    }
}

/// Outcome of [`LetterNumberReconstructor::reconstruct`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    pub letter_number: FieldValue,
    pub components: LetterNumberComponents,
    /// Cascade entry that matched, if any.
    pub pattern: Option<&'static str>,
    /// Components were found but not enough to assemble a number.
    pub partial: bool,
    /// Raw text captured by the last-resort recovery.
    pub candidate: Option<String>,
}

/// Upper-case a month capture and repair `1X` to `IX`. Only Roman months pass.
pub fn normalize_month(raw: &str) -> Option<String> {
    let month = raw.trim().to_uppercase().replace("1X", "IX");
    ROMAN_MONTHS.contains(&month.as_str()).then_some(month)
}

/// Month from a slash-delimited slot, where Arabic `1`..`12` is also accepted.
pub fn slot_month(raw: &str) -> Option<String> {
    if let Some(month) = normalize_month(raw) {
        return Some(month);
    }
    match raw.trim().parse::<usize>() {
        Ok(n) if (1..=12).contains(&n) => Some(ROMAN_MONTHS[n - 1].to_string()),
        _ => None,
    }
}

fn clean_code(raw: &str) -> Option<String> {
    let code = raw.trim().trim_matches('.');
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

fn group(caps: &Captures<'_>, idx: usize) -> Option<String> {
    caps.get(idx).and_then(|m| clean_code(m.as_str()))
}

fn year(caps: &Captures<'_>, idx: usize) -> Option<String> {
    caps.get(idx)
        .map(|m| m.as_str())
        .filter(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Build the office-code alternation: exact spelling plus one tolerating
/// spaces or a missing hyphen between its parts, e.g. `W15 A12`.
fn office_alternation(code: &str) -> String {
    let exact = regex::escape(code);
    let parts: Vec<String> = code.split('-').map(regex::escape).collect();
    if parts.len() > 1 {
        format!("(?:{}|{})", exact, parts.join(r"[-\s]*"))
    } else {
        format!("(?:{})", exact)
    }
}

/// Loose form of the office code's first part: `W15` also accepts `W` ... `15`.
fn loose_office_token(code: &str) -> String {
    let head = code.split('-').next().unwrap_or(code);
    let split = head.find(|c: char| c.is_ascii_digit());
    match split {
        Some(idx) if idx > 0 && head[idx..].bytes().all(|b| b.is_ascii_digit()) => format!(
            "(?:{}|{}.*?{})",
            regex::escape(head),
            regex::escape(&head[..idx]),
            regex::escape(&head[idx..])
        ),
        _ => format!("(?:{})", regex::escape(head)),
    }
}

/// Optional remainder of the office code after its first part, e.g. `-A12`.
fn office_tail(code: &str) -> String {
    match code.split_once('-') {
        Some((_, tail)) if !tail.is_empty() => format!(r"(?:[-\s]*{})?", regex::escape(tail)),
        _ => String::new(),
    }
}

/// Ordered letter-number cascade compiled from a [`Dictionary`].
pub struct LetterNumberReconstructor {
    patterns: Vec<NumberPattern>,
    office_code: String,
    default_prefix: String,
}

impl LetterNumberReconstructor {
    pub fn new(dict: &Dictionary) -> Result<Self> {
        let label = format!(r"(?i)\b(?:{})\b\s*[:：.\-]{{0,2}}\s*", alternation(dict.number_labels()));
        let office = office_alternation(dict.office_code());
        let loose_office = loose_office_token(dict.office_code());
        let office_tail = office_tail(dict.office_code());

        let specs: Vec<(&'static str, String, Layout)> = vec![
            (
                "prefixed_strict",
                format!(
                    r"{label}(\d+)[/\s-]+([A-Za-z.]+)\.?{office}[/\s-]+([A-Z0-9.]+)[/\s-]+(\d?[XIV]+)[/\s-]+(\d{{4}})"
                ),
                Layout::Prefixed,
            ),
            (
                "prefixed_spaced",
                format!(
                    r"{label}\(?(\d+)\s*[/\s-]+\s*([A-Za-z.]+)\s*\.?\s*{office}\s*[/\s-]+\s*([A-Z0-9.]+)\s*[/\s-]+\s*([IVX]+)\s*[/\s-]+\s*(\d{{4}})\)?"
                ),
                Layout::Prefixed,
            ),
            (
                "captured_five_part",
                format!(
                    r"{label}(\d+)/([A-Za-z0-9.\-]+)\.([A-Za-z0-9\-]+)/([A-Za-z0-9\-.]+)/([A-Za-z0-9]+)/(\d{{4}})"
                ),
                Layout::Captured,
            ),
            (
                "anchored_loose",
                format!(r"{label}(\d+).*?{office}.*?(?-i:([A-Z0-9.]+)).*?(?-i:([IVX]+)).*?(\d{{4}})"),
                Layout::Anchored,
            ),
            (
                "anchored_variant",
                format!(
                    r"{label}(\d+).*?{loose_office}{office_tail}[/\s-]+(?-i:([A-Z0-9.]+))[/\s-]+(?-i:(1?[IVX]+))\b.*?(\d{{4}})"
                ),
                Layout::Anchored,
            ),
            ("label_digits", format!(r"{label}\(?(\d+)"), Layout::LabelOnly),
        ];

        let mut patterns = Vec::with_capacity(specs.len());
        for (name, source, layout) in specs {
            patterns.push(NumberPattern {
                name,
                regex: Regex::new(&source)?,
                layout,
            });
        }

        Ok(Self {
            patterns,
            office_code: dict.office_code().to_string(),
            default_prefix: dict.default_office_prefix().to_string(),
        })
    }

    /// Names of the cascade entries in the order they are tried.
    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.name).collect()
    }

    pub fn patterns(&self) -> &[NumberPattern] {
        &self.patterns
    }

    /// Run the cascade over `text`. Never fails; absence is reported in the result.
    pub fn reconstruct(&self, text: &str) -> Reconstruction {
        let text = normalize_structural(text);

        for pattern in &self.patterns {
            let Some(caps) = pattern.regex.captures(&text) else {
                trace!("letter number pattern {} did not match", pattern.name);
                continue;
            };
            let components = self.components(pattern.layout, &caps);
            let canonical = components.canonical();
            debug!(
                "letter number pattern {} matched: {:?}",
                pattern.name,
                caps.get(0).map(|m| m.as_str())
            );
            return Reconstruction {
                partial: canonical.is_none() && components.any_present(),
                letter_number: FieldValue::from_option(canonical),
                components,
                pattern: Some(pattern.name),
                candidate: None,
            };
        }

        // last resort: a bare value after the misspelt label
        if let Some(caps) = LAST_RESORT.captures(&text) {
            let candidate = caps[1].trim().to_string();
            if !candidate.is_empty() {
                debug!("letter number last-resort candidate: {:?}", candidate);
                let components = LetterNumberComponents {
                    sequence_number: LEADING_DIGITS
                        .captures(&candidate)
                        .map(|c| c[1].to_string()),
                    ..Default::default()
                };
                return Reconstruction {
                    letter_number: FieldValue::Absent,
                    partial: components.any_present(),
                    components,
                    pattern: Some("last_resort"),
                    candidate: Some(candidate),
                };
            }
        }

        Reconstruction::default()
    }

    fn is_office_part(&self, code: &str) -> bool {
        self.office_code
            .split('-')
            .any(|part| part.eq_ignore_ascii_case(code))
    }

    fn components(&self, layout: Layout, caps: &Captures<'_>) -> LetterNumberComponents {
        let month = |idx: usize| caps.get(idx).and_then(|m| normalize_month(m.as_str()));
        let slot = |idx: usize| caps.get(idx).and_then(|m| slot_month(m.as_str()));
        match layout {
            Layout::Prefixed => LetterNumberComponents {
                sequence_number: group(caps, 1),
                office_code_part1: group(caps, 2),
                office_code_fixed: Some(self.office_code.clone()),
                classification_code: group(caps, 3),
                month_roman: month(4),
                year: year(caps, 5),
            },
            Layout::Captured => LetterNumberComponents {
                sequence_number: group(caps, 1),
                office_code_part1: group(caps, 2),
                office_code_fixed: group(caps, 3),
                classification_code: group(caps, 4),
                month_roman: slot(5),
                year: year(caps, 6),
            },
            Layout::Anchored => LetterNumberComponents {
                sequence_number: group(caps, 1),
                office_code_part1: Some(self.default_prefix.clone()),
                office_code_fixed: Some(self.office_code.clone()),
                // a piece of the office code is never a classification
                classification_code: group(caps, 2).filter(|code| !self.is_office_part(code)),
                month_roman: month(3),
                year: year(caps, 4),
            },
            Layout::LabelOnly => LetterNumberComponents {
                sequence_number: group(caps, 1),
                ..Default::default()
            },
        }
    }
}

impl fmt::Debug for LetterNumberReconstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LetterNumberReconstructor")
            .field("patterns", &self.pattern_names())
            .field("office_code", &self.office_code)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstructor() -> LetterNumberReconstructor {
        LetterNumberReconstructor::new(&Dictionary::builtin()).unwrap()
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(
            reconstructor().pattern_names(),
            vec![
                "prefixed_strict",
                "prefixed_spaced",
                "captured_five_part",
                "anchored_loose",
                "anchored_variant",
                "label_digits"
            ]
        );
    }

    #[test]
    fn test_strict_number() {
        let r = reconstructor().reconstruct("Nomor : 1931/PAN.PA.W15-A12/HM2.1.4/X/2024");
        assert_eq!(r.letter_number.as_str(), "1931/PAN.PA.W15-A12/HM2.1.4/X/2024");
        assert_eq!(r.pattern, Some("prefixed_strict"));
        assert_eq!(r.components.classification_code.as_deref(), Some("HM2.1.4"));
        assert!(!r.partial);
    }

    #[test]
    fn test_spaced_number_is_rejoined() {
        let r = reconstructor().reconstruct("No. 45 / PAN.PA.W15 A12 / HK.2.6 / 1X / 2023");
        assert_eq!(r.letter_number.as_str(), "45/PAN.PA.W15-A12/HK.2.6/IX/2023");
    }

    #[test]
    fn test_other_office_is_captured() {
        let r = reconstructor().reconstruct("Nomor: 77/SEK.PTA.W9-A/KP1.2/III/2022");
        assert_eq!(r.pattern, Some("captured_five_part"));
        assert_eq!(r.letter_number.as_str(), "77/SEK.PTA.W9-A/KP1.2/III/2022");
    }

    #[test]
    fn test_anchored_uses_default_prefix() {
        let r = reconstructor().reconstruct("Nomor 12 xx W15-A12 ~ HM2.1 ~ XI ~ 2024");
        assert_eq!(r.pattern, Some("anchored_loose"));
        assert_eq!(r.letter_number.as_str(), "12/PAN.PA.W15-A12/HM2.1/XI/2024");
    }

    #[test]
    fn test_label_only_is_partial() {
        let r = reconstructor().reconstruct("Nomor : 1931 tanpa kode");
        assert!(r.letter_number.is_absent());
        assert!(r.partial);
        assert_eq!(r.components.sequence_number.as_deref(), Some("1931"));
    }

    #[test]
    fn test_unknown_month_rejects_number() {
        let r = reconstructor().reconstruct("Nomor : 1931/PAN.PA.W15-A12/HM2.1.4/XIV/2024");
        assert!(r.letter_number.is_absent());
        assert!(r.partial);
        assert_eq!(r.components.year.as_deref(), Some("2024"));
    }

    #[test]
    fn test_no_label_is_absent() {
        let r = reconstructor().reconstruct("1931/PAN.PA.W15-A12/HM2.1.4/X/2024");
        assert!(r.letter_number.is_absent());
        assert_eq!(r.pattern, None);
        assert!(!r.partial);
    }

    #[test]
    fn test_last_resort_candidate() {
        let r = reconstructor().reconstruct("Nomnor : abc/def");
        assert!(r.letter_number.is_absent());
        assert_eq!(r.pattern, Some("last_resort"));
        assert_eq!(r.candidate.as_deref(), Some("abc"));
    }

    #[test]
    fn test_normalize_month() {
        assert_eq!(normalize_month("x").as_deref(), Some("X"));
        assert_eq!(normalize_month("1X").as_deref(), Some("IX"));
        assert_eq!(normalize_month("10"), None);
        assert_eq!(normalize_month("IIII"), None);
        assert_eq!(slot_month("10").as_deref(), Some("X"));
        assert_eq!(slot_month("13"), None);
    }

    #[test]
    fn test_captured_slot_accepts_arabic_month() {
        let r = reconstructor().reconstruct("Nomor: 77/SEK.PTA.W9-A/KP1.2/3/2022");
        assert_eq!(r.pattern, Some("captured_five_part"));
        assert_eq!(r.letter_number.as_str(), "77/SEK.PTA.W9-A/KP1.2/III/2022");
    }

    #[test]
    fn test_office_tail_is_not_a_classification() {
        for text in [
            "Nomor: 12 tgl W15-A12 HM 2 tahun 2024",
            "No. 7 W15-A12 KP.1 2024",
            "Nomor 3 W15 A12 X 2024",
        ] {
            let r = reconstructor().reconstruct(text);
            assert!(r.letter_number.is_absent(), "{text}");
            assert_ne!(r.components.classification_code.as_deref(), Some("A12"), "{text}");
        }
    }

    #[test]
    fn test_stray_digit_is_not_a_month() {
        let r = reconstructor().reconstruct("Nomor 45 kantor W15 HK 3 2023");
        assert!(r.letter_number.is_absent());
        assert_eq!(r.components.month_roman, None);
        assert_eq!(r.components.sequence_number.as_deref(), Some("45"));
    }

    #[test]
    fn test_loose_office_variant() {
        let r = reconstructor().reconstruct("Nomor 45 kantor W 15 A12 / HK.2.6 / XI hal 2023");
        assert_eq!(r.pattern, Some("anchored_variant"));
        assert_eq!(r.letter_number.as_str(), "45/PAN.PA.W15-A12/HK.2.6/XI/2023");
    }
}
