//! Recipient ("Kepada Yth.") extraction with word-boundary repair.

use lazy_static::lazy_static;
use regex::Regex;

use super::cascade::{Cascade, Hit, Rule};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::record::LetterKind;

lazy_static! {
    static ref KEPADA_YTH: Regex =
        Regex::new(r"(?i)\bKepada[:\s]*(?:Yth|YM)\b\.?[ \t]*[:：]?\s*([^\n]+)").unwrap();
    static ref YTH: Regex = Regex::new(r"(?i)\b(?:Yth|YM)\b\.?[ \t]*[:：]?\s*([^\n]+)").unwrap();
    static ref KEPADA: Regex = Regex::new(r"(?i)\bKepada[ \t]*[:：]?\s+([^\n]+)").unwrap();

    // outgoing letters put a colon after the salutation
    static ref KEPADA_YTH_COLON_NEXT_LINE: Regex =
        Regex::new(r"(?i)\bKepada\s*(?:Yth\.?|YM\.?)\s*:[ \t]*\n\s*([^\n]+)").unwrap();
    static ref KEPADA_YTH_COLON: Regex =
        Regex::new(r"(?i)\bKepada\s*(?:Yth\.?|YM\.?)\s*:[ \t]*([^\n]+)").unwrap();

    // Ordered boundary repairs, applied after acronyms are protected.
    static ref REPAIR_RULES: Vec<(&'static str, Regex, &'static str)> = vec![
        // "KetuaPengadilan" -> "Ketua Pengadilan"
        ("lower_upper", Regex::new(r"([a-z])([A-Z])").unwrap(), "$1 $2"),
        // "PENGADILANAgama" -> "PENGADILAN Agama"
        ("caps_run_word", Regex::new(r"([A-Z]{2,})([A-Z][a-z])").unwrap(), "$1 $2"),
        // "Yth.Bapak" -> "Yth. Bapak"
        ("title_dot", Regex::new(r"\b(Yth|Bpk|Bapak|Ibu|Sdr|Sdri)\.(\S)").unwrap(), "$1. $2"),
    ];
}

const STOPWORDS: &[&str] = &["dengan hormat", "assalamu"];

/// First code point of the private-use block used for acronym placeholders.
const PLACEHOLDER_BASE: u32 = 0xE000;
const PLACEHOLDER_LAST: u32 = 0xF8FF;

/// Pins institution acronyms before the repair table runs, then restores them.
#[derive(Debug, Clone)]
pub struct BoundaryRepair {
    acronyms: Vec<(String, Regex)>,
}

impl BoundaryRepair {
    pub fn new<S: AsRef<str>>(acronyms: &[S]) -> Result<Self> {
        let mut pinned = Vec::new();
        for acronym in acronyms {
            let canonical = acronym.as_ref().trim().to_uppercase();
            if canonical.is_empty() {
                continue;
            }
            let escaped = regex::escape(&canonical);
            // short acronyms are too ambiguous to pull out of glued text
            let source = if canonical.chars().count() >= 4 {
                format!(r"\b(?i:{escaped})(\b|[A-Z])")
            } else {
                format!(r"\b{escaped}()\b")
            };
            pinned.push((canonical, Regex::new(&source)?));
        }
        // longer spellings first so "PTUN" wins over "PTA"
        pinned.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(Self { acronyms: pinned })
    }

    pub fn repair(&self, value: &str) -> String {
        let placeholders = self.placeholders(value);
        let mut text = value.to_string();
        for ((_, pattern), placeholder) in self.acronyms.iter().zip(&placeholders) {
            text = pattern
                .replace_all(&text, |caps: &regex::Captures| format!("{}{}", placeholder, &caps[1]))
                .into_owned();
        }

        for (_name, pattern, replacement) in REPAIR_RULES.iter() {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }

        self.restore(&text, &placeholders)
    }

    /// One private-use char per acronym, skipping any already present in `value`.
    fn placeholders(&self, value: &str) -> Vec<char> {
        (PLACEHOLDER_BASE..=PLACEHOLDER_LAST)
            .filter_map(char::from_u32)
            .filter(|c| !value.contains(*c))
            .take(self.acronyms.len())
            .collect()
    }

    fn restore(&self, text: &str, placeholders: &[char]) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let acronym = placeholders
                .iter()
                .position(|p| *p == c)
                .and_then(|idx| self.acronyms.get(idx));
            match acronym {
                Some((canonical, _)) => {
                    out.push_str(canonical);
                    if chars.peek().is_some_and(|next| next.is_alphanumeric()) {
                        out.push(' ');
                    }
                }
                None => out.push(c),
            }
        }
        out
    }

    pub fn is_acronym(&self, word: &str) -> bool {
        self.acronyms
            .iter()
            .any(|(canonical, _)| canonical.eq_ignore_ascii_case(word))
    }
}

#[derive(Debug, Clone)]
pub struct RecipientExtractor {
    incoming: Cascade,
    outgoing: Cascade,
    repair: BoundaryRepair,
}

impl RecipientExtractor {
    pub fn new(dict: &Dictionary) -> Result<Self> {
        let incoming_rules = vec![
            Rule::new("kepada_yth", &KEPADA_YTH),
            Rule::new("yth", &YTH),
            Rule::new("kepada", &KEPADA),
        ];
        let mut outgoing_rules = vec![
            Rule::new("kepada_yth_colon_next_line", &KEPADA_YTH_COLON_NEXT_LINE),
            Rule::new("kepada_yth_colon", &KEPADA_YTH_COLON),
        ];
        outgoing_rules.extend(incoming_rules.iter().cloned());

        Ok(Self {
            incoming: Cascade::new("recipient", incoming_rules).with_stopwords(STOPWORDS),
            outgoing: Cascade::new("recipient", outgoing_rules).with_stopwords(STOPWORDS),
            repair: BoundaryRepair::new(dict.institution_acronyms())?,
        })
    }

    pub fn rule_names(&self, kind: LetterKind) -> Vec<&'static str> {
        self.cascade(kind).rule_names()
    }

    pub fn extract(&self, text: &str, kind: LetterKind) -> Option<Hit> {
        let hit = self.cascade(kind).run(text)?;
        let repaired = self.repair.repair(&hit.value);
        let value = self.normalize_case(&repaired);
        Some(Hit { rule: hit.rule, value })
    }

    fn cascade(&self, kind: LetterKind) -> &Cascade {
        match kind {
            LetterKind::Incoming => &self.incoming,
            LetterKind::Outgoing => &self.outgoing,
        }
    }

    /// All-caps values become title case; short words and acronyms keep their caps.
    fn normalize_case(&self, value: &str) -> String {
        if value.chars().any(char::is_lowercase) || !value.chars().any(char::is_alphabetic) {
            return value.to_string();
        }
        value
            .split(' ')
            .map(|word| {
                let core = word.trim_matches(|c: char| !c.is_alphanumeric());
                if core.chars().count() <= 3 || self.repair.is_acronym(core) {
                    word.to_string()
                } else {
                    title_case(word)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut seen_letter = false;
    for c in word.chars() {
        if c.is_alphabetic() && !seen_letter {
            out.extend(c.to_uppercase());
            seen_letter = true;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
