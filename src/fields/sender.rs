//! Sender extraction.
//!
//! The signature block sits near the end of a letter, so lines are scanned
//! bottom to top for a sender-role keyword. Anything below the last
//! carbon-copy header ("Tembusan") is ignored, as are salutation lines.
//! Labelled forms ("Dari :", "Pengirim :") are only a secondary fallback.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::cascade::{Cascade, Hit, Rule, alternation, clean_capture};
use crate::dictionary::Dictionary;
use crate::error::Result;

lazy_static! {
    static ref DARI: Regex = Regex::new(r"(?im)^\s*Dari\s*[:：]\s*([^\n]+)").unwrap();
    static ref PENGIRIM: Regex = Regex::new(r"(?i)\bPengirim\s*[:：]\s*([^\n]+)").unwrap();
}

pub const KEYWORD_BOTTOM_UP: &str = "keyword_bottom_up";

const CC_HEADER: &str = "tembusan";
const SALUTATIONS: &[&str] = &["yth", "kepada"];

#[derive(Debug, Clone)]
pub struct SenderExtractor {
    keyword: Option<Regex>,
    labelled: Cascade,
}

impl SenderExtractor {
    pub fn new(dict: &Dictionary) -> Result<Self> {
        let keywords = dict.sender_keywords();
        let keyword = if keywords.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"(?i)\b(?:{})\b", alternation(keywords)))?)
        };
        let labelled = Cascade::new(
            "sender",
            vec![Rule::new("dari", &DARI), Rule::new("pengirim", &PENGIRIM)],
        )
        .with_stopwords(&["dengan hormat"]);
        Ok(Self { keyword, labelled })
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        let mut names = vec![KEYWORD_BOTTOM_UP];
        names.extend(self.labelled.rule_names());
        names
    }

    pub fn extract(&self, text: &str) -> Option<Hit> {
        self.scan_bottom_up(text).or_else(|| self.labelled.run(text))
    }

    fn scan_bottom_up(&self, text: &str) -> Option<Hit> {
        let keyword = self.keyword.as_ref()?;
        let lines: Vec<&str> = text.lines().collect();
        let end = lines
            .iter()
            .rposition(|line| line.to_lowercase().contains(CC_HEADER))
            .unwrap_or(lines.len());

        for line in lines[..end].iter().rev() {
            let lower = line.to_lowercase();
            if SALUTATIONS.iter().any(|s| lower.contains(s)) {
                continue;
            }
            let Some(m) = keyword.find(line) else {
                continue;
            };
            let value = clean_capture(&line[m.start()..]);
            if !value.is_empty() {
                debug!("sender: keyword {:?} in line {:?}", m.as_str(), line);
                return Some(Hit {
                    rule: KEYWORD_BOTTOM_UP,
                    value,
                });
            }
        }
        None
    }
}
