//! Shared first-match-wins cascade machinery.
//!
//! A [`Cascade`] is plain data: an ordered list of named [`Rule`]s. Each rule
//! is tried once, top to bottom. The first capture that survives line
//! truncation and the stopword filter is the field value.

use log::{debug, trace};
use regex::Regex;

/// One named pattern. Group 1 is the value; without groups the whole match is.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    pub regex: Regex,
}

impl Rule {
    pub fn new(name: &'static str, regex: &Regex) -> Self {
        Self {
            name,
            regex: regex.clone(),
        }
    }
}

/// A value accepted by a cascade, tagged with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub rule: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Cascade {
    field: &'static str,
    rules: Vec<Rule>,
    stopwords: Vec<String>,
}

impl Cascade {
    pub fn new(field: &'static str, rules: Vec<Rule>) -> Self {
        Self {
            field,
            rules,
            stopwords: Vec::new(),
        }
    }

    /// Reject captures containing any of these (case-insensitive substring).
    pub fn with_stopwords<S: AsRef<str>>(mut self, stopwords: &[S]) -> Self {
        self.stopwords = stopwords
            .iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn run(&self, text: &str) -> Option<Hit> {
        for rule in &self.rules {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let raw = caps.get(1).or_else(|| caps.get(0)).map_or("", |m| m.as_str());
            let value = clean_capture(raw);
            if value.is_empty() {
                trace!("{}: rule {} captured nothing", self.field, rule.name);
                continue;
            }
            if self.has_stopword(&value) {
                trace!("{}: rule {} rejected {:?}", self.field, rule.name, value);
                continue;
            }
            debug!("{}: rule {} matched {:?}", self.field, rule.name, value);
            return Some(Hit {
                rule: rule.name,
                value,
            });
        }
        None
    }

    fn has_stopword(&self, value: &str) -> bool {
        let lower = value.to_lowercase();
        self.stopwords.iter().any(|s| lower.contains(s.as_str()))
    }
}

/// Keep only the first line of a capture and strip label punctuation.
pub fn clean_capture(raw: &str) -> String {
    let line = raw.split('\n').next().unwrap_or("");
    line.trim()
        .trim_matches(|c: char| matches!(c, ':' | '：' | ',' | ';') || c.is_whitespace())
        .to_string()
}

/// First line with at least `min_words` words and no boilerplate token.
pub fn fallback_line<S: AsRef<str>>(text: &str, min_words: usize, boilerplate: &[S]) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().any(char::is_alphabetic))
        .filter(|line| line.split_whitespace().count() >= min_words)
        .find(|line| {
            let lower = line.to_lowercase();
            !boilerplate
                .iter()
                .any(|token| lower.contains(&token.as_ref().to_lowercase()))
        })
        .map(clean_capture)
        .filter(|line| !line.is_empty())
}

/// Regex alternation over literal spellings, longest first so that a short
/// spelling never shadows a longer one sharing its prefix.
pub fn alternation<S: AsRef<str>>(items: &[S]) -> String {
    let mut spellings: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();
    spellings.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    spellings.dedup();
    spellings
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade() -> Cascade {
        Cascade::new(
            "test",
            vec![
                Rule::new("first", &Regex::new(r"A:\s*(.*)").unwrap()),
                Rule::new("second", &Regex::new(r"B:\s*(.*)").unwrap()),
            ],
        )
        .with_stopwords(&["hormat"])
    }

    #[test]
    fn test_first_rule_wins() {
        let hit = cascade().run("B: bee\nA: ay").unwrap();
        assert_eq!(hit, Hit { rule: "first", value: "ay".into() });
    }

    #[test]
    fn test_stopword_falls_through() {
        let hit = cascade().run("A: Dengan Hormat\nB: bee").unwrap();
        assert_eq!(hit.rule, "second");
        assert!(cascade().run("nothing here").is_none());
    }

    #[test]
    fn test_clean_capture() {
        assert_eq!(clean_capture(" : value ;\nnext"), "value");
        assert_eq!(clean_capture("\n"), "");
    }

    #[test]
    fn test_fallback_line_skips_boilerplate() {
        let text = "Dengan hormat kami sampaikan bahwa\nrapat akan dilaksanakan pada hari Senin\nok";
        assert_eq!(
            fallback_line(text, 5, &["dengan hormat"]).as_deref(),
            Some("rapat akan dilaksanakan pada hari Senin")
        );
        assert_eq!(fallback_line("a b", 5, &["x"]), None);
    }

    #[test]
    fn test_alternation_longest_first() {
        assert_eq!(alternation(&["No", "Nomor", "No."]), r"Nomor|No\.|No");
    }
}
