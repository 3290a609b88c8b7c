//! Output record types.
//!
//! Inside the crate a missing value is [`FieldValue::Absent`]; it only turns
//! into the literal `"Not found"` when a record is serialised or flattened
//! into a string map for the persistence layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::classifier::Category;

/// Literal written for absent fields at the output boundary.
pub const NOT_FOUND: &str = "Not found";

/// A single extracted field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Found(String),
    #[default]
    Absent,
}

impl FieldValue {
    /// Wrap a trimmed value; blank input becomes `Absent`.
    pub fn found(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            FieldValue::Absent
        } else if trimmed.len() == value.len() {
            FieldValue::Found(value)
        } else {
            FieldValue::Found(trimmed.to_string())
        }
    }

    /// Parse a boundary string back, treating the sentinel and blanks as absent.
    pub fn from_output(value: &str) -> Self {
        if value.trim() == NOT_FOUND {
            FieldValue::Absent
        } else {
            FieldValue::found(value)
        }
    }

    pub fn from_option(value: Option<String>) -> Self {
        value.map(FieldValue::found).unwrap_or_default()
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FieldValue::Found(v) => Some(v.as_str()),
            FieldValue::Absent => None,
        }
    }

    /// Boundary representation.
    pub fn as_str(&self) -> &str {
        self.as_deref().unwrap_or(NOT_FOUND)
    }

    pub fn map<F: FnOnce(&str) -> String>(&self, f: F) -> Self {
        match self {
            FieldValue::Found(v) => FieldValue::found(f(v)),
            FieldValue::Absent => FieldValue::Absent,
        }
    }

    pub fn or_else<F: FnOnce() -> FieldValue>(self, f: F) -> Self {
        match self {
            FieldValue::Absent => f(),
            found => found,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        FieldValue::from_option(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldValue::from_output(&raw))
    }
}

/// Direction of a letter relative to the office digitising it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterKind {
    /// Surat Masuk; carries event metadata.
    #[default]
    Incoming,
    /// Surat Keluar.
    Outgoing,
}

impl LetterKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "incoming" | "masuk" | "surat_masuk" => Some(LetterKind::Incoming),
            "outgoing" | "keluar" | "surat_keluar" => Some(LetterKind::Outgoing),
            _ => None,
        }
    }
}

/// Event metadata found in invitations and hearing summons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub event_name: FieldValue,
    pub event_venue: FieldValue,
    pub event_date: FieldValue,
    pub event_time: FieldValue,
}

/// The structured record for one scanned letter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub letter_number: FieldValue,
    pub classification_code: FieldValue,
    pub document_category: Category,
    pub date: FieldValue,
    pub sender: FieldValue,
    pub recipient: FieldValue,
    pub body_summary: FieldValue,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventFields>,
}

impl ExtractionResult {
    /// Record with every field absent. Incoming letters get absent event fields too.
    pub fn empty(kind: LetterKind) -> Self {
        Self {
            letter_number: FieldValue::Absent,
            classification_code: FieldValue::Absent,
            document_category: Category::default(),
            date: FieldValue::Absent,
            sender: FieldValue::Absent,
            recipient: FieldValue::Absent,
            body_summary: FieldValue::Absent,
            event: match kind {
                LetterKind::Incoming => Some(EventFields::default()),
                LetterKind::Outgoing => None,
            },
        }
    }

    /// Flatten into the string map handed to the persistence layer.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: &FieldValue| {
            map.insert(key.to_string(), value.as_str().to_string());
        };
        put("letter_number", &self.letter_number);
        put("classification_code", &self.classification_code);
        put("date", &self.date);
        put("sender", &self.sender);
        put("recipient", &self.recipient);
        put("body_summary", &self.body_summary);
        if let Some(event) = &self.event {
            put("event_name", &event.event_name);
            put("event_venue", &event.event_venue);
            put("event_date", &event.event_date);
            put("event_time", &event.event_time);
        }
        map.insert(
            "document_category".to_string(),
            self.document_category.as_str().to_string(),
        );
        map
    }
}

/// Language guess for the normalised input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedLanguage {
    /// ISO 639-3 code, e.g. `ind`.
    pub code: &'static str,
    pub confidence: f64,
}

/// How each field of an [`ExtractionResult`] was obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Field name to the cascade rule that produced it.
    pub rules: BTreeMap<&'static str, &'static str>,
    pub letter_number_pattern: Option<&'static str>,
    /// Some components were found but the letter number was rejected.
    pub partial_letter_number: bool,
    /// Raw value seen by the last-resort recovery.
    pub letter_number_candidate: Option<String>,
    pub language: Option<DetectedLanguage>,
}

impl Diagnostics {
    pub fn record(&mut self, field: &'static str, rule: &'static str) {
        self.rules.insert(field, rule);
    }
}
