//! Document category from the classification-code prefix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Umum,
    Perkara,
    Kepegawaian,
    /// Leave requests; never produced by [`classify`].
    Cuti,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Umum => "Umum",
            Category::Perkara => "Perkara",
            Category::Kepegawaian => "Kepegawaian",
            Category::Cuti => "Cuti",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix table; first match wins.
const PREFIXES: &[(&str, Category)] = &[
    ("HM", Category::Umum),
    ("HK", Category::Perkara),
    ("KP", Category::Kepegawaian),
];

/// `HM` -> Umum, `HK` -> Perkara, `KP` -> Kepegawaian, anything else -> Umum.
pub fn classify(code: &str) -> Category {
    let code = code.trim().to_ascii_uppercase();
    PREFIXES
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .map(|(_, category)| *category)
        .unwrap_or_default()
}

pub fn classify_field(code: &FieldValue) -> Category {
    code.as_deref().map(classify).unwrap_or_default()
}
