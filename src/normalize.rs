//! Whitespace normalisation for raw OCR text.
//!
//! Neither pass ever rewrites a character: `I`/`l`/`1`, `O`/`0` and friends
//! are left exactly as the OCR engine produced them.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HORIZONTAL_RUN: Regex = Regex::new(r"[ \t\u{a0}]+").unwrap();

    // Re-glue letter-number fragments that OCR split with stray spaces.
    // Each entry only ever removes whitespace.
    static ref STRUCTURAL_PATTERNS: Vec<(&'static str, Regex, &'static str)> = vec![
        // "1931 / PAN.PA" -> "1931/PAN.PA"
        (
            "slash_spacing",
            Regex::new(r"([A-Za-z0-9.\-])(?:[ \t]+/[ \t]*|/[ \t]+)([A-Za-z0-9.\-])").unwrap(),
            "$1/$2",
        ),
        // "PAN .PA" / "PAN . PA" -> "PAN.PA"
        (
            "dot_spacing",
            Regex::new(r"([A-Z0-9])[ \t]+\.[ \t]*([A-Z0-9])").unwrap(),
            "$1.$2",
        ),
    ];
}

/// Light pass: drop carriage returns, collapse horizontal whitespace runs to
/// one space and trim every line. Line breaks (blank lines included) survive.
pub fn normalize_light(text: &str) -> String {
    let text = text.replace('\r', "");
    text.split('\n')
        .map(|line| HORIZONTAL_RUN.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Structural pass: the light pass plus re-joining of tokens split around
/// `/` and `.` separators. Runs to a fixpoint so it is idempotent.
pub fn normalize_structural(text: &str) -> String {
    structural_internal(&normalize_light(text)).0
}

/// Default normaliser used by the field extractors.
pub fn normalize(text: &str) -> String {
    normalize_light(text)
}

fn structural_internal(text: &str) -> (String, u64) {
    let mut result = text.to_string();
    let mut total_subs: u64 = 0;

    loop {
        let mut changed = false;
        for (_name, pattern, replacement) in STRUCTURAL_PATTERNS.iter() {
            let count = pattern.find_iter(&result).count();
            if count > 0 {
                result = pattern.replace_all(&result, *replacement).into_owned();
                total_subs += count as u64;
                changed = true;
            }
        }
        // every substitution shortens the text, so this terminates
        if !changed {
            break;
        }
    }

    (result, total_subs)
}
