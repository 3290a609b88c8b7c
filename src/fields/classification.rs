//! Standalone classification-code recovery, used when the letter number did
//! not yield one.

use lazy_static::lazy_static;
use regex::Regex;

use super::cascade::Hit;
use crate::letter_number::LetterNumberComponents;

lazy_static! {
    static ref STANDALONE_CODE: Regex =
        Regex::new(r"(?i)\b((?:HM|HK|KP)[ \t]*\.?[ \t]*\d+(?:[ \t]*\.[ \t]*\d+)*)\b").unwrap();
}

pub const FROM_LETTER_NUMBER: &str = "letter_number_component";
pub const STANDALONE: &str = "standalone_code";

/// Prefer the component from the letter number, else an `HM`/`HK`/`KP` code anywhere in the text.
pub fn extract(text: &str, components: &LetterNumberComponents) -> Option<Hit> {
    if let Some(code) = components.classification_code.as_deref() {
        return Some(Hit {
            rule: FROM_LETTER_NUMBER,
            value: code.to_string(),
        });
    }
    let caps = STANDALONE_CODE.captures(text)?;
    let code: String = caps[1]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    Some(Hit {
        rule: STANDALONE,
        value: code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_wins() {
        let components = LetterNumberComponents {
            classification_code: Some("HM2.1.4".into()),
            ..Default::default()
        };
        let hit = extract("kode HK.2.6", &components).unwrap();
        assert_eq!(hit.rule, FROM_LETTER_NUMBER);
        assert_eq!(hit.value, "HM2.1.4");
    }

    #[test]
    fn test_standalone_code() {
        let hit = extract("Klasifikasi: hk . 2.6 arsip", &LetterNumberComponents::default()).unwrap();
        assert_eq!(hit.value, "HK.2.6");
        assert!(extract("tanpa kode", &LetterNumberComponents::default()).is_none());
    }
}
