//! Property tests: totality, idempotent normalisation, scorer bounds,
//! word-breaker safety.

use std::sync::OnceLock;

use proptest::prelude::*;

use rust_ocr_fields::normalize::{normalize, normalize_structural};
use rust_ocr_fields::{Dictionary, Extractor, LetterKind, break_words, field_accuracy};

const REQUIRED_KEYS: &[&str] = &[
    "letter_number",
    "classification_code",
    "document_category",
    "date",
    "sender",
    "recipient",
    "body_summary",
    "event_name",
    "event_venue",
    "event_date",
    "event_time",
];

fn extractor() -> &'static Extractor {
    static EXTRACTOR: OnceLock<Extractor> = OnceLock::new();
    EXTRACTOR.get_or_init(|| Extractor::new(Dictionary::builtin()).unwrap())
}

fn letterish() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("Nomor : ".to_string()),
            Just("Perihal : ".to_string()),
            Just("Kepada Yth.\n".to_string()),
            Just("/PAN.PA.W15-A12/".to_string()),
            Just(" / ".to_string()),
            Just("X/2024".to_string()),
            "[0-9]{1,4}",
            "[A-Za-z .,:]{0,20}",
            "\\PC{0,10}",
            Just("\n".to_string()),
        ],
        0..20,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn extraction_is_total(text in any::<String>()) {
        let map = extractor().extract(&text, LetterKind::Incoming).record.to_map();
        for key in REQUIRED_KEYS {
            let value = map.get(*key);
            prop_assert!(value.is_some(), "missing {}", key);
            prop_assert!(!value.unwrap().trim().is_empty(), "blank {}", key);
        }
    }

    #[test]
    fn extraction_is_total_on_letter_fragments(text in letterish()) {
        let extraction = extractor().extract(&text, LetterKind::Outgoing);
        prop_assert_eq!(extraction.record.to_map().len(), 7);
        if extraction.components.month_roman.is_none() || extraction.components.year.is_none() {
            prop_assert!(extraction.record.letter_number.is_absent());
        }
    }

    #[test]
    fn normalize_is_idempotent(text in letterish()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);

        let once = normalize_structural(&text);
        prop_assert_eq!(normalize_structural(&once), once);
    }

    #[test]
    fn field_accuracy_is_bounded(a in "[a-z ]{0,30}", b in "[a-z ]{0,30}") {
        let score = field_accuracy(&a, &b);
        prop_assert!((0.0..=100.0).contains(&score));
        prop_assert_eq!(field_accuracy(&a, &a), 100.0);
    }

    #[test]
    fn word_breaker_leaves_unknown_tokens(token in "[qxz]{8,16}") {
        let dict = Dictionary::builtin();
        prop_assert_eq!(break_words(&dict, &token), token);
    }
}
