//! Field extraction and accuracy scoring for OCR'd Indonesian office letters.
//!
//! Raw OCR text goes in; a fixed-shape record comes out (letter number,
//! classification code, category, date, sender, recipient, body summary and,
//! for incoming letters, event details). Every field is either a value or
//! `"Not found"`, and extraction never fails on malformed text.
//!
//! ```no_run
//! use rust_ocr_fields::{Dictionary, Extractor, LetterKind};
//!
//! let extractor = Extractor::new(Dictionary::builtin())?;
//! let extraction = extractor.extract("Nomor : 12/PAN.PA.W15-A12/HK.2.6/X/2024", LetterKind::Outgoing);
//! println!("{}", extraction.record.letter_number);
//! # Ok::<(), rust_ocr_fields::Error>(())
//! ```

use std::sync::OnceLock;

pub mod batch;
pub mod classifier;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod fields;
pub mod leave;
pub mod letter_number;
pub mod normalize;
pub mod record;
pub mod scoring;
pub mod word_breaker;

#[cfg(feature = "python")]
mod python;

pub use batch::{BatchOutput, BatchRecord, OcrEngine, SidecarText, process_directory};
pub use classifier::{Category, classify};
pub use dictionary::Dictionary;
pub use engine::{Extraction, Extractor, ExtractorOptions};
pub use error::{Error, Result};
pub use leave::LeaveRequest;
pub use record::{ExtractionResult, FieldValue, LetterKind, NOT_FOUND};
pub use scoring::{DocumentAccuracy, FieldAccuracy, document_accuracy, field_accuracy, score_record};
pub use word_breaker::break_words;

static BUILTIN: OnceLock<Extractor> = OnceLock::new();

fn builtin_extractor() -> Result<&'static Extractor> {
    if let Some(extractor) = BUILTIN.get() {
        return Ok(extractor);
    }
    let built = Extractor::new(Dictionary::builtin())?;
    Ok(BUILTIN.get_or_init(|| built))
}

/// Extract a letter with the builtin dictionary.
pub fn extract_letter(text: &str, kind: LetterKind) -> Result<ExtractionResult> {
    Ok(builtin_extractor()?.extract(text, kind).record)
}

/// Extract a leave-request form with the builtin dictionary.
pub fn extract_leave(text: &str) -> Result<LeaveRequest> {
    Ok(builtin_extractor()?.extract_leave(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_helpers() {
        let record = extract_letter("Nomor : 12/PAN.PA.W15-A12/KP.1.2/III/2023", LetterKind::Outgoing).unwrap();
        assert_eq!(record.letter_number.as_str(), "12/PAN.PA.W15-A12/KP.1.2/III/2023");
        assert_eq!(record.document_category, Category::Kepegawaian);

        let leave = extract_leave("").unwrap();
        assert_eq!(leave.document_category, Category::Cuti);
    }
}
