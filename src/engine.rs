//! The extraction pipeline: normalise, reconstruct the letter number, run the
//! field cascades, word-break sender/body, classify.

use log::debug;

use crate::classifier::classify_field;
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::fields::cascade::Hit;
use crate::fields::{
    BodyExtractor, DateExtractor, EventExtractor, RecipientExtractor, SenderExtractor,
    classification,
};
use crate::leave::{LeaveExtractor, LeaveRequest};
use crate::letter_number::{LetterNumberComponents, LetterNumberReconstructor};
use crate::normalize::normalize_light;
use crate::record::{
    DetectedLanguage, Diagnostics, EventFields, ExtractionResult, FieldValue, LetterKind,
};
use crate::word_breaker::{DEFAULT_MIN_LEN, DEFAULT_MIN_PIECE, WordBreaker};

/// Tunables for an [`Extractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorOptions {
    /// Minimum words for the body "first substantial line" fallback.
    pub fallback_min_words: usize,
    /// Tokens shorter than this are never word-broken.
    pub min_token_len: usize,
    /// Shortest piece a split may produce.
    pub min_piece_len: usize,
    /// Record a language guess in the diagnostics.
    pub detect_language: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            fallback_min_words: 5,
            min_token_len: DEFAULT_MIN_LEN,
            min_piece_len: DEFAULT_MIN_PIECE,
            detect_language: true,
        }
    }
}

impl ExtractorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_min_words(mut self, words: usize) -> Self {
        self.fallback_min_words = words.max(1);
        self
    }

    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    pub fn with_min_piece_len(mut self, len: usize) -> Self {
        self.min_piece_len = len;
        self
    }

    pub fn with_language_detection(mut self, enabled: bool) -> Self {
        self.detect_language = enabled;
        self
    }
}

/// A record plus what produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub record: ExtractionResult,
    pub components: LetterNumberComponents,
    pub diagnostics: Diagnostics,
}

/// Owns the dictionary and every compiled cascade. Build once, share freely.
pub struct Extractor {
    dictionary: Dictionary,
    options: ExtractorOptions,
    letter_numbers: LetterNumberReconstructor,
    body: BodyExtractor,
    recipient: RecipientExtractor,
    sender: SenderExtractor,
    dates: DateExtractor,
    event: EventExtractor,
    leave: LeaveExtractor,
}

impl Extractor {
    pub fn new(dictionary: Dictionary) -> Result<Self> {
        Self::with_options(dictionary, ExtractorOptions::default())
    }

    pub fn with_options(dictionary: Dictionary, options: ExtractorOptions) -> Result<Self> {
        let extractor = Self {
            letter_numbers: LetterNumberReconstructor::new(&dictionary)?,
            body: BodyExtractor::new(&dictionary, options.fallback_min_words),
            recipient: RecipientExtractor::new(&dictionary)?,
            sender: SenderExtractor::new(&dictionary)?,
            dates: DateExtractor::new(&dictionary)?,
            event: EventExtractor::new(),
            leave: LeaveExtractor::new(&dictionary)?,
            dictionary,
            options,
        };
        debug!("Extractor ready: {}", extractor.dictionary.stats());
        Ok(extractor)
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    pub fn letter_numbers(&self) -> &LetterNumberReconstructor {
        &self.letter_numbers
    }

    pub fn dates(&self) -> &DateExtractor {
        &self.dates
    }

    pub fn word_breaker(&self) -> WordBreaker<'_> {
        WordBreaker::new(&self.dictionary)
            .with_min_len(self.options.min_token_len)
            .with_min_piece(self.options.min_piece_len)
    }

    /// Extract a letter. Total: any input, including `""`, yields a full record.
    pub fn extract(&self, text: &str, kind: LetterKind) -> Extraction {
        let text = normalize_light(text);
        let breaker = self.word_breaker();
        let mut diagnostics = Diagnostics::default();

        if self.options.detect_language {
            diagnostics.language = whatlang::detect(&text).map(|info| DetectedLanguage {
                code: info.lang().code(),
                confidence: info.confidence(),
            });
        }

        let numbers = self.letter_numbers.reconstruct(&text);
        diagnostics.letter_number_pattern = numbers.pattern;
        diagnostics.partial_letter_number = numbers.partial;
        diagnostics.letter_number_candidate = numbers.candidate.clone();
        if !numbers.letter_number.is_absent() {
            if let Some(name) = numbers.pattern {
                diagnostics.record("letter_number", name);
            }
        }

        let classification_code = take(
            &mut diagnostics,
            "classification_code",
            classification::extract(&text, &numbers.components),
        );
        let date = take(&mut diagnostics, "date", self.dates.extract(&text));
        let sender = take(&mut diagnostics, "sender", self.sender.extract(&text))
            .map(|v| breaker.break_words(v));
        let recipient = take(
            &mut diagnostics,
            "recipient",
            self.recipient.extract(&text, kind),
        );
        let body_summary = take(&mut diagnostics, "body_summary", self.body.extract(&text))
            .map(|v| breaker.break_words(v));

        let event = match kind {
            LetterKind::Incoming => {
                let hits = self.event.extract(&text, &self.dates);
                Some(EventFields {
                    event_name: take(&mut diagnostics, "event_name", hits.name),
                    event_venue: take(&mut diagnostics, "event_venue", hits.venue),
                    event_date: take(&mut diagnostics, "event_date", hits.date),
                    event_time: take(&mut diagnostics, "event_time", hits.time),
                })
            }
            LetterKind::Outgoing => None,
        };

        let record = ExtractionResult {
            letter_number: numbers.letter_number,
            document_category: classify_field(&classification_code),
            classification_code,
            date,
            sender,
            recipient,
            body_summary,
            event,
        };
        debug!(
            "extracted {:?} letter: number={}, category={}",
            kind, record.letter_number, record.document_category
        );

        Extraction {
            record,
            components: numbers.components,
            diagnostics,
        }
    }

    pub fn extract_leave(&self, text: &str) -> LeaveRequest {
        self.leave.extract(text)
    }
}

fn take(diagnostics: &mut Diagnostics, field: &'static str, hit: Option<Hit>) -> FieldValue {
    match hit {
        Some(hit) => {
            diagnostics.record(field, hit.rule);
            FieldValue::found(hit.value)
        }
        None => FieldValue::Absent,
    }
}
