//! End-to-end extraction and scoring on realistic letter text.

use rust_ocr_fields::{
    Category, Dictionary, Extractor, FieldValue, LetterKind, classify, field_accuracy,
};

fn extractor() -> Extractor {
    Extractor::new(Dictionary::builtin()).unwrap()
}

#[test]
fn test_letter_number_line() {
    let extraction = extractor().extract(
        "Nomor : 1931/PAN.PA.W15-A12/HM2.1.4/X/2024",
        LetterKind::Outgoing,
    );
    assert_eq!(
        extraction.record.letter_number.as_str(),
        "1931/PAN.PA.W15-A12/HM2.1.4/X/2024"
    );
    assert_eq!(extraction.record.document_category.as_str(), "Umum");
}

#[test]
fn test_glued_subject_is_word_broken() {
    let text = "Nomor : 88/PAN.PA.W15-A12/HM2.1.4/III/2024\n\
                Perihal : Mohonkesediaan menerima praktekkerja\n\
                Lampiran : -\n";
    let record = extractor().extract(text, LetterKind::Incoming).record;
    assert_eq!(
        record.body_summary.as_str(),
        "Mohon kesediaan menerima praktek kerja"
    );
}

#[test]
fn test_subject_already_spaced_is_unchanged() {
    let text = "Perihal : Mohon kesediaan menerima praktek kerja\n";
    let record = extractor().extract(text, LetterKind::Incoming).record;
    assert!(
        record
            .body_summary
            .as_str()
            .contains("Mohon kesediaan menerima praktek kerja")
    );
}

#[test]
fn test_no_number_label() {
    let text = "PENGADILAN AGAMA SIDOARJO\nPerihal : Pemberitahuan\nSidoarjo, 2 Mei 2024\nPanitera,";
    let extraction = extractor().extract(text, LetterKind::Outgoing);
    assert!(extraction.record.letter_number.is_absent());
    assert_eq!(extraction.record.letter_number.as_str(), "Not found");
    assert_eq!(extraction.diagnostics.letter_number_pattern, None);
}

#[test]
fn test_misspelt_label_keeps_only_a_candidate() {
    let text = "PENGADILAN AGAMA SIDOARJO\nNomnor : B-12 / kode tidak terbaca\nPerihal : Pemberitahuan";
    let extraction = extractor().extract(text, LetterKind::Outgoing);
    assert_eq!(extraction.record.letter_number.as_str(), "Not found");
    assert_eq!(
        extraction.diagnostics.letter_number_candidate.as_deref(),
        Some("B-12")
    );
    assert_eq!(extraction.diagnostics.letter_number_pattern, Some("last_resort"));
}

#[test]
fn test_unresolved_month_is_all_or_nothing() {
    // XIV is not a month
    let text = "Nomor : 1931/PAN.PA.W15-A12/HK.2.6/XIV/2024";
    let extraction = extractor().extract(text, LetterKind::Outgoing);
    assert_eq!(extraction.record.letter_number, FieldValue::Absent);
    assert_eq!(extraction.components.sequence_number.as_deref(), Some("1931"));
    assert!(extraction.diagnostics.partial_letter_number);
}

#[test]
fn test_identical_fields_score_full() {
    assert_eq!(
        field_accuracy("Surat Undangan Rapat", "Surat Undangan Rapat"),
        100.0
    );
}

#[test]
fn test_partially_edited_field_scores_mid_range() {
    let score = field_accuracy("Surat Undangan Rapat", "Undangan Rapat Pimpinan");
    assert!(score > 40.0 && score < 90.0, "score was {}", score);
}

#[test]
fn test_category_from_code() {
    assert_eq!(classify("HK.2.6"), Category::Perkara);
    assert_eq!(classify("Not found"), Category::Umum);

    let extraction = extractor().extract(
        "Nomor : 7/PAN.PA.W15-A12/HK.2.6/IV/2024",
        LetterKind::Outgoing,
    );
    assert_eq!(extraction.record.classification_code.as_str(), "HK.2.6");
    assert_eq!(extraction.record.document_category, Category::Perkara);
}

#[test]
fn test_full_incoming_letter_json() {
    let text = "PENGADILAN TINGGI AGAMA SURABAYA\r\n\
                Nomor : 1931 / PAN.PA.W15-A12 / HM2.1.4 / X / 2024\r\n\
                Perihal : Undangan Rapat Koordinasi\r\n\
                Kepada Yth.\r\n\
                Ketua Pengadilan Agama Sidoarjo\r\n\
                Hari/Tanggal : Senin, 14 Oktober 2024\r\n\
                Pukul : 09.00 WIB\r\n\
                Surabaya, 7 Oktober 2024\r\n\
                Panitera,\r\n";
    let record = extractor().extract(text, LetterKind::Incoming).record;
    assert_eq!(
        record.letter_number.as_str(),
        "1931/PAN.PA.W15-A12/HM2.1.4/X/2024"
    );

    let json: serde_json::Value = serde_json::to_value(&record).unwrap();
    assert_eq!(json["date"], "2024-10-07");
    assert_eq!(json["event_time"], "09.00 WIB");
    assert_eq!(json["event_venue"], "Not found");
    assert_eq!(json["document_category"], "Umum");
}
