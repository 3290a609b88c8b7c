//! Leave-request ("Surat Permintaan Cuti") forms.
//!
//! These forms are label/value tables rather than prose letters, so every
//! field has its own small cascade. The letter number and dates reuse the
//! letter machinery.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::classifier::Category;
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::fields::cascade::{Cascade, Hit, Rule, clean_capture};
use crate::fields::dates::DateExtractor;
use crate::letter_number::LetterNumberReconstructor;
use crate::normalize::normalize_light;
use crate::record::FieldValue;

lazy_static! {
    static ref NAMA: Regex = Regex::new(r"(?im)^\s*NAMA\b\s*[:：]?[ \t]*([A-Za-z .,'\-]+)").unwrap();
    static ref NIP: Regex = Regex::new(r"(?i)\bNIP[.:\s]*(\d[\d \t]{9,})").unwrap();
    static ref JABATAN: Regex = Regex::new(r"(?i)\bJABATAN\s*[:：]?[ \t]*([A-Za-z .,\-]+)").unwrap();
    static ref GOL_RUANG: Regex =
        Regex::new(r"(?i)\bGOL(?:ONGAN)?\.?\s*/?\s*RUANG\s*[:：]?[ \t]*([A-Za-z0-9 ./,\-]+)").unwrap();
    static ref UNIT_KERJA: Regex = Regex::new(r"(?i)\bUNIT\s*KERJA\s*[:：]?[ \t]*([A-Za-z .,\-]+)").unwrap();
    static ref MASA_KERJA: Regex = Regex::new(r"(?i)\bMASA\s*KERJA\s*[:：]?[ \t]*([A-Za-z0-9 .,\-]+)").unwrap();

    static ref JENIS_LABELLED: Regex =
        Regex::new(r#"(?i)JENIS CUTI YANG DIAMBIL["“”]*[ \t]*[:：]?[ \t]*([A-Za-z .,\-]+)"#).unwrap();
    static ref JENIS_CHECKED: Regex = Regex::new(r"(CUTI [A-Z ]+)[^\n]*[V✓✔]").unwrap();

    static ref ALASAN_CUTI: Regex = Regex::new(r"(?i)\bALASAN\s*CUTI\s*[:：]?[ \t]*([A-Za-z .,\-]+)").unwrap();
    static ref SELAMA: Regex = Regex::new(r"(?i)\b(?:SELAMA|LAMA\s+CUTI)\b[^\n\d]{0,20}(\d+)").unwrap();
    static ref N_HARI: Regex = Regex::new(r"(?i)\b(\d+)[ \t]*hari\b").unwrap();

    static ref PERIOD_RANGE: Regex = Regex::new(
        r"(?i)\b(?:TANGGAL|MULAI)\s*[:：]?\s*([0-9A-Za-z \-/]+?)\s+(?:sampai dengan|sampai|s\.?\s?d\.?|hingga)\s+([0-9A-Za-z\-/]+(?:[ \t]+[A-Za-z]+[ \t]+\d{4})?)"
    )
    .unwrap();
    static ref TANGGAL_MULAI: Regex = Regex::new(r"(?im)^\s*Tanggal\s+Mulai\s*[:：]?\s*([^\n]+)").unwrap();
    static ref TANGGAL_SELESAI: Regex = Regex::new(r"(?im)^\s*Tanggal\s+Selesai\s*[:：]?\s*([^\n]+)").unwrap();
    static ref TANGGAL_WRITTEN: Regex =
        Regex::new(r"Tanggal\s*[:：]?\s*(\d{1,2}\s*[A-Za-z]+\s*\d{4})").unwrap();

    static ref ALAMAT: Regex = Regex::new(r"(?i)\bALAMAT\b[^\n:：]*[:：][ \t]*([^\n]+)").unwrap();
    static ref ALAMAT_NEXT_LINE: Regex = Regex::new(r"(?i)\bALAMAT\b[^\n]*\n\s*([^\n]+)").unwrap();
    static ref TELP: Regex =
        Regex::new(r"(?i)\b(?:TELP|TELEPON|NO\.?\s*HP|HP)\b\.?\s*[:：]?[ \t]*(\+?\d[\d \-]{6,})").unwrap();
}

/// Known leave types, canonical spelling.
const LEAVE_TYPES: &[&str] = &[
    "Cuti Tahunan",
    "Cuti Besar",
    "Cuti Sakit",
    "Cuti Melahirkan",
    "Cuti Alasan Penting",
    "Cuti Di Luar Tanggungan Negara",
];

/// Line prefixes marking an unticked checkbox on scanned forms.
const UNCHECKED_MARKERS: &[&str] = &["U)", "O)", "CJ)"];

const MIN_NIP_DIGITS: usize = 14;
const UNREAD: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveRequest {
    pub letter_number: FieldValue,
    pub name: FieldValue,
    pub nip: FieldValue,
    pub position: FieldValue,
    pub rank: FieldValue,
    pub work_unit: FieldValue,
    pub service_period: FieldValue,
    pub leave_type: FieldValue,
    pub leave_reason: FieldValue,
    pub duration_days: FieldValue,
    pub period_start: FieldValue,
    pub period_end: FieldValue,
    pub address: FieldValue,
    pub phone: FieldValue,
    pub sender: FieldValue,
    pub recipient: FieldValue,
    pub body_summary: FieldValue,
    pub document_category: Category,
}

impl LeaveRequest {
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let fields: [(&str, &FieldValue); 17] = [
            ("letter_number", &self.letter_number),
            ("name", &self.name),
            ("nip", &self.nip),
            ("position", &self.position),
            ("rank", &self.rank),
            ("work_unit", &self.work_unit),
            ("service_period", &self.service_period),
            ("leave_type", &self.leave_type),
            ("leave_reason", &self.leave_reason),
            ("duration_days", &self.duration_days),
            ("period_start", &self.period_start),
            ("period_end", &self.period_end),
            ("address", &self.address),
            ("phone", &self.phone),
            ("sender", &self.sender),
            ("recipient", &self.recipient),
            ("body_summary", &self.body_summary),
        ];
        let mut map: BTreeMap<String, String> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_str().to_string()))
            .collect();
        map.insert(
            "document_category".to_string(),
            self.document_category.as_str().to_string(),
        );
        map
    }
}

fn single(field: &'static str, name: &'static str, regex: &Regex) -> Cascade {
    Cascade::new(field, vec![Rule::new(name, regex)])
}

fn value(hit: Option<Hit>) -> FieldValue {
    FieldValue::from_option(hit.map(|h| h.value))
}

pub struct LeaveExtractor {
    letter_numbers: LetterNumberReconstructor,
    dates: DateExtractor,
    recipient: String,
    position: Cascade,
    rank: Cascade,
    work_unit: Cascade,
    service_period: Cascade,
    leave_reason: Cascade,
    duration: Cascade,
    start: Cascade,
    end: Cascade,
    address: Cascade,
    phone: Cascade,
}

impl LeaveExtractor {
    pub fn new(dict: &Dictionary) -> Result<Self> {
        Ok(Self {
            letter_numbers: LetterNumberReconstructor::new(dict)?,
            dates: DateExtractor::new(dict)?,
            recipient: dict.leave_recipient().to_string(),
            position: single("position", "jabatan", &JABATAN),
            rank: single("rank", "gol_ruang", &GOL_RUANG),
            work_unit: single("work_unit", "unit_kerja", &UNIT_KERJA),
            service_period: single("service_period", "masa_kerja", &MASA_KERJA),
            leave_reason: single("leave_reason", "alasan_cuti", &ALASAN_CUTI),
            duration: Cascade::new(
                "duration_days",
                vec![Rule::new("selama", &SELAMA), Rule::new("n_hari", &N_HARI)],
            ),
            start: Cascade::new(
                "period_start",
                vec![
                    Rule::new("tanggal_mulai", &TANGGAL_MULAI),
                    Rule::new("tanggal_written", &TANGGAL_WRITTEN),
                ],
            ),
            end: single("period_end", "tanggal_selesai", &TANGGAL_SELESAI),
            address: Cascade::new(
                "address",
                vec![
                    Rule::new("alamat", &ALAMAT),
                    Rule::new("alamat_next_line", &ALAMAT_NEXT_LINE),
                ],
            ),
            phone: single("phone", "telp", &TELP),
        })
    }

    pub fn extract(&self, text: &str) -> LeaveRequest {
        let text = normalize_light(text);

        let nip = self.nip(&text);
        let name = self.name(&text);
        let leave_type = self.leave_type(&text);
        let (period_start, period_end) = self.period(&text);

        let body_summary = format!(
            "Surat Permintaan Cuti oleh {} (NIP: {}) - {}",
            name.as_deref().unwrap_or(UNREAD),
            nip.as_deref().unwrap_or(UNREAD),
            leave_type.as_deref().unwrap_or(UNREAD)
        );

        let request = LeaveRequest {
            letter_number: self.letter_numbers.reconstruct(&text).letter_number,
            sender: name.clone(),
            name,
            nip,
            position: value(self.position.run(&text)),
            rank: value(self.rank.run(&text)),
            work_unit: value(self.work_unit.run(&text)),
            service_period: value(self.service_period.run(&text)),
            leave_type,
            leave_reason: value(self.leave_reason.run(&text)),
            duration_days: value(self.duration.run(&text)),
            period_start,
            period_end,
            address: value(self.address.run(&text)),
            phone: value(self.phone.run(&text)).map(|p| p.split_whitespace().collect()),
            recipient: FieldValue::found(self.recipient.clone()),
            body_summary: FieldValue::found(body_summary),
            document_category: Category::Cuti,
        };
        debug!("leave request: {:?}", request.name);
        request
    }

    /// First NIP label followed by at least 14 digits, spaces removed.
    fn nip(&self, text: &str) -> FieldValue {
        NIP.captures_iter(text)
            .map(|caps| caps[1].chars().filter(char::is_ascii_digit).collect::<String>())
            .find(|digits| digits.len() >= MIN_NIP_DIGITS)
            .into()
    }

    /// Labelled name, else the line just above the first NIP.
    fn name(&self, text: &str) -> FieldValue {
        if let Some(caps) = NAMA.captures(text) {
            let name = clean_capture(&caps[1]);
            if !name.is_empty() {
                return FieldValue::found(name);
            }
        }
        let Some(m) = NIP.find(text) else {
            return FieldValue::Absent;
        };
        let above = text[..m.start()].trim_end();
        let line = above.rsplit('\n').next().unwrap_or("");
        FieldValue::found(clean_capture(line))
    }

    /// Labelled value, then a ticked checkbox, then the first known type on a
    /// line that is not marked unticked.
    fn leave_type(&self, text: &str) -> FieldValue {
        if let Some(caps) = JENIS_LABELLED.captures(text) {
            let raw = clean_capture(&caps[1]);
            if !raw.is_empty() {
                return FieldValue::found(canonical_leave_type(&raw).unwrap_or(raw));
            }
        }
        if let Some(caps) = JENIS_CHECKED.captures(text) {
            let raw = caps[1].trim().to_string();
            return FieldValue::found(canonical_leave_type(&raw).unwrap_or(raw));
        }
        for line in text.lines().map(str::trim) {
            if line.is_empty() || UNCHECKED_MARKERS.iter().any(|m| line.starts_with(m)) {
                continue;
            }
            if let Some(found) = canonical_leave_type(line) {
                return FieldValue::found(found);
            }
        }
        FieldValue::Absent
    }

    fn period(&self, text: &str) -> (FieldValue, FieldValue) {
        if let Some(caps) = PERIOD_RANGE.captures(text) {
            return (
                FieldValue::found(self.dates.to_output(&caps[1])),
                FieldValue::found(self.dates.to_output(&caps[2])),
            );
        }
        let start = self.start.run(text).map(|h| self.dates.to_output(&h.value));
        let end = self.end.run(text).map(|h| self.dates.to_output(&h.value));
        (start.into(), end.into())
    }
}

/// Known leave type mentioned in `text`, compared case-insensitively.
fn canonical_leave_type(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    LEAVE_TYPES
        .iter()
        .find(|t| lower.contains(&t.to_lowercase()))
        .map(|t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = "FORMULIR PERMINTAAN DAN PEMBERIAN CUTI\n\
        Nomor : 245/PAN.PA.W15-A12/KP5.3/XI/2024\n\
        I. DATA PEGAWAI\n\
        Nama : Siti Aminah, S.H.\n\
        NIP : 19850312 201001 2 005\n\
        Jabatan : Panitera Pengganti\n\
        Gol. Ruang : III/c\n\
        Unit Kerja : Pengadilan Agama Sidoarjo\n\
        Masa Kerja : 14 tahun\n\
        II. JENIS CUTI YANG DIAMBIL\n\
        U) Cuti Besar\n\
        Cuti Tahunan\n\
        III. ALASAN CUTI : Keperluan keluarga\n\
        IV. LAMANYA CUTI selama 3 hari\n\
        Tanggal 4 Desember 2024 sampai 6 Desember 2024\n\
        VI. ALAMAT SELAMA MENJALANKAN CUTI : Jl. Mawar No. 5 Sidoarjo\n\
        Telp : 0812 3456 789";

    fn extractor() -> LeaveExtractor {
        LeaveExtractor::new(&Dictionary::builtin()).unwrap()
    }

    #[test]
    fn test_full_form() {
        let req = extractor().extract(FORM);
        assert_eq!(req.letter_number.as_str(), "245/PAN.PA.W15-A12/KP5.3/XI/2024");
        assert_eq!(req.name.as_str(), "Siti Aminah, S.H.");
        assert_eq!(req.nip.as_str(), "198503122010012005");
        assert_eq!(req.position.as_str(), "Panitera Pengganti");
        assert_eq!(req.rank.as_str(), "III/c");
        assert_eq!(req.work_unit.as_str(), "Pengadilan Agama Sidoarjo");
        assert_eq!(req.leave_type.as_str(), "Cuti Tahunan");
        assert_eq!(req.leave_reason.as_str(), "Keperluan keluarga");
        assert_eq!(req.duration_days.as_str(), "3");
        assert_eq!(req.period_start.as_str(), "2024-12-04");
        assert_eq!(req.period_end.as_str(), "2024-12-06");
        assert_eq!(req.address.as_str(), "Jl. Mawar No. 5 Sidoarjo");
        assert_eq!(req.phone.as_str(), "08123456789");
        assert_eq!(req.recipient.as_str(), "Ketua Pengadilan Agama");
        assert_eq!(req.sender, req.name);
        assert_eq!(
            req.body_summary.as_str(),
            "Surat Permintaan Cuti oleh Siti Aminah, S.H. (NIP: 198503122010012005) - Cuti Tahunan"
        );
        assert_eq!(req.document_category, Category::Cuti);
    }

    #[test]
    fn test_checked_box() {
        let req = extractor().extract("CUTI SAKIT  V\nCUTI BESAR");
        assert_eq!(req.leave_type.as_str(), "Cuti Sakit");
    }

    #[test]
    fn test_name_above_nip() {
        let req = extractor().extract("Ahmad Fauzi\nNIP. 197001011998031001");
        assert_eq!(req.name.as_str(), "Ahmad Fauzi");
        assert_eq!(req.nip.as_str(), "197001011998031001");
    }

    #[test]
    fn test_short_nip_rejected() {
        let req = extractor().extract("NIP : 1234567890");
        assert!(req.nip.is_absent());
    }

    #[test]
    fn test_empty_form_is_total() {
        let req = extractor().extract("");
        let map = req.to_map();
        assert_eq!(map["name"], "Not found");
        assert_eq!(map["document_category"], "Cuti");
        assert_eq!(map["body_summary"], "Surat Permintaan Cuti oleh N/A (NIP: N/A) - N/A");
    }
}
