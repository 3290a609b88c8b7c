//! Event metadata carried by incoming invitations and summons.

use lazy_static::lazy_static;
use regex::Regex;

use super::cascade::{Cascade, Hit, Rule};
use super::dates::DateExtractor;

lazy_static! {
    static ref ACARA: Regex =
        Regex::new(r"(?im)^\s*(?:Acara|Kegiatan|Agenda)\s*[:：]\s*([^\n]+)").unwrap();
    static ref DALAM_RANGKA: Regex = Regex::new(r"(?i)\bdalam rangka\s+([^\n]+)").unwrap();

    static ref TEMPAT: Regex =
        Regex::new(r"(?im)^\s*(?:Tempat|Lokasi)\s*[:：]\s*([^\n]+)").unwrap();
    static ref BERTEMPAT: Regex = Regex::new(r"(?i)\bbertempat di\s+([^\n]+)").unwrap();

    static ref HARI_TANGGAL: Regex =
        Regex::new(r"(?im)^\s*Hari\s*(?:[/,]|dan)?\s*Tanggal\s*[:：]\s*([^\n]+)").unwrap();
    static ref PADA_HARI: Regex =
        Regex::new(r"(?i)\bpada\s+(?:hari\s+)?([A-Za-z]+,?\s*\d{1,2}\s+[A-Za-z]+\.?\s+\d{4})").unwrap();

    static ref PUKUL: Regex = Regex::new(
        r"(?i)\bPukul\s*[:：]?\s*(\d{1,2}[.:]\d{2}(?:\s*(?:-|s\.?\s?d\.?|sampai)\s*(?:\d{1,2}[.:]\d{2}|selesai))?(?:\s*(?:WIB|WITA|WIT)\b)?)"
    )
    .unwrap();
    static ref JAM: Regex = Regex::new(r"(?im)^\s*(?:Jam|Waktu)\s*[:：]\s*([^\n]+)").unwrap();
}

/// Per-field hits; `None` means the field was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventHits {
    pub name: Option<Hit>,
    pub venue: Option<Hit>,
    pub date: Option<Hit>,
    pub time: Option<Hit>,
}

#[derive(Debug, Clone)]
pub struct EventExtractor {
    name: Cascade,
    venue: Cascade,
    date: Cascade,
    time: Cascade,
}

impl EventExtractor {
    pub fn new() -> Self {
        Self {
            name: Cascade::new(
                "event_name",
                vec![Rule::new("acara", &ACARA), Rule::new("dalam_rangka", &DALAM_RANGKA)],
            ),
            venue: Cascade::new(
                "event_venue",
                vec![Rule::new("tempat", &TEMPAT), Rule::new("bertempat_di", &BERTEMPAT)],
            ),
            date: Cascade::new(
                "event_date",
                vec![
                    Rule::new("hari_tanggal", &HARI_TANGGAL),
                    Rule::new("pada_hari", &PADA_HARI),
                ],
            ),
            time: Cascade::new(
                "event_time",
                vec![Rule::new("pukul", &PUKUL), Rule::new("jam_waktu", &JAM)],
            ),
        }
    }

    /// Event date goes through `dates` so it is ISO when parseable.
    pub fn extract(&self, text: &str, dates: &DateExtractor) -> EventHits {
        let date = self.date.run(text).map(|hit| Hit {
            rule: hit.rule,
            value: dates.to_output(&hit.value),
        });
        EventHits {
            name: self.name.run(text),
            venue: self.venue.run(text),
            date,
            time: self.time.run(text),
        }
    }
}

impl Default for EventExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;

    const INVITATION: &str = "Dengan hormat, kami mengundang Bapak pada:\n\
        Hari/Tanggal : Senin, 14 Oktober 2024\n\
        Pukul : 09.00 - 12.00 WIB\n\
        Tempat : Aula Pengadilan Agama Sidoarjo\n\
        Acara : Rapat Koordinasi Mediasi";

    #[test]
    fn test_invitation_block() {
        let dates = DateExtractor::new(&Dictionary::builtin()).unwrap();
        let hits = EventExtractor::new().extract(INVITATION, &dates);
        assert_eq!(hits.name.unwrap().value, "Rapat Koordinasi Mediasi");
        assert_eq!(hits.venue.unwrap().value, "Aula Pengadilan Agama Sidoarjo");
        assert_eq!(hits.date.unwrap().value, "2024-10-14");
        assert_eq!(hits.time.unwrap().value, "09.00 - 12.00 WIB");
    }

    #[test]
    fn test_prose_forms() {
        let dates = DateExtractor::new(&Dictionary::builtin()).unwrap();
        let text = "dalam rangka Pembinaan Teknis Yustisial yang akan dilaksanakan \
                    pada hari Rabu, 2 Juli 2025 bertempat di Hotel Majapahit Surabaya";
        let hits = EventExtractor::new().extract(text, &dates);
        assert_eq!(hits.date.unwrap().value, "2025-07-02");
        assert_eq!(hits.venue.unwrap().rule, "bertempat_di");
        assert!(hits.time.is_none());
    }

    #[test]
    fn test_nothing_found() {
        let dates = DateExtractor::new(&Dictionary::builtin()).unwrap();
        assert_eq!(EventExtractor::new().extract("", &dates), EventHits::default());
    }
}
