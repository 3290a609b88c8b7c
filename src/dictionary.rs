//! Language reference data for the extraction cascades.
//!
//! A [`Dictionary`] is built once (from the compiled-in tables, a JSON file,
//! or both) and then handed by reference to everything that needs month
//! names, sender keywords, label spellings or the word-breaker vocabulary.
//! An optional Hunspell dictionary widens word recognition.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::{Error, Result};

const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

/// Misspellings, old spellings and English names seen in scanned letters.
const MONTH_ALIASES: &[(&str, u32)] = &[
    ("pebruari", 2),
    ("nopember", 11),
    ("agustud", 8),
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("october", 10),
    ("december", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("jun", 6),
    ("jul", 7),
    ("agu", 8),
    ("agt", 8),
    ("ags", 8),
    ("sep", 9),
    ("sept", 9),
    ("okt", 10),
    ("oct", 10),
    ("nov", 11),
    ("des", 12),
    ("dec", 12),
];

const SENDER_KEYWORDS: &[&str] = &[
    "Ketua",
    "Wakil Ketua",
    "Panitera",
    "Sekretaris",
    "Kepala",
    "Direktur",
    "Hakim",
    "Kasubbag",
    "Koordinator",
    "Pimpinan",
    "Camat",
    "Lurah",
    "Bupati",
    "Walikota",
    "Gubernur",
    "Rektor",
    "Dekan",
    "Plh",
    "Plt",
];

/// Label spellings for the letter-number line, including common misreads.
const NUMBER_LABELS: &[&str] = &[
    "Nomor", "NOMOR", "Nomer", "Nomnor", "Nomar", "Nomur", "Nomot", "Nomoe", "N0mor", "No",
];

const OFFICE_CODE: &str = "W15-A12";
const DEFAULT_OFFICE_PREFIX: &str = "PAN.PA";
const LEAVE_RECIPIENT: &str = "Ketua Pengadilan Agama";

const INSTITUTION_ACRONYMS: &[&str] = &[
    "PTA", "PTUN", "PA", "PN", "MA", "RI", "DPRD", "BPN", "KPU", "KPPN", "POLRES", "POLDA",
    "POLSEK", "BAPPEDA", "KEMENAG", "SKPD", "UIN", "IAIN", "LBH", "BPJS", "UPT",
];

const BOILERPLATE_TOKENS: &[&str] = &[
    "dengan hormat",
    "assalamu",
    "wassalam",
    "kepada",
    "yth",
    "nomor",
    "lampiran",
    "tembusan",
    "telp",
    "email",
    "website",
    "kode pos",
    "jl.",
];

/// Domain vocabulary the word-breaker may split glued tokens into.
const WORDLIST: &[&str] = &[
    // function words
    "dan", "atau", "yang", "dengan", "untuk", "dalam", "pada", "dari", "kepada", "oleh", "ini",
    "itu", "tersebut", "agar", "bahwa", "bagi", "atas", "serta", "sebagai", "telah", "akan",
    "dapat", "tidak", "kami", "kita", "anda", "saudara", "bapak", "ibu", "sdr", "sdri", "hari",
    "tanggal", "waktu", "tempat", "pukul", "acara", "bulan", "tahun", "secara", "sesuai",
    "terhadap", "antara", "hingga", "sampai", "selama", "karena", "maka", "demikian", "adapun",
    "berikut", "mohon", "harap", "perhatian", "kerjasama", "kerja", "sama", "baik",
    // letter vocabulary
    "surat", "nomor", "perihal", "lampiran", "hormat", "undangan", "permohonan", "pemberitahuan",
    "penyampaian", "permintaan", "keterangan", "rapat", "sidang", "pimpinan", "kegiatan",
    "pelaksanaan", "pelaksana", "laporan", "data", "informasi", "tembusan", "arsip", "berkas",
    "dokumen", "salinan", "putusan", "penetapan", "perkara", "gugatan", "banding",
    "kasasi", "eksekusi", "mediasi", "praktek", "praktik", "magang", "mahasiswa", "penelitian",
    "kesediaan", "menerima", "memberikan", "menghadiri", "mengikuti", "melaksanakan",
    "menyampaikan", "mengajukan", "bersama", "sehubungan", "berdasarkan", "menindaklanjuti",
    "virtual", "daring", "luring", "zoom", "online", "offline", "aula", "ruang", "gedung",
    "kantor", "jalan", "kota", "kabupaten", "provinsi", "kecamatan", "desa", "kelurahan",
    // institutions and roles
    "pengadilan", "agama", "negeri", "tinggi", "mahkamah", "agung", "kementerian", "dinas",
    "badan", "kepolisian", "kejaksaan", "universitas", "fakultas", "hukum", "syariah",
    "ketua", "wakil", "panitera", "sekretaris", "kepala", "direktur", "hakim", "pegawai",
    "jurusita", "pengganti", "muda", "bagian", "umum", "keuangan", "kepegawaian", "perencanaan",
    "organisasi", "tata", "laksana", "teknologi", "pelayanan", "terpadu", "satu", "pintu",
    // leave requests
    "cuti", "tahunan", "besar", "sakit", "melahirkan", "alasan", "penting", "luar", "tanggungan",
    "negara", "jabatan", "golongan", "unit", "masa", "alamat", "jenis", "diambil",
];

/// `"hunspell": {"dir": "...", "name": "id_ID"}`; a relative `dir` is taken
/// from the dictionary file's folder.
#[derive(Debug, Deserialize)]
struct HunspellPair {
    dir: PathBuf,
    #[serde(default = "default_hunspell_name")]
    name: String,
}

fn default_hunspell_name() -> String {
    "id_ID".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DictionaryFile {
    hunspell: Option<HunspellPair>,
    #[serde(alias = "indonesian_months")]
    months: Option<Vec<String>>,
    month_aliases: Option<BTreeMap<String, u32>>,
    #[serde(alias = "pengirim_keywords")]
    sender_keywords: Option<Vec<String>>,
    number_labels: Option<Vec<String>>,
    office_code: Option<String>,
    default_office_prefix: Option<String>,
    institution_acronyms: Option<Vec<String>>,
    boilerplate_tokens: Option<Vec<String>>,
    /// Replaces the builtin wordlist.
    wordlist: Option<Vec<String>>,
    /// Added on top of the wordlist in effect.
    extra_words: Option<Vec<String>>,
    leave_recipient: Option<String>,
}

/// Immutable reference data shared by every extractor.
pub struct Dictionary {
    months: Vec<String>,
    month_aliases: BTreeMap<String, u32>,
    sender_keywords: Vec<String>,
    number_labels: Vec<String>,
    office_code: String,
    default_office_prefix: String,
    institution_acronyms: Vec<String>,
    boilerplate_tokens: Vec<String>,
    wordlist: HashSet<String>,
    leave_recipient: String,
    hunspell: Option<zspell::Dictionary>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Dictionary {
    /// The compiled-in reference data.
    pub fn builtin() -> Self {
        Self {
            months: owned(&MONTHS),
            month_aliases: MONTH_ALIASES
                .iter()
                .map(|(name, n)| (name.to_string(), *n))
                .collect(),
            sender_keywords: owned(SENDER_KEYWORDS),
            number_labels: owned(NUMBER_LABELS),
            office_code: OFFICE_CODE.to_string(),
            default_office_prefix: DEFAULT_OFFICE_PREFIX.to_string(),
            institution_acronyms: owned(INSTITUTION_ACRONYMS),
            boilerplate_tokens: owned(BOILERPLATE_TOKENS),
            wordlist: WORDLIST.iter().map(|w| w.to_string()).collect(),
            leave_recipient: LEAVE_RECIPIENT.to_string(),
            hunspell: None,
        }
    }

    /// Parse a JSON dictionary; keys that are missing keep their builtin value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_in(json, None)
    }

    fn from_json_in(json: &str, base: Option<&Path>) -> Result<Self> {
        let file: DictionaryFile = serde_json::from_str(json)?;
        let mut dict = Self::builtin();

        if let Some(months) = file.months {
            let months: Vec<String> = months.into_iter().map(|m| m.trim().to_string()).collect();
            if months.len() != 12 || months.iter().any(|m| m.is_empty()) {
                return Err(Error::InvalidDictionary(format!(
                    "expected 12 month names, got {}",
                    months.len()
                )));
            }
            dict.months = months;
        }
        if let Some(aliases) = file.month_aliases {
            for (name, month) in aliases {
                if !(1..=12).contains(&month) {
                    return Err(Error::InvalidDictionary(format!(
                        "month alias {name:?} maps to {month}"
                    )));
                }
                dict.month_aliases.insert(name.to_lowercase(), month);
            }
        }
        if let Some(keywords) = file.sender_keywords {
            dict.sender_keywords = non_blank(keywords);
        }
        if let Some(labels) = file.number_labels {
            let labels = non_blank(labels);
            if labels.is_empty() {
                return Err(Error::InvalidDictionary(
                    "number_labels must not be empty".to_string(),
                ));
            }
            dict.number_labels = labels;
        }
        if let Some(code) = file.office_code {
            if code.trim().is_empty() {
                return Err(Error::InvalidDictionary(
                    "office_code must not be empty".to_string(),
                ));
            }
            dict.office_code = code.trim().to_string();
        }
        if let Some(prefix) = file.default_office_prefix {
            dict.default_office_prefix = prefix.trim().to_string();
        }
        if let Some(acronyms) = file.institution_acronyms {
            dict.institution_acronyms = non_blank(acronyms);
        }
        if let Some(tokens) = file.boilerplate_tokens {
            dict.boilerplate_tokens = non_blank(tokens)
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect();
        }
        if let Some(words) = file.wordlist {
            dict.wordlist = non_blank(words).into_iter().map(|w| w.to_lowercase()).collect();
        }
        if let Some(words) = file.extra_words {
            dict.wordlist
                .extend(non_blank(words).into_iter().map(|w| w.to_lowercase()));
        }
        if let Some(recipient) = file.leave_recipient {
            dict.leave_recipient = recipient.trim().to_string();
        }
        // a pair named in the file is required, unlike `with_hunspell`
        if let Some(pair) = file.hunspell {
            let dir = match base {
                Some(base) if pair.dir.is_relative() => base.join(&pair.dir),
                _ => pair.dir,
            };
            dict.hunspell = Some(read_hunspell(&dir, &pair.name)?);
        }

        debug!(
            "Dictionary parsed: {} months, {} sender keywords, {} words",
            dict.months.len(),
            dict.sender_keywords.len(),
            dict.wordlist.len()
        );
        Ok(dict)
    }

    /// Load a JSON dictionary file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let dict = Self::from_json_in(&content, path.parent())?;
        info!("Loaded dictionary: {}", path.display());
        Ok(dict)
    }

    /// Attach `<name>.aff`/`<name>.dic` from `dict_dir`. An unusable pair is logged and skipped.
    pub fn with_hunspell(mut self, dict_dir: impl AsRef<Path>, name: &str) -> Self {
        match read_hunspell(dict_dir.as_ref(), name) {
            Ok(hunspell) => {
                info!("Loaded Hunspell dictionary: {}", name);
                self.hunspell = Some(hunspell);
            }
            Err(e) => warn!("Hunspell dictionary {} skipped: {}", name, e),
        }
        self
    }

    /// Add a plain word list (one word per line, `#` comments) to the vocabulary.
    pub fn with_wordlist_file(mut self, path: impl AsRef<Path>) -> Self {
        let words = load_wordlist(path.as_ref());
        self.wordlist.extend(words);
        self
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    /// Canonical month names followed by aliases, for building alternations.
    pub fn month_spellings(&self) -> Vec<&str> {
        self.months
            .iter()
            .map(String::as_str)
            .chain(self.month_aliases.keys().map(String::as_str))
            .collect()
    }

    pub fn sender_keywords(&self) -> &[String] {
        &self.sender_keywords
    }

    pub fn number_labels(&self) -> &[String] {
        &self.number_labels
    }

    pub fn office_code(&self) -> &str {
        &self.office_code
    }

    pub fn default_office_prefix(&self) -> &str {
        &self.default_office_prefix
    }

    pub fn institution_acronyms(&self) -> &[String] {
        &self.institution_acronyms
    }

    pub fn boilerplate_tokens(&self) -> &[String] {
        &self.boilerplate_tokens
    }

    pub fn leave_recipient(&self) -> &str {
        &self.leave_recipient
    }

    pub fn has_hunspell(&self) -> bool {
        self.hunspell.is_some()
    }

    /// 1-based month for a canonical name or alias, case-insensitive.
    pub fn month_number(&self, name: &str) -> Option<u32> {
        let lower = name.trim().trim_end_matches('.').to_lowercase();
        if let Some(idx) = self.months.iter().position(|m| m.to_lowercase() == lower) {
            return Some(idx as u32 + 1);
        }
        self.month_aliases.get(&lower).copied()
    }

    /// Whether `word` is in the wordlist or the Hunspell dictionary.
    pub fn is_known(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        if self.wordlist.contains(&lower) {
            return true;
        }
        match self.hunspell {
            Some(ref d) => d.check_word(word) || (lower != word && d.check_word(&lower)),
            None => false,
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "Dictionary: months={}, aliases={}, sender_keywords={}, labels={}, words={}, hunspell={}",
            self.months.len(),
            self.month_aliases.len(),
            self.sender_keywords.len(),
            self.number_labels.len(),
            self.wordlist.len(),
            self.hunspell.is_some()
        )
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("months", &self.months)
            .field("sender_keywords", &self.sender_keywords)
            .field("number_labels", &self.number_labels)
            .field("office_code", &self.office_code)
            .field("default_office_prefix", &self.default_office_prefix)
            .field("words", &self.wordlist.len())
            .field("hunspell", &self.hunspell.is_some())
            .finish()
    }
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn load_wordlist(path: &Path) -> HashSet<String> {
    if !path.exists() {
        warn!("Word list not found: {}", path.display());
        return HashSet::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => {
            let words: HashSet<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(|line| line.to_lowercase())
                .collect();
            info!("Loaded word list {}: {} words", path.display(), words.len());
            words
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            HashSet::new()
        }
    }
}

/// Build a zspell dictionary from `<name>.aff` and `<name>.dic` in `dir`.
fn read_hunspell(dir: &Path, name: &str) -> Result<zspell::Dictionary> {
    let aff = fs::read_to_string(dir.join(format!("{name}.aff")))?;
    let dic = fs::read_to_string(dir.join(format!("{name}.dic")))?;
    zspell::builder()
        .config_str(&aff)
        .dict_str(&dic)
        .build()
        .map_err(|e| Error::InvalidDictionary(format!("Hunspell {name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_months() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.months().len(), 12);
        assert_eq!(dict.month_number("Oktober"), Some(10));
        assert_eq!(dict.month_number("NOPEMBER"), Some(11));
        assert_eq!(dict.month_number("Agt."), Some(8));
        assert_eq!(dict.month_number("Brumaire"), None);
    }

    #[test]
    fn test_known_words() {
        let dict = Dictionary::builtin();
        assert!(dict.is_known("Pengadilan"));
        assert!(dict.is_known("kesediaan"));
        assert!(!dict.is_known("asdfgh"));
        assert!(!dict.has_hunspell());
    }

    #[test]
    fn test_json_keeps_unset_keys() {
        let dict = Dictionary::from_json_str(r#"{"pengirim_keywords": ["Camat"]}"#).unwrap();
        assert_eq!(dict.sender_keywords(), &["Camat".to_string()]);
        assert_eq!(dict.office_code(), "W15-A12");
        assert_eq!(dict.months()[0], "Januari");
    }

    #[test]
    fn test_json_rejects_short_month_list() {
        let err = Dictionary::from_json_str(r#"{"indonesian_months": ["Januari"]}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidDictionary(_)));
    }

    #[test]
    fn test_hunspell_pair_named_in_file_must_exist() {
        let err = Dictionary::from_json_str(r#"{"hunspell": {"dir": "no-such-dir"}}"#).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_missing_hunspell_is_ignored() {
        let dict = Dictionary::builtin().with_hunspell("no-such-dir", "id_ID");
        assert!(!dict.has_hunspell());
    }
}
