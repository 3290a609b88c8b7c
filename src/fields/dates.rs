//! Letter date extraction and ISO normalisation.

use std::collections::HashMap;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::cascade::{Cascade, Hit, Rule, alternation};
use crate::dictionary::Dictionary;
use crate::error::Result;

lazy_static! {
    static ref TANGGAL_LABEL: Regex = Regex::new(r"(?im)^\s*Tanggal\s*[:：]\s*([^\n]+)").unwrap();
    static ref NUMERIC_DATE: Regex =
        Regex::new(r"\b(\d{1,2}[/\-]\d{1,2}[/\-]\d{4}|\d{4}-\d{1,2}-\d{1,2})\b").unwrap();
    static ref DMY: Regex = Regex::new(r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})\b").unwrap();
    static ref YMD: Regex = Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap();
}

#[derive(Debug, Clone)]
pub struct DateExtractor {
    cascade: Cascade,
    written: Regex,
    months: HashMap<String, u32>,
}

impl DateExtractor {
    pub fn new(dict: &Dictionary) -> Result<Self> {
        let spellings = dict.month_spellings();
        let months_alt = alternation(&spellings);

        let place_date = Regex::new(&format!(
            r"(?im)^[A-Za-z .]+,\s*(\d{{1,2}}\s+(?:{months_alt})\.?\s+\d{{4}})\b"
        ))?;
        let written_date = Regex::new(&format!(
            r"(?i)\b(\d{{1,2}}\s+(?:{months_alt})\.?\s+\d{{4}})\b"
        ))?;
        let written = Regex::new(&format!(
            r"(?i)\b(\d{{1,2}})\s+({months_alt})\.?\s+(\d{{4}})\b"
        ))?;

        let months = spellings
            .iter()
            .filter_map(|name| dict.month_number(name).map(|n| (name.to_lowercase(), n)))
            .collect();

        let cascade = Cascade::new(
            "date",
            vec![
                Rule::new("place_date", &place_date),
                Rule::new("tanggal_label", &TANGGAL_LABEL),
                Rule::new("written_date", &written_date),
                Rule::new("numeric_date", &NUMERIC_DATE),
            ],
        );

        Ok(Self {
            cascade,
            written,
            months,
        })
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.cascade.rule_names()
    }

    /// Letter date as ISO `YYYY-MM-DD`, or the raw capture when it cannot be parsed.
    pub fn extract(&self, text: &str) -> Option<Hit> {
        let hit = self.cascade.run(text)?;
        Some(Hit {
            rule: hit.rule,
            value: self.to_output(&hit.value),
        })
    }

    /// Find a date anywhere in `raw`: written Indonesian form, `d/m/Y`, `d-m-Y` or ISO.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        if let Some(caps) = self.written.captures(raw) {
            let day = caps[1].parse().ok()?;
            let month = *self.months.get(&caps[2].to_lowercase())?;
            let year = caps[3].parse().ok()?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }
        if let Some(caps) = YMD.captures(raw) {
            return NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            );
        }
        if let Some(caps) = DMY.captures(raw) {
            return NaiveDate::from_ymd_opt(
                caps[3].parse().ok()?,
                caps[2].parse().ok()?,
                caps[1].parse().ok()?,
            );
        }
        None
    }

    pub fn to_output(&self, raw: &str) -> String {
        match self.parse(raw) {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => raw.trim().to_string(),
        }
    }
}
