//! Python bindings via PyO3.
//!
//! The extractor is built once per process, from the builtin dictionary
//! unless `init_dictionary` is called first.
//!
//! ```python
//! import rust_ocr_fields as rof
//!
//! rof.init_dictionary("static/assets/js/dictionary.json")
//! record = rof.extract_letter(text, "incoming")
//! score = rof.field_accuracy(record["sender"], edited_sender)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::classifier;
use crate::dictionary::Dictionary;
use crate::engine::Extractor;
use crate::error::Error;
use crate::record::LetterKind;
use crate::scoring;

/// Process-wide extractor (built once, reused)
static EXTRACTOR: OnceLock<Extractor> = OnceLock::new();

fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::Io(_) | Error::DirectoryNotFound(_) => PyIOError::new_err(e.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

fn extractor() -> PyResult<&'static Extractor> {
    if let Some(extractor) = EXTRACTOR.get() {
        return Ok(extractor);
    }
    let built = Extractor::new(Dictionary::builtin()).map_err(to_py_err)?;
    // another thread may have won the race; either instance is equivalent
    let _ = EXTRACTOR.set(built);
    EXTRACTOR
        .get()
        .ok_or_else(|| PyRuntimeError::new_err("Extractor unavailable"))
}

/// Load a JSON dictionary (and optionally a Hunspell pair) before first use.
/// Returns False when an extractor was already initialised.
#[pyfunction]
#[pyo3(signature = (dictionary_path=None, hunspell_dir=None, hunspell_name="id_ID"))]
fn init_dictionary(
    dictionary_path: Option<String>,
    hunspell_dir: Option<String>,
    hunspell_name: &str,
) -> PyResult<bool> {
    let mut dict = match dictionary_path {
        Some(path) => Dictionary::load(&path).map_err(to_py_err)?,
        None => Dictionary::builtin(),
    };
    if let Some(dir) = hunspell_dir {
        dict = dict.with_hunspell(Path::new(&dir), hunspell_name);
    }
    let stats = dict.stats();
    let built = Extractor::new(dict).map_err(to_py_err)?;
    match EXTRACTOR.set(built) {
        Ok(()) => {
            log::info!("Dictionary initialization complete: {}", stats);
            Ok(true)
        }
        Err(_) => {
            log::warn!("Extractor already initialized");
            Ok(false)
        }
    }
}

/// Extract a letter. `kind` is "incoming" (default) or "outgoing".
#[pyfunction]
#[pyo3(signature = (text, kind="incoming"))]
fn extract_letter(text: &str, kind: &str) -> PyResult<BTreeMap<String, String>> {
    let kind = LetterKind::parse(kind)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown letter kind: {}", kind)))?;
    Ok(extractor()?.extract(text, kind).record.to_map())
}

/// Extract a leave-request form.
#[pyfunction]
fn extract_leave(text: &str) -> PyResult<BTreeMap<String, String>> {
    Ok(extractor()?.extract_leave(text).to_map())
}

#[pyfunction]
fn field_accuracy(initial: &str, edited: &str) -> f64 {
    scoring::field_accuracy(initial, edited)
}

/// Score `(field, initial, edited)` triples. Returns (overall, {field: score}).
#[pyfunction]
fn document_accuracy(fields: Vec<(String, String, String)>) -> (f64, HashMap<String, f64>) {
    let doc = scoring::document_accuracy(&fields);
    let per_field = doc.fields.into_iter().map(|f| (f.field, f.score)).collect();
    (doc.overall, per_field)
}

/// Score a stored record with `initial_<field>` / `<field>` keys.
#[pyfunction]
#[pyo3(signature = (record, fields=None))]
fn score_record(
    record: HashMap<String, String>,
    fields: Option<Vec<String>>,
) -> (f64, HashMap<String, f64>) {
    let record: BTreeMap<String, String> = record.into_iter().collect();
    let names: Vec<&str> = match &fields {
        Some(list) => list.iter().map(String::as_str).collect(),
        None => scoring::SCORED_FIELDS.to_vec(),
    };
    let doc = scoring::score_record(&record, &names);
    let per_field = doc.fields.into_iter().map(|f| (f.field, f.score)).collect();
    (doc.overall, per_field)
}

#[pyfunction]
fn break_words(text: &str) -> PyResult<String> {
    Ok(extractor()?.word_breaker().break_words(text))
}

#[pyfunction]
fn classify(code: &str) -> &'static str {
    classifier::classify(code).as_str()
}

#[pymodule]
fn rust_ocr_fields(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_dictionary, m)?)?;
    m.add_function(wrap_pyfunction!(extract_letter, m)?)?;
    m.add_function(wrap_pyfunction!(extract_leave, m)?)?;
    m.add_function(wrap_pyfunction!(field_accuracy, m)?)?;
    m.add_function(wrap_pyfunction!(document_accuracy, m)?)?;
    m.add_function(wrap_pyfunction!(score_record, m)?)?;
    m.add_function(wrap_pyfunction!(break_words, m)?)?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    Ok(())
}
