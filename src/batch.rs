//! Directory batch processing.
//!
//! The OCR engine itself lives outside this crate; it is reached through the
//! [`OcrEngine`] trait. Files are independent, so they are processed in
//! parallel with rayon, and results come back in file-name order.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::engine::{Extraction, Extractor};
use crate::error::{Error, Result};
use crate::record::{ExtractionResult, LetterKind};

/// Extensions accepted as scanned pages.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

/// Produces raw recognised text for one image file.
pub trait OcrEngine: Sync {
    fn recognize(&self, path: &Path) -> Result<String>;
}

/// Reads OCR output previously written next to each image as `<image>.txt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarText;

impl SidecarText {
    pub fn sidecar_path(image: &Path) -> PathBuf {
        let mut name = image.as_os_str().to_owned();
        name.push(".txt");
        PathBuf::from(name)
    }
}

impl OcrEngine for SidecarText {
    fn recognize(&self, path: &Path) -> Result<String> {
        let sidecar = Self::sidecar_path(path);
        fs::read_to_string(&sidecar).map_err(|e| Error::Ocr {
            path: path.to_path_buf(),
            message: format!("cannot read {}: {}", sidecar.display(), e),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub filename: String,
    #[serde(flatten)]
    pub record: ExtractionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutput {
    pub records: Vec<BatchRecord>,
    /// `--- Dokumen: <file> ---` sections with each body summary.
    pub digest: String,
    /// Files skipped because OCR failed or produced no text.
    pub skipped: Vec<String>,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by name, at most `max_files`.
pub fn list_images(dir: &Path, max_files: Option<usize>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    if let Some(max) = max_files {
        files.truncate(max);
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn process_one<E: OcrEngine>(
    path: &Path,
    engine: &E,
    extractor: &Extractor,
    kind: LetterKind,
) -> Option<Extraction> {
    let text = match engine.recognize(path) {
        Ok(text) => text,
        Err(e) => {
            error!("OCR failed for {}: {}", path.display(), e);
            return None;
        }
    };
    if text.trim().is_empty() {
        warn!("No text recognised in {}, skipping", path.display());
        return None;
    }
    Some(extractor.extract(&text, kind))
}

/// OCR and extract every image in `dir`. Per-file failures are logged and skipped.
pub fn process_directory<E: OcrEngine>(
    dir: impl AsRef<Path>,
    max_files: Option<usize>,
    engine: &E,
    extractor: &Extractor,
    kind: LetterKind,
) -> Result<BatchOutput> {
    let dir = dir.as_ref();
    let files = list_images(dir, max_files)?;
    info!("Processing {} files from {}", files.len(), dir.display());

    let results: Vec<(String, Option<Extraction>)> = files
        .par_iter()
        .map(|path| (file_name(path), process_one(path, engine, extractor, kind)))
        .collect();

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut digest = String::new();
    for (filename, extraction) in results {
        match extraction {
            Some(extraction) => {
                digest.push_str(&format!(
                    "--- Dokumen: {} ---\n{}\n\n",
                    filename, extraction.record.body_summary
                ));
                records.push(BatchRecord {
                    filename,
                    record: extraction.record,
                });
            }
            None => skipped.push(filename),
        }
    }

    info!(
        "Batch done: {} extracted, {} skipped",
        records.len(),
        skipped.len()
    );
    Ok(BatchOutput {
        records,
        digest,
        skipped,
    })
}
