//! Batch field extraction over a directory of scanned letters.
//!
//! OCR text is read from `<image>.txt` sidecars written by the OCR step.
//!
//! Usage:
//!   ocr-fields <dir> [--max-files N] [--outgoing] [--dictionary dictionary.json]
//!              [--hunspell-dir DIR] [--digest]

use std::path::PathBuf;
use std::process::ExitCode;

use log::error;

use rust_ocr_fields::batch::{SidecarText, process_directory};
use rust_ocr_fields::{Dictionary, Extractor, LetterKind};

struct BatchConfig {
    dir: PathBuf,
    max_files: Option<usize>,
    kind: LetterKind,
    dictionary: Option<PathBuf>,
    hunspell_dir: Option<PathBuf>,
    digest_only: bool,
}

impl BatchConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut dir = None;
        let mut max_files = None;
        let mut kind = LetterKind::Incoming;
        let mut dictionary = None;
        let mut hunspell_dir = None;
        let mut digest_only = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--max-files" => {
                    i += 1;
                    max_files = args.get(i).and_then(|n| n.parse().ok());
                },
                "--outgoing" => kind = LetterKind::Outgoing,
                "--dictionary" => {
                    i += 1;
                    dictionary = args.get(i).map(PathBuf::from);
                },
                "--hunspell-dir" => {
                    i += 1;
                    hunspell_dir = args.get(i).map(PathBuf::from);
                },
                "--digest" => digest_only = true,
                other if dir.is_none() && !other.starts_with("--") => {
                    dir = Some(PathBuf::from(other));
                },
                other => eprintln!("Ignoring unknown argument: {}", other),
            }
            i += 1;
        }

        Some(Self {
            dir: dir?,
            max_files,
            kind,
            dictionary,
            hunspell_dir,
            digest_only,
        })
    }
}

fn run(config: BatchConfig) -> rust_ocr_fields::Result<()> {
    let mut dict = match &config.dictionary {
        Some(path) => Dictionary::load(path)?,
        None => Dictionary::builtin(),
    };
    if let Some(dir) = &config.hunspell_dir {
        dict = dict.with_hunspell(dir, "id_ID");
    }
    let extractor = Extractor::new(dict)?;

    let output = process_directory(
        &config.dir,
        config.max_files,
        &SidecarText,
        &extractor,
        config.kind,
    )?;

    if config.digest_only {
        print!("{}", output.digest);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(config) = BatchConfig::from_args() else {
        eprintln!(
            "Usage: ocr-fields <dir> [--max-files N] [--outgoing] [--dictionary FILE] [--hunspell-dir DIR] [--digest]"
        );
        return ExitCode::from(2);
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
