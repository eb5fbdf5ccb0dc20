use std::path::{Path, PathBuf};

use log::info;

use crate::error::ManifestError;
use crate::fallback::{recover_missing_input, FALLBACK_FILE};
use crate::file::{entry_name, scan};
use crate::hash::checksum;
use crate::manifest::{ManifestEntry, ManifestWriter};

/// Directory scanned when none is given.
pub const DEFAULT_INPUT_DIR: &str = "input_data";

/// Manifest written when no output path is given.
pub const DEFAULT_OUTPUT: &str = "metadata.jsonl";

/// Inputs for a single manifest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    /// File copied into `input_dir` when that directory does not exist.
    /// `None` always produces an empty manifest in that case.
    pub fallback: Option<PathBuf>,
}

impl GenerateOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            fallback: Some(PathBuf::from(FALLBACK_FILE)),
        }
    }

    pub fn with_fallback(mut self, fallback: Option<PathBuf>) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT)
    }
}

/// Writes the manifest for `input_dir` to `output_path` and returns the
/// number of entries.
///
/// A missing `input_dir` is recovered from `paper.pdf` in the current
/// working directory; see [`generate_with`].
pub fn generate(input_dir: &Path, output_path: &Path) -> Result<usize, ManifestError> {
    generate_with(&GenerateOptions::new(input_dir, output_path))
}

/// Generates a manifest as described by `options`.
///
/// This function:
/// 1. Resolves the input set: the sorted regular, non-hidden files of
///    `input_dir`, or the fallback entry when that directory is absent.
/// 2. Hashes each file in turn and writes one JSON line per entry.
/// 3. Replaces `output_path` only once every entry is written.
///
/// The first I/O error aborts the run.
pub fn generate_with(options: &GenerateOptions) -> Result<usize, ManifestError> {
    let GenerateOptions {
        input_dir,
        output_path,
        fallback,
    } = options;

    if !input_dir.exists() {
        let mut writer = ManifestWriter::create(output_path)?;
        if let Some(entry) = recover_missing_input(input_dir, fallback.as_deref())? {
            writer.push(&entry)?;
        }
        return writer.finish();
    }

    info!("Generating {:?}", output_path);
    info!("Scanning {:?} for files...", input_dir);

    let files = scan(input_dir)?;
    let mut writer = ManifestWriter::create(output_path)?;
    for file in &files {
        let name = entry_name(file);
        info!("  Processing: {}", name);
        let md5sum = checksum(file)?;
        writer.push(&ManifestEntry::new(name, md5sum))?;
    }

    let count = writer.finish()?;
    info!("Created {:?} with {} files", output_path, count);
    Ok(count)
}
