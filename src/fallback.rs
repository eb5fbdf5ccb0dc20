//! Recovery for a missing input directory.
//!
//! When the input directory is absent, a single well-known file from the
//! working directory stands in for it. This is not a general fallback: the
//! regular scan never comes through here.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::ManifestError;
use crate::file::entry_name;
use crate::hash::checksum;
use crate::manifest::ManifestEntry;

/// File looked up in the working directory when the input directory is absent.
pub const FALLBACK_FILE: &str = "paper.pdf";

/// Copies `fallback` into the missing `input_dir` and returns its entry.
///
/// Returns `Ok(None)` when there is no fallback or the file does not exist,
/// in which case the caller writes an empty manifest.
pub fn recover_missing_input(
    input_dir: &Path,
    fallback: Option<&Path>,
) -> Result<Option<ManifestEntry>, ManifestError> {
    warn!("Input directory {:?} not found", input_dir);

    let source = match fallback {
        Some(path) if path.is_file() => path,
        Some(path) => {
            info!("Fallback file {:?} not present, writing an empty manifest", path);
            return Ok(None);
        }
        None => {
            info!("No fallback configured, writing an empty manifest");
            return Ok(None);
        }
    };

    let name = entry_name(source);
    let dest = input_dir.join(&name);
    let copy_err = |source_err| ManifestError::Fallback {
        from: source.to_path_buf(),
        to: dest.clone(),
        source: source_err,
    };

    fs::create_dir_all(input_dir).map_err(copy_err)?;
    fs::copy(source, &dest).map_err(copy_err)?;

    let md5sum = checksum(&dest)?;
    info!("Added {} to manifest from fallback {:?}", name, source);
    Ok(Some(ManifestEntry::new(name, md5sum)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::recover_missing_input;
    use crate::hash::compute_hash;
    use crate::ManifestError;

    #[test]
    fn test_copies_fallback_into_new_directory() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let fallback = dir.path().join("paper.pdf");
        fs::write(&fallback, b"%PDF-1.4 fake").unwrap();
        let input = dir.path().join("input_data");

        let entry = recover_missing_input(&input, Some(&fallback))
            .expect("Fallback failed")
            .expect("Expected a fallback entry");

        assert_eq!(entry.name, "paper.pdf");
        assert_eq!(entry.md5sum, compute_hash(b"%PDF-1.4 fake"));
        assert_eq!(fs::read(input.join("paper.pdf")).unwrap(), b"%PDF-1.4 fake");
    }

    #[test]
    fn test_absent_fallback_yields_nothing() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let input = dir.path().join("input_data");

        let missing = dir.path().join("paper.pdf");
        assert!(recover_missing_input(&input, Some(&missing)).unwrap().is_none());
        assert!(recover_missing_input(&input, None).unwrap().is_none());
        assert!(!input.exists());
    }

    #[test]
    fn test_fallback_directory_is_not_a_file() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let fallback = dir.path().join("paper.pdf");
        fs::create_dir(&fallback).unwrap();

        let input = dir.path().join("input_data");
        assert!(recover_missing_input(&input, Some(&fallback)).unwrap().is_none());
    }

    #[test]
    fn test_uncreatable_input_directory_fails() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let fallback = dir.path().join("paper.pdf");
        fs::write(&fallback, b"pdf").unwrap();
        // A regular file blocks the parent of the input directory.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let input = blocker.join("input_data");

        assert!(matches!(
            recover_missing_input(&input, Some(&fallback)),
            Err(ManifestError::Fallback { .. })
        ));
    }
}
