use log::{debug, warn};
use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use crate::error::ManifestError;

/// Leading character that marks a file as hidden.
const HIDDEN_MARKER: &str = ".";

/// Returns true when `name` belongs to a hidden file.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with(HIDDEN_MARKER)
}

/// Returns the base name of `path` as a manifest entry name.
pub fn entry_name(path: &Path) -> String {
    let name = path.file_name().unwrap_or_default();
    if name.to_str().is_none() {
        warn!("File name {:?} is not valid UTF-8, recording it lossily", name);
    }
    name.to_string_lossy().into_owned()
}

/// Lists the regular, non-hidden files directly inside `dir`, sorted by name.
///
/// Symlinks are followed, so a link to a regular file is listed and a link to
/// a directory is not. Subdirectories are never descended into.
pub fn scan(dir: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let list_err = |source| ManifestError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();

        if is_hidden(&entry.file_name()) {
            debug!("Skipping hidden entry {:?}", path);
            continue;
        }

        // A dangling symlink has no metadata; it is not a regular file.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            _ => debug!("Skipping non-regular entry {:?}", path),
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::{entry_name, is_hidden, scan};
    use crate::ManifestError;

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(OsStr::new(".secret")));
        assert!(is_hidden(OsStr::new(".")));
        assert!(!is_hidden(OsStr::new("data.bin")));
        assert!(!is_hidden(OsStr::new("a.b")));
    }

    #[test]
    fn test_entry_name_is_base_name() {
        assert_eq!(entry_name(Path::new("input_data/paper.pdf")), "paper.pdf");
        assert_eq!(entry_name(Path::new("a.txt")), "a.txt");
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let root = dir.path();
        fs::write(root.join("zeta.txt"), b"z").unwrap();
        fs::write(root.join("alpha.txt"), b"a").unwrap();
        fs::write(root.join("Beta.txt"), b"b").unwrap();
        fs::write(root.join(".hidden"), b"h").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested").join("inner.txt"), b"i").unwrap();

        let names: Vec<String> = scan(root)
            .expect("Scan failed")
            .iter()
            .map(|p| entry_name(p))
            .collect();

        // Byte order puts uppercase before lowercase.
        assert_eq!(names, vec!["Beta.txt", "alpha.txt", "zeta.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follows_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().expect("Failed to create temporary directory");
        let root = dir.path();
        fs::write(root.join("target.txt"), b"t").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        symlink(root.join("target.txt"), root.join("link.txt")).unwrap();
        symlink(root.join("subdir"), root.join("dirlink")).unwrap();
        symlink(root.join("missing"), root.join("dangling")).unwrap();

        let names: Vec<String> = scan(root).unwrap().iter().map(|p| entry_name(p)).collect();
        assert_eq!(names, vec!["link.txt", "target.txt"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempdir().expect("Failed to create temporary directory");
        assert!(scan(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_on_file_fails() {
        let dir = tempdir().expect("Failed to create temporary directory");
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(scan(&file), Err(ManifestError::ListDirectory { .. })));
    }
}
