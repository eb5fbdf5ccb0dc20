use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use tempfile::NamedTempFile;

use crate::error::ManifestError;

/// One manifest line. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub md5sum: String,
}

impl ManifestEntry {
    pub fn new(name: impl Into<String>, md5sum: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            md5sum: md5sum.into(),
        }
    }
}

/// JSON layout of a manifest line: `", "` and `": "` separators, and every
/// character outside printable ASCII written as a `\uXXXX` escape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestFormatter;

impl Formatter for ManifestFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        // Quotes, backslashes and control characters never reach a fragment.
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Writes manifest entries as line-delimited JSON.
///
/// Lines go to a temporary file in the output's directory which replaces the
/// output path on [`ManifestWriter::finish`]. A writer dropped before that
/// removes its temporary file and leaves the output path untouched.
pub struct ManifestWriter {
    path: PathBuf,
    out: BufWriter<NamedTempFile>,
    count: usize,
}

impl ManifestWriter {
    pub fn create(path: &Path) -> Result<Self, ManifestError> {
        // Same directory as the output so the final rename stays atomic.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".manifest-").suffix(".jsonl.tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Staging files default to 0600.
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }

        let named_temp = builder
            .tempfile_in(dir)
            .map_err(|source| ManifestError::UnwritableOutput {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Staging manifest {:?} in {:?}", path, named_temp.path());
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(named_temp),
            count: 0,
        })
    }

    /// Appends one entry as a single JSON line.
    pub fn push(&mut self, entry: &ManifestEntry) -> Result<(), ManifestError> {
        let mut ser = serde_json::Serializer::with_formatter(&mut self.out, ManifestFormatter);
        entry.serialize(&mut ser).map_err(|e| self.json_err(e))?;
        self.out.write_all(b"\n").map_err(|e| self.write_err(e))?;
        self.count += 1;
        Ok(())
    }

    /// Flushes the staged lines and moves them over the output path.
    pub fn finish(self) -> Result<usize, ManifestError> {
        let Self { path, out, count } = self;

        let named_temp = out.into_inner().map_err(|e| ManifestError::UnwritableOutput {
            path: path.clone(),
            source: e.into_error(),
        })?;
        named_temp
            .as_file()
            .sync_all()
            .map_err(|source| ManifestError::UnwritableOutput {
                path: path.clone(),
                source,
            })?;
        named_temp.persist(&path)?;

        debug!("Wrote {} manifest entries to {:?}", count, path);
        Ok(count)
    }

    fn write_err(&self, source: io::Error) -> ManifestError {
        ManifestError::UnwritableOutput {
            path: self.path.clone(),
            source,
        }
    }

    fn json_err(&self, e: serde_json::Error) -> ManifestError {
        // Only the underlying writer can fail for a two-string struct.
        if e.is_io() {
            self.write_err(io::Error::from(e))
        } else {
            ManifestError::Serialize(e)
        }
    }
}
