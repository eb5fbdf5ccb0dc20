use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use log::debug;
use md5::{Digest, Md5};

use crate::error::ManifestError;

/// Number of bytes fed to the digest per read.
pub const CHUNK_SIZE: usize = 8192;

/// Computes the MD5 hash of an in-memory buffer.
pub fn compute_hash(input: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}

/// Streams `reader` through the digest in `CHUNK_SIZE` pieces and returns the
/// lowercase hex digest.
pub fn checksum_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Md5::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Computes the MD5 checksum of the file at `path` without loading it whole.
pub fn checksum(path: &Path) -> Result<String, ManifestError> {
    let unreadable = |source| ManifestError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let hash = checksum_reader(file).map_err(unreadable)?;

    debug!("MD5 checksum for {:?} is {}", path, hash);
    Ok(hash)
}
