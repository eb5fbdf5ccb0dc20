pub mod file;
pub mod hash;
pub mod manifest;
pub mod fallback;
pub mod generator;
pub mod error;

pub use generator::{generate, generate_with, GenerateOptions};
pub use manifest::{ManifestEntry, ManifestFormatter, ManifestWriter};
pub use hash::checksum;
pub use error::ManifestError;
