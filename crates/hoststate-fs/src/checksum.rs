//! SHA-256 checksum utilities
//!
//! Checksums are only ever compared for equality; they are never persisted.
//! The display form is `sha256:<hex>`.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Prefix for the display form of every checksum
const PREFIX: &str = "sha256:";

/// Files are streamed through the hasher in chunks of this size
pub const CHUNK_SIZE: usize = 8 * 1024;

/// A SHA-256 digest of some content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    /// Checksum of an in-memory byte slice.
    pub fn of_bytes(content: &[u8]) -> Self {
        Self(Sha256::digest(content).into())
    }

    /// Lowercase hex digest without the prefix.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.to_hex())
    }
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// The file is read in [`CHUNK_SIZE`] chunks so large files are never held
/// in memory at once.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub fn hash_file(path: &Path) -> Result<Checksum> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    hash_reader(BufReader::with_capacity(CHUNK_SIZE, file)).map_err(|e| Error::io(path, e))
}

fn hash_reader(mut reader: impl Read) -> io::Result<Checksum> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(Checksum(hasher.finalize().into()))
}
