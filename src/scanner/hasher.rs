//! Streaming file hasher.
//!
//! # Overview
//!
//! [`Hasher`] computes a 32-byte content digest by feeding a file through an
//! incremental hasher at most [`CHUNK_SIZE`] bytes at a time, so memory use
//! does not grow with file size. Small files get a buffer sized to fit.
//! BLAKE3 is the default; SHA-256 is available when a widely recognised
//! digest is preferred.
//!
//! Neither choice is relied on for tamper resistance: the digest only decides
//! which same-size files are reported together.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::scanner::{hash_to_hex, HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(HashAlgorithm::Blake3);
//! let hash = hasher.hash_file(Path::new("Cargo.toml")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::HashError;

/// Content digest produced by every supported algorithm.
pub type Hash = [u8; 32];

/// Bytes read per `read` call while hashing.
pub const CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Smallest read buffer used for files whose size is known.
const MIN_BUFFER: usize = 8 * 1024;

/// Read buffer for a file of `len` bytes: just large enough, up to
/// [`CHUNK_SIZE`].
fn buffer_len(len: u64) -> usize {
    usize::try_from(len)
        .unwrap_or(CHUNK_SIZE)
        .clamp(MIN_BUFFER, CHUNK_SIZE)
}

/// Digest algorithm used for the content key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3 (fast, default)
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Blake3 => write!(f, "blake3"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Incremental digest state for one file.
enum State {
    Blake3(Box<blake3::Hasher>),
    Sha256(Sha256),
}

impl State {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => State::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => State::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            State::Blake3(h) => {
                h.update(chunk);
            }
            State::Sha256(h) => h.update(chunk),
        }
    }

    fn finalize(self) -> Hash {
        match self {
            State::Blake3(h) => *h.finalize().as_bytes(),
            State::Sha256(h) => h.finalize().into(),
        }
    }
}

/// Streaming content hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hash the full contents of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails.
    pub fn hash_file(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let capacity = file
            .metadata()
            .map(|m| buffer_len(m.len()))
            .unwrap_or(CHUNK_SIZE);
        self.hash_with_buffer(file, capacity)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Hash everything a reader yields, [`CHUNK_SIZE`] bytes at a time.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, reader: R) -> std::io::Result<Hash> {
        self.hash_with_buffer(reader, CHUNK_SIZE)
    }

    fn hash_with_buffer<R: Read>(&self, mut reader: R, capacity: usize) -> std::io::Result<Hash> {
        let mut state = State::new(self.algorithm);
        let mut buf = vec![0u8; capacity];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.update(&buf[..n]);
        }
        Ok(state.finalize())
    }
}

/// Render a digest as lowercase hexadecimal.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
