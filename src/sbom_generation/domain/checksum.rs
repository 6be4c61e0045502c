use crate::shared::error::SbomError;
use crate::shared::Result;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Algorithm name → lowercase hex digest, iterated in algorithm-name order
pub type Checksums = BTreeMap<String, String>;

/// Digest algorithms supported for files and packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumAlgorithm {
    /// Algorithms computed for files
    pub const FILE: &'static [ChecksumAlgorithm] = &[
        ChecksumAlgorithm::Sha1,
        ChecksumAlgorithm::Sha256,
        ChecksumAlgorithm::Sha512,
    ];

    /// Algorithms computed for package source files (archives, layers)
    pub const PACKAGE_SOURCE: &'static [ChecksumAlgorithm] =
        &[ChecksumAlgorithm::Sha256, ChecksumAlgorithm::Sha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "SHA1",
            ChecksumAlgorithm::Sha256 => "SHA256",
            ChecksumAlgorithm::Sha512 => "SHA512",
        }
    }
}

enum Hasher {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Sha1 => Hasher::Sha1(Sha1::new()),
            ChecksumAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
            ChecksumAlgorithm::Sha512 => Hasher::Sha512(Sha512::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha1(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Hasher::Sha1(h) => hex::encode(h.finalize()),
            Hasher::Sha256(h) => hex::encode(h.finalize()),
            Hasher::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// Streams a reader once through every requested digest
pub fn digest_reader<R: Read>(
    mut reader: R,
    algorithms: &[ChecksumAlgorithm],
) -> io::Result<Checksums> {
    let mut hashers: Vec<(ChecksumAlgorithm, Hasher)> = algorithms
        .iter()
        .map(|&a| (a, Hasher::new(a)))
        .collect();

    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        for (_, hasher) in hashers.iter_mut() {
            hasher.update(&buffer[..read]);
        }
    }

    Ok(hashers
        .into_iter()
        .map(|(algorithm, hasher)| (algorithm.as_str().to_string(), hasher.finalize_hex()))
        .collect())
}

/// Computes the requested digests of a file on disk
///
/// # Errors
/// Returns `SbomError::FileReadError` if the file cannot be opened or read
pub fn digest_file(path: &Path, algorithms: &[ChecksumAlgorithm]) -> Result<Checksums> {
    let file = fs::File::open(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    digest_reader(io::BufReader::new(file), algorithms).map_err(|e| {
        SbomError::FileReadError {
            path: path.to_path_buf(),
            details: format!("Failed while hashing: {}", e),
        }
        .into()
    })
}
