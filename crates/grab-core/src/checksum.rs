//! File checksums for `grabsum`.
//!
//! Reads through a caller-sized buffer and feeds every chunk to the hasher.
//! Independent of the download path.

use anyhow::{Context, Result};
use sha2::Digest;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Md5,
    Sha256,
}

impl Algorithm {
    /// Label used in `grabsum` output.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha256 => "SHA-256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha256 => "sha256",
        })
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha256" | "sha-256" => Ok(Algorithm::Sha256),
            other => Err(format!("unknown algorithm {:?} (expected md5 or sha256)", other)),
        }
    }
}

/// Lowercase hex digest plus the number of bytes hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub algorithm: Algorithm,
    pub hex: String,
    pub bytes: u64,
}

impl FileDigest {
    /// Compares against a user-supplied digest, ignoring hex case and surrounding whitespace.
    pub fn matches(&self, expected: &str) -> bool {
        self.hex.eq_ignore_ascii_case(expected.trim())
    }
}

/// Hashes everything `reader` yields, `buf_size` bytes at a time.
pub fn digest_reader<R: Read>(reader: R, algorithm: Algorithm, buf_size: usize) -> Result<FileDigest> {
    if buf_size == 0 {
        anyhow::bail!("buffer size must be >= 1");
    }
    let (hex, bytes) = match algorithm {
        Algorithm::Md5 => hash_with(md5::Md5::new(), reader, buf_size)?,
        Algorithm::Sha256 => hash_with(sha2::Sha256::new(), reader, buf_size)?,
    };
    Ok(FileDigest {
        algorithm,
        hex,
        bytes,
    })
}

/// Hashes the file at `path`.
pub fn digest_path(path: &Path, algorithm: Algorithm, buf_size: usize) -> Result<FileDigest> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    digest_reader(f, algorithm, buf_size).with_context(|| format!("read {}", path.display()))
}

fn hash_with<D: Digest, R: Read>(mut hasher: D, mut reader: R, buf_size: usize) -> Result<(String, u64)> {
    let mut buf = vec![0u8; buf_size];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    Ok((hex::encode(hasher.finalize()), total))
}
