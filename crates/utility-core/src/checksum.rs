//! Content identity: SHA-1 and SHA-256 digests as lowercase hex.
//!
//! The same pair is computed for every lifecycle operation so identical
//! content always yields the same resource `id`.

use anyhow::{Context, Result};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Hex digests of a piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksums {
    pub sha1: String,
    pub sha256: String,
}

/// Compute both digests of an in-memory buffer. Never fails.
pub fn digest(bytes: &[u8]) -> Checksums {
    Checksums {
        sha1: hex::encode(Sha1::digest(bytes)),
        sha256: hex::encode(Sha256::digest(bytes)),
    }
}

/// Compute both digests of a file, reading in chunks to keep memory bounded.
pub fn digest_path(path: &Path) -> Result<Checksums> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut sha1 = Sha1::new();
    let mut sha256 = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        sha1.update(&buf[..n]);
        sha256.update(&buf[..n]);
    }
    Ok(Checksums {
        sha1: hex::encode(sha1.finalize()),
        sha256: hex::encode(sha256.finalize()),
    })
}
