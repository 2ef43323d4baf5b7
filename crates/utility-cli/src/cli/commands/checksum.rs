//! Checksum command: SHA-1 and SHA-256 of a file, as recorded in resource state.

use anyhow::Result;
use std::path::Path;
use utility_core::checksum;

pub fn run_checksum(path: &Path) -> Result<()> {
    let digests = checksum::digest_path(path)?;
    println!("sha1    {}  {}", digests.sha1, path.display());
    println!("sha256  {}  {}", digests.sha256, path.display());
    Ok(())
}
