//! MD5 digests of arbitrary files

use anyhow::{Context, Result};
use fwpkg_schema::Md5Digest;
use std::path::PathBuf;

/// Print `<md5>  <path>` for each file, like `md5sum`.
pub fn hash(files: &[PathBuf]) -> Result<()> {
    for path in files {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        println!("{}  {}", Md5Digest::compute(&data), path.display());
    }
    Ok(())
}
