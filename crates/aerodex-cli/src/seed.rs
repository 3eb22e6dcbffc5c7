//! Seed files: one facility code per line.
//!
//! ```text
//! # West coast
//! KSEA
//! KLAX
//!
//! KJFK
//! ```

use std::path::Path;

use anyhow::{bail, Context};

/// Extracts codes from seed file contents.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
pub fn parse_seed(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Reads a seed file. A file with no codes is an error.
pub fn read_seed_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    let codes = parse_seed(&contents);
    if codes.is_empty() {
        bail!("Seed file {} contains no codes", path.display());
    }

    Ok(codes)
}
