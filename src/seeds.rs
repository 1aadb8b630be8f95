// src/seeds.rs
// =============================================================================
// Loads the seed file: one URL per line, surrounding whitespace trimmed,
// blank lines ignored, duplicates collapsed by the HashSet.
// =============================================================================

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

pub async fn load_seeds(path: &Path) -> Result<HashSet<String>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    Ok(parse_seeds(&raw))
}

pub fn parse_seeds(raw: &str) -> HashSet<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
