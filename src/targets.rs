// src/targets.rs
// =============================================================================
// This module assembles the final list of target URLs from the two places
// they can come from: positional arguments and an optional targets file.
//
// Rules:
// - Command-line URLs come first, file URLs after, in the order given
// - In the file, blank lines and '#' comment lines are skipped
// - Duplicates are kept on purpose: each occurrence is checked independently
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;

// Combines positional URLs with the contents of an optional targets file
pub fn assemble_targets(urls: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    let mut targets = urls;

    if let Some(path) = file {
        // with_context attaches the file name to the error, so the user sees
        // which path failed instead of a bare "No such file or directory"
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read targets file '{}'", path.display()))?;
        targets.extend(parse_target_lines(&contents));
    }

    Ok(targets)
}

// Parses the line-oriented targets file format
fn parse_target_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
