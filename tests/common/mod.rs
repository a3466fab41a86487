/*!
 * Common test utilities for the voxalign test suite
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use tempfile::TempDir;

use voxalign::aligner::TimedFragment;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a fragment sequence from (start, end, text) tuples
pub fn fragments(parts: &[(i64, i64, &str)]) -> Vec<TimedFragment> {
    parts
        .iter()
        .map(|(start, end, text)| TimedFragment::new(*start, *end, *text))
        .collect()
}

/// Builds an owned unit list from string slices
pub fn units(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
