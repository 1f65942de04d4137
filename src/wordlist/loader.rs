use std::fs;
use std::path::Path;

/// Newline-delimited word file: one candidate per line, blanks skipped.
pub fn load_lines<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(&path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
