use std::path::Path;

use anyhow::{Context, Result};

/// Page break emitted by text extractors such as `pdftotext`.
const PAGE_BREAK: char = '\u{c}';

/// Split extracted text into pages of lines.
pub fn split_pages(text: &str) -> Vec<Vec<String>> {
    text.split(PAGE_BREAK)
        .map(|page| page.lines().map(str::to_string).collect())
        .collect()
}

/// Read one document's pages. `.json` files hold `[[line, ...], ...]`;
/// anything else is plain text with form-feed page breaks.
pub fn read_document(path: &Path) -> Result<Vec<Vec<String>>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a JSON array of pages", path.display()))
    } else {
        Ok(split_pages(&raw))
    }
}
