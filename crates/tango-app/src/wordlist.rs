use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;

/// Reads the query list. Plain text lists carry one word per line; Kindle
/// vocabulary HTML exports carry one word per noteText block.
pub fn read_word_list(path: &Path) -> Result<Vec<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "txt" => read_txt(path),
        "html" => read_kindle_html(path),
        other => bail!("cannot handle .{other} word lists (expected .txt or .html)"),
    }
}

fn read_txt(path: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn read_kindle_html(path: &Path) -> Result<Vec<String>> {
    let html = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let re = Regex::new(r#"(?s)<div[^>]*class="noteText"[^>]*>(.*?)</div>"#)
        .context("noteText pattern")?;
    let mut words = Vec::new();
    for cap in re.captures_iter(&html) {
        // The looked-up word is the text before the first line break; the
        // rest of the block is surrounding sentence context.
        let first_line = cap[1].lines().next().unwrap_or("").trim();
        if !first_line.is_empty() {
            words.push(first_line.to_string());
        }
    }
    Ok(words)
}
