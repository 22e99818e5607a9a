use anyhow::{Context, Result};
use reqwest::Url;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::charts::ChartKind;

pub fn export_to_json<T: serde::Serialize>(data: &T, path: &Path) -> Result<()> {
    let file = File::create(path).context("Failed to create output JSON file")?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, data)
        .context("Failed to serialize data to JSON")
}

// Function to get a safe filename from a string
pub fn sanitize_filename(s: &str) -> String {
    // Replace characters that might be problematic in filenames
    let mut result = s.to_string();
    for c in &['/', '\\', ':', '*', '?', '"', '<', '>', '|', ' '] {
        result = result.replace(*c, "_");
    }

    // Trim and truncate if too long
    let result = result.trim_matches('_');
    result.chars().take(50).collect()
}

/// `<host>-<kind>.<extension>`, e.g. `example.com-bar.png`.
pub fn chart_file_name(url: &str, kind: ChartKind, extension: &str) -> String {
    let host = Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "page".to_string());

    let host = sanitize_filename(&host);
    let host = if host.is_empty() { "page".to_string() } else { host };
    format!("{}-{}.{}", host, kind.name(), extension)
}

// Return a pluralized form of a word based on count
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sanitizes_filenames() {
        assert_eq!(sanitize_filename("a/b:c?d"), "a_b_c_d");
        assert_eq!(sanitize_filename(" spaced "), "spaced");
        assert_eq!(sanitize_filename(&"x".repeat(80)).len(), 50);
    }

    #[test]
    fn chart_file_names_use_host_and_kind() {
        assert_eq!(
            chart_file_name("https://news.example.com/a/b?c=1", ChartKind::BoxPlot, "png"),
            "news.example.com-box-plot.png"
        );
        assert_eq!(chart_file_name("not a url", ChartKind::Pie, "html"), "page-pie.html");
    }

    #[test]
    fn pluralizes_common_words() {
        assert_eq!(pluralize("word", 1), "word");
        assert_eq!(pluralize("word", 2), "words");
        assert_eq!(pluralize("match", 0), "matches");
    }

    #[test]
    fn exports_pretty_json() {
        let path = std::env::temp_dir().join(format!("word_insights_export_{}.json", std::process::id()));
        export_to_json(&vec![("a", 1)], &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(written.contains("\"a\""));
        assert!(written.contains('\n'));
    }
}
