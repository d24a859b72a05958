use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use chatarc_types::ExportDocument;

/// Write the export document as pretty-printed UTF-8 JSON.
///
/// The document lands in a sibling temp file first and is renamed over the
/// target, so a crashed run never leaves a half-written archive behind.
pub fn write_document(path: &Path, document: &ExportDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(document)
        .context("failed to serialize export document")?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, json.as_bytes())
        .with_context(|| format!("failed to write temp file: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move export into place: {}", path.display()))?;

    Ok(())
}

fn tmp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatarc_types::{Conversation, ExportDocument, Source, conversation::UNTITLED};

    #[test]
    fn test_written_document_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let document = ExportDocument::new(
            Source::new("chat.example.com (API-first exporter)"),
            vec![Conversation::header_only(
                "c1",
                "https://chat.example.com/c/c1",
                UNTITLED,
            )],
        );
        write_document(&path, &document).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let back: ExportDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back.conversations.len(), 1);
        assert_eq!(back.conversations[0].id, "c1");

        // No temp file left behind.
        assert!(!dir.path().join("export.json.tmp").exists());
    }

    #[test]
    fn test_rewrites_existing_file_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        fs::write(&path, "{\"stale\": true}").unwrap();

        let document =
            ExportDocument::new(Source::new("chat.example.com"), Vec::new());
        write_document(&path, &document).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        let back: ExportDocument = serde_json::from_str(&text).unwrap();
        assert!(back.conversations.is_empty());
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/export.json");

        let document = ExportDocument::new(Source::new("chat.example.com"), Vec::new());
        write_document(&path, &document).unwrap();
        assert!(path.exists());
    }
}
