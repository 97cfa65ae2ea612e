use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::ClassifiedDocument;

/// `*.json` files directly inside `dir`, in directory-listing order.
///
/// Entries that fail to read are skipped; only failing to open `dir` is an error.
pub fn list_json_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

pub fn read_json_value<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| Error::parse(path, e))
}

pub fn read_document<P: AsRef<Path>>(path: P) -> Result<ClassifiedDocument> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| Error::parse(path, e))
}

/// Writes the document as four-space indented UTF-8 JSON, creating parent dirs.
pub fn write_document<P: AsRef<Path>>(path: P, document: &ClassifiedDocument) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut ser)?;
    buf.push(b'\n');

    std::fs::write(path, buf)?;
    Ok(())
}

/// `processed_<name>` inside `output_dir`.
pub fn processed_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("processed_{}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassifiedItem;

    #[test]
    fn test_list_json_files_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("b.txt"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = list_json_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.json")]);
    }

    #[test]
    fn test_write_then_read_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/doc.json");

        let mut doc = ClassifiedDocument::empty();
        doc.use_cases.push(ClassifiedItem {
            content: "Café menus – with ünïcode".to_string(),
            author: "@x".to_string(),
            votes: 2.0,
            hearted: true,
            has_replies: false,
        });
        write_document(&path, &doc).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Café menus – with ünïcode"));
        assert!(raw.contains("\n    \"use_cases\": ["));
        assert_eq!(read_document(&path).unwrap(), doc);
    }

    #[test]
    fn test_read_document_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"use_cases\": [").unwrap();

        match read_document(&path) {
            Err(Error::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_processed_output_path() {
        assert_eq!(
            processed_output_path(Path::new("out"), Path::new("in/video_1.json")),
            PathBuf::from("out/processed_video_1.json")
        );
    }
}
