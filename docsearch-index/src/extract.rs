//! Document extraction from zip bundles
//!
//! Bundles are usually a repository snapshot such as `fastmcp-main.zip`,
//! where every entry sits under one wrapping directory. That first path
//! segment is dropped so filenames read as repository paths.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::document::Document;
use crate::error::Result;

/// Suffixes accepted when none are configured.
pub const DEFAULT_SUFFIXES: &[&str] = &[".md", ".mdx"];

/// Upper bound on the buffer preallocated from an entry's declared size.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Extract documents from a zip archive held by any seekable reader.
///
/// Entries whose names end with one of `suffixes` become documents; all
/// others are skipped. Invalid UTF-8 is replaced, never rejected.
pub fn extract_documents<R, S>(reader: R, suffixes: &[S]) -> Result<Vec<Document>>
where
    R: Read + Seek,
    S: AsRef<str>,
{
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut documents = Vec::new();
    let mut skipped = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        if !has_accepted_suffix(&name, suffixes) {
            skipped += 1;
            continue;
        }

        let mut bytes = Vec::with_capacity(capacity_hint(entry.size()));
        entry.read_to_end(&mut bytes)?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        documents.push(Document::new(strip_leading_segment(&name), content));
    }

    log::debug!(
        "Extracted {} documents ({} entries skipped)",
        documents.len(),
        skipped
    );

    Ok(documents)
}

/// Extract documents from a zip archive on disk.
pub fn extract_documents_from_path<P, S>(path: P, suffixes: &[S]) -> Result<Vec<Document>>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    log::info!("Extracting documents from {}", path.display());
    let file = File::open(path)?;
    extract_documents(BufReader::new(file), suffixes)
}

/// Headers can declare any size; only trust it up to a bound.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or(0)
}

fn has_accepted_suffix<S: AsRef<str>>(name: &str, suffixes: &[S]) -> bool {
    suffixes.iter().any(|s| name.ends_with(s.as_ref()))
}

/// Drop the first `/`-delimited segment; names without a slash are kept.
fn strip_leading_segment(name: &str) -> &str {
    match name.split_once('/') {
        Some((_, rest)) => rest,
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn build_zip_raw<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a [u8])>,
    ) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, bytes) in entries {
            if name.ends_with('/') {
                writer.add_directory(name, options).unwrap();
            } else {
                writer.start_file(name, options).unwrap();
                writer.write_all(bytes).unwrap();
            }
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn build_zip(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        build_zip_raw(entries.iter().map(|(name, body)| (*name, body.as_bytes())))
    }

    #[test]
    fn test_strip_leading_segment() {
        assert_eq!(
            strip_leading_segment("fastmcp-main/docs/intro.md"),
            "docs/intro.md"
        );
        assert_eq!(strip_leading_segment("README.md"), "README.md");
        assert_eq!(strip_leading_segment("root/"), "");
    }

    #[test]
    fn test_capacity_hint_is_bounded() {
        assert_eq!(capacity_hint(0), 0);
        assert_eq!(capacity_hint(4096), 4096);
        assert_eq!(capacity_hint(u64::MAX), 1 << 20);
    }

    #[test]
    fn test_extracts_matching_suffixes() {
        let archive = build_zip(&[
            ("fastmcp-main/", ""),
            ("fastmcp-main/README.md", "# FastMCP"),
            ("fastmcp-main/docs/tools.mdx", "Create a tool"),
            ("fastmcp-main/src/server.py", "print('hi')"),
        ]);

        let docs = extract_documents(archive, DEFAULT_SUFFIXES).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], Document::new("README.md", "# FastMCP"));
        assert_eq!(docs[1], Document::new("docs/tools.mdx", "Create a tool"));
    }

    #[test]
    fn test_custom_suffixes() {
        let archive = build_zip(&[("repo/a.txt", "alpha"), ("repo/b.md", "beta")]);

        let docs = extract_documents(archive, &[".txt"]).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "a.txt");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let archive = build_zip_raw([("repo/bad.md", &b"ok \xff\xfe end"[..])]);

        let docs = extract_documents(archive, DEFAULT_SUFFIXES).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.starts_with("ok "));
        assert!(docs[0].content.ends_with(" end"));
        assert!(docs[0].content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_empty_archive() {
        let archive = build_zip(&[]);
        let docs = extract_documents(archive, DEFAULT_SUFFIXES).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        let result = extract_documents(Cursor::new(b"plain text".to_vec()), DEFAULT_SUFFIXES);
        assert!(matches!(result, Err(crate::IndexError::Archive(_))));
    }

    #[test]
    fn test_extract_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        let archive = build_zip(&[("bundle/guide.md", "install guide")]);
        std::fs::write(&path, archive.into_inner()).unwrap();

        let docs = extract_documents_from_path(&path, DEFAULT_SUFFIXES).unwrap();
        assert_eq!(docs, vec![Document::new("guide.md", "install guide")]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = extract_documents_from_path("/nonexistent/bundle.zip", DEFAULT_SUFFIXES);
        assert!(matches!(result, Err(crate::IndexError::Io(_))));
    }
}
