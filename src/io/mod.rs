pub mod bucket_lists;
pub mod per_file;
pub mod pgml_sample;
pub mod walker;

pub use bucket_lists::BucketWriters;
pub use per_file::{JsonlRecordWriter, RecordSink, TsvRecordWriter};
pub use pgml_sample::PgmlBlockSampler;
pub use walker::{find_pg_files, PgFileWalker};

use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a file as Latin-1: every byte maps to the char with the same code,
/// so any byte sequence decodes.
pub fn read_latin1(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| Error::io_at(format!("cannot read {}", path.display()), path, e))?;
    Ok(decode_latin1(&bytes))
}

pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| Error::io_at("cannot create directory", path, e))?;
    }
    Ok(())
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::io_at("cannot write file", path, e))
}

/// Write each rendered report into `out_dir`, returning the written paths.
pub fn write_reports(out_dir: &Path, reports: &BTreeMap<String, String>) -> Result<Vec<PathBuf>> {
    ensure_dir(out_dir)?;
    reports
        .iter()
        .map(|(name, content)| {
            let path = out_dir.join(name);
            write_file(&path, content)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_latin1_maps_high_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.pg");
        fs::write(&path, [b'a', 0xE9, 0xFF, b'\n']).unwrap();
        assert_eq!(read_latin1(&path).unwrap(), "a\u{e9}\u{ff}\n");
    }

    #[test]
    fn test_read_missing_file_is_file_system_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.pg");
        let err = read_latin1(&path).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn test_write_reports_creates_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/out");
        let mut reports = BTreeMap::new();
        reports.insert("counts_by_type.tsv".to_string(), "type\tcount\n".to_string());
        let written = write_reports(&out, &reports).unwrap();
        assert_eq!(written, vec![out.join("counts_by_type.tsv")]);
        assert_eq!(
            fs::read_to_string(out.join("counts_by_type.tsv")).unwrap(),
            "type\tcount\n"
        );
    }
}
