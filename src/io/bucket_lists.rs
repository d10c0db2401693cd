//! Per-bucket file lists under `lists/`.
//!
//! Every bucket file (`lists/<group>/<key>_files.txt`) is owned by a single
//! lazily opened handle, so each path is written by exactly one writer.

use super::per_file::RecordSink;
use crate::errors::Error;
use crate::model::Record;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const LISTS_DIR: &str = "lists";
const NONE_KEY: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum ListGroup {
    Type,
    Widget,
    Evaluator,
    NeedsReview,
}

impl ListGroup {
    fn dir_name(&self) -> &'static str {
        match self {
            ListGroup::Type => "type",
            ListGroup::Widget => "widget",
            ListGroup::Evaluator => "evaluator",
            ListGroup::NeedsReview => "needs_review",
        }
    }
}

pub struct BucketWriters {
    root: PathBuf,
    handles: HashMap<(ListGroup, String), BufWriter<File>>,
}

impl BucketWriters {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            root: out_dir.join(LISTS_DIR),
            handles: HashMap::new(),
        }
    }

    /// Bucket keys for a record, unique per group.
    fn keys(record: &Record) -> BTreeSet<(ListGroup, String)> {
        let mut keys = BTreeSet::new();
        for t in &record.types {
            keys.insert((ListGroup::Type, t.as_str().to_string()));
        }

        if record.widget_kinds.is_empty() {
            keys.insert((ListGroup::Widget, NONE_KEY.to_string()));
        }
        for kind in &record.widget_kinds {
            keys.insert((ListGroup::Widget, kind.as_str().to_string()));
        }

        if record.evaluator_kinds.is_empty() {
            keys.insert((ListGroup::Evaluator, NONE_KEY.to_string()));
        }
        for kind in &record.evaluator_kinds {
            keys.insert((ListGroup::Evaluator, kind.as_str().to_string()));
        }

        if let Some(bucket) = record.needs_review_bucket {
            keys.insert((ListGroup::NeedsReview, bucket.as_str().to_string()));
        }
        keys
    }

    fn handle(&mut self, group: ListGroup, key: &str) -> crate::errors::Result<&mut BufWriter<File>> {
        match self.handles.entry((group, key.to_string())) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let dir = self.root.join(group.dir_name());
                fs::create_dir_all(&dir)
                    .map_err(|e| Error::io_at("cannot create list directory", &dir, e))?;
                let path = dir.join(format!("{key}_files.txt"));
                let file = File::create(&path)
                    .map_err(|e| Error::io_at("cannot create list file", &path, e))?;
                Ok(entry.insert(BufWriter::new(file)))
            }
        }
    }
}

impl RecordSink for BucketWriters {
    fn write_record(&mut self, record: &Record) -> anyhow::Result<()> {
        for (group, key) in Self::keys(record) {
            let handle = self.handle(group, &key)?;
            writeln!(handle, "{}", record.file)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        for handle in self.handles.values_mut() {
            handle.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EvaluatorKind, ProblemType, ReviewBucket, WidgetKind};
    use tempfile::TempDir;

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(LISTS_DIR).join(rel)).unwrap()
    }

    #[test]
    fn test_paths_written_once_per_bucket() {
        let dir = TempDir::new().unwrap();
        let mut writers = BucketWriters::new(dir.path());
        writers
            .write_record(&Record {
                file: "a.pg".into(),
                types: vec![ProblemType::NumericEntry],
                widget_kinds: vec![WidgetKind::Blank, WidgetKind::Blank],
                evaluator_kinds: vec![EvaluatorKind::Cmp],
                ..Default::default()
            })
            .unwrap();
        writers
            .write_record(&Record {
                file: "b.pg".into(),
                types: vec![ProblemType::Other, ProblemType::Multipart],
                needs_review: true,
                needs_review_bucket: Some(ReviewBucket::LowConfidence),
                ..Default::default()
            })
            .unwrap();
        writers.finish().unwrap();

        let root = dir.path();
        assert_eq!(read(root, "type/numeric_entry_files.txt"), "a.pg\n");
        assert_eq!(read(root, "type/other_files.txt"), "b.pg\n");
        assert_eq!(read(root, "type/multipart_files.txt"), "b.pg\n");
        assert_eq!(read(root, "widget/blank_files.txt"), "a.pg\n");
        assert_eq!(read(root, "widget/none_files.txt"), "b.pg\n");
        assert_eq!(read(root, "evaluator/cmp_files.txt"), "a.pg\n");
        assert_eq!(read(root, "evaluator/none_files.txt"), "b.pg\n");
        assert_eq!(read(root, "needs_review/low_confidence_files.txt"), "b.pg\n");
    }
}
