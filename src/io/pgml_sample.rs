//! Bounded dump of markup blocks from files the classifier could not place.

use crate::errors::{Error, Result};
use crate::extract::extract_pgml_blocks;
use crate::model::{PgmlBlock, ProblemType, Record, ReviewBucket};
use crate::scan::SourceText;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const PGML_SAMPLE_FILE: &str = "pgml_blocks_sample.txt";
const END_MARKER: &str = "=== END ===";

pub struct PgmlBlockSampler {
    path: PathBuf,
    writer: BufWriter<File>,
    limit: usize,
    written: usize,
}

impl PgmlBlockSampler {
    pub fn new(out_dir: &Path, limit: usize) -> Result<Self> {
        let path = out_dir.join(PGML_SAMPLE_FILE);
        let file = File::create(&path).map_err(|e| Error::io_at("cannot create sample file", &path, e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            limit,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn is_full(&self) -> bool {
        self.written >= self.limit
    }

    /// Records whose markup is worth a manual look.
    pub fn wants(record: &Record) -> bool {
        record.has_type(ProblemType::UnknownPgmlBlank)
            || record.needs_review_bucket == Some(ReviewBucket::PgmlPayloadUnrecognized)
    }

    /// Append the record's blocks until the limit is reached.
    pub fn add_blocks(&mut self, record: &Record, blocks: &[PgmlBlock]) -> Result<()> {
        for block in blocks {
            if self.is_full() {
                break;
            }
            self.write_block(record, block)?;
        }
        Ok(())
    }

    /// Extract blocks from raw file text and append them.
    pub fn add_text(&mut self, record: &Record, text: &str) -> Result<()> {
        let source = SourceText::new(text);
        let blocks = extract_pgml_blocks(source.markup(), source.newlines());
        self.add_blocks(record, &blocks)
    }

    fn write_block(&mut self, record: &Record, block: &PgmlBlock) -> Result<()> {
        writeln!(
            self.writer,
            "=== file={} kind={} start_line={} blanks={} payload={} confidence={:.2} ===",
            record.file,
            block.kind.as_str(),
            block.start_line,
            block.blank_marker_count,
            u8::from(block.has_payload),
            record.confidence,
        )?;
        self.writer.write_all(block.text.as_bytes())?;
        if !block.text.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        writeln!(self.writer, "{END_MARKER}")?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn unknown(file: &str) -> Record {
        Record {
            file: file.into(),
            types: vec![ProblemType::UnknownPgmlBlank],
            confidence: 0.25,
            ..Default::default()
        }
    }

    #[test]
    fn test_sample_written() {
        let dir = TempDir::new().unwrap();
        let mut sampler = PgmlBlockSampler::new(dir.path(), 200).unwrap();
        let text = "BEGIN_PGML\nAnswer: [_]{Real(3)->cmp()}\nEND_PGML\n";
        sampler.add_text(&unknown("a.pg"), text).unwrap();
        sampler.finish().unwrap();

        let out = fs::read_to_string(dir.path().join(PGML_SAMPLE_FILE)).unwrap();
        assert!(out.starts_with(
            "=== file=a.pg kind=BEGIN_PGML start_line=1 blanks=1 payload=1 confidence=0.25 ==="
        ));
        assert!(out.contains("Answer: [_]{Real(3)->cmp()}"));
        assert!(out.trim_end().ends_with(END_MARKER));
    }

    #[test]
    fn test_sample_is_capped() {
        let dir = TempDir::new().unwrap();
        let mut sampler = PgmlBlockSampler::new(dir.path(), 2).unwrap();
        let text = "BEGIN_PGML\n[_]\nEND_PGML\nBEGIN_PGML_HINT\n[_]\nEND_PGML_HINT\n";
        sampler.add_text(&unknown("a.pg"), text).unwrap();
        sampler.add_text(&unknown("b.pg"), text).unwrap();
        sampler.finish().unwrap();

        assert!(sampler.is_full());
        let out = fs::read_to_string(sampler.path()).unwrap();
        assert_eq!(out.matches(END_MARKER).count(), 2);
        assert!(!out.contains("file=b.pg"));
    }

    #[test]
    fn test_wants_only_unplaced_markup() {
        assert!(PgmlBlockSampler::wants(&unknown("a.pg")));
        let payload = Record {
            needs_review_bucket: Some(ReviewBucket::PgmlPayloadUnrecognized),
            ..Default::default()
        };
        assert!(PgmlBlockSampler::wants(&payload));
        assert!(!PgmlBlockSampler::wants(&Record::default()));
    }
}
