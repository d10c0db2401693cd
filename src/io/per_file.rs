//! Per-file record outputs: a TSV row or a JSON line per analyzed file.

use crate::model::{join_display, Record};
use std::io::Write;

pub const PER_FILE_COLUMNS: &[&str] = &[
    "file",
    "needs_review",
    "confidence",
    "types",
    "input_count",
    "ans_count",
    "widget_kinds",
    "evaluator_kinds",
    "loadMacros",
    "includePGproblem",
];

/// Destination for per-file records, written in discovery order.
pub trait RecordSink {
    fn write_record(&mut self, record: &Record) -> anyhow::Result<()>;

    fn finish(&mut self) -> anyhow::Result<()>;
}

pub struct TsvRecordWriter<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> TsvRecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", PER_FILE_COLUMNS.join("\t"))?;
            self.header_written = true;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for TsvRecordWriter<W> {
    fn write_record(&mut self, record: &Record) -> anyhow::Result<()> {
        self.write_header()?;
        writeln!(self.writer, "{}", tsv_row(record).join("\t"))?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.write_header()?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Column values for one record; tabs and newlines inside fields become spaces.
pub fn tsv_row(record: &Record) -> Vec<String> {
    vec![
        tsv_field(&record.file),
        record.needs_review.to_string(),
        format!("{:.2}", record.confidence),
        record.types_text(),
        record.input_count.to_string(),
        record.ans_count.to_string(),
        join_display(&record.widget_kinds, ","),
        join_display(&record.evaluator_kinds, ","),
        tsv_field(&record.load_macros.join(",")),
        tsv_field(&record.include_pgproblem.join(",")),
    ]
}

fn tsv_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

pub struct JsonlRecordWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonlRecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonlRecordWriter<W> {
    fn write_record(&mut self, record: &Record) -> anyhow::Result<()> {
        let line = serde_json::to_string(record)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EvaluatorKind, ProblemType, WidgetKind};
    use pretty_assertions::assert_eq;

    fn record() -> Record {
        Record {
            file: "dir/a.pg".into(),
            types: vec![ProblemType::Multipart, ProblemType::NumericEntry],
            confidence: 0.75,
            input_count: 2,
            ans_count: 2,
            widget_kinds: vec![WidgetKind::Blank, WidgetKind::Blank],
            evaluator_kinds: vec![EvaluatorKind::Cmp, EvaluatorKind::Cmp],
            load_macros: vec!["PGstandard.pl".into(), "MathObjects.pl".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_tsv_header_and_row() {
        let mut writer = TsvRecordWriter::new(Vec::new());
        writer.write_record(&record()).unwrap();
        writer.finish().unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], PER_FILE_COLUMNS.join("\t"));
        assert_eq!(
            lines[1],
            "dir/a.pg\tfalse\t0.75\tmultipart,numeric_entry\t2\t2\tblank,blank\tcmp,cmp\tPGstandard.pl,MathObjects.pl\t"
        );
    }

    #[test]
    fn test_tsv_header_written_for_empty_run() {
        let mut writer = TsvRecordWriter::new(Vec::new());
        writer.finish().unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, format!("{}\n", PER_FILE_COLUMNS.join("\t")));
    }

    #[test]
    fn test_jsonl_one_object_per_line() {
        let mut writer = JsonlRecordWriter::new(Vec::new());
        writer.write_record(&record()).unwrap();
        writer.write_record(&Record::default()).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["file"], "dir/a.pg");
        assert_eq!(first["types"][0], "multipart");
        assert_eq!(first["loadMacros"][1], "MathObjects.pl");
    }
}
