//! Flat text output: one record per line, `%8.5f` fields joined by two spaces.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// A row of numbers written as one output line.
pub trait Record {
    fn fields(&self) -> Vec<f64>;
}

pub fn format_line(fields: &[f64]) -> String {
    let mut line = fields
        .iter()
        .map(|x| format!("{x:8.5}"))
        .collect::<Vec<_>>()
        .join("  ");
    line.push('\n');
    line
}

/// `dir/populations.txt` tagged with `exact` becomes `dir/populations_exact.txt`.
pub fn tagged_path(base: &Path, tag: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{tag}.{ext}"),
        None => format!("{stem}_{tag}"),
    };
    base.with_file_name(name)
}

/// Owns the output handle for the length of one driver call.
///
/// [`RecordWriter::create`] truncates the file once; records are then
/// streamed through a buffer and flushed by [`RecordWriter::finish`].
pub struct RecordWriter<W: Write> {
    inner: W,
    lines: usize,
}

impl RecordWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "truncating output file");
        Ok(RecordWriter::new(BufWriter::new(File::create(path)?)))
    }
}

impl RecordWriter<io::Sink> {
    /// Writer that drops every record.
    pub fn discard() -> Self {
        RecordWriter::new(io::sink())
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        RecordWriter { inner, lines: 0 }
    }

    pub fn write(&mut self, record: &impl Record) -> Result<()> {
        self.inner.write_all(format_line(&record.fields()).as_bytes())?;
        self.lines += 1;
        Ok(())
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(Vec<f64>);

    impl Record for Row {
        fn fields(&self) -> Vec<f64> {
            self.0.clone()
        }
    }

    #[test]
    fn fields_are_fixed_width_five_decimals() {
        assert_eq!(format_line(&[0.0, 1.0, 0.5]), " 0.00000   1.00000   0.50000\n");
        assert_eq!(format_line(&[-12.345678]), "-12.34568\n");
    }

    #[test]
    fn writer_counts_and_keeps_order() {
        let mut out = RecordWriter::new(Vec::new());
        out.write(&Row(vec![1.0, 2.0])).unwrap();
        out.write(&Row(vec![3.0, 4.0])).unwrap();
        assert_eq!(out.lines(), 2);
        let bytes = out.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            " 1.00000   2.00000\n 3.00000   4.00000\n"
        );
    }

    #[test]
    fn tagged_path_keeps_directory_and_extension() {
        assert_eq!(
            tagged_path(Path::new("runs/populations.txt"), "w0"),
            PathBuf::from("runs/populations_w0.txt")
        );
        assert_eq!(tagged_path(Path::new("kernel"), "cd"), PathBuf::from("kernel_cd"));
    }

    #[test]
    fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut out = RecordWriter::create(&path).unwrap();
        out.write(&Row(vec![0.25])).unwrap();
        out.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), " 0.25000\n");
    }
}
