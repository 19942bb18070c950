//! The exporter contract.
//!
//! An exporter knows one format. It only has to implement `dump`, writing a
//! table into any byte sink; buffered, file, streaming and response variants
//! are derived from it.
//!
//! Invariants:
//! - `dump` must produce the same bytes regardless of the sink it is given,
//!   so `dumps`, `dump_path` and `dump_iter` all agree byte for byte.
//! - `dump` may be called from a worker thread (`dump_iter`), hence
//!   `Send + Sync + 'static`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use amcatable_core::{Encoding, ExportConfig, Table};

use crate::error::Result;
use crate::response::StreamingResponse;
use crate::stream::{DumpIter, StreamConfig};

/// Per-call hints passed through to `dump`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Some formats (zipped ones) need a filename inside the archive.
    pub filename_hint: Option<String>,
    /// Encoding for text formats. Binary formats ignore it.
    pub encoding: Encoding,
}

impl DumpOptions {
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self {
            filename_hint: None,
            encoding,
        }
    }

    pub fn filename_hint(mut self, name: impl Into<String>) -> Self {
        self.filename_hint = Some(name.into());
        self
    }
}

impl From<&ExportConfig> for DumpOptions {
    fn from(cfg: &ExportConfig) -> Self {
        Self::with_encoding(cfg.encoding)
    }
}

pub trait Exporter: Send + Sync + 'static {
    /// File extension without the dot (`csv`).
    fn extension(&self) -> &'static str;

    /// MIME type for downloads (`text/csv`).
    fn content_type(&self) -> &'static str;

    /// Write the whole table to `sink`. The only sink method used is `write`.
    fn dump(&self, table: &Table, sink: &mut dyn Write, options: &DumpOptions) -> Result<()>;

    /// Export into memory and return the bytes.
    fn dumps(&self, table: &Table, options: &DumpOptions) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.dump(table, &mut buf, options)?;
        Ok(buf)
    }

    /// Export into a file, creating or truncating it.
    fn dump_path(&self, table: &Table, path: &Path, options: &DumpOptions) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.dump(table, &mut writer, options)?;
        writer.flush()?;
        Ok(())
    }

    /// Export on a background worker and return the bytes as a lazy sequence
    /// of chunks. See `DumpIter` for completion and error semantics.
    fn dump_iter(
        self: Arc<Self>,
        table: Arc<Table>,
        options: DumpOptions,
        stream: StreamConfig,
    ) -> DumpIter {
        DumpIter::spawn(self, table, options, stream)
    }

    /// Streaming download: content type, optional attachment header, chunked body.
    fn dump_response(
        self: Arc<Self>,
        table: Arc<Table>,
        filename: Option<&str>,
        encoding: Encoding,
    ) -> StreamingResponse {
        let content_type = self.content_type();
        let content_disposition =
            filename.map(|name| attachment_header(name, self.extension()));
        let options = DumpOptions {
            filename_hint: filename.map(str::to_string),
            encoding,
        };
        let body = self.dump_iter(table, options, StreamConfig::default());
        StreamingResponse {
            content_type,
            content_disposition,
            body,
        }
    }
}

fn attachment_header(filename: &str, extension: &str) -> String {
    format!("attachment; filename=\"{filename}.{extension}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes one line per row: the cells joined by `|`.
    struct PipeExporter;

    impl Exporter for PipeExporter {
        fn extension(&self) -> &'static str {
            "txt"
        }
        fn content_type(&self) -> &'static str {
            "text/plain"
        }
        fn dump(&self, table: &Table, sink: &mut dyn Write, options: &DumpOptions) -> Result<()> {
            for row in table.rows() {
                let line: Vec<String> = row.map(|v| v.to_string()).collect();
                sink.write_all(&options.encoding.encode(&line.join("|"))?)?;
                sink.write_all(b"\n")?;
            }
            Ok(())
        }
    }

    fn table() -> Table {
        Table::from_rows(
            &["a", "b"],
            vec![vec![1i64.into(), "x".into()], vec![2i64.into(), "é".into()]],
        )
        .unwrap()
    }

    #[test]
    fn dumps_collects_what_dump_writes() {
        let out = PipeExporter.dumps(&table(), &DumpOptions::default()).unwrap();
        assert_eq!(out, "1|x\n2|é\n".as_bytes());
    }

    #[test]
    fn dumps_propagates_dump_errors() {
        let euro = Table::from_rows(&["a"], vec![vec!["€".into()]]).unwrap();
        let err = PipeExporter
            .dumps(&euro, &DumpOptions::with_encoding(Encoding::Latin1))
            .unwrap_err();
        assert!(err.to_string().contains("latin-1"));
    }

    #[test]
    fn dump_path_writes_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("amcatable-dump-path-{}.txt", std::process::id()));
        PipeExporter
            .dump_path(&table(), &path, &DumpOptions::with_encoding(Encoding::Latin1))
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(bytes, b"1|x\n2|\xe9\n");
    }

    #[test]
    fn works_through_trait_objects() {
        let exporter: Arc<dyn Exporter> = Arc::new(PipeExporter);
        let streamed = Arc::clone(&exporter)
            .dump_iter(Arc::new(table()), DumpOptions::default(), StreamConfig::default())
            .into_bytes()
            .unwrap();
        assert_eq!(streamed, exporter.dumps(&table(), &DumpOptions::default()).unwrap());
    }

    #[test]
    fn attachment_header_appends_extension() {
        assert_eq!(
            attachment_header("report", "csv"),
            "attachment; filename=\"report.csv\""
        );
    }
}
