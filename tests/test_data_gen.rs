//! Shared table builders and test exporters for the integration tests.
#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use amcatable::{DumpOptions, ExportError, Exporter, Scalar, Table};

/// `rows` rows of (id, name, score, flag) with a null every 7th score.
pub fn generate_table(rows: usize) -> Table {
    let data = (0..rows).map(|i| {
        vec![
            Scalar::I64(i as i64),
            Scalar::Str(format!("row-{i}")),
            if i % 7 == 0 {
                Scalar::Null
            } else {
                Scalar::F64(i as f64 / 4.0)
            },
            Scalar::Bool(i % 2 == 0),
        ]
    });
    Table::from_rows(&["id", "name", "score", "flag"], data).expect("rectangular rows")
}

/// Writes each row as its own `write` call: one chunk per row when streamed.
#[derive(Default)]
pub struct LineExporter {
    /// Sleep after every row; lets tests outpace the worker.
    pub delay: Option<Duration>,
    /// Return an error instead of writing row `n`.
    pub fail_at: Option<usize>,
    /// Panic instead of writing row `n`.
    pub panic_at: Option<usize>,
    /// Rows successfully handed to the sink.
    pub written: Arc<AtomicUsize>,
    /// (filename hint, thread name) seen by each `dump` call.
    pub calls: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
}

impl LineExporter {
    pub fn line(row: usize, table: &Table) -> String {
        let cells: Vec<String> = table.row(row).map(|v| v.to_string()).collect();
        format!("{}\n", cells.join(";"))
    }
}

impl Exporter for LineExporter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    fn dump(
        &self,
        table: &Table,
        sink: &mut dyn Write,
        options: &DumpOptions,
    ) -> Result<(), ExportError> {
        self.calls.lock().unwrap().push((
            options.filename_hint.clone(),
            thread::current().name().map(str::to_string),
        ));
        for idx in 0..table.num_rows() {
            if self.fail_at == Some(idx) {
                return Err(ExportError::Io(std::io::Error::other(format!(
                    "refusing row {idx}"
                ))));
            }
            if self.panic_at == Some(idx) {
                panic!("exporter blew up at row {idx}");
            }
            let line = Self::line(idx, table);
            sink.write_all(&options.encoding.encode(&line)?)?;
            self.written.fetch_add(1, Ordering::SeqCst);
            if let Some(d) = self.delay {
                thread::sleep(d);
            }
        }
        Ok(())
    }
}
