#![forbid(unsafe_code)]
//! amcatable: export in-memory tables as CSV, TSV or JSONL.
//!
//! Re-exports the two library crates so tests, benches and embedders can
//! depend on a single package.

pub use amcatable_core::prelude::*;
pub use amcatable_export::{
    CsvExporter, DumpIter, DumpOptions, ExportError, Exporter, Format, JsonlExporter,
    QueueWriter, StreamConfig, StreamingResponse,
};
