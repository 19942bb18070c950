#![forbid(unsafe_code)]
//! amcatable-export: write a `Table` as bytes in some target format.
//!
//! - `exporter`: the `Exporter` trait with its three access modes
//!   (`dump` into a sink, `dumps` into memory, `dump_iter` streaming).
//! - `sink`: `QueueWriter`, the `io::Write` side of the streaming queue.
//! - `stream`: `DumpIter`, one background worker relaying chunks.
//! - `response`: framework-neutral streaming download response.
//! - `formats`: CSV/TSV/JSONL exporters and the `Format` registry.

pub mod error;
pub mod exporter;
pub mod formats;
pub mod response;
pub mod sink;
pub mod stream;

pub use error::{ExportError, Result};
pub use exporter::{DumpOptions, Exporter};
pub use formats::{CsvExporter, Format, JsonlExporter};
pub use response::StreamingResponse;
pub use sink::QueueWriter;
pub use stream::{DumpIter, StreamConfig};
