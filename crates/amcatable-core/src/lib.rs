#![forbid(unsafe_code)]
//! amcatable-core: the in-memory table exporters read from.
//!
//! - `types`: `Scalar`/`Column`/`Table`, the row-major view exporters walk.
//! - `schema`: logical field types, inferred from a table on demand.
//! - `encoding`: output encodings selected by an exporter's encoding hint.
//! - `config`: `ExportConfig` with defaults and environment overrides.
//!
//! No threads and no IO live here; see `amcatable-export` for both.

pub mod config;
pub mod encoding;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod types;

pub use config::ExportConfig;
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use types::{Column, Scalar, Table};
