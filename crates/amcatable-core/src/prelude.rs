//! Convenient re-exports for downstream crates.

pub use crate::config::ExportConfig;
pub use crate::encoding::Encoding;
pub use crate::error::{Error, Result};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, Scalar, Table};
