//! Table documents read by the CLI.
//!
//! ```json
//! {"columns": ["id", "title"], "rows": [[1, "first"], [2, null]]}
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use amcatable_core::{Scalar, Table};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("reading {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("parsing table document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("row {row}, column {column}: nested arrays/objects are not table cells")]
    NestedCell { row: usize, column: usize },
    #[error(transparent)]
    Table(#[from] amcatable_core::Error),
}

#[derive(Debug, Deserialize)]
struct TableDocument {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

pub fn read_table(path: &Path) -> Result<Table, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_table(&text)
}

pub fn parse_table(text: &str) -> Result<Table, InputError> {
    let doc: TableDocument = serde_json::from_str(text)?;
    let mut rows = Vec::with_capacity(doc.rows.len());
    for (r, row) in doc.rows.into_iter().enumerate() {
        let cells = row
            .into_iter()
            .enumerate()
            .map(|(c, v)| json_to_scalar(v).ok_or(InputError::NestedCell { row: r, column: c }))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }
    Ok(Table::from_rows(doc.columns.as_slice(), rows)?)
}

fn json_to_scalar(v: Value) -> Option<Scalar> {
    match v {
        Value::Null => Some(Scalar::Null),
        Value::Bool(b) => Some(Scalar::Bool(b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => Scalar::I64(i),
            None => Scalar::F64(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(s) => Some(Scalar::Str(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}
