//! Lightweight value/column types for the tables exporters consume.
//!
//! Storage is columnar (`Vec<Column>`); exporters walk it row by row through
//! `Table::rows`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null => DataType::Utf8,
            Scalar::Bool(_) => DataType::Boolean,
            Scalar::I32(_) => DataType::Int32,
            Scalar::I64(_) => DataType::Int64,
            Scalar::F32(_) => DataType::Float32,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
            Scalar::Bin(_) => DataType::Binary,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

/// Textual cell value as written by the text formats. `Null` renders empty.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Scalar::*;
        match self {
            Null => Ok(()),
            Bool(b) => write!(f, "{b}"),
            I32(i) => write!(f, "{i}"),
            I64(i) => write!(f, "{i}"),
            F32(x) => write!(f, "{x}"),
            F64(x) => write!(f, "{x}"),
            Str(s) => f.write_str(s),
            Bin(b) => write!(f, "[binary {} bytes]", b.len()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::I64(i)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::F64(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A rectangular table: every column holds the same number of values.
///
/// Fields are public for cheap construction in tests and adapters; use
/// `Table::new` when the input is not known to be rectangular. Exporters call
/// `validate` before writing, and deserialization goes through `Table::new`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    pub columns: Vec<Column>,
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<Column>,
}

impl TryFrom<RawTable> for Table {
    type Error = Error;

    fn try_from(raw: RawTable) -> Result<Self> {
        Table::new(raw.columns)
    }
}

/// Stands in for cells a ragged table is missing.
static NULL: Scalar = Scalar::Null;

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let table = Self { columns };
        table.validate()?;
        Ok(table)
    }

    /// Every column must have as many values as the first one.
    pub fn validate(&self) -> Result<()> {
        if let Some(first) = self.columns.first() {
            if let Some(bad) = self.columns.iter().find(|c| c.len() != first.len()) {
                return Err(Error::Schema(format!(
                    "column '{}' has {} values, expected {} (from column '{}')",
                    bad.name,
                    bad.len(),
                    first.len(),
                    first.name
                )));
            }
        }
        Ok(())
    }

    /// Build a table from row-major data. Every row must have one cell per name.
    pub fn from_rows<N, R>(names: &[N], rows: R) -> Result<Self>
    where
        N: AsRef<str>,
        R: IntoIterator<Item = Vec<Scalar>>,
    {
        let mut columns: Vec<Column> = names
            .iter()
            .map(|n| Column::new(n.as_ref(), Vec::new()))
            .collect();
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::Schema(format!(
                    "row {} has {} cells, expected {}",
                    idx,
                    row.len(),
                    columns.len()
                )));
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.values.push(value);
            }
        }
        Ok(Self { columns })
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cells of row `idx`, one per column. Missing cells read as `Null`.
    pub fn row(&self, idx: usize) -> impl Iterator<Item = &Scalar> + '_ {
        self.columns
            .iter()
            .map(move |c| c.values.get(idx).unwrap_or(&NULL))
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &Scalar> + '_> + '_ {
        (0..self.num_rows()).map(move |idx| self.row(idx))
    }

    /// Infer a schema: each field takes the type of its first non-null value.
    pub fn schema(&self) -> Schema {
        let fields = self
            .columns
            .iter()
            .map(|c| {
                let data_type = c
                    .values
                    .iter()
                    .find(|v| !v.is_null())
                    .map(Scalar::data_type)
                    .unwrap_or(DataType::Utf8);
                let nullable = c.values.iter().any(Scalar::is_null);
                Field::new(c.name.clone(), data_type, nullable)
            })
            .collect();
        Schema::new(fields)
    }
}
