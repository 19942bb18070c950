//! Newline-delimited JSON exporter: one object per row.

use std::io::{BufWriter, Write};

use amcatable_core::{Scalar, Table};

use crate::error::Result;
use crate::exporter::{DumpOptions, Exporter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonlExporter;

impl JsonlExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for JsonlExporter {
    fn extension(&self) -> &'static str {
        "jsonl"
    }

    fn content_type(&self) -> &'static str {
        "application/x-ndjson"
    }

    /// Keys follow column order, so objects are written by hand instead of
    /// through a (sorted) `serde_json::Map`.
    fn dump(&self, table: &Table, sink: &mut dyn Write, options: &DumpOptions) -> Result<()> {
        table.validate()?;
        let encoding = options.encoding;
        let mut writer = BufWriter::new(sink);
        writer.write_all(encoding.bom())?;

        let keys = table
            .column_names()
            .map(serde_json::to_string)
            .collect::<serde_json::Result<Vec<_>>>()?;

        let mut line = String::new();
        for row in table.rows() {
            line.clear();
            line.push('{');
            for (ci, (key, value)) in keys.iter().zip(row).enumerate() {
                if ci > 0 {
                    line.push(',');
                }
                line.push_str(key);
                line.push(':');
                line.push_str(&serde_json::to_string(&scalar_to_json(value))?);
            }
            line.push_str("}\n");
            writer.write_all(&encoding.encode(&line)?)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn scalar_to_json(v: &Scalar) -> serde_json::Value {
    use Scalar::*;
    match v {
        Null => serde_json::Value::Null,
        Bool(b) => serde_json::Value::Bool(*b),
        I32(i) => serde_json::Value::from(*i),
        I64(i) => serde_json::Value::from(*i),
        // from_f64 yields None for NaN/inf, which JSON cannot carry
        F32(f) => serde_json::Number::from_f64(*f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        F64(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Str(s) => serde_json::Value::String(s.clone()),
        Bin(b) => serde_json::Value::String(format!("[binary {} bytes]", b.len())),
    }
}
