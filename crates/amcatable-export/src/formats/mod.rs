//! Concrete exporters and the name → exporter registry.

pub mod csv;
pub mod jsonl;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use amcatable_core::{Error as CoreError, ExportConfig};

use crate::error::Result;
use crate::exporter::Exporter;

pub use self::csv::CsvExporter;
pub use self::jsonl::JsonlExporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Csv,
    Tsv,
    Jsonl,
}

impl Format {
    pub fn all() -> &'static [Format] {
        &[Format::Csv, Format::Tsv, Format::Jsonl]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Jsonl => "jsonl",
        }
    }

    /// Guess the format from a file extension (`out.tsv` → `Tsv`).
    pub fn from_path(path: &Path) -> Option<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Instantiate the exporter. CSV honors the configured delimiter and header flag;
    /// TSV keeps its tab delimiter.
    pub fn exporter(&self, cfg: &ExportConfig) -> Result<Arc<dyn Exporter>> {
        let exporter: Arc<dyn Exporter> = match self {
            Format::Csv => Arc::new(
                CsvExporter::csv()
                    .with_delimiter(cfg.csv_delimiter_byte()?)
                    .with_header(cfg.csv_header),
            ),
            Format::Tsv => Arc::new(CsvExporter::tsv().with_header(cfg.csv_header)),
            Format::Jsonl => Arc::new(JsonlExporter::new()),
        };
        Ok(exporter)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "tsv" | "tab" => Ok(Format::Tsv),
            "jsonl" | "ndjson" => Ok(Format::Jsonl),
            other => Err(CoreError::Config(format!("unknown export format '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("CSV".parse::<Format>().unwrap(), Format::Csv);
        assert_eq!("ndjson".parse::<Format>().unwrap(), Format::Jsonl);
        assert!("xlsx".parse::<Format>().is_err());
    }

    #[test]
    fn from_path_uses_extension() {
        assert_eq!(Format::from_path(Path::new("out/report.tsv")), Some(Format::Tsv));
        assert_eq!(Format::from_path(Path::new("report")), None);
    }

    #[test]
    fn exporter_metadata_matches_format() {
        let cfg = ExportConfig::default();
        for format in Format::all() {
            let exporter = format.exporter(&cfg).unwrap();
            assert_eq!(exporter.extension(), format.name());
        }
    }

    #[test]
    fn exporter_rejects_bad_delimiter() {
        let cfg = ExportConfig {
            csv_delimiter: 'ß',
            ..Default::default()
        };
        assert!(Format::Csv.exporter(&cfg).is_err());
        // TSV ignores the CSV delimiter
        assert!(Format::Tsv.exporter(&cfg).is_ok());
    }
}
