//! Export configuration that the CLI and embedding services can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Max chunks queued between the streaming worker and its consumer. 0 = unbounded.
    pub buffer_size: usize,

    /// How long the consumer waits for a chunk before re-checking the worker.
    pub poll_interval_ms: u64,

    /// Default encoding hint for text formats.
    pub encoding: Encoding,

    /// Field delimiter for the CSV format. Must be ASCII.
    pub csv_delimiter: char,

    /// Whether CSV/TSV output starts with a header row.
    pub csv_header: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            buffer_size: 20,
            poll_interval_ms: 200,
            encoding: Encoding::Utf8,
            csv_delimiter: ',',
            csv_header: true,
        }
    }
}

impl ExportConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `AMCATABLE_BUFFER_SIZE`: streaming queue capacity in chunks
    /// - `AMCATABLE_POLL_INTERVAL_MS`: consumer poll interval
    /// - `AMCATABLE_ENCODING`: encoding label (`utf-8`, `utf-8-sig`, `latin-1`)
    /// - `AMCATABLE_CSV_DELIMITER`: single ASCII character
    /// - `AMCATABLE_CSV_HEADER`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("AMCATABLE_BUFFER_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.buffer_size = v;
            }
        }

        if let Ok(s) = std::env::var("AMCATABLE_POLL_INTERVAL_MS") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.poll_interval_ms = v;
            }
        }

        if let Ok(s) = std::env::var("AMCATABLE_ENCODING") {
            if let Ok(v) = s.parse::<Encoding>() {
                cfg.encoding = v;
            }
        }

        if let Ok(s) = std::env::var("AMCATABLE_CSV_DELIMITER") {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if c.is_ascii() {
                    cfg.csv_delimiter = c;
                }
            }
        }

        if let Ok(s) = std::env::var("AMCATABLE_CSV_HEADER") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.csv_header = v;
            }
        }

        cfg
    }

    /// Reject settings the exporters cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be > 0".into()));
        }
        self.csv_delimiter_byte()?;
        Ok(())
    }

    pub fn csv_delimiter_byte(&self) -> Result<u8> {
        if self.csv_delimiter.is_ascii() {
            Ok(self.csv_delimiter as u8)
        } else {
            Err(Error::Config(format!(
                "csv_delimiter must be ASCII, got {:?}",
                self.csv_delimiter
            )))
        }
    }
}
