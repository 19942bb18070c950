//! Delimited text (CSV/TSV) exporter on top of the `csv` crate.

use std::io::Write;

use amcatable_core::Table;

use crate::error::Result;
use crate::exporter::{DumpOptions, Exporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvExporter {
    delimiter: u8,
    header: bool,
    extension: &'static str,
    content_type: &'static str,
}

impl CsvExporter {
    pub fn csv() -> Self {
        Self {
            delimiter: b',',
            header: true,
            extension: "csv",
            content_type: "text/csv",
        }
    }

    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            header: true,
            extension: "tsv",
            content_type: "text/tab-separated-values",
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::csv()
    }
}

impl Exporter for CsvExporter {
    fn extension(&self) -> &'static str {
        self.extension
    }

    fn content_type(&self) -> &'static str {
        self.content_type
    }

    fn dump(&self, table: &Table, sink: &mut dyn Write, options: &DumpOptions) -> Result<()> {
        table.validate()?;
        let encoding = options.encoding;
        sink.write_all(encoding.bom())?;

        let mut writer = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(sink);

        if self.header && table.num_columns() > 0 {
            let names = table
                .column_names()
                .map(|name| encoding.encode(name))
                .collect::<amcatable_core::Result<Vec<_>>>()?;
            writer.write_record(&names)?;
        }

        let mut record: Vec<Vec<u8>> = Vec::with_capacity(table.num_columns());
        for row in table.rows() {
            record.clear();
            for value in row {
                record.push(encoding.encode(&value.to_string())?.into_owned());
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
