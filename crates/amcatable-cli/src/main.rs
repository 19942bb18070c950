//! amcatable CLI: export a table document as CSV, TSV or JSONL.

mod input;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use amcatable_core::{Encoding, ExportConfig, Table};
use amcatable_export::{DumpOptions, Format, StreamConfig};

#[derive(Parser)]
#[command(name = "amcatable")]
#[command(about = "Export tables to CSV, TSV or JSONL, buffered or streamed", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a JSON table document
    Export {
        /// Path to the table document ({"columns": [...], "rows": [[...], ...]})
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the output extension, then csv)
        #[arg(short, long)]
        format: Option<Format>,

        /// Encoding for text output: utf-8, utf-8-sig, latin-1 (overrides config)
        #[arg(long)]
        encoding: Option<Encoding>,

        /// Stream through a background worker instead of buffering in memory
        #[arg(long)]
        stream: bool,

        /// Max chunks queued while streaming; 0 = unbounded (overrides config)
        #[arg(long)]
        buffer_size: Option<usize>,

        /// Consumer poll interval while streaming, in ms (overrides config)
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Filename hint passed to the exporter
        #[arg(long)]
        filename_hint: Option<String>,
    },

    /// Print row count and inferred column types of a table document
    Inspect {
        /// Path to the table document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List the available formats
    Formats,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export {
            input,
            output,
            format,
            encoding,
            stream,
            buffer_size,
            poll_interval_ms,
            filename_hint,
        } => {
            let mut cfg = ExportConfig::from_env();
            if let Some(e) = encoding {
                cfg.encoding = e;
            }
            if let Some(n) = buffer_size {
                cfg.buffer_size = n;
            }
            if let Some(ms) = poll_interval_ms {
                cfg.poll_interval_ms = ms;
            }
            let request = ExportRequest {
                input,
                output,
                format,
                stream,
                filename_hint,
            };
            if let Err(e) = run_export(&request, &cfg) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Inspect { input: path } => match input::read_table(&path) {
            Ok(table) => print!("{}", describe_table(&table)),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Formats => print_formats(),
    }
}

fn describe_table(table: &Table) -> String {
    format!("rows: {}\n{}", table.num_rows(), table.schema())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

struct ExportRequest {
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<Format>,
    stream: bool,
    filename_hint: Option<String>,
}

fn resolve_format(explicit: Option<Format>, output: Option<&Path>) -> Format {
    explicit
        .or_else(|| output.and_then(Format::from_path))
        .unwrap_or(Format::Csv)
}

fn run_export(req: &ExportRequest, cfg: &ExportConfig) -> Result<(), Box<dyn std::error::Error>> {
    cfg.validate()?;

    let table = input::read_table(&req.input)?;
    let format = resolve_format(req.format, req.output.as_deref());
    let exporter = format.exporter(cfg)?;
    info!(
        format = %format,
        rows = table.num_rows(),
        columns = table.num_columns(),
        stream = req.stream,
        "exporting table"
    );

    let mut options = DumpOptions::from(cfg);
    options.filename_hint = req.filename_hint.clone();

    let mut sink: Box<dyn Write> = match &req.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if req.stream {
        let mut chunks =
            exporter.dump_iter(Arc::new(table), options, StreamConfig::from(cfg));
        let written = chunks.write_to(&mut sink)?;
        debug!(
            bytes = written,
            chunks = chunks.chunks_received(),
            "streamed export complete"
        );
    } else {
        exporter.dump(&table, &mut sink, &options)?;
        sink.flush()?;
    }
    Ok(())
}

fn print_formats() {
    println!("{:<8} {:<10} CONTENT TYPE", "FORMAT", "EXTENSION");
    let cfg = ExportConfig::default();
    for format in Format::all() {
        match format.exporter(&cfg) {
            Ok(exporter) => println!(
                "{:<8} {:<10} {}",
                format.name(),
                exporter.extension(),
                exporter.content_type()
            ),
            Err(e) => eprintln!("{}: {}", format, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        assert_eq!(
            resolve_format(Some(Format::Jsonl), Some(Path::new("out.csv"))),
            Format::Jsonl
        );
        assert_eq!(resolve_format(None, Some(Path::new("out.tsv"))), Format::Tsv);
        assert_eq!(resolve_format(None, None), Format::Csv);
    }

    #[test]
    fn parses_export_flags() {
        let cli = Cli::try_parse_from([
            "amcatable",
            "export",
            "--input",
            "t.json",
            "--format",
            "ndjson",
            "--encoding",
            "latin-1",
            "--stream",
            "--buffer-size",
            "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Export {
                format,
                encoding,
                stream,
                buffer_size,
                ..
            } => {
                assert_eq!(format, Some(Format::Jsonl));
                assert_eq!(encoding, Some(Encoding::Latin1));
                assert!(stream);
                assert_eq!(buffer_size, Some(0));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn describe_table_reports_inferred_types() {
        let table = input::parse_table(r#"{"columns": ["id", "note"], "rows": [[1, null], [2, "x"]]}"#)
            .unwrap();
        assert_eq!(describe_table(&table), "rows: 2\nid: i64\nnote: string?\n");
    }

    #[test]
    fn streamed_and_buffered_exports_match() {
        let dir = std::env::temp_dir().join(format!("amcatable-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("table.json");
        std::fs::write(&input, r#"{"columns": ["a", "b"], "rows": [[1, "x"], [2, null]]}"#)
            .unwrap();

        let cfg = ExportConfig {
            poll_interval_ms: 5,
            ..Default::default()
        };
        let buffered = dir.join("buffered.tsv");
        let streamed = dir.join("streamed.tsv");
        for (output, stream) in [(&buffered, false), (&streamed, true)] {
            let req = ExportRequest {
                input: input.clone(),
                output: Some(output.clone()),
                format: None,
                stream,
                filename_hint: None,
            };
            run_export(&req, &cfg).unwrap();
        }

        let a = std::fs::read(&buffered).unwrap();
        let b = std::fs::read(&streamed).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(a, b"a\tb\n1\tx\n2\t\n");
        assert_eq!(a, b);
    }
}
