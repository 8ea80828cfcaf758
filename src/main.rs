//! Cleansheet CLI - load a tabular file and print its dataset summary.
//!
//! Stand-in for the dashboard caller: reads a file into memory, runs the
//! ingestion pipeline and reports what came out.

use anyhow::{bail, Context, Result};
use clap::Parser;
use cleansheet::{load_table, summarize, ByteSource, LoadOptions};

#[derive(Parser, Debug)]
#[command(version, about = "Tabular data ingestion & cleaning engine")]
struct Args {
    /// Path to the CSV or spreadsheet file to load
    file: String,

    /// Field separator override (auto-detected when omitted)
    #[arg(short, long)]
    separator: Option<char>,

    /// Text encoding override, e.g. "latin1" (auto-detected when omitted)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut options = LoadOptions::default();
    if let Some(sep) = args.separator {
        options = options.with_separator(sep);
    }
    if let Some(enc) = args.encoding {
        options = options.with_encoding(enc);
    }

    let bytes = std::fs::read(&args.file).with_context(|| format!("reading {}", args.file))?;
    let name = std::path::Path::new(&args.file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&args.file)
        .to_string();

    let df = match load_table(&ByteSource::new(name, bytes), &options) {
        Ok(df) => df,
        Err(e) => {
            log::debug!("load failed: {e}");
            bail!("could not read {} as a table", args.file);
        }
    };

    let summary = summarize(&df);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "rows: {}  columns: {}  missing values: {}",
            summary.rows, summary.columns, summary.missing_values
        );
        print!("{}", summary.column_report);
    }

    Ok(())
}
