//! Table Loader Module
//! Orchestrates encoding fallback, separator/header detection and parsing,
//! then hands the raw table to the normalizer.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use encoding_rs::Encoding;
use log::debug;
use polars::prelude::*;
use thiserror::Error;

use super::header::locate_header;
use super::normalizer::{dedupe_names, normalize};
use super::separator::detect_separator;
use super::source::{ByteSource, FileFormat};

/// Encodings tried in order when the caller does not pin one.
const ENCODING_FALLBACKS: [&str; 4] = ["utf-8", "latin1", "cp1252", "iso-8859-1"];
/// Bytes sampled for separator detection.
const DETECT_SAMPLE_BYTES: usize = 4096;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("No encoding produced a readable table ({attempts} attempted)")]
    Exhausted { attempts: usize },
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),
}

/// Manual overrides for delimited-text loading. Each axis left `None` is
/// auto-detected.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub separator: Option<char>,
    pub encoding: Option<String>,
}

impl LoadOptions {
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// Load and normalize a tabular file.
///
/// Any `Err` means "no table". The variants carry detail for logging only;
/// callers are expected to show a generic failure message.
pub fn load_table(source: &ByteSource, options: &LoadOptions) -> Result<DataFrame, LoadError> {
    match source.format() {
        FileFormat::Delimited => load_delimited(source, options),
        FileFormat::Spreadsheet => {
            let raw = read_spreadsheet(source.bytes())?;
            Ok(normalize(&raw))
        }
        FileFormat::Unknown => Err(LoadError::UnsupportedFormat(source.name().to_string())),
    }
}

fn load_delimited(source: &ByteSource, options: &LoadOptions) -> Result<DataFrame, LoadError> {
    // The CSV reader takes a single-byte separator, so a non-ASCII override
    // cannot be honored; treat it like no override at all.
    let separator = match options.separator {
        Some(c) if c.is_ascii() => c,
        Some(c) => {
            debug!("separator override {c:?} is not ascii, falling back to detection");
            detect_separator(source.sample(DETECT_SAMPLE_BYTES)).unwrap_or(',')
        }
        None => detect_separator(source.sample(DETECT_SAMPLE_BYTES)).unwrap_or(','),
    };

    let labels: Vec<&str> = match &options.encoding {
        Some(label) => vec![label.as_str()],
        None => ENCODING_FALLBACKS.to_vec(),
    };

    for label in &labels {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            debug!("unknown encoding label {label:?}");
            continue;
        };
        let (text, _, had_errors) = encoding.decode(source.bytes());
        if had_errors {
            debug!("{label}: bytes not valid for this encoding");
            continue;
        }

        let header_row = locate_header(&text, separator);
        let body = &text[line_offset(&text, header_row)..];
        match parse_delimited(body, separator) {
            Ok(df) if df.height() > 0 => return Ok(normalize(&df)),
            Ok(_) => debug!("{label}: parse produced an empty table"),
            Err(e) => debug!("{label}: parse failed: {e}"),
        }
    }

    Err(LoadError::Exhausted {
        attempts: labels.len(),
    })
}

/// Byte offset of the start of line `row`.
fn line_offset(text: &str, row: usize) -> usize {
    text.split_inclusive('\n').take(row).map(str::len).sum()
}

/// Parse decoded delimited text, treating line 0 as the header.
///
/// The text is read header-less with schema inference disabled so every
/// column comes back as strings, then the first row is lifted into the column
/// names. Applying the header here (rather than in the CSV reader) keeps
/// empty and duplicate header cells from failing the parse: they get
/// deterministic `column_N` placeholders the normalizer knows how to judge.
fn parse_delimited(body: &str, separator: char) -> PolarsResult<DataFrame> {
    debug_assert!(separator.is_ascii());
    let sep_byte = separator as u8;

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_ignore_errors(true)
        .map_parse_options(|opts| {
            opts.with_separator(sep_byte)
                .with_truncate_ragged_lines(true)
        })
        .into_reader_with_file_handle(Cursor::new(body.as_bytes()))
        .finish()?;

    apply_header_row(df)
}

/// Lift row 0 of a header-less all-string frame into the column names.
fn apply_header_row(df: DataFrame) -> PolarsResult<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }

    let labels: Vec<String> = df
        .get_columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let cell = col
                .as_materialized_series()
                .str()
                .ok()
                .and_then(|ca| ca.get(0))
                .unwrap_or("");
            header_label(cell, idx)
        })
        .collect();

    let mut body = df.slice(1, df.height() - 1);
    body.set_column_names(dedupe_names(labels))?;
    Ok(body)
}

/// Missing header cells get the parser placeholder the normalizer expects.
fn header_label(cell: &str, idx: usize) -> String {
    if cell.trim().is_empty() {
        format!("column_{}", idx + 1)
    } else {
        cell.to_string()
    }
}

/// Read the first sheet of a workbook held in memory. The format is
/// self-describing, so no separator/encoding detection applies.
fn read_spreadsheet(bytes: &[u8]) -> Result<DataFrame, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::Spreadsheet("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let rows: Vec<&[Data]> = rows.collect();

    let labels: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            Data::Empty => header_label("", idx),
            other => header_label(other.to_string().trim(), idx),
        })
        .collect();

    let columns: Vec<Column> = dedupe_names(labels)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| spreadsheet_column(name, idx, &rows))
        .collect();

    DataFrame::new(columns).map_err(|e| LoadError::Spreadsheet(e.to_string()))
}

/// Build one column from workbook cells: float when every non-empty cell is
/// numeric, text otherwise.
fn spreadsheet_column(name: String, idx: usize, rows: &[&[Data]]) -> Column {
    let cells: Vec<&Data> = rows
        .iter()
        .map(|row| row.get(idx).unwrap_or(&Data::Empty))
        .collect();

    let all_numeric = cells.iter().all(|cell| {
        matches!(
            cell,
            Data::Empty | Data::Int(_) | Data::Float(_) | Data::DateTime(_)
        )
    });

    if all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Int(i) => Some(*i as f64),
                Data::Float(f) => Some(*f),
                Data::DateTime(dt) => Some(dt.as_f64()),
                _ => None,
            })
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Empty => None,
                Data::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_offsets() {
        let text = "\n\nheader\ndata\n";
        assert_eq!(line_offset(text, 0), 0);
        assert_eq!(line_offset(text, 2), 2);
        assert_eq!(&text[line_offset(text, 2)..], "header\ndata\n");
    }

    #[test]
    fn header_applied_with_placeholders_and_dupes() {
        let df = parse_delimited("name,,name\na,b,c\nd,e,f\n", ',').unwrap();
        assert_eq!(df.get_column_names_str(), vec!["name", "column_2", "name_2"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn manual_separator_beats_detection() {
        // Commas dominate the sample, but the caller pins the pipe.
        let src = ByteSource::new("x.csv", b"a,a|b,b\n1,1|2,2\n3,3|4,4\n".to_vec());
        let df = load_table(&src, &LoadOptions::default().with_separator('|')).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.get_column_names_str(), vec!["a,a", "b,b"]);
    }

    #[test]
    fn non_ascii_separator_override_falls_back_to_detection() {
        let src = ByteSource::new("x.csv", b"a;b\n1;2\n3;4\n".to_vec());
        let df = load_table(&src, &LoadOptions::default().with_separator('→')).unwrap();
        assert_eq!(df.get_column_names_str(), vec!["a", "b"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn unsupported_extension() {
        let src = ByteSource::new("report.pdf", b"whatever".to_vec());
        assert!(matches!(
            load_table(&src, &LoadOptions::default()),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn pinned_encoding_that_cannot_decode_exhausts() {
        let src = ByteSource::new("x.csv", vec![b'a', 0xff, 0xfe, b'\n']);
        let options = LoadOptions::default().with_encoding("utf-8");
        assert!(matches!(
            load_table(&src, &options),
            Err(LoadError::Exhausted { attempts: 1 })
        ));
    }
}
