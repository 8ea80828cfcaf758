//! Cleansheet - Tabular Data Ingestion & Cleaning Engine
//!
//! Takes a loosely-structured CSV or spreadsheet of unknown layout and
//! produces an analysis-ready Polars `DataFrame` plus a small summary.
//! The interactive dashboard lives elsewhere; it hands this crate a named
//! byte buffer (and optional separator/encoding overrides) and gets back a
//! cleaned table or a single load-failed signal.

pub mod data;

pub use data::{
    detect_separator, load_table, locate_header, normalize, summarize, ByteSource,
    DatasetSummary, FileFormat, LoadError, LoadOptions,
};
