//! Summary Extractor Module
//! Lightweight descriptive metadata for the dashboard widgets.

use polars::prelude::*;
use serde::Serialize;
use std::fmt::Write;

/// Read-only snapshot of a normalized table, computed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub missing_values: usize,
    /// Per-column type/non-null listing, one line per column.
    pub column_report: String,
}

pub fn summarize(df: &DataFrame) -> DatasetSummary {
    let rows = df.height();
    let columns = df.width();
    let missing_values = df.get_columns().iter().map(Column::null_count).sum();

    let name_width = df
        .get_columns()
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or(0)
        .max("Column".len());

    let mut column_report = String::new();
    if columns > 0 {
        let _ = writeln!(
            column_report,
            "  #  {:<name_width$}  Non-Null  Dtype",
            "Column"
        );
        for (idx, col) in df.get_columns().iter().enumerate() {
            let _ = writeln!(
                column_report,
                "{idx:>3}  {:<name_width$}  {:>8}  {}",
                col.name().as_str(),
                rows - col.null_count(),
                col.dtype()
            );
        }
    }

    DatasetSummary {
        rows,
        columns,
        missing_values,
        column_report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_report() {
        let df = DataFrame::new(vec![
            Column::new("name".into(), vec![Some("a"), None, Some("c")]),
            Column::new("score".into(), vec![Some(1.0), Some(2.0), None]),
        ])
        .unwrap();

        let summary = summarize(&df);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, 2);
        assert_eq!(summary.missing_values, 2);
        assert!(summary.column_report.contains("name"));
        assert!(summary.column_report.contains("score"));
        assert_eq!(summary.column_report.lines().count(), 3);
    }

    #[test]
    fn empty_table() {
        let summary = summarize(&DataFrame::empty());
        assert_eq!(summary.rows, 0);
        assert_eq!(summary.columns, 0);
        assert_eq!(summary.missing_values, 0);
        assert!(summary.column_report.is_empty());
    }
}
