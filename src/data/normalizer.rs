//! Table Normalizer Module
//! Turns a raw parsed table into an analysis-ready one: drops empty
//! rows/columns, repairs column names, retypes numeric-looking text.

use polars::prelude::*;
use std::collections::HashSet;

/// Placeholder columns below this share of non-missing values are dropped.
pub const PLACEHOLDER_KEEP_RATIO: f64 = 0.1;
/// Share of values that must parse as numbers before a text column is
/// replaced by its numeric version.
pub const NUMERIC_ADOPT_RATIO: f64 = 0.7;
/// Non-missing values sampled when sniffing whether a column is numeric-like.
const NUMERIC_SNIFF_SAMPLE: usize = 10;

/// Clean a raw parsed table.
///
/// Pure: the input is untouched and a new frame is returned. Never fails;
/// a frame that cannot be cleaned comes back unchanged.
pub fn normalize(df: &DataFrame) -> DataFrame {
    normalize_inner(df).unwrap_or_else(|_| df.clone())
}

fn normalize_inner(df: &DataFrame) -> PolarsResult<DataFrame> {
    if df.width() == 0 {
        return Ok(DataFrame::empty());
    }

    let df = drop_empty_rows(df)?;
    let height = df.height();

    // Walk columns once: drop all-missing and near-empty placeholders,
    // repair names, retype numeric-like text.
    let mut out: Vec<Column> = Vec::with_capacity(df.width());
    let mut names: Vec<String> = Vec::with_capacity(df.width());
    for (idx, col) in df.get_columns().iter().enumerate() {
        if col.null_count() == height {
            continue;
        }

        let trimmed = col.name().trim();
        let name = if is_placeholder_name(trimmed) {
            let non_missing = height - col.null_count();
            if (non_missing as f64) < height as f64 * PLACEHOLDER_KEEP_RATIO {
                continue;
            }
            format!("col_{idx}")
        } else {
            trimmed.to_string()
        };

        names.push(name);
        out.push(retype_numeric(col)?);
    }

    // Renaming does not guarantee uniqueness on its own; suffix collisions.
    let names = dedupe_names(names);
    for (col, name) in out.iter_mut().zip(&names) {
        col.rename(name.as_str().into());
    }

    DataFrame::new(out)
}

/// Keep only rows with at least one non-missing cell.
fn drop_empty_rows(df: &DataFrame) -> PolarsResult<DataFrame> {
    let height = df.height();
    let mut keep = vec![false; height];
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        if series.null_count() == 0 {
            keep.iter_mut().for_each(|k| *k = true);
            break;
        }
        for (i, slot) in keep.iter_mut().enumerate() {
            if !*slot && !series.get(i)?.is_null() {
                *slot = true;
            }
        }
    }
    df.filter(&BooleanChunked::from_slice("keep".into(), &keep))
}

/// Names the parser synthesized (or left degenerate) instead of reading from
/// a real header cell. The synthesized shape is exactly `column_<digits>`;
/// a genuine label that merely starts with `column_` is not a placeholder.
fn is_placeholder_name(trimmed: &str) -> bool {
    if trimmed.is_empty() || trimmed == "nan" {
        return true;
    }
    match trimmed.strip_prefix("column_") {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Suffix colliding names with `_2`, `_3`, … so a frame never carries two
/// identical column names. Shared with the loader's header application.
pub(crate) fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let mut k = 2;
            loop {
                let candidate = format!("{name}_{k}");
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
                k += 1;
            }
        })
        .collect()
}

/// Replace a text column with a float version when its values are
/// predominantly numeric after stripping currency/percent symbols and
/// resolving the decimal convention. Anything else passes through untouched.
fn retype_numeric(col: &Column) -> PolarsResult<Column> {
    if col.dtype() != &DataType::String {
        return Ok(col.clone());
    }
    let ca = col.as_materialized_series().str()?.clone();

    // Cheap gate: if a small sample carries no digit at all this is prose,
    // not mangled numbers.
    let sample_has_digit = ca
        .iter()
        .flatten()
        .take(NUMERIC_SNIFF_SAMPLE)
        .any(|v| v.chars().any(|c| c.is_ascii_digit()));
    if !sample_has_digit {
        return Ok(col.clone());
    }

    let cleaned: Vec<Option<String>> = ca
        .iter()
        .map(|v| v.map(strip_symbols))
        .collect();

    // Decide the locale convention column-wide, not per value.
    let convention = decimal_convention(&cleaned);

    let parsed: Vec<Option<f64>> = cleaned
        .into_iter()
        .map(|v| {
            v.and_then(|v| {
                let v = match convention {
                    DecimalConvention::European => v.replace('.', "").replace(',', "."),
                    DecimalConvention::Thousands => v.replace(',', ""),
                    DecimalConvention::DecimalComma => v.replace(',', "."),
                    DecimalConvention::Plain => v,
                };
                v.parse::<f64>().ok()
            })
        })
        .collect();

    let valid = parsed.iter().filter(|v| v.is_some()).count();
    if (valid as f64) > ca.len() as f64 * NUMERIC_ADOPT_RATIO {
        Ok(Column::new(col.name().clone(), parsed))
    } else {
        Ok(col.clone())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum DecimalConvention {
    /// Period groups thousands, comma marks decimals ("1.000,50").
    European,
    /// Comma groups thousands, period marks decimals ("1,000.5").
    Thousands,
    /// Comma marks decimals, no grouping ("10,5").
    DecimalComma,
    /// Nothing to rewrite.
    Plain,
}

/// Pick the number-formatting convention for a whole column of cleaned
/// values. When both marks appear, the one written last in a value carrying
/// both is the decimal mark and the other groups thousands.
fn decimal_convention(cleaned: &[Option<String>]) -> DecimalConvention {
    let has_comma = cleaned.iter().flatten().any(|v| v.contains(','));
    let has_period = cleaned.iter().flatten().any(|v| v.contains('.'));

    if has_comma && has_period {
        let period_last = cleaned
            .iter()
            .flatten()
            .filter_map(|v| Some((v.rfind(',')?, v.rfind('.')?)))
            .next()
            .map(|(comma, period)| period > comma);
        match period_last {
            Some(true) => DecimalConvention::Thousands,
            // Comma written last, or the marks never co-occur in one value.
            Some(false) | None => DecimalConvention::European,
        }
    } else if has_comma {
        DecimalConvention::DecimalComma
    } else {
        DecimalConvention::Plain
    }
}

fn strip_symbols(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£' | '%') && !c.is_whitespace())
        .collect()
}
