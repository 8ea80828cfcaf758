//! Header Locator Module
//! Finds the true column-header row in a decoded delimited file.

/// Rows inspected when hunting for the header.
pub const HEADER_SCAN_ROWS: usize = 20;

/// Penalty applied per missing cell when scoring a candidate row.
const MISSING_PENALTY: f64 = 0.5;

/// Return the zero-based line index of the most likely header row.
///
/// The first `HEADER_SCAN_ROWS` lines are split on `separator` without any
/// header assumption. A row scores one point per cell that is non-empty text
/// and not purely numeric, minus half a point per missing cell (empty cell or
/// short row padding). Header rows are dense with descriptive labels and have
/// few gaps, so they outscore both preamble noise and numeric data rows.
/// Scanning top-down, the first strictly-best score wins; an unscorable input
/// falls back to row 0.
pub fn locate_header(text: &str, separator: char) -> usize {
    let rows: Vec<Vec<String>> = text
        .lines()
        .take(HEADER_SCAN_ROWS)
        .map(|line| split_fields(line, separator))
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return 0;
    }

    let mut best_row = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (idx, row) in rows.iter().enumerate() {
        let labels = row
            .iter()
            .filter(|cell| {
                let cell = cell.trim();
                !cell.is_empty() && cell.parse::<f64>().is_err()
            })
            .count();
        let missing =
            row.iter().filter(|cell| cell.trim().is_empty()).count() + (width - row.len());

        let score = labels as f64 - MISSING_PENALTY * missing as f64;
        if score > best_score {
            best_score = score;
            best_row = idx;
        }
    }

    best_row
}

/// Split one line on `separator`, honoring double-quoted fields (quote marks
/// are dropped from the output). Quoted line breaks are not resolved here;
/// the preview only ever scores whole lines.
fn split_fields(line: &str, separator: char) -> Vec<String> {
    let mut fields = vec![String::new()];
    let mut in_quotes = false;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == separator && !in_quotes {
            fields.push(String::new());
        } else if let Some(field) = fields.last_mut() {
            field.push(c);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_after_preamble_garbage() {
        let text = "report generated 2024\ninternal use only\n\
                    name;city;score;year;flag\n\
                    alice;rome;10;2021;1\n\
                    bob;milan;20;2022;0\n";
        assert_eq!(locate_header(text, ';'), 2);
    }

    #[test]
    fn blank_preamble_lines() {
        let text = "\n\n\nproduct,price\nwidget,10\n";
        assert_eq!(locate_header(text, ','), 3);
    }

    #[test]
    fn quoted_separators_stay_in_one_field() {
        assert_eq!(
            split_fields("a,\"1,000.5\",b", ','),
            vec!["a", "1,000.5", "b"]
        );
        let text = "id,amount\n1,\"2,000.5\"\n2,\"3,500.0\"\n";
        assert_eq!(locate_header(text, ','), 0);
    }

    #[test]
    fn first_of_tied_rows_wins() {
        let text = "a,b\nc,d\n1,2\n";
        assert_eq!(locate_header(text, ','), 0);
    }

    #[test]
    fn unscorable_input_falls_back_to_zero() {
        assert_eq!(locate_header("", ','), 0);
        assert_eq!(locate_header("1,2\n3,4\n", ','), 0);
    }
}
