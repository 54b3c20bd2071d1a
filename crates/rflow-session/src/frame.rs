//! Tabular frames: ordered column names plus rows of raw cell text.
//! No typing, no statistics.

use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Ordered column names; length equals `column_count` by construction.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Replace all names at once, preserving order. The caller checks the
    /// length; reapplying the same names is a no-op.
    pub fn set_column_names(&mut self, names: Vec<String>) {
        debug_assert_eq!(names.len(), self.columns.len());
        self.columns = names;
    }

    pub fn summary(&self, frame_id: &str) -> Value {
        json!({
            "frame_id": frame_id,
            "columns": self.columns,
            "column_count": self.column_count(),
            "row_count": self.row_count(),
        })
    }
}

/// Default names for headerless data: `C1..Cn`, mirroring what analytics
/// engines generate when a file has no header row.
pub fn generated_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("C{i}")).collect()
}

/// Pick the separator that splits the first line into the most fields.
pub fn guess_separator(first_line: &str) -> u8 {
    [b',', b';', b'\t', b'|']
        .into_iter()
        .max_by_key(|sep| first_line.matches(*sep as char).count())
        .unwrap_or(b',')
}

/// A row looks like a header when none of its cells parse as numbers.
pub fn looks_like_header(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| c.trim().parse::<f64>().is_err())
}

fn split_line(line: &str, separator: u8) -> Vec<String> {
    line.split(separator as char)
        .map(|c| c.trim().to_string())
        .collect()
}

/// Materialize a frame from raw CSV text.
///
/// `check_header`: 1 treats the first row as a header, -1 as data, 0 applies
/// the heuristic. Explicit `column_names` always win over a header row.
pub fn parse_csv(
    raw: &str,
    separator: Option<u8>,
    check_header: i32,
    column_names: Option<Vec<String>>,
) -> Frame {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty()).peekable();
    let first = match lines.peek() {
        Some(l) => *l,
        None => return Frame::new(column_names.unwrap_or_default(), Vec::new()),
    };
    let separator = separator.unwrap_or_else(|| guess_separator(first));

    let mut rows: Vec<Vec<String>> = lines.map(|l| split_line(l, separator)).collect();
    let width = rows.first().map(Vec::len).unwrap_or(0);

    let has_header = match check_header {
        1 => true,
        -1 => false,
        _ => rows.first().map(|r| looks_like_header(r)).unwrap_or(false),
    };
    let header = if has_header { Some(rows.remove(0)) } else { None };

    let columns = match column_names {
        Some(names) => names,
        None => header.unwrap_or_else(|| generated_names(width)),
    };
    Frame::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERED: &str = "ID,CAPSULE,AGE,RACE,DPROS,DCAPS\n1,0,65,1,2,1\n2,1,72,1,3,2\n";
    const HEADERLESS: &str = "1,0,65,1,2,1\n2,1,72,1,3,2\n";

    #[test]
    fn header_row_becomes_the_column_names() {
        let frame = parse_csv(HEADERED, None, 0, None);
        assert_eq!(
            frame.column_names(),
            &["ID", "CAPSULE", "AGE", "RACE", "DPROS", "DCAPS"]
        );
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn headerless_data_gets_generated_names() {
        let frame = parse_csv(HEADERLESS, None, 0, None);
        assert_eq!(frame.column_names(), &["C1", "C2", "C3", "C4", "C5", "C6"]);
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn explicit_names_win_over_the_header() {
        let names: Vec<String> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let frame = parse_csv(HEADERED, None, 1, Some(names.clone()));
        assert_eq!(frame.column_names(), names.as_slice());
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn separator_guess_prefers_the_most_frequent_candidate() {
        assert_eq!(guess_separator("a;b;c"), b';');
        assert_eq!(guess_separator("a\tb\tc"), b'\t');
        assert_eq!(guess_separator("abc"), b',');
    }
}
