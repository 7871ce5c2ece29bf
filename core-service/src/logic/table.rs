//! Table - Row-oriented CSV data
//!
//! Giữ nguyên text của từng ô (verbatim) để export lại không mất dữ liệu.
//! Type conversion chỉ xảy ra ở inference stage.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No columns to parse from file")]
    NoColumns,

    #[error("Row {row} has {found} fields, expected {expected}")]
    RowWidth { row: usize, expected: usize, found: usize },

    #[error("Column '{column}' has {found} values, table has {expected} rows")]
    ColumnLength { column: String, expected: usize, found: usize },
}

// ============================================================================
// TABLE
// ============================================================================

/// Uploaded tabular data: header names plus rows of raw cell text.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// First rows of a table, ready for JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the header
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(TableError::RowWidth {
                row,
                expected: headers.len(),
                found: cells.len(),
            });
        }

        Ok(Self { headers, rows })
    }

    /// Parse CSV with a header line
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(TableError::NoColumns);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        log::debug!("Parsed CSV: {} columns, {} rows", headers.len(), rows.len());

        Self::new(headers, rows)
    }

    /// Parse CSV from an in-memory upload
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        Self::from_csv_reader(bytes)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name (first occurrence wins)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Name -> position lookup, first occurrence wins on duplicate headers
    pub fn column_lookup(&self) -> HashMap<&str, usize> {
        let mut lookup = HashMap::with_capacity(self.headers.len());
        for (i, name) in self.headers.iter().enumerate() {
            lookup.entry(name.as_str()).or_insert(i);
        }
        lookup
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Append a column, or overwrite it in place if the name already exists
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(())
    }

    /// First `limit` rows
    pub fn preview(&self, limit: usize) -> TablePreview {
        TablePreview {
            columns: self.headers.clone(),
            rows: self.rows.iter().take(limit).cloned().collect(),
            total_rows: self.rows.len(),
        }
    }

    /// Selected columns (those that exist, in the given order), first `limit` rows
    pub fn project(&self, names: &[&str], limit: usize) -> TablePreview {
        let indices: Vec<(usize, &str)> = names
            .iter()
            .filter_map(|&name| self.column_index(name).map(|i| (i, name)))
            .collect();

        TablePreview {
            columns: indices.iter().map(|(_, name)| name.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .take(limit)
                .map(|row| indices.iter().map(|(i, _)| row[*i].clone()).collect())
                .collect(),
            total_rows: self.rows.len(),
        }
    }

    /// Serialize as comma-separated UTF-8 text with a header line
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        writer
            .into_inner()
            .map_err(|e| TableError::Io(e.into_error()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "srcip,sport,dur\n10.0.0.1,80,0.5\n10.0.0.2,22,1.2\n";

    #[test]
    fn test_parse_csv() {
        let table = Table::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["srcip", "sport", "dur"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("sport").unwrap(), vec!["80", "22"]);
    }

    #[test]
    fn test_parse_header_only() {
        let table = Table::from_csv_bytes(b"sport,dur\n").unwrap();
        assert_eq!(table.column_count(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_empty_file() {
        let result = Table::from_csv_bytes(b"");
        assert!(matches!(result, Err(TableError::NoColumns)));
    }

    #[test]
    fn test_parse_ragged_rows() {
        let result = Table::from_csv_bytes(b"a,b\n1,2\n3\n");
        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn test_new_rejects_bad_width() {
        let result = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        );
        assert!(matches!(
            result,
            Err(TableError::RowWidth { row: 1, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_duplicate_headers_first_wins() {
        let table = Table::from_csv_bytes(b"dur,dur\n1,2\n").unwrap();
        assert_eq!(table.column_index("dur"), Some(0));
        assert_eq!(table.column_lookup()["dur"], 0);
        assert_eq!(table.column("dur").unwrap(), vec!["1"]);
    }

    #[test]
    fn test_set_column_appends() {
        let mut table = Table::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        table
            .set_column("Attack Type", vec!["Normal".into(), "DoS".into()])
            .unwrap();
        assert_eq!(table.headers().last().unwrap(), "Attack Type");
        assert_eq!(table.rows()[1][3], "DoS");
    }

    #[test]
    fn test_set_column_overwrites_existing() {
        let mut table = Table::from_csv_bytes(b"x,Attack Type\n1,old\n").unwrap();
        table.set_column("Attack Type", vec!["new".into()]).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("Attack Type").unwrap(), vec!["new"]);
    }

    #[test]
    fn test_set_column_length_mismatch() {
        let mut table = Table::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        let result = table.set_column("Attack Type", vec!["Normal".into()]);
        assert!(matches!(result, Err(TableError::ColumnLength { .. })));
    }

    #[test]
    fn test_preview_and_project() {
        let table = Table::from_csv_bytes(SAMPLE.as_bytes()).unwrap();

        let preview = table.preview(1);
        assert_eq!(preview.rows.len(), 1);
        assert_eq!(preview.total_rows, 2);

        let view = table.project(&["dstip", "srcip", "dur"], 10);
        assert_eq!(view.columns, vec!["srcip", "dur"]);
        assert_eq!(view.rows[1], vec!["10.0.0.2", "1.2"]);
    }

    #[test]
    fn test_csv_output_keeps_cells() {
        let input = "name,note\nalpha,\"a, b\"\nbeta,\n";
        let table = Table::from_csv_bytes(input.as_bytes()).unwrap();
        let output = String::from_utf8(table.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(output, input);
    }
}
