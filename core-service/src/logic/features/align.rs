//! Feature Aligner - Project an arbitrary table onto the feature schema
//!
//! Cột có trong schema → copy nguyên văn, cột thiếu → điền 0, cột thừa → bỏ.
//! Thứ tự cột luôn đúng thứ tự schema.

use serde::{Deserialize, Serialize};

use crate::constants::ZERO_FILL;
use crate::logic::table::Table;
use super::schema::FeatureSchema;

/// Table reshaped to exactly the schema's columns, borrowing source cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedTable<'a> {
    columns: &'a [String],
    rows: Vec<Vec<&'a str>>,
}

/// Which columns were copied, synthesized or ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub matched: Vec<String>,
    pub zero_filled: Vec<String>,
    pub dropped: Vec<String>,
}

impl<'a> AlignedTable<'a> {
    /// Column names, in schema order
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<&'a str>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&'a str>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }
}

/// Align `table` onto `schema`
pub fn align<'a>(table: &'a Table, schema: &'a FeatureSchema) -> AlignedTable<'a> {
    align_with_stats(table, schema).0
}

/// Align and report which columns matched
pub fn align_with_stats<'a>(
    table: &'a Table,
    schema: &'a FeatureSchema,
) -> (AlignedTable<'a>, AlignmentStats) {
    let lookup = table.column_lookup();

    // Source position per schema column, None = zero-fill
    let sources: Vec<Option<usize>> = schema
        .names()
        .iter()
        .map(|name| lookup.get(name.as_str()).copied())
        .collect();

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            sources
                .iter()
                .map(|source| match source {
                    Some(i) => row[*i].as_str(),
                    None => ZERO_FILL,
                })
                .collect()
        })
        .collect();

    let mut stats = AlignmentStats::default();
    for (name, source) in schema.names().iter().zip(&sources) {
        if source.is_some() {
            stats.matched.push(name.clone());
        } else {
            stats.zero_filled.push(name.clone());
        }
    }
    stats.dropped = table
        .headers()
        .iter()
        .filter(|h| !schema.contains(h))
        .cloned()
        .collect();

    log::debug!(
        "Aligned {} rows: {} matched, {} zero-filled, {} dropped",
        table.row_count(),
        stats.matched.len(),
        stats.zero_filled.len(),
        stats.dropped.len()
    );

    (
        AlignedTable {
            columns: schema.names(),
            rows,
        },
        stats,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_csv_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_copy_fill_drop() {
        let schema = FeatureSchema::new(vec!["a".into(), "b".into(), "c".into()]);
        let input = table("c,x,a\n3,9,1\n6,9,4\n");

        let (aligned, stats) = align_with_stats(&input, &schema);

        assert_eq!(aligned.columns(), &["a", "b", "c"]);
        assert_eq!(aligned.rows(), &[vec!["1", "0", "3"], vec!["4", "0", "6"]]);
        assert_eq!(stats.matched, vec!["a", "c"]);
        assert_eq!(stats.zero_filled, vec!["b"]);
        assert_eq!(stats.dropped, vec!["x"]);
    }

    #[test]
    fn test_no_coercion() {
        let schema = FeatureSchema::new(vec!["a".into()]);
        let input = table("a\nhello\n");
        assert_eq!(align(&input, &schema).column("a").unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_duplicate_header_uses_first() {
        let schema = FeatureSchema::new(vec!["a".into()]);
        let input = table("a,a\n1,2\n");
        assert_eq!(align(&input, &schema).column("a").unwrap(), vec!["1"]);
    }

    #[test]
    fn test_empty_schema() {
        let schema = FeatureSchema::new(Vec::new());
        let input = table("a\n1\n2\n");
        let aligned = align(&input, &schema);
        assert_eq!(aligned.row_count(), 2);
        assert_eq!(aligned.column_count(), 0);
    }
}
