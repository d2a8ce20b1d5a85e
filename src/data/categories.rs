//! Category table: one labelled row of sub-group values per category.
//!
//! Loaded from CSV where the first column is the category label and every
//! remaining column is a numeric sub-group (for example population by age
//! bracket per state). Rows with a missing or non-numeric value are dropped
//! before any layout math sees them.

use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// One category with its sub-group values.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    /// Category label (first column).
    pub label: String,
    /// Sub-group values in header order.
    pub values: Vec<f64>,
    /// Sum of `values`, computed once at load.
    pub total: f64,
    /// Position in load order among accepted rows.
    pub original_index: usize,
}

impl AsRef<[f64]> for CategoryRow {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Parsed category table.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    /// Header of the label column.
    pub label_column: String,
    /// Sub-group names in declaration order.
    pub keys: Vec<String>,
    /// Accepted rows in load order.
    pub rows: Vec<CategoryRow>,
    /// Number of rows rejected as malformed.
    pub skipped: usize,
}

impl CategoryTable {
    /// Build a table from in-memory rows, computing totals.
    #[must_use]
    pub fn from_rows(label_column: &str, keys: Vec<String>, rows: Vec<(String, Vec<f64>)>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(original_index, (label, values))| {
                let total = values.iter().sum();
                CategoryRow { label, values, total, original_index }
            })
            .collect();
        Self { label_column: label_column.to_string(), keys, rows, skipped: 0 }
    }

    /// Parse CSV from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is unreadable or has fewer than two columns.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr =
            csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        if headers.len() < 2 {
            return Err(Error::MalformedData(format!(
                "category table needs a label column and at least one value column, \
                 found {} column(s)",
                headers.len()
            )));
        }

        let label_column = headers.get(0).unwrap_or_default().to_string();
        let keys: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut rows = Vec::new();
        let mut skipped = 0;
        for (line, record) in rdr.records().enumerate() {
            let record = record?;
            match parse_row(&record, keys.len()) {
                Some((label, values)) => rows.push((label, values)),
                None => {
                    skipped += 1;
                    tracing::warn!(
                        row = line + 1,
                        record = ?record,
                        "skipping malformed category row"
                    );
                }
            }
        }

        let mut table = Self::from_rows(&label_column, keys, rows);
        table.skipped = skipped;
        tracing::info!(
            rows = table.rows.len(),
            keys = table.keys.len(),
            skipped,
            "loaded category table"
        );
        Ok(table)
    }

    /// Parse CSV text.
    ///
    /// # Errors
    ///
    /// See [`CategoryTable::from_reader`].
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Load a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Largest row total, or zero for an empty table.
    #[must_use]
    pub fn max_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).fold(0.0, f64::max)
    }
}

fn parse_row(record: &csv::StringRecord, key_count: usize) -> Option<(String, Vec<f64>)> {
    if record.len() != key_count + 1 {
        return None;
    }
    let label = record.get(0)?.to_string();
    let values = record
        .iter()
        .skip(1)
        .map(|field| field.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()?;
    Some((label, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "State,Under 5 Years,5 to 13 Years\nCA,10,20\nTX,5,5\n";

    #[test]
    fn test_parse_and_totals() {
        let table = CategoryTable::from_csv_str(SAMPLE).unwrap();
        assert_eq!(table.label_column, "State");
        assert_eq!(table.keys, vec!["Under 5 Years", "5 to 13 Years"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].label, "CA");
        assert!((table.rows[0].total - 30.0).abs() < f64::EPSILON);
        assert!((table.rows[1].total - 10.0).abs() < f64::EPSILON);
        assert_eq!(table.rows[1].original_index, 1);
        assert!((table.max_total() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let csv = "State,a,b\nCA,1,2\nTX,,3\nNY,x,1\nWA,1\nOR,4,4\n";
        let table = CategoryTable::from_csv_str(csv).unwrap();
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["CA", "OR"]);
        assert_eq!(table.skipped, 3);
        assert_eq!(table.rows[1].original_index, 1);
    }

    #[test]
    fn test_single_column_rejected() {
        assert!(matches!(CategoryTable::from_csv_str("State\nCA\n"), Err(Error::MalformedData(_))));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = CategoryTable::from_csv_str("State,a,b\n").unwrap();
        assert!(table.rows.is_empty());
        assert!(table.max_total().abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("population.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(CategoryTable::load(&path).unwrap().rows.len(), 2);
        assert!(matches!(CategoryTable::load(dir.path().join("missing.csv")), Err(Error::Io(_))));
    }
}
