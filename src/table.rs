use std::collections::HashSet;

use crate::error::{NormalizeError, Result};

/// In-memory table with a fixed, ordered header. Cells keep their original
/// text so columns that are not normalized are written back untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(NormalizeError::Schema(format!(
                    "duplicate column '{}'",
                    header
                )));
            }
        }

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(NormalizeError::Schema(format!(
                "row {} has {} fields, expected {}",
                i,
                row.len(),
                headers.len()
            )));
        }

        Ok(Table { headers, rows })
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

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| NormalizeError::Schema(format!("column '{}' not found", name)))
    }

    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Parses every cell of `name` as a finite `f64`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .enumerate()
            .map(|(row, cell)| {
                parse_numeric(cell).ok_or_else(|| NormalizeError::NonNumericValue {
                    column: name.to_string(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}

fn parse_numeric(cell: &str) -> Option<f64> {
    match cell.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_rejects_duplicate_headers() {
        let err = Table::new(strings(&["Patient", "X", "X"]), vec![]).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema(_)));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Table::new(
            strings(&["Patient", "X"]),
            vec![strings(&["1", "2"]), strings(&["1"])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_numeric_column_trims_and_parses() {
        let table = Table::new(
            strings(&["Patient", "X"]),
            vec![strings(&["1", " 1.5 "]), strings(&["2", "-2e-3"])],
        )
        .unwrap();
        assert_eq!(table.numeric_column("X").unwrap(), vec![1.5, -0.002]);
    }

    #[test]
    fn test_numeric_column_reports_offending_cell() {
        let table = Table::new(
            strings(&["Patient", "X"]),
            vec![strings(&["1", "3"]), strings(&["1", "abc"])],
        )
        .unwrap();
        match table.numeric_column("X").unwrap_err() {
            NormalizeError::NonNumericValue { column, row, value } => {
                assert_eq!(column, "X");
                assert_eq!(row, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_and_non_finite_cells_are_rejected() {
        for bad in ["", "NaN", "inf"] {
            let table = Table::new(strings(&["X"]), vec![strings(&[bad])]).unwrap();
            assert!(matches!(
                table.numeric_column("X"),
                Err(NormalizeError::NonNumericValue { .. })
            ));
        }
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = Table::new(strings(&["X"]), vec![]).unwrap();
        assert!(matches!(
            table.column_index("Y"),
            Err(NormalizeError::Schema(_))
        ));
    }
}
