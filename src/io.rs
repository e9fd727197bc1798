use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::error::{NormalizeError, Result};
use crate::table::Table;

pub fn read_table(path: &Path, delimiter: u8) -> Result<Table> {
    if !path.exists() {
        return Err(NormalizeError::MissingInput(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new().delimiter(delimiter).from_path(path)?;
    let headers = reader.headers()?.iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|record| -> Result<Vec<String>> { Ok(record?.iter().map(String::from).collect()) })
        .collect::<Result<Vec<Vec<String>>>>()?;

    let table = Table::new(headers, rows)?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "read table"
    );
    Ok(table)
}

pub fn write_table(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = table.row_count(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("detailed_psd_table.csv");
        match read_table(&path, b',') {
            Err(NormalizeError::MissingInput(p)) => assert_eq!(p, path),
            other => panic!("expected MissingInput, got {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read_keeps_quoted_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["Patient".into(), "Label, raw".into()],
            vec![vec!["1".into(), "a \"b\"".into()]],
        )
        .unwrap();

        write_table(&table, &path, b',').unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Patient,\"Label, raw\"\n1,\"a \"\"b\"\"\"\n"
        );
        assert_eq!(read_table(&path, b',').unwrap(), table);
    }

    #[test]
    fn test_ragged_input_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "Patient,X\n1,2\n1\n").unwrap();
        assert!(read_table(&path, b',').is_err());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "Patient;X\n1;2,5\n").unwrap();
        let table = read_table(&path, b';').unwrap();
        assert_eq!(table.rows()[0], vec!["1".to_string(), "2,5".to_string()]);
    }
}
