//! CSV boundary collaborators
//!
//! The engine itself never touches files; these helpers translate between
//! CSV bytes and the in-memory [`Table`]. Cells round-trip as the exact
//! strings the file contains, with one documented collapse on export:
//! null cells (ragged-record padding) become empty fields.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{Cell, Table};

/// Read a CSV file into a table. The header row becomes the column list;
/// records shorter than the header are padded with nulls and longer ones
/// truncated to the header width.
pub fn read_csv(path: &Path) -> Result<Table> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let columns: Vec<String> = headers.iter().map(|name| name.to_string()).collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (record_num, result) in csv_reader.records().enumerate() {
        // +2 for 1-indexing and the header line
        let record =
            result.with_context(|| format!("Failed to read CSV row {}", record_num + 2))?;
        rows.push(record.iter().map(|field| Some(field.to_string())).collect());
    }

    let table = Table::from_parts(columns, rows)
        .with_context(|| format!("Unusable CSV header in {}", path.display()))?;
    Ok(table)
}

/// Write a table as CSV to any writer.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(table.columns())
        .context("Failed to write CSV header")?;
    for row in table.rows() {
        csv_writer
            .write_record(row.cells().iter().map(|cell| cell.as_deref().unwrap_or("")))
            .context("Failed to write CSV row")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write a table as CSV to a file path.
pub fn write_csv_file(table: &Table, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    write_csv(table, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_read_csv_keeps_cells_as_strings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,Age").unwrap();
        writeln!(file, "Ann,30").unwrap();
        writeln!(file, "Bo,").unwrap();
        writeln!(file, "Cy").unwrap();
        file.flush().unwrap();

        let table = read_csv(file.path()).unwrap();
        assert_eq!(table.columns(), &["Name".to_string(), "Age".to_string()]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.rows()[0].cells(),
            &[Some("Ann".to_string()), Some("30".to_string())]
        );
        // An empty field is an empty string; a missing field is null.
        assert_eq!(
            table.rows()[1].cells(),
            &[Some("Bo".to_string()), Some(String::new())]
        );
        assert_eq!(table.rows()[2].cells(), &[Some("Cy".to_string()), None]);
    }

    #[test]
    fn test_write_csv_round_trips_values() {
        let table = Table::from_parts(
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec![Some("1".into()), Some("two, three".into())],
                vec![Some("".into()), None],
            ],
        )
        .unwrap();

        let mut buffer = Vec::new();
        write_csv(&table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "A,B\n1,\"two, three\"\n,\n");
    }
}
