//! Table and Row data structures with the mutation operations

use std::cmp::Ordering;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::error::{EngineError, Result};

use super::cell::{cell_text, coerce_numeric, Cell};

/// A row in the table.
///
/// Cells are stored in column order; the owning [`Table`] guarantees every
/// row is exactly as wide as the column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Get a cell value by column index.
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Cell values in column order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// The in-memory dataset: an ordered column list plus ordered rows.
///
/// Column order is fixed at load; rows change through the mutation
/// operations. Queries live in the `query` module and never mutate.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from row mappings, replacing any previous content.
    ///
    /// Row payloads are normalized: keys outside `columns` are dropped and
    /// missing keys become the empty string. The schema itself must be
    /// sound; duplicate or empty column names fail with a schema error.
    pub fn load(columns: Vec<String>, records: &[IndexMap<String, Cell>]) -> Result<Self> {
        validate_columns(&columns)?;
        let rows = records
            .iter()
            .map(|record| Row {
                cells: columns
                    .iter()
                    .map(|col| Some(record.get(col).and_then(|c| c.clone()).unwrap_or_default()))
                    .collect(),
            })
            .collect();
        Ok(Self { columns, rows })
    }

    /// Build a table from rows whose cells are already in column order.
    ///
    /// Short rows are padded with nulls and long rows truncated to the
    /// column count, the forgiving treatment ragged CSV records get.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        validate_columns(&columns)?;
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, None);
                Row { cells }
            })
            .collect();
        Ok(Self { columns, rows })
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// An owned copy of the column names; callers may mutate it freely.
    pub fn column_list(&self) -> Vec<String> {
        self.columns.clone()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The first `n` rows (or all of them if the table is shorter).
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve a column name or fail with the typed unknown-column error.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| EngineError::UnknownColumn(name.to_string()))
    }

    /// Append a row. Columns missing from `values` become the empty string
    /// and unknown keys are dropped, so this always succeeds.
    pub fn add_row(&mut self, values: &IndexMap<String, String>) {
        let cells = self
            .columns
            .iter()
            .map(|col| Some(values.get(col).cloned().unwrap_or_default()))
            .collect();
        self.rows.push(Row { cells });
    }

    /// Set a single cell.
    pub fn update_cell(
        &mut self,
        row_index: usize,
        column: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        let col = self.require_column(column)?;
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(row_index)
            .ok_or(EngineError::RowIndex { index: row_index, len })?;
        row.cells[col] = Some(value.into());
        Ok(())
    }

    /// Remove a row. Subsequent rows shift down by one index, so callers
    /// must not hold stale indices across a delete.
    pub fn delete_row(&mut self, row_index: usize) -> Result<()> {
        if row_index >= self.rows.len() {
            return Err(EngineError::RowIndex {
                index: row_index,
                len: self.rows.len(),
            });
        }
        self.rows.remove(row_index);
        Ok(())
    }

    /// Sort rows in place by one column. Pairs where both cells coerce to
    /// numbers compare numerically; everything else compares as
    /// case-sensitive strings with null read as empty. The sort is stable.
    pub fn sort_by(&mut self, column: &str, ascending: bool) -> Result<()> {
        let col = self.require_column(column)?;
        self.rows.sort_by(|a, b| {
            let ord = compare_cells(&a.cells[col], &b.cells[col]);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(())
    }

    /// Replace cells in `column` whose exact value is a key of `mapping`
    /// with the mapped value; all other cells are left untouched. Returns
    /// how many cells changed.
    pub fn replace_by_mapping(
        &mut self,
        column: &str,
        mapping: &IndexMap<String, String>,
    ) -> Result<usize> {
        let col = self.require_column(column)?;
        let mut replaced = 0;
        for row in &mut self.rows {
            if let Some(mapped) = row.cells[col].as_ref().and_then(|v| mapping.get(v)) {
                row.cells[col] = Some(mapped.clone());
                replaced += 1;
            }
        }
        Ok(replaced)
    }
}

fn validate_columns(columns: &[String]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for name in columns {
        if name.is_empty() {
            return Err(EngineError::Schema("empty column name".to_string()));
        }
        if !seen.insert(name.as_str()) {
            return Err(EngineError::Schema(format!("duplicate column name: {name}")));
        }
    }
    Ok(())
}

/// Numeric comparison when both sides coerce, string comparison otherwise.
fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    match (coerce_numeric(a), coerce_numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => cell_text(a).cmp(cell_text(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn mapping(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample() -> Table {
        Table::from_parts(
            columns(&["Name", "Age", "Status"]),
            vec![
                vec![Some("Ann".into()), Some("30".into()), Some("Yes".into())],
                vec![Some("Bo".into()), Some("".into()), Some("No".into())],
                vec![Some("Cy".into()), Some("25".into()), Some("".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_load_normalizes_records() {
        let records = vec![
            IndexMap::from([
                ("Name".to_string(), Some("Ann".to_string())),
                ("Extra".to_string(), Some("dropped".to_string())),
            ]),
            IndexMap::from([("Age".to_string(), Some("30".to_string()))]),
        ];
        let table = Table::load(columns(&["Name", "Age"]), &records).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows()[0].cells(),
            &[Some("Ann".to_string()), Some(String::new())]
        );
        assert_eq!(
            table.rows()[1].cells(),
            &[Some(String::new()), Some("30".to_string())]
        );
    }

    #[test]
    fn test_load_rejects_bad_schema() {
        assert!(matches!(
            Table::load(columns(&["A", "A"]), &[]),
            Err(EngineError::Schema(_))
        ));
        assert!(matches!(
            Table::load(columns(&["A", ""]), &[]),
            Err(EngineError::Schema(_))
        ));
    }

    #[test]
    fn test_from_parts_pads_and_truncates() {
        let table = Table::from_parts(
            columns(&["A", "B"]),
            vec![
                vec![Some("1".into())],
                vec![Some("2".into()), Some("3".into()), Some("overflow".into())],
            ],
        )
        .unwrap();
        assert_eq!(table.rows()[0].cells(), &[Some("1".to_string()), None]);
        assert_eq!(
            table.rows()[1].cells(),
            &[Some("2".to_string()), Some("3".to_string())]
        );
    }

    #[test]
    fn test_add_row_fills_missing_and_drops_unknown() {
        let mut table = sample();
        table.add_row(&mapping(&[("Name", "Di"), ("Nope", "x")]));
        let added = &table.rows()[3];
        assert_eq!(
            added.cells(),
            &[Some("Di".to_string()), Some(String::new()), Some(String::new())]
        );
    }

    #[test]
    fn test_update_cell() {
        let mut table = sample();
        table.update_cell(1, "Age", "41").unwrap();
        assert_eq!(table.rows()[1].get(1), Some(&Some("41".to_string())));

        assert_eq!(
            table.update_cell(9, "Age", "x"),
            Err(EngineError::RowIndex { index: 9, len: 3 })
        );
        assert_eq!(
            table.update_cell(0, "Nope", "x"),
            Err(EngineError::UnknownColumn("Nope".to_string()))
        );
    }

    #[test]
    fn test_delete_shifts_indices() {
        let mut table = sample();
        table.delete_row(0).unwrap();
        // Index 0 now addresses the row formerly at index 1.
        table.update_cell(0, "Name", "Bob").unwrap();
        assert_eq!(table.rows()[0].get(0), Some(&Some("Bob".to_string())));
        assert_eq!(
            table.delete_row(2),
            Err(EngineError::RowIndex { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_sort_numeric_when_both_coerce() {
        let mut table = Table::from_parts(
            columns(&["V"]),
            vec![
                vec![Some("10".into())],
                vec![Some("9".into())],
                vec![Some("100".into())],
            ],
        )
        .unwrap();
        table.sort_by("V", true).unwrap();
        let values: Vec<_> = table.rows().iter().map(|r| r.cells()[0].clone()).collect();
        assert_eq!(
            values,
            vec![
                Some("9".to_string()),
                Some("10".to_string()),
                Some("100".to_string())
            ]
        );

        table.sort_by("V", false).unwrap();
        let values: Vec<_> = table.rows().iter().map(|r| r.cells()[0].clone()).collect();
        assert_eq!(
            values,
            vec![
                Some("100".to_string()),
                Some("10".to_string()),
                Some("9".to_string())
            ]
        );
    }

    #[test]
    fn test_sort_falls_back_to_string_compare() {
        let mut table = Table::from_parts(
            columns(&["V"]),
            vec![
                vec![Some("pear".into())],
                vec![None],
                vec![Some("Apple".into())],
                vec![Some("3".into())],
            ],
        )
        .unwrap();
        table.sort_by("V", true).unwrap();
        let values: Vec<_> = table
            .rows()
            .iter()
            .map(|r| cell_text(&r.cells()[0]).to_string())
            .collect();
        // Case-sensitive lexicographic order with null as empty string.
        assert_eq!(values, vec!["", "3", "Apple", "pear"]);
        assert_eq!(
            table.sort_by("Nope", true),
            Err(EngineError::UnknownColumn("Nope".into()))
        );
    }

    #[test]
    fn test_replace_by_mapping_exact_matches_only() {
        let mut table = sample();
        let replaced = table
            .replace_by_mapping("Status", &mapping(&[("Yes", "Si")]))
            .unwrap();
        assert_eq!(replaced, 1);
        let statuses: Vec<_> = table.rows().iter().map(|r| r.cells()[2].clone()).collect();
        assert_eq!(
            statuses,
            vec![
                Some("Si".to_string()),
                Some("No".to_string()),
                Some(String::new())
            ]
        );
    }
}
