//! JSON rendering of query results

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{Row, Table};

/// Convert rows to an array of column-keyed objects. Null cells become
/// JSON null; everything else stays a string.
pub fn rows_to_json(table: &Table, rows: &[&Row]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                let mut object = Map::new();
                for (name, cell) in table.columns().iter().zip(row.cells()) {
                    let value = match cell {
                        None => Value::Null,
                        Some(s) => Value::String(s.clone()),
                    };
                    object.insert(name.clone(), value);
                }
                Value::Object(object)
            })
            .collect(),
    )
}

/// Pretty-print any serializable result to stdout.
pub fn print_pretty<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_to_json_distinguishes_null_from_empty() {
        let table = Table::from_parts(
            vec!["A".to_string(), "B".to_string()],
            vec![vec![Some("".into())]],
        )
        .unwrap();
        let rows: Vec<&Row> = table.rows().iter().collect();
        let json = rows_to_json(&table, &rows);
        assert_eq!(json[0]["A"], Value::String(String::new()));
        assert_eq!(json[0]["B"], Value::Null);
    }
}
