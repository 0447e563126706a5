//! Cell values and the rules for reading them

/// A single cell: a string value, or `None` for a missing entry.
///
/// The engine performs no type inference at load time. Cells stay exactly
/// the strings the source produced and acquire numeric meaning only inside
/// the operations that ask for it.
pub type Cell = Option<String>;

/// Whether a cell counts as null: missing entirely or the empty string.
/// Everything else is a value, including `"0"` and `"false"`.
pub fn is_null(cell: &Cell) -> bool {
    match cell {
        None => true,
        Some(s) => s.is_empty(),
    }
}

/// Coerce a cell to a number for numeric operations.
///
/// Null, empty, and non-parsing cells yield `None` and are excluded from
/// the computation rather than treated as zero.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    let text = cell.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Borrow a cell's text, reading null as the empty string.
pub fn cell_text(cell: &Cell) -> &str {
    cell.as_deref().unwrap_or("")
}
