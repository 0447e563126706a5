//! Data model for the in-memory tabular dataset

mod cell;
mod remap;
mod table;

pub use cell::{cell_text, coerce_numeric, is_null, Cell};
pub use remap::parse_mapping;
pub use table::{Row, Table};
