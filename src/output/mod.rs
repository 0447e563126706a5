//! Presentation adapters for query results
//!
//! The engine returns plain data; these helpers turn it into terminal
//! tables or JSON. Nothing here feeds back into the engine.

mod json;
mod table;

pub use json::{print_pretty, rows_to_json};
pub use table::{
    describe_table, histogram_table, pairs_table, points_table, print_heading, rows_table,
    summary_table,
};
