//! Terminal rendering of tables and summaries

use std::io::Write;

use indexmap::IndexMap;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::model::{cell_text, Row, Table};
use crate::query::stats::{ColumnCounts, ColumnSummary, HistogramBin};

/// Print a bold heading line, honoring the terminal's color support.
pub fn print_heading(text: &str) -> std::io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(&mut stdout, "{text}")?;
    stdout.reset()
}

/// Render rows under the table's own header.
pub fn rows_table(table: &Table, rows: &[&Row]) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns().iter().cloned());
    for row in rows {
        builder.push_record(row.cells().iter().map(|c| cell_text(c).to_string()));
    }
    finish(builder)
}

/// Render label/value pairs under the given two headers.
pub fn pairs_table(
    headers: [&str; 2],
    entries: impl IntoIterator<Item = (String, String)>,
) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for (label, value) in entries {
        builder.push_record([label, value]);
    }
    finish(builder)
}

/// Render the per-column null/non-null tallies.
pub fn summary_table(summary: &IndexMap<String, ColumnCounts>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["column".to_string(), "non_nulls".to_string(), "nulls".to_string()]);
    for (name, counts) in summary {
        builder.push_record([
            name.clone(),
            counts.non_nulls.to_string(),
            counts.nulls.to_string(),
        ]);
    }
    finish(builder)
}

/// Render descriptive statistics, one row per column. Numeric profiles
/// fill the statistics columns; text columns fill only count and unique.
pub fn describe_table(summaries: &IndexMap<String, ColumnSummary>) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "column", "count", "mean", "std", "min", "q25", "median", "q75", "max", "unique",
    ]);
    for (name, summary) in summaries {
        match summary {
            ColumnSummary::Numeric {
                count,
                mean,
                std,
                min,
                q25,
                median,
                q75,
                max,
            } => builder.push_record([
                name.clone(),
                count.to_string(),
                mean.to_string(),
                std.to_string(),
                min.to_string(),
                q25.to_string(),
                median.to_string(),
                q75.to_string(),
                max.to_string(),
                String::new(),
            ]),
            ColumnSummary::Categorical { count, unique } => builder.push_record([
                name.clone(),
                count.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                unique.to_string(),
            ]),
        }
    }
    finish(builder)
}

/// Render histogram buckets.
pub fn histogram_table(bins: &[HistogramBin]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["range".to_string(), "count".to_string()]);
    for bin in bins {
        builder.push_record([
            format!("{:.3} - {:.3}", bin.lower, bin.upper),
            bin.count.to_string(),
        ]);
    }
    finish(builder)
}

/// Render numeric (x, y) pairs.
pub fn points_table(x_label: &str, y_label: &str, pairs: &[(f64, f64)]) -> String {
    let mut builder = Builder::default();
    builder.push_record([x_label.to_string(), y_label.to_string()]);
    for (x, y) in pairs {
        builder.push_record([x.to_string(), y.to_string()]);
    }
    finish(builder)
}

fn finish(builder: Builder) -> String {
    let mut rendered = builder.build();
    rendered.with(Style::sharp());
    rendered.to_string()
}
