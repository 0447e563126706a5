//! Read-only query and aggregation operations
//!
//! Every operation validates its column arguments against the table and
//! fails with the typed unknown-column error when a name is absent. Numeric
//! operations apply the on-demand coercion rule from the model: cells that
//! do not parse are excluded, never treated as zero.

pub mod stats;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::model::{cell_text, coerce_numeric, is_null, Row, Table};

/// Label null cells are folded into for counting and dedup operations.
pub const NULL_LABEL: &str = "NULL";

impl Table {
    /// Numeric values of one column, in row order.
    pub(crate) fn numeric_column(&self, column: &str) -> Result<Vec<f64>> {
        let col = self.require_column(column)?;
        Ok(self
            .rows()
            .iter()
            .filter_map(|row| coerce_numeric(&row.cells()[col]))
            .collect())
    }

    /// Count of null cells per column, for all columns.
    pub fn null_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> =
            self.columns().iter().map(|c| (c.clone(), 0)).collect();
        for row in self.rows() {
            for (idx, cell) in row.cells().iter().enumerate() {
                if is_null(cell) {
                    if let Some((_, count)) = counts.get_index_mut(idx) {
                        *count += 1;
                    }
                }
            }
        }
        counts
    }

    /// Average of the numeric cells of a column; `None` when there are none.
    pub fn mean(&self, column: &str) -> Result<Option<f64>> {
        let values = self.numeric_column(column)?;
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }

    /// Sum of the numeric cells of a column; zero when there are none.
    pub fn sum(&self, column: &str) -> Result<f64> {
        Ok(self.numeric_column(column)?.iter().sum())
    }

    /// Minimum and maximum of the numeric cells; `None` when there are none.
    pub fn min_max(&self, column: &str) -> Result<Option<(f64, f64)>> {
        let values = self.numeric_column(column)?;
        let mut iter = values.into_iter();
        let first = match iter.next() {
            Some(v) => v,
            None => return Ok(None),
        };
        let extremes = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Ok(Some(extremes))
    }

    /// Occurrences of each value in a column, nulls folded into
    /// [`NULL_LABEL`]. The mapping keeps first-encountered order, which is
    /// what makes the [`top_n`](Table::top_n) tie-break reproducible.
    pub fn value_counts(&self, column: &str) -> Result<IndexMap<String, usize>> {
        let col = self.require_column(column)?;
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for row in self.rows() {
            let cell = &row.cells()[col];
            let label = if is_null(cell) {
                NULL_LABEL.to_string()
            } else {
                cell_text(cell).to_string()
            };
            *counts.entry(label).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// The `n` most frequent values of a column, count-descending; ties
    /// keep first-encountered order.
    pub fn top_n(&self, column: &str, n: usize) -> Result<Vec<(String, usize)>> {
        let mut entries: Vec<(String, usize)> =
            self.value_counts(column)?.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        Ok(entries)
    }

    /// Rows whose column coerces numeric and is strictly greater than the
    /// threshold, in order.
    pub fn filter_threshold(&self, column: &str, threshold: f64) -> Result<Vec<&Row>> {
        let col = self.require_column(column)?;
        Ok(self
            .rows()
            .iter()
            .filter(|row| {
                coerce_numeric(&row.cells()[col]).map_or(false, |v| v > threshold)
            })
            .collect())
    }

    /// Rows where any of the given columns contains the keyword,
    /// case-insensitively. Null cells read as empty strings.
    pub fn search_keyword(&self, columns: &[String], keyword: &str) -> Result<Vec<&Row>> {
        let indices = columns
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>>>()?;
        let needle = keyword.to_lowercase();
        Ok(self
            .rows()
            .iter()
            .filter(|row| {
                indices
                    .iter()
                    .any(|&col| cell_text(&row.cells()[col]).to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Sum of the numeric values of a column that are strictly greater than
    /// the threshold; zero when there are none.
    pub fn sum_above_threshold(&self, column: &str, threshold: f64) -> Result<f64> {
        Ok(self
            .numeric_column(column)?
            .into_iter()
            .filter(|v| *v > threshold)
            .sum())
    }

    /// Pearson correlation over the rows where both columns coerce numeric.
    ///
    /// `None` with fewer than two usable pairs; `0.0` when either column
    /// has zero variance, so a constant column never divides by zero.
    pub fn correlation(&self, x_column: &str, y_column: &str) -> Result<Option<f64>> {
        let pairs = self.scatter_pairs(x_column, y_column)?;
        if pairs.len() < 2 {
            return Ok(None);
        }
        let n = pairs.len() as f64;
        let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        let denom = (var_x * var_y).sqrt();
        if denom == 0.0 {
            return Ok(Some(0.0));
        }
        Ok(Some(cov / denom))
    }

    /// The first row encountered for each distinct value of a column,
    /// nulls folded into [`NULL_LABEL`], preserving original order.
    pub fn unique_rows(&self, column: &str) -> Result<Vec<&Row>> {
        let col = self.require_column(column)?;
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for row in self.rows() {
            let cell = &row.cells()[col];
            let key = if is_null(cell) {
                NULL_LABEL
            } else {
                cell_text(cell)
            };
            if seen.insert(key.to_string()) {
                out.push(row);
            }
        }
        Ok(out)
    }

    /// Ordered `(x, y)` pairs over the rows where both columns coerce
    /// numeric; the data behind a scatter plot.
    pub fn scatter_pairs(&self, x_column: &str, y_column: &str) -> Result<Vec<(f64, f64)>> {
        let x_col = self.require_column(x_column)?;
        let y_col = self.require_column(y_column)?;
        Ok(self
            .rows()
            .iter()
            .filter_map(|row| {
                Some((
                    coerce_numeric(&row.cells()[x_col])?,
                    coerce_numeric(&row.cells()[y_col])?,
                ))
            })
            .collect())
    }
}
