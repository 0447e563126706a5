//! Descriptive statistics and per-column summaries

use std::cmp::Ordering;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::Result;
use crate::model::{cell_text, coerce_numeric, is_null, Table};

/// Per-column null and non-null tallies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCounts {
    pub non_nulls: usize,
    pub nulls: usize,
}

/// Descriptive statistics for one column.
///
/// Columns with at least one numeric cell get the numeric profile computed
/// over those cells only; everything else gets a count of rows and of
/// distinct non-null values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnSummary {
    Numeric {
        count: usize,
        mean: f64,
        std: f64,
        min: f64,
        q25: f64,
        median: f64,
        q75: f64,
        max: f64,
    },
    Categorical {
        count: usize,
        unique: usize,
    },
}

/// One equal-width bucket over a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Table {
    /// Null and non-null counts for every column.
    pub fn reduced_summary(&self) -> IndexMap<String, ColumnCounts> {
        let null_counts = self.null_counts();
        let total = self.row_count();
        null_counts
            .into_iter()
            .map(|(name, nulls)| {
                (
                    name,
                    ColumnCounts {
                        non_nulls: total - nulls,
                        nulls,
                    },
                )
            })
            .collect()
    }

    /// Descriptive statistics for every column.
    ///
    /// Numeric profiles use population standard deviation and
    /// linear-interpolation quantiles.
    pub fn describe(&self) -> IndexMap<String, ColumnSummary> {
        let mut out = IndexMap::with_capacity(self.column_count());
        for (col, name) in self.columns().iter().enumerate() {
            let mut values: Vec<f64> = self
                .rows()
                .iter()
                .filter_map(|row| coerce_numeric(&row.cells()[col]))
                .collect();
            let summary = if values.is_empty() {
                let unique: FxHashSet<&str> = self
                    .rows()
                    .iter()
                    .map(|row| &row.cells()[col])
                    .filter(|cell| !is_null(cell))
                    .map(cell_text)
                    .collect();
                ColumnSummary::Categorical {
                    count: self.row_count(),
                    unique: unique.len(),
                }
            } else {
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let std =
                    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
                ColumnSummary::Numeric {
                    count: values.len(),
                    mean,
                    std,
                    min: values[0],
                    q25: quantile(&values, 0.25),
                    median: quantile(&values, 0.5),
                    q75: quantile(&values, 0.75),
                    max: values[values.len() - 1],
                }
            };
            out.insert(name.clone(), summary);
        }
        out
    }

    /// Equal-width histogram buckets over the numeric cells of a column.
    ///
    /// Buckets are `[lower, upper)` except the last, which closes at the
    /// maximum. A degenerate range (all values equal) is widened to 1.
    /// Empty when the column has no numeric cells; `bins` below 1 is
    /// clamped to 1.
    pub fn histogram(&self, column: &str, bins: usize) -> Result<Vec<HistogramBin>> {
        let values = self.numeric_column(column)?;
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let bins = bins.max(1);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = if max > min { max - min } else { 1.0 };
        let width = range / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in &values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Ok(counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + i as f64 * width,
                upper: if i == bins - 1 {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                count,
            })
            .collect())
    }
}

/// Linear-interpolation quantile over already-sorted values.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let idx = (sorted.len() - 1) as f64 * p;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] * (hi as f64 - idx) + sorted[hi] * (idx - lo as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_parts(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Some(v.to_string())).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_reduced_summary() {
        let t = table(&["A", "B"], &[&["x", ""], &["", ""], &["y", "1"]]);
        let summary = t.reduced_summary();
        assert_eq!(summary["A"], ColumnCounts { non_nulls: 2, nulls: 1 });
        assert_eq!(summary["B"], ColumnCounts { non_nulls: 1, nulls: 2 });
    }

    #[test]
    fn test_describe_numeric_column() {
        let t = table(&["V"], &[&["1"], &["2"], &["3"], &["4"]]);
        match &t.describe()["V"] {
            ColumnSummary::Numeric {
                count,
                mean,
                std,
                min,
                q25,
                median,
                q75,
                max,
            } => {
                assert_eq!(*count, 4);
                assert_eq!(*mean, 2.5);
                assert!((std - 1.118033988749895).abs() < 1e-12);
                assert_eq!(*min, 1.0);
                assert_eq!(*q25, 1.75);
                assert_eq!(*median, 2.5);
                assert_eq!(*q75, 3.25);
                assert_eq!(*max, 4.0);
            }
            other => panic!("expected numeric summary, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_mixed_column_uses_numeric_cells_only() {
        let t = table(&["V"], &[&["1"], &["x"], &["3"]]);
        match &t.describe()["V"] {
            ColumnSummary::Numeric { count, mean, .. } => {
                assert_eq!(*count, 2);
                assert_eq!(*mean, 2.0);
            }
            other => panic!("expected numeric summary, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_categorical_column() {
        let t = table(&["C"], &[&["a"], &["b"], &["a"], &[""]]);
        assert_eq!(
            t.describe()["C"],
            ColumnSummary::Categorical { count: 4, unique: 2 }
        );
    }

    #[test]
    fn test_histogram_buckets() {
        let t = table(&["V"], &[&["0"], &["1"], &["5"], &["9"], &["10"]]);
        let bins = t.histogram("V", 2).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[0].upper, 5.0);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].upper, 10.0);
        // The maximum lands in the last, closed bucket.
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let t = table(&["V"], &[&["7"], &["7"], &["7"]]);
        let bins = t.histogram("V", 4).unwrap();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_histogram_edge_inputs() {
        let t = table(&["V", "W"], &[&["1", "x"], &["2", "y"]]);
        assert!(t.histogram("W", 10).unwrap().is_empty());
        assert_eq!(t.histogram("V", 0).unwrap().len(), 1);
        assert_eq!(
            t.histogram("Nope", 10),
            Err(EngineError::UnknownColumn("Nope".to_string()))
        );
    }
}
