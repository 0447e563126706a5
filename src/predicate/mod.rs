//! Structured row predicates for the custom filter
//!
//! The filter takes a user-typed expression like
//! `Age > 20 and Status == "Yes"` and parses it into a [`Predicate`] tree;
//! no user text is ever evaluated as code. Parse failures are typed errors,
//! and a predicate naming a column the table does not have is rejected
//! before evaluation, so a typo never reads as "no matches".
//!
//! Evaluation itself never fails: a numeric comparison against a cell that
//! does not coerce is simply non-matching, and string comparisons read null
//! cells as empty strings.

mod lexer;
mod parser;
mod token;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{cell_text, coerce_numeric, Row, Table};

use lexer::Lexer;
use parser::Parser;

/// Comparison operator in a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
}

/// Right-hand side of a comparison. A number compares against the cell's
/// numeric coercion; text compares against the cell's string value,
/// case-sensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Text(String),
}

/// A boolean test over a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: Literal,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Parse a filter expression into a predicate tree.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Parser::new(tokens).parse()
    }

    /// Column names referenced anywhere in the predicate.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::Compare { column, .. } => out.push(column),
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Predicate::Not(inner) => inner.collect_columns(out),
        }
    }

    /// Evaluate against one row of `table`. Unknown columns read as
    /// non-matching here; [`Table::filter`] rejects them up front.
    pub fn matches(&self, table: &Table, row: &Row) -> bool {
        match self {
            Predicate::Compare { column, op, value } => {
                let col = match table.column_index(column) {
                    Some(col) => col,
                    None => return false,
                };
                let cell = &row.cells()[col];
                match (op, value) {
                    (CompareOp::Contains, Literal::Text(needle)) => {
                        cell_text(cell).contains(needle.as_str())
                    }
                    (CompareOp::Contains, Literal::Number(needle)) => {
                        cell_text(cell).contains(&needle.to_string())
                    }
                    (_, Literal::Number(rhs)) => match coerce_numeric(cell) {
                        Some(lhs) => op.compare_numbers(lhs, *rhs),
                        None => false,
                    },
                    (_, Literal::Text(rhs)) => op.compare_text(cell_text(cell), rhs),
                }
            }
            Predicate::And(left, right) => left.matches(table, row) && right.matches(table, row),
            Predicate::Or(left, right) => left.matches(table, row) || right.matches(table, row),
            Predicate::Not(inner) => !inner.matches(table, row),
        }
    }
}

impl CompareOp {
    fn compare_numbers(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Contains => false,
        }
    }

    fn compare_text(self, lhs: &str, rhs: &str) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Contains => lhs.contains(rhs),
        }
    }
}

impl Table {
    /// Rows matching the predicate, preserving order. Every column the
    /// predicate references must exist in the table.
    pub fn filter(&self, predicate: &Predicate) -> Result<Vec<&Row>> {
        for column in predicate.columns() {
            self.require_column(column)?;
        }
        Ok(self
            .rows()
            .iter()
            .filter(|row| predicate.matches(self, row))
            .collect())
    }
}
