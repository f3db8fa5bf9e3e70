//! In-place table operations: edit, search, row insertion and row sort
//!
//! Every operation validates its arguments before touching the table, so a
//! failed call leaves the table exactly as it was.

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::table::{Cell, Table};
use crate::token::TokenSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which part of a cell an edit replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Key,
    Value,
    /// Payload is `key,value`, split on the first comma
    Both,
}

impl FromStr for EditKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "key" => Ok(EditKind::Key),
            "value" => Ok(EditKind::Value),
            "both" => Ok(EditKind::Both),
            other => Err(Error::InvalidArgument(format!("invalid edit type '{}'", other))),
        }
    }
}

/// What an edit changed. Unchanged fields repeat the old value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResult {
    pub row: usize,
    pub col: usize,
    pub old_key: String,
    pub old_value: String,
    pub new_key: String,
    pub new_value: String,
}

impl fmt::Display for EditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{} -> {},{}",
            self.old_key, self.old_value, self.new_key, self.new_value
        )
    }
}

/// A cell containing the search term in its key, its value, or both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub key_occurrences: usize,
    pub term: String,
    pub value_occurrences: usize,
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key_occurrences > 0 {
            write!(f, "{} <{}> at key", self.key_occurrences, self.term)?;
            if self.value_occurrences > 0 {
                f.write_str(" and ")?;
            }
        }
        if self.value_occurrences > 0 {
            write!(f, "{} <{}> at value", self.value_occurrences, self.term)?;
        }
        write!(f, " of [{},{}]", self.row, self.col)
    }
}

/// Direction for [`Table::sort_row`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::InvalidArgument(format!(
                "invalid order '{}', use 'asc' or 'desc'",
                other
            ))),
        }
    }
}

/// Count non-overlapping occurrences of `term`, scanning left to right
fn occurrences(haystack: &str, term: &str) -> usize {
    haystack.matches(term).count()
}

impl Table {
    /// Replace the key, the value, or both of the cell at (`row`, `col`).
    ///
    /// A new key must not already appear anywhere in the table, the edited
    /// cell included.
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: usize,
        kind: EditKind,
        edited: &str,
    ) -> Result<EditResult> {
        let row_count = self.row_count();
        let cell_count = self
            .rows
            .get(row)
            .ok_or_else(|| Error::index("row", row, row_count))?
            .len();
        if col >= cell_count {
            return Err(Error::index("column", col, cell_count));
        }

        let (new_key, new_value) = match kind {
            EditKind::Key => {
                self.check_new_key(edited)?;
                (Some(edited), None)
            }
            EditKind::Value => (None, Some(edited)),
            EditKind::Both => {
                let (key, value) = edited.split_once(',').ok_or_else(|| {
                    Error::Format(format!(
                        "expected 'key,value' for both key and value, got '{}'",
                        edited
                    ))
                })?;
                self.check_new_key(key)?;
                (Some(key), Some(value))
            }
        };

        let cell = &mut self.rows[row].cells[col];
        let old_key = cell.key.clone();
        let old_value = cell.value.clone();
        if let Some(key) = new_key {
            cell.key = key.to_string();
        }
        if let Some(value) = new_value {
            cell.value = value.to_string();
        }

        Ok(EditResult {
            row,
            col,
            old_key,
            old_value,
            new_key: cell.key.clone(),
            new_value: cell.value.clone(),
        })
    }

    fn check_new_key(&self, key: &str) -> Result<()> {
        if self.contains_key(key) {
            Err(Error::DuplicateKey(key.to_string()))
        } else {
            Ok(())
        }
    }

    /// Find every cell whose key or value contains `term`, in row-major order
    pub fn search(&self, term: &str) -> Result<Vec<SearchHit>> {
        if term.is_empty() {
            return Err(Error::InvalidArgument("search term must not be empty".to_string()));
        }

        let mut hits = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, cell) in row.cells.iter().enumerate() {
                let key_occurrences = occurrences(&cell.key, term);
                let value_occurrences = occurrences(&cell.value, term);

                if key_occurrences > 0 || value_occurrences > 0 {
                    hits.push(SearchHit {
                        key_occurrences,
                        term: term.to_string(),
                        value_occurrences,
                        row: row_idx,
                        col: col_idx,
                    });
                }
            }
        }
        Ok(hits)
    }

    /// Insert a row of `num_cells` random cells before position `at`.
    ///
    /// `at == row_count()` appends. New keys are not checked against the
    /// rest of the table.
    pub fn add_row<T: TokenSource>(
        &mut self,
        num_cells: usize,
        at: usize,
        generator: &mut Generator<T>,
    ) -> Result<()> {
        if at > self.row_count() {
            // Insertion allows one past the last row
            return Err(Error::index("row", at, self.row_count() + 1));
        }
        let row = generator.new_row(num_cells);
        self.rows.insert(at, row);
        Ok(())
    }

    /// Sort the cells of one row by `key + value`.
    ///
    /// `Desc` is the exact reverse of the stable `Asc` order, ties included.
    pub fn sort_row(&mut self, row: usize, order: SortOrder) -> Result<()> {
        let row_count = self.row_count();
        let cells: &mut Vec<Cell> = &mut self
            .rows
            .get_mut(row)
            .ok_or_else(|| Error::index("row", row, row_count))?
            .cells;

        cells.sort_by(Cell::cmp_concat);
        if order == SortOrder::Desc {
            cells.reverse();
        }
        Ok(())
    }
}
