//! Core table types: a table is rows of key/value cells

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub key: String,
    pub value: String,
}

impl Cell {
    /// Create a new cell
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Placeholder substituted for cell tokens that fail to parse
    pub fn invalid() -> Self {
        Self::new(INVALID, INVALID)
    }

    /// Compare by the concatenation `key + value` without allocating it
    pub fn cmp_concat(&self, other: &Cell) -> Ordering {
        self.key
            .bytes()
            .chain(self.value.bytes())
            .cmp(other.key.bytes().chain(other.value.bytes()))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.key, self.value)
    }
}

/// Key and value of the placeholder cell
pub const INVALID: &str = "Invalid";

/// An ordered sequence of cells. Position is the column index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Number of cells in this row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell by column index
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str("   ")?;
            }
            write!(f, "{}", cell)?;
        }
        Ok(())
    }
}

/// The whole dataset.
///
/// Keys are expected to be unique across every cell of every row. The
/// container does not check this itself; the mutating operations do.
/// Rows may differ in length; [`Table::column_count`] reports the first
/// row's length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns, taken from the first row
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Row::len)
    }

    /// Get a row by index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Get a cell by row and column index
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Append a row
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Remove every row
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Check whether any cell in the table uses `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.cells().any(|cell| cell.key == key)
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.cells.iter())
    }
}
