//! Delimited text format for tables
//!
//! One line per row. Cells are separated by `0x1F` and written as
//! `(` key `0x1E` value `)`. Lines end in `\n`; `\r\n` and a lone `\r` are
//! also accepted on input. A file whose first line is
//! exactly [`DEFAULT_MARKER`] is the bundled default table; that line is
//! still parsed as an ordinary row.

use crate::table::{Cell, Row, Table};
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;

/// Separates cells within a line (unit separator)
pub const CELL_DELIMITER: char = '\u{1F}';
/// Separates key from value within a cell (record separator)
pub const KEY_VALUE_DELIMITER: char = '\u{1E}';
/// First line of the bundled default table
pub const DEFAULT_MARKER: &str = "APP_DEFAULT_TABLE";

/// Outcome of parsing one cell token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCell {
    Ok(Cell),
    /// The token was malformed and replaced by [`Cell::invalid`]
    Recovered { sentinel: Cell, original: String },
}

impl ParsedCell {
    /// The cell to store in the table
    pub fn into_cell(self) -> Cell {
        match self {
            ParsedCell::Ok(cell) => cell,
            ParsedCell::Recovered { sentinel, .. } => sentinel,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, ParsedCell::Recovered { .. })
    }
}

/// A malformed token found while loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveredCell {
    pub row: usize,
    pub col: usize,
    pub original: String,
}

/// A table parsed from text, plus what had to be patched up along the way
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub table: Table,
    pub recovered: Vec<RecoveredCell>,
    /// First line equals [`DEFAULT_MARKER`]
    pub is_default: bool,
}

/// Parse a single `(key<RS>value)` token
pub fn parse_cell(token: &str) -> ParsedCell {
    let pair = token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .and_then(|inner| inner.split_once(KEY_VALUE_DELIMITER));

    match pair {
        Some((key, value)) => ParsedCell::Ok(Cell::new(key, value)),
        None => ParsedCell::Recovered {
            sentinel: Cell::invalid(),
            original: token.to_string(),
        },
    }
}

/// Split a line into cell tokens and parse each one.
///
/// Trailing empty tokens are dropped; other empty tokens are malformed.
pub fn parse_line(line: &str) -> Vec<ParsedCell> {
    let mut tokens: Vec<&str> = line.split(CELL_DELIMITER).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens.into_iter().map(parse_cell).collect()
}

/// A line holding nothing but control characters and spaces
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c <= ' ')
}

/// Split on `\n`, `\r\n` or a lone `\r`. A `\r\n` pair yields an extra
/// empty line, which is blank.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split(['\r', '\n'])
}

/// Parse a whole file's content. Blank lines never become rows.
pub fn parse_table(content: &str) -> ParsedTable {
    let mut parsed = ParsedTable {
        is_default: split_lines(content).next() == Some(DEFAULT_MARKER),
        ..ParsedTable::default()
    };

    for line in split_lines(content).filter(|l| !is_blank(l)) {
        let row_idx = parsed.table.row_count();
        let mut cells = Vec::new();

        for (col_idx, cell) in parse_line(line).into_iter().enumerate() {
            if let ParsedCell::Recovered { original, .. } = &cell {
                warn!(row = row_idx, col = col_idx, token = %original.escape_debug(), "invalid cell format");
                parsed.recovered.push(RecoveredCell {
                    row: row_idx,
                    col: col_idx,
                    original: original.clone(),
                });
            }
            cells.push(cell.into_cell());
        }

        parsed.table.push_row(Row::new(cells));
    }

    parsed
}

/// Format one cell as `(key<RS>value)`
pub fn format_cell(cell: &Cell) -> String {
    format!("({}{}{})", cell.key, KEY_VALUE_DELIMITER, cell.value)
}

/// Write every row as one newline-terminated line
pub fn write_table<W: Write>(table: &Table, writer: &mut W) -> io::Result<()> {
    let mut buf = [0u8; 4];
    let delim = CELL_DELIMITER.encode_utf8(&mut buf).as_bytes();

    for row in &table.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if i > 0 {
                writer.write_all(delim)?;
            }
            writer.write_all(format_cell(cell).as_bytes())?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Serialize a table to a string, in the same layout as [`write_table`]
pub fn to_string(table: &Table) -> String {
    let mut out = String::new();
    for row in &table.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if i > 0 {
                out.push(CELL_DELIMITER);
            }
            out.push_str(&format_cell(cell));
        }
        out.push('\n');
    }
    out
}
