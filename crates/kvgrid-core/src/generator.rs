//! Synthetic table content built from a token source

use crate::config::Config;
use crate::error::{Error, Result};
use crate::table::{Cell, Row, Table};
use crate::token::TokenSource;
use std::collections::HashSet;
use tracing::debug;

/// Builds rows of random cells.
///
/// Keys are only made unique within a single [`Generator::create_table`]
/// call. [`Generator::new_row`] never checks keys against anything.
#[derive(Debug, Clone)]
pub struct Generator<T> {
    tokens: T,
    key_length: usize,
    value_length: usize,
    max_key_attempts: usize,
}

impl<T: TokenSource> Generator<T> {
    /// Create a generator with the default token lengths and attempt cap
    pub fn new(tokens: T) -> Self {
        Self::from_config(tokens, &Config::default())
    }

    /// Create a generator using the lengths and attempt cap from `config`
    pub fn from_config(tokens: T, config: &Config) -> Self {
        Self {
            tokens,
            key_length: config.key_length,
            value_length: config.value_length,
            max_key_attempts: config.max_key_attempts,
        }
    }

    /// Replace all rows of `table` with `rows` x `columns` random cells.
    ///
    /// A colliding key is regenerated until it is new to this call, up to
    /// `max_key_attempts` tries per key. On any error the table is left as
    /// it was.
    pub fn create_table(&mut self, table: &mut Table, rows: usize, columns: usize) -> Result<()> {
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidArgument(format!(
                "table dimensions must be positive, got {} x {}",
                rows, columns
            )));
        }

        let mut seen: HashSet<String> = HashSet::with_capacity(rows * columns);
        let mut new_rows = Vec::with_capacity(rows);

        for _ in 0..rows {
            let mut cells = Vec::with_capacity(columns);
            for _ in 0..columns {
                let key = self.unique_key(&mut seen)?;
                let value = self.tokens.token(self.value_length);
                cells.push(Cell::new(key, value));
            }
            new_rows.push(Row::new(cells));
        }

        table.rows = new_rows;
        debug!(rows, columns, "generated table");
        Ok(())
    }

    /// Build a row of `num_cells` random cells
    pub fn new_row(&mut self, num_cells: usize) -> Row {
        let cells = (0..num_cells)
            .map(|_| {
                let key = self.tokens.token(self.key_length);
                let value = self.tokens.token(self.value_length);
                Cell::new(key, value)
            })
            .collect();
        Row::new(cells)
    }

    fn unique_key(&mut self, seen: &mut HashSet<String>) -> Result<String> {
        for _ in 0..self.max_key_attempts {
            let key = self.tokens.token(self.key_length);
            if seen.insert(key.clone()) {
                return Ok(key);
            }
        }
        Err(Error::KeyGenerationExhausted {
            attempts: self.max_key_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{RandomTokens, ScriptedTokens};
    use proptest::prelude::*;

    #[test]
    fn test_create_table_shape() {
        let mut table = Table::new();
        let mut gen = Generator::new(RandomTokens::new());
        gen.create_table(&mut table, 4, 6).unwrap();

        assert_eq!(table.row_count(), 4);
        assert!(table.rows.iter().all(|r| r.len() == 6));
        for cell in table.cells() {
            assert_eq!(cell.key.len(), 3);
            assert_eq!(cell.value.len(), 3);
        }
    }

    #[test]
    fn test_create_table_replaces_rows() {
        let mut table = Table::new();
        table.push_row(Row::new(vec![Cell::new("old", "row")]));

        let mut gen = Generator::new(RandomTokens::new());
        gen.create_table(&mut table, 1, 2).unwrap();

        assert_eq!(table.row_count(), 1);
        assert!(!table.contains_key("old"));
    }

    #[test]
    fn test_create_table_regenerates_duplicate_keys() {
        // key, value, key (dup), key, value
        let tokens = ScriptedTokens::new(["aaa", "v01", "aaa", "bbb", "v02"]);
        let mut gen = Generator::new(tokens);
        let mut table = Table::new();
        gen.create_table(&mut table, 1, 2).unwrap();

        assert_eq!(
            table.rows[0].cells,
            vec![Cell::new("aaa", "v01"), Cell::new("bbb", "v02")]
        );
    }

    #[test]
    fn test_values_may_repeat() {
        let tokens = ScriptedTokens::new(["k1", "same", "k2", "same"]);
        let mut gen = Generator::new(tokens);
        let mut table = Table::new();
        gen.create_table(&mut table, 2, 1).unwrap();

        assert_eq!(table.rows[0].cells[0].value, "same");
        assert_eq!(table.rows[1].cells[0].value, "same");
    }

    #[test]
    fn test_create_table_rejects_zero_dimensions() {
        let mut table = Table::new();
        let mut gen = Generator::new(RandomTokens::new());
        assert!(matches!(
            gen.create_table(&mut table, 0, 3),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            gen.create_table(&mut table, 3, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_key_generation_exhausted_leaves_table_unchanged() {
        let config = Config {
            max_key_attempts: 5,
            ..Config::default()
        };
        // Empty script: every token is the same filler, so the second key collides forever
        let mut gen = Generator::from_config(ScriptedTokens::default(), &config);
        let mut table = Table::new();
        table.push_row(Row::new(vec![Cell::new("keep", "me")]));
        let before = table.clone();

        let err = gen.create_table(&mut table, 1, 2).unwrap_err();
        assert!(matches!(err, Error::KeyGenerationExhausted { attempts: 5 }));
        assert_eq!(table, before);
    }

    #[test]
    fn test_new_row_does_not_dedupe() {
        let mut gen = Generator::new(ScriptedTokens::new(["dup", "v1", "dup", "v2"]));
        let row = gen.new_row(2);
        assert_eq!(row.cells, vec![Cell::new("dup", "v1"), Cell::new("dup", "v2")]);
        assert!(gen.new_row(0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_generated_keys_are_unique(rows in 1usize..20, columns in 1usize..20) {
            let mut table = Table::new();
            let mut gen = Generator::new(RandomTokens::new());
            gen.create_table(&mut table, rows, columns).unwrap();

            let keys: HashSet<&str> = table.cells().map(|c| c.key.as_str()).collect();
            prop_assert_eq!(keys.len(), rows * columns);
        }
    }
}
