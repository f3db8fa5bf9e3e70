//! A table bound to the file it was loaded from or saved to

use crate::codec::{self, ParsedTable, RecoveredCell};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::table::Table;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Content of the bundled default table
pub const BUNDLED_DEFAULT: &str = include_str!("../assets/app_default.txt");

/// Summary of a load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Rows now in the table
    pub rows: usize,
    /// Tokens that were replaced by placeholder cells
    pub recovered: Vec<RecoveredCell>,
}

/// The session's one table plus the file metadata that goes with it
#[derive(Debug, Clone, Default)]
pub struct TableFile {
    table: Table,
    current_file: Option<PathBuf>,
    is_default: bool,
    config: Config,
}

impl TableFile {
    /// Create an empty session with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session using `config` for the default table
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// File the table was last loaded from or saved to
    pub fn current_file_name(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Whether the loaded content is the default table
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Replace the table with the content of `path`
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        let content = read_table_file(path)?;

        let report = self.apply(codec::parse_table(&content));
        self.current_file = Some(path.to_path_buf());
        debug!(path = %path.display(), rows = report.rows, default = self.is_default, "loaded table");
        Ok(report)
    }

    /// Replace the table with in-memory content. The file name is kept.
    pub fn load_str(&mut self, content: &str) -> LoadReport {
        self.apply(codec::parse_table(content))
    }

    /// Replace the table with the default table.
    ///
    /// Reads `Config::default_table` when set, the bundled copy otherwise.
    pub fn load_default(&mut self) -> Result<LoadReport> {
        let report = match self.config.default_table.clone() {
            Some(path) => {
                let content = read_table_file(&path)?;
                self.apply(codec::parse_table(&content))
            }
            None => self.apply(codec::parse_table(BUNDLED_DEFAULT)),
        };

        self.is_default = true;
        self.current_file = Some(PathBuf::from(&self.config.default_file_name));
        info!(rows = report.rows, "loaded default table");
        Ok(report)
    }

    /// Write the table to `path`, overwriting it
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file_error = |e: std::io::Error| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        };

        let file = File::create(path).map_err(file_error)?;
        let mut writer = BufWriter::new(file);
        codec::write_table(&self.table, &mut writer).map_err(file_error)?;
        writer.flush().map_err(file_error)?;

        self.current_file = Some(path.to_path_buf());
        self.is_default = false;
        debug!(path = %path.display(), rows = self.table.row_count(), "saved table");
        Ok(())
    }

    /// Save back to the current file
    pub fn save_current(&mut self) -> Result<()> {
        let path = self
            .current_file
            .clone()
            .ok_or_else(|| Error::InvalidArgument("no current file name to save to".to_string()))?;
        self.save(path)
    }

    fn apply(&mut self, parsed: ParsedTable) -> LoadReport {
        self.table = parsed.table;
        self.is_default = parsed.is_default;
        LoadReport {
            rows: self.table.row_count(),
            recovered: parsed.recovered,
        }
    }
}

fn read_table_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    // Bad bytes become U+FFFD inside their own cell
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
