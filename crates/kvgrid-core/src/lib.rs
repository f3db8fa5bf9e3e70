//! kvgrid-core: Core library for key/value grid tables
//!
//! This library provides functionality to:
//! - Hold a table of rows of key/value cells with globally unique keys
//! - Generate random tables and rows from a token source
//! - Edit, search, sort and insert rows in place
//! - Read and write the delimited table file format, including the
//!   bundled default table
//! - Export tables to CSV and JSON

pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod file;
pub mod generator;
pub mod ops;
pub mod table;
pub mod token;

pub use codec::{ParsedCell, RecoveredCell, DEFAULT_MARKER};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export_csv, export_json};
pub use file::{LoadReport, TableFile};
pub use generator::Generator;
pub use ops::{EditKind, EditResult, SearchHit, SortOrder};
pub use table::{Cell, Row, Table};
pub use token::{RandomTokens, ScriptedTokens, TokenSource};
