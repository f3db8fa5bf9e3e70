//! kvgrid CLI
//!
//! Interactive and scripted access to key/value grid tables.

mod menu;

use clap::{Parser, Subcommand, ValueEnum};
use kvgrid_core::{
    export_csv, export_json, Config, Generator, RandomTokens, TableFile,
};
use menu::Menu;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// File argument that selects the bundled default table
const DEFAULT_ALIAS: &str = "default.txt";

#[derive(Parser)]
#[command(name = "kvgrid")]
#[command(about = "Key/value grid table editor", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Table file to open (the default table when omitted)
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every row of the table
    Print,

    /// Search keys and values for a term
    Search {
        /// Term to count in each key and value
        term: String,
    },

    /// Generate a random table and save it
    Generate {
        /// Number of rows
        #[arg(short, long)]
        rows: usize,

        /// Number of cells per row
        #[arg(short = 'C', long)]
        columns: usize,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export the table to another format
    Export {
        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(env).with_writer(io::stderr).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> kvgrid_core::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let generator = Generator::from_config(RandomTokens::new(), &config);
    let mut session = open_session(config, cli.file.as_deref());

    match cli.command {
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Menu::new(&mut session, generator, stdin.lock(), stdout.lock()).run()?;
            Ok(())
        }
        Some(Commands::Print) => cmd_print(&session),
        Some(Commands::Search { term }) => cmd_search(&session, &term),
        Some(Commands::Generate {
            rows,
            columns,
            output,
        }) => cmd_generate(&mut session, generator, rows, columns, &output),
        Some(Commands::Export { format, output }) => cmd_export(&session, format, &output),
    }
}

/// Load the requested table, falling back to the default table
fn open_session(config: Config, file: Option<&Path>) -> TableFile {
    let mut session = TableFile::with_config(config);

    let requested = file.filter(|f| {
        let name = f.to_string_lossy();
        !name.trim().is_empty() && !name.eq_ignore_ascii_case(DEFAULT_ALIAS)
    });

    if let Some(path) = requested {
        match session.load(path) {
            Ok(_) => return session,
            Err(e) => warn!("error loading table from file: {}", e),
        }
    }

    if let Err(e) = session.load_default() {
        error!("error loading default table: {}", e);
    }
    session
}

fn cmd_print(session: &TableFile) -> kvgrid_core::Result<()> {
    let mut out = io::stdout().lock();
    for row in &session.table().rows {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

fn cmd_search(session: &TableFile, term: &str) -> kvgrid_core::Result<()> {
    let hits = session.table().search(term)?;

    let mut out = io::stdout().lock();
    for hit in &hits {
        writeln!(out, "{}", hit)?;
    }
    if hits.is_empty() {
        writeln!(out, "No matches for '{}'", term)?;
    }
    Ok(())
}

fn cmd_generate(
    session: &mut TableFile,
    mut generator: Generator<RandomTokens>,
    rows: usize,
    columns: usize,
    output: &Path,
) -> kvgrid_core::Result<()> {
    generator.create_table(session.table_mut(), rows, columns)?;
    session.save(output)?;
    println!("Generated {} x {} table in {}", rows, columns, output.display());
    Ok(())
}

fn cmd_export(session: &TableFile, format: ExportFormat, output: &Path) -> kvgrid_core::Result<()> {
    let file = File::create(output)?;
    let writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => export_csv(session.table(), writer)?,
        ExportFormat::Json => export_json(session.table(), writer)?,
    }

    println!(
        "Exported {} rows to {}",
        session.table().row_count(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_open_session_without_file_loads_default() {
        let session = open_session(Config::default(), None);
        assert!(session.is_default());
        assert_eq!(session.current_file_name(), Some(Path::new("app_default.txt")));
    }

    #[test]
    fn test_open_session_default_alias() {
        let session = open_session(Config::default(), Some(Path::new("DEFAULT.TXT")));
        assert!(session.is_default());
    }

    #[test]
    fn test_open_session_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        fs::write(&path, "(a\u{1E}1)\n").unwrap();

        let session = open_session(Config::default(), Some(path.as_path()));
        assert!(!session.is_default());
        assert_eq!(session.current_file_name(), Some(path.as_path()));
    }

    #[test]
    fn test_open_session_falls_back_on_missing_file() {
        let session = open_session(Config::default(), Some(Path::new("/nonexistent/t.txt")));
        assert!(session.is_default());
    }

    #[test]
    fn test_generate_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let table_path = dir.path().join("gen.txt");
        let json_path = dir.path().join("gen.json");

        let mut session = TableFile::new();
        let generator = Generator::new(RandomTokens::new());
        cmd_generate(&mut session, generator, 2, 3, &table_path).unwrap();
        cmd_export(&session, ExportFormat::Json, &json_path).unwrap();

        let mut reloaded = TableFile::new();
        reloaded.load(&table_path).unwrap();
        assert_eq!(reloaded.table().row_count(), 2);
        assert_eq!(reloaded.table().column_count(), 3);

        assert!(fs::read_to_string(&json_path).unwrap().contains("\"rows\""));
    }
}
