//! Interactive line-oriented menu

use kvgrid_core::{EditKind, Error, Generator, SortOrder, TableFile, TokenSource};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Menu actions, keyed by what the user types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Edit,
    AddRow,
    Print,
    Sort,
    Reset,
    Exit,
}

impl Action {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "search" => Some(Action::Search),
            "edit" => Some(Action::Edit),
            "add_row" => Some(Action::AddRow),
            "print" => Some(Action::Print),
            "sort" => Some(Action::Sort),
            "reset" => Some(Action::Reset),
            "x" => Some(Action::Exit),
            _ => None,
        }
    }
}

/// Runs the menu loop against one session
pub struct Menu<'a, T, R, W> {
    session: &'a mut TableFile,
    generator: Generator<T>,
    input: R,
    output: W,
}

impl<'a, T, R, W> Menu<'a, T, R, W>
where
    T: TokenSource,
    R: BufRead,
    W: Write,
{
    pub fn new(session: &'a mut TableFile, generator: Generator<T>, input: R, output: W) -> Self {
        Self {
            session,
            generator,
            input,
            output,
        }
    }

    /// Loop until the user exits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                break;
            };

            match Action::parse(&line) {
                Some(Action::Search) => self.search()?,
                Some(Action::Edit) => self.edit()?,
                Some(Action::AddRow) => self.add_row()?,
                Some(Action::Print) => self.print_table()?,
                Some(Action::Sort) => self.sort()?,
                Some(Action::Reset) => self.reset()?,
                Some(Action::Exit) => {
                    self.save_table()?;
                    writeln!(self.output, "Exiting application.")?;
                    break;
                }
                None => writeln!(self.output, "Invalid action.")?,
            }
        }
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "MENU:")?;
        writeln!(self.output, "[ search ] - Search")?;
        writeln!(self.output, "[ edit ] - Edit")?;
        writeln!(self.output, "[ add_row ] - Add Row")?;
        writeln!(self.output, "[ print ] - Print")?;
        writeln!(self.output, "[ sort ] - Sort")?;
        writeln!(self.output, "[ reset ] - Reset")?;
        writeln!(self.output, "[ x ] - Exit")?;
        write!(self.output, "Action: ")?;
        self.output.flush()
    }

    /// Next trimmed input line, or None at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    fn print_table(&mut self) -> io::Result<()> {
        for row in &self.session.table().rows {
            writeln!(self.output, "{}", row)?;
        }
        Ok(())
    }

    fn search(&mut self) -> io::Result<()> {
        let Some(term) = self.prompt("Search term: ")? else {
            return Ok(());
        };

        match self.session.table().search(&term) {
            Ok(hits) => {
                writeln!(self.output, "Output:")?;
                for hit in hits {
                    writeln!(self.output, "{}", hit)?;
                }
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    fn edit(&mut self) -> io::Result<()> {
        let Some(position) = self.prompt("Edit [row,column]: ")? else {
            return Ok(());
        };
        let Some((row, col)) = parse_position(&position) else {
            writeln!(self.output, "Invalid input format. Please use '[row,column]'")?;
            return Ok(());
        };

        let table = self.session.table();
        if table.row(row).map_or(true, |r| col >= r.len()) {
            writeln!(self.output, "Invalid row or column number.")?;
            return Ok(());
        }

        let Some(kind) = self.prompt("key, value or both? : ")? else {
            return Ok(());
        };
        let kind = match kind.to_lowercase().parse::<EditKind>() {
            Ok(kind) => kind,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(());
            }
        };

        let Some(edited) = self.prompt("Input new: ")? else {
            return Ok(());
        };

        match self.session.table_mut().edit_cell(row, col, kind, &edited) {
            Ok(result) => {
                debug!(row, col, "edited cell");
                writeln!(self.output, "{}", result)?;
                self.save_table()?;
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    fn add_row(&mut self) -> io::Result<()> {
        let Some(input) = self.prompt("No. of Cells: ")? else {
            return Ok(());
        };
        let Ok(num_cells) = input.parse::<usize>() else {
            writeln!(self.output, "Invalid number of cells.")?;
            return Ok(());
        };

        let row_count = self.session.table().row_count();
        let message = format!("Insert at row (0 to {}): ", row_count);
        let Some(input) = self.prompt(&message)? else {
            return Ok(());
        };
        let Ok(at) = input.parse::<i64>() else {
            writeln!(self.output, "Invalid row index.")?;
            return Ok(());
        };

        let result = match usize::try_from(at) {
            Ok(at) => self
                .session
                .table_mut()
                .add_row(num_cells, at, &mut self.generator),
            Err(_) => Err(Error::InvalidArgument(format!("invalid row index {}", at))),
        };

        match result {
            Ok(()) => {
                writeln!(self.output, "Row added at index {}.", at)?;
                self.save_table()?;
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    fn sort(&mut self) -> io::Result<()> {
        let Some(input) = self.prompt("Row to sort: ")? else {
            return Ok(());
        };
        let parts: Vec<&str> = input.split(" - ").collect();
        if parts.len() != 2 {
            writeln!(self.output, "Invalid input format. Please use 'row - <asc/desc>'.")?;
            return Ok(());
        }

        let Ok(row) = parts[0].trim().parse::<usize>() else {
            writeln!(self.output, "Invalid row number.")?;
            return Ok(());
        };
        let order_text = parts[1].trim().to_lowercase();
        let Ok(order) = order_text.parse::<SortOrder>() else {
            writeln!(self.output, "Invalid order. Please use 'asc' or 'desc'.")?;
            return Ok(());
        };

        match self.session.table_mut().sort_row(row, order) {
            Ok(()) => {
                writeln!(self.output, "Sorted row {} in {} order.", row, order_text)?;
                self.save_table()?;
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        let (rows, columns) = loop {
            let Some(input) = self.prompt("Input table dimension (rows x columns): ")? else {
                return Ok(());
            };
            match parse_dimensions(&input) {
                Some(dims) => break dims,
                None => writeln!(
                    self.output,
                    "Invalid input format. Please use 'rows x columns' with positive integers."
                )?,
            }
        };

        if let Err(e) = self
            .generator
            .create_table(self.session.table_mut(), rows, columns)
        {
            writeln!(self.output, "Error: {}", e)?;
            return Ok(());
        }

        self.print_table()?;
        writeln!(self.output, "Table reset.")?;
        self.save_table()
    }

    /// Save after a change, asking for a name when the table is still the default
    fn save_table(&mut self) -> io::Result<()> {
        if self.session.is_default() {
            if let Some(name) = self.prompt("Enter a file name to save the table: ")? {
                if !name.is_empty() {
                    let saved = self.session.save(&name).map(|()| name);
                    return self.write_report(saved);
                }
            }
        }

        let name = self
            .session
            .current_file_name()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let saved = self.session.save_current().map(|()| name);
        self.write_report(saved)
    }

    fn write_report(&mut self, saved: kvgrid_core::Result<String>) -> io::Result<()> {
        match saved {
            Ok(name) => writeln!(self.output, "Table saved to {}", name),
            Err(e) => writeln!(self.output, "Error saving table: {}", e),
        }
    }
}

/// Parse `[row,col]`
fn parse_position(s: &str) -> Option<(usize, usize)> {
    let inner = s.strip_prefix('[')?.strip_suffix(']')?;
    let (row, col) = inner.split_once(',')?;
    let is_digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(row) || !is_digits(col) {
        return None;
    }
    Some((row.parse().ok()?, col.parse().ok()?))
}

/// Parse `rows x columns`, both positive
fn parse_dimensions(s: &str) -> Option<(usize, usize)> {
    let (rows, columns) = s.split_once('x')?;
    let rows: usize = rows.trim().parse().ok()?;
    let columns: usize = columns.trim().parse().ok()?;
    (rows > 0 && columns > 0).then_some((rows, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvgrid_core::{Cell, Row, ScriptedTokens, Table};
    use std::fs;
    use std::path::Path;

    fn session_at(path: &Path) -> TableFile {
        let mut session = TableFile::new();
        *session.table_mut() = Table {
            rows: vec![Row::new(vec![Cell::new("b", "2"), Cell::new("a", "1")])],
        };
        session.save(path).unwrap();
        session
    }

    fn run(session: &mut TableFile, tokens: ScriptedTokens, input: &str) -> String {
        let mut output = Vec::new();
        Menu::new(session, Generator::new(tokens), input.as_bytes(), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("[1,2]"), Some((1, 2)));
        assert_eq!(parse_position("[10,0]"), Some((10, 0)));
        assert_eq!(parse_position("1,2"), None);
        assert_eq!(parse_position("[1, 2]"), None);
        assert_eq!(parse_position("[-1,2]"), None);
        assert_eq!(parse_position("[,2]"), None);
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("3 x 4"), Some((3, 4)));
        assert_eq!(parse_dimensions("3x4"), Some((3, 4)));
        assert_eq!(parse_dimensions("0 x 4"), None);
        assert_eq!(parse_dimensions("3 by 4"), None);
    }

    #[test]
    fn test_print_and_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        let mut session = session_at(&path);

        let out = run(&mut session, ScriptedTokens::default(), "print\nx\n");

        assert!(out.contains("b,2   a,1\n"));
        assert!(out.contains(&format!("Table saved to {}", path.display())));
        assert!(out.ends_with("Exiting application.\n"));
    }

    #[test]
    fn test_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(&dir.path().join("t.txt"));

        let out = run(&mut session, ScriptedTokens::default(), "search\na\nsearch\n\n");

        assert!(out.contains("Output:\n1 <a> at key of [0,1]\n"));
        assert!(out.contains("Error: invalid argument: search term must not be empty"));
    }

    #[test]
    fn test_edit_saves_to_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.txt");
        let mut session = session_at(&path);

        let out = run(&mut session, ScriptedTokens::default(), "edit\n[0,1]\nBOTH\nz,9\n");

        assert!(out.contains("a,1 -> z,9\n"));
        let mut reloaded = TableFile::new();
        reloaded.load(&path).unwrap();
        assert_eq!(reloaded.table().cell(0, 1), Some(&Cell::new("z", "9")));
    }

    #[test]
    fn test_edit_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(&dir.path().join("t.txt"));
        let input = "edit\n0,1\nedit\n[0,5]\nedit\n[0,0]\nkey\na\nedit\n[0,0]\nsize\n";

        let out = run(&mut session, ScriptedTokens::default(), input);

        assert!(out.contains("Invalid input format. Please use '[row,column]'"));
        assert!(out.contains("Invalid row or column number."));
        assert!(out.contains("Error: duplicate key found: a"));
        assert!(out.contains("Error: invalid argument: invalid edit type 'size'"));
        assert_eq!(session.table().cell(0, 0), Some(&Cell::new("b", "2")));
    }

    #[test]
    fn test_add_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(&dir.path().join("t.txt"));
        let tokens = ScriptedTokens::new(["new", "val"]);

        let out = run(&mut session, tokens, "add_row\n1\n1\nadd_row\n1\n-1\nadd_row\n1\n9\n");

        assert!(out.contains("Insert at row (0 to 1): "));
        assert!(out.contains("Row added at index 1."));
        assert!(out.contains("Error: invalid argument: invalid row index -1"));
        assert!(out.contains("Error: invalid row index 9"));
        assert_eq!(session.table().row_count(), 2);
        assert_eq!(session.table().rows[1].cells, vec![Cell::new("new", "val")]);
    }

    #[test]
    fn test_sort() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(&dir.path().join("t.txt"));

        let out = run(&mut session, ScriptedTokens::default(), "sort\n0 - ASC\nsort\n0 asc\nsort\n0 - up\n");

        assert!(out.contains("Sorted row 0 in asc order."));
        assert!(out.contains("Invalid input format. Please use 'row - <asc/desc>'."));
        assert!(out.contains("Invalid order. Please use 'asc' or 'desc'."));
        assert_eq!(
            session.table().rows[0].cells,
            vec![Cell::new("a", "1"), Cell::new("b", "2")]
        );
    }

    #[test]
    fn test_reset_retries_until_valid_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_at(&dir.path().join("t.txt"));
        let tokens = ScriptedTokens::new(["k1", "v1", "k2", "v2"]);

        let out = run(&mut session, tokens, "reset\nthree\n1 x 2\n");

        assert!(out.contains("Invalid input format. Please use 'rows x columns' with positive integers."));
        assert!(out.contains("k1,v1   k2,v2\nTable reset.\n"));
        assert_eq!(session.table().row_count(), 1);
    }

    #[test]
    fn test_default_table_prompts_for_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.txt");
        let mut session = TableFile::new();
        session.load_default().unwrap();

        let input = format!("x\n{}\n", path.display());
        let out = run(&mut session, ScriptedTokens::default(), &input);

        assert!(out.contains("Enter a file name to save the table: "));
        assert!(!session.is_default());
        assert_eq!(session.current_file_name(), Some(path.as_path()));
        assert!(fs::read_to_string(&path).unwrap().starts_with("(Invalid\u{1E}Invalid)\n"));
    }

    #[test]
    fn test_invalid_action_and_end_of_input() {
        let mut session = TableFile::new();
        let out = run(&mut session, ScriptedTokens::default(), "dance\n");

        assert!(out.contains("Invalid action."));
        assert!(!out.contains("Exiting application."));
    }
}
