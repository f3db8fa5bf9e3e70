//! Export tables to CSV and JSON

use crate::error::Result;
use crate::table::Table;
use std::io::Write;

/// Write one CSV record per row, two fields (key, value) per cell
pub fn export_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true) // Rows may have different cell counts
        .from_writer(writer);

    for row in &table.rows {
        let fields = row
            .cells
            .iter()
            .flat_map(|c| [c.key.as_str(), c.value.as_str()]);
        csv_writer.write_record(fields)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the table as pretty-printed JSON
pub fn export_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
