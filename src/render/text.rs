//! Plain-text transcript rendering.

use crate::model::{FlowDocument, Row, Workbook};
use std::io::{self, Write};

/// Separator between cell texts of a table row.
pub const CELL_SEPARATOR: &str = " | ";

/// Render a row as `(a, b, c)`, every cell in its display form.
pub fn format_row(row: &Row) -> String {
    let cells: Vec<String> = row.cells.iter().map(ToString::to_string).collect();
    format!("({})", cells.join(", "))
}

/// Write every sheet header and every row that holds a value.
pub fn write_workbook<W: Write>(out: &mut W, workbook: &Workbook) -> io::Result<()> {
    for sheet in &workbook.sheets {
        writeln!(out, "\n--- Sheet: {} ---", sheet.name)?;
        for row in sheet.data_rows() {
            writeln!(out, "{}", format_row(row))?;
        }
    }
    Ok(())
}

/// Write the non-blank paragraphs, then a numbered listing of the tables.
pub fn write_flow_document<W: Write>(out: &mut W, doc: &FlowDocument) -> io::Result<()> {
    for paragraph in doc.text_paragraphs() {
        writeln!(out, "{}", paragraph)?;
    }

    if doc.tables.is_empty() {
        return Ok(());
    }

    writeln!(out, "\n--- Tables ---")?;
    for (i, table) in doc.tables.iter().enumerate() {
        writeln!(out, "\nTable {}:", i + 1)?;
        for row in &table.rows {
            writeln!(out, "{}", row.join(CELL_SEPARATOR))?;
        }
    }
    Ok(())
}
