//! Spreadsheet backend using the calamine crate (feature `calamine`).

use super::Backend;
use crate::error::Result;
use crate::model::Workbook;
use std::path::Path;

/// Reads any workbook format calamine supports, picked by file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineBackend;

impl Backend for CalamineBackend {
    type Output = Workbook;

    fn name(&self) -> &'static str {
        "calamine"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "calamine")
    }

    #[cfg(feature = "calamine")]
    fn open(&self, path: &Path) -> Result<Workbook> {
        read_workbook(path)
    }

    #[cfg(not(feature = "calamine"))]
    fn open(&self, _path: &Path) -> Result<Workbook> {
        Err(crate::error::Error::BackendUnavailable(self.name()))
    }
}

#[cfg(feature = "calamine")]
fn read_workbook(path: &Path) -> Result<Workbook> {
    use crate::model::SheetBuilder;
    use ::calamine::{open_workbook_auto, Reader};

    let mut sheets = open_workbook_auto(path)?;
    let mut workbook = Workbook::new();

    for name in sheets.sheet_names() {
        let range = sheets.worksheet_range(&name)?;
        let mut builder = SheetBuilder::new(name);

        // Ranges start at the first used cell; keep A1-based positions
        if let Some((first_row, first_col)) = range.start() {
            for (offset, cells) in range.rows().enumerate() {
                let row = first_row + offset as u32 + 1;
                builder.touch_row(row);
                for (i, cell) in cells.iter().enumerate() {
                    builder.set(row, first_col as usize + i, cell_value(cell));
                }
            }
        }

        workbook.sheets.push(builder.build());
    }

    Ok(workbook)
}

#[cfg(feature = "calamine")]
fn cell_value(cell: &::calamine::Data) -> crate::model::CellValue {
    use crate::model::{CellValue, SerialDate};
    use ::calamine::Data;

    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => CellValue::DateTime(SerialDate(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
