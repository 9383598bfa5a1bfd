//! Tabular document model.

use super::CellValue;
use std::collections::BTreeMap;

/// A spreadsheet: named sheets in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet names in declaration order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Get a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// One worksheet. Every row has the same number of cells, starting at column A.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Rows holding at least one value, in source order.
    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.is_blank())
    }

    /// Number of columns, counting from column A.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.cells.len())
    }
}

/// A worksheet row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// 1-based row number in the source sheet
    pub index: u32,
    pub cells: Vec<CellValue>,
}

impl Row {
    /// True when every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

/// Collects positioned cells and lays them out as a rectangular [`Sheet`].
#[derive(Debug, Default)]
pub struct SheetBuilder {
    name: String,
    rows: BTreeMap<u32, Vec<CellValue>>,
    width: usize,
}

impl SheetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record a row without values so it still counts toward the layout.
    pub fn touch_row(&mut self, row: u32) {
        self.rows.entry(row).or_default();
    }

    /// Place a value at a 1-based row and 0-based column.
    ///
    /// Empty values still widen the sheet, matching how styled blank
    /// cells extend a worksheet's used range.
    pub fn set(&mut self, row: u32, col: usize, value: CellValue) {
        self.width = self.width.max(col + 1);
        let cells = self.rows.entry(row).or_default();
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    pub fn build(self) -> Sheet {
        let width = self.width;
        let rows = self
            .rows
            .into_iter()
            .map(|(index, mut cells)| {
                cells.resize(width, CellValue::Empty);
                Row { index, cells }
            })
            .collect();

        Sheet {
            name: self.name,
            rows,
        }
    }
}
