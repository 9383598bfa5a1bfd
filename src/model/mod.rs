//! In-memory document models produced by the backends.

mod cell;
mod flow;
mod workbook;

pub use cell::{CellValue, SerialDate};
pub use flow::{FlowDocument, Table};
pub use workbook::{Row, Sheet, SheetBuilder, Workbook};
