//! Transcript rendering for the document models.

mod text;

pub use text::{format_row, write_flow_document, write_workbook, CELL_SEPARATOR};
