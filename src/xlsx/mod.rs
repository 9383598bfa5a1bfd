//! XLSX (Excel) workbook reader.
//!
//! Reads the cached cell values of every worksheet in an Office Open XML
//! (.xlsx) workbook.
//!
//! # Example
//!
//! ```no_run
//! use docdump::xlsx::XlsxReader;
//!
//! let workbook = XlsxReader::open("spreadsheet.xlsx")?.read()?;
//!
//! for sheet in &workbook.sheets {
//!     println!("Sheet: {} ({} rows)", sheet.name, sheet.rows.len());
//! }
//! # Ok::<(), docdump::Error>(())
//! ```

mod parser;
mod shared_strings;
mod styles;

pub use parser::XlsxReader;
