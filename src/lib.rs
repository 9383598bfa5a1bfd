//! # docdump
//!
//! Plain-text dumps of Office spreadsheets and Word documents.
//!
//! A run reads one `.xlsx` workbook and one `.docx` document and prints
//! their contents: every sheet with its non-empty rows, then the document's
//! paragraphs and tables. Each document kind has an ordered list of parsing
//! backends; the first one compiled into the build that reads the file wins.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docdump::{run, Targets};
//!
//! let targets = Targets::default().with_base_dir("/srv/docs");
//! let summary = run(&targets, std::io::stdout())?;
//! println!("{:?}", summary);
//! # Ok::<(), docdump::Error>(())
//! ```
//!
//! ## Format-Specific APIs
//!
//! ```no_run
//! use docdump::docx::DocxReader;
//! use docdump::xlsx::XlsxReader;
//!
//! let workbook = XlsxReader::open("data.xlsx")?.read()?;
//! let doc = DocxReader::open("report.docx")?.read()?;
//! println!("{} sheets, {} tables", workbook.sheets.len(), doc.tables.len());
//! # Ok::<(), docdump::Error>(())
//! ```
//!
//! ## Features
//!
//! - `xlsx` (default): native spreadsheet backend
//! - `docx` (default): native Word document backend
//! - `calamine` (default): fallback spreadsheet backend using calamine

pub mod backend;
pub mod config;
pub mod container;
pub mod dump;
pub mod error;
pub mod model;
pub mod render;

#[cfg(feature = "docx")]
pub mod docx;

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(test)]
mod testutil;

// Re-exports
pub use backend::{flow_backends, tabular_backends, Backend, FlowBackend, TabularBackend};
pub use config::{locate, Targets};
pub use container::Package;
pub use dump::{run, DocumentDumper, Outcome, RunSummary};
pub use error::{Error, Result};
pub use model::{CellValue, FlowDocument, Row, SerialDate, Sheet, Table, Workbook};

use std::path::Path;

/// Read a spreadsheet with the default backends and render it as text.
///
/// Returns the transcript, including any backend error lines.
///
/// # Example
///
/// ```no_run
/// let text = docdump::dump_tabular_to_string("data.xlsx")?;
/// print!("{}", text);
/// # Ok::<(), docdump::Error>(())
/// ```
pub fn dump_tabular_to_string(path: impl AsRef<Path>) -> Result<String> {
    let mut dumper = DocumentDumper::new(Vec::new());
    dumper.dump_tabular(path.as_ref())?;
    transcript(dumper)
}

/// Read a Word document with the default backends and render it as text.
pub fn dump_flow_to_string(path: impl AsRef<Path>) -> Result<String> {
    let mut dumper = DocumentDumper::new(Vec::new());
    dumper.dump_flow_text(path.as_ref())?;
    transcript(dumper)
}

fn transcript(dumper: DocumentDumper<Vec<u8>>) -> Result<String> {
    String::from_utf8(dumper.into_inner())
        .map_err(|e| Error::InvalidData(format!("transcript is not UTF-8: {}", e)))
}
