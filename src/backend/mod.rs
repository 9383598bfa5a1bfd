//! Parsing backends and the ordered registries the dumper walks.
//!
//! A backend is available when its cargo feature was compiled in. The
//! dumper uses the first available backend that opens the file and falls
//! back to the next one on failure.
//!
//! # Example
//!
//! ```no_run
//! use docdump::backend::{tabular_backends, Backend};
//! use std::path::Path;
//!
//! for backend in tabular_backends() {
//!     if backend.is_available() {
//!         let workbook = backend.open(Path::new("data.xlsx"))?;
//!         println!("{}: {} sheets", backend.name(), workbook.sheets.len());
//!         break;
//!     }
//! }
//! # Ok::<(), docdump::Error>(())
//! ```

mod calamine;
mod ooxml;

pub use self::calamine::CalamineBackend;
pub use ooxml::{DocxBackend, XlsxBackend};

use crate::error::Result;
use crate::model::{FlowDocument, Workbook};
use std::path::Path;

/// A reader for one document format.
pub trait Backend {
    /// Document model this backend produces.
    type Output;

    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Whether the backend can be used in this build.
    fn is_available(&self) -> bool;

    /// Open and fully read the document at `path`.
    fn open(&self, path: &Path) -> Result<Self::Output>;
}

/// A backend producing a [`Workbook`].
pub type TabularBackend = Box<dyn Backend<Output = Workbook>>;

/// A backend producing a [`FlowDocument`].
pub type FlowBackend = Box<dyn Backend<Output = FlowDocument>>;

/// Spreadsheet backends in preference order.
pub fn tabular_backends() -> Vec<TabularBackend> {
    vec![Box::new(XlsxBackend), Box::new(CalamineBackend)]
}

/// Word-processing backends in preference order.
pub fn flow_backends() -> Vec<FlowBackend> {
    vec![Box::new(DocxBackend)]
}
