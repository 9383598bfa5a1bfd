//! Backends built on the crate's own OOXML readers.

use super::Backend;
use crate::error::Result;
use crate::model::{FlowDocument, Workbook};
use std::path::Path;

#[cfg(not(all(feature = "xlsx", feature = "docx")))]
use crate::error::Error;

/// Native `.xlsx` reader (feature `xlsx`).
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxBackend;

impl Backend for XlsxBackend {
    type Output = Workbook;

    fn name(&self) -> &'static str {
        "ooxml-xlsx"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "xlsx")
    }

    #[cfg(feature = "xlsx")]
    fn open(&self, path: &Path) -> Result<Workbook> {
        crate::xlsx::XlsxReader::open(path)?.read()
    }

    #[cfg(not(feature = "xlsx"))]
    fn open(&self, _path: &Path) -> Result<Workbook> {
        Err(Error::BackendUnavailable(self.name()))
    }
}

/// Native `.docx` reader (feature `docx`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxBackend;

impl Backend for DocxBackend {
    type Output = FlowDocument;

    fn name(&self) -> &'static str {
        "ooxml-docx"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "docx")
    }

    #[cfg(feature = "docx")]
    fn open(&self, path: &Path) -> Result<FlowDocument> {
        crate::docx::DocxReader::open(path)?.read()
    }

    #[cfg(not(feature = "docx"))]
    fn open(&self, _path: &Path) -> Result<FlowDocument> {
        Err(Error::BackendUnavailable(self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "xlsx")]
    fn test_xlsx_backend_missing_file() {
        let err = XlsxBackend
            .open(Path::new("/nonexistent/dir/book.xlsx"))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    #[cfg(feature = "docx")]
    fn test_docx_backend_reads_file() {
        let data = crate::testutil::docx_with_body(r#"<w:p><w:r><w:t>hi</w:t></w:r></w:p>"#);
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        std::fs::write(file.path(), data).unwrap();

        let doc = DocxBackend.open(file.path()).unwrap();
        assert_eq!(doc.paragraphs, vec!["hi".to_string()]);
    }
}
