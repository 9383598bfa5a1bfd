//! DOCX (Word) document reader.
//!
//! Extracts body paragraphs and body tables from an Office Open XML
//! (.docx) document.

mod parser;

pub use parser::DocxReader;
