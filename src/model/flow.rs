//! Flow (word-processing) document model.

/// A word-processing document: body paragraphs and body tables, each in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowDocument {
    pub paragraphs: Vec<String>,
    pub tables: Vec<Table>,
}

impl FlowDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraphs whose trimmed text is non-empty, untrimmed.
    pub fn text_paragraphs(&self) -> impl Iterator<Item = &str> {
        self.paragraphs
            .iter()
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }
}

/// A table as rows of cell texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }
}
