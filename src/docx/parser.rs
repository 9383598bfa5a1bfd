//! DOCX reader implementation.

use crate::container::Package;
use crate::error::{Error, Result};
use crate::model::{FlowDocument, Table};
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Widest grid Word lays out; larger `w:gridSpan` values are clamped.
const MAX_GRID_COLUMNS: usize = 63;

/// Elements whose text is not part of the surrounding paragraph
/// (text boxes, shapes, embedded objects).
const OPAQUE_ELEMENTS: &[&[u8]] = &[
    b"w:drawing",
    b"w:pict",
    b"w:object",
    b"mc:AlternateContent",
];

/// Reader for DOCX (Word) documents.
pub struct DocxReader {
    package: Package,
}

impl DocxReader {
    /// Open a DOCX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            package: Package::open(path)?,
        })
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            package: Package::from_bytes(data)?,
        })
    }

    /// Read body paragraphs and body tables.
    pub fn read(&mut self) -> Result<FlowDocument> {
        let xml = self.package.read_xml(DOCUMENT_PART)?;
        parse_document(&xml)
    }
}

/// Where a finished paragraph goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphOwner {
    Body,
    Cell,
}

#[derive(Debug)]
struct OpenParagraph {
    depth: usize,
    owner: ParagraphOwner,
    text: String,
    /// Depth of the run whose text is being collected
    run: Option<usize>,
}

impl OpenParagraph {
    fn new(depth: usize, owner: ParagraphOwner) -> Self {
        Self {
            depth,
            owner,
            text: String::new(),
            run: None,
        }
    }

    /// Runs count when they are direct children of the paragraph or of a
    /// hyperlink that is. Runs in `w:ins`, `w:smartTag`, `w:fldSimple` and
    /// inline content controls do not.
    fn accepts_run(&self, depth: usize, parent: Option<&[u8]>) -> bool {
        depth == self.depth + 1
            || (depth == self.depth + 2 && parent == Some(b"w:hyperlink".as_slice()))
    }
}

/// A body-level table being collected. Nested tables are not tracked.
#[derive(Debug, Default)]
struct OpenTable {
    depth: usize,
    rows: Vec<Vec<String>>,
    row: Option<Vec<String>>,
    /// Paragraph texts of the current cell
    cell: Option<Vec<String>>,
    /// Grid columns the current cell covers (`w:gridSpan`)
    span: usize,
    /// The current cell continues a vertical merge (`w:vMerge`)
    continues: bool,
}

impl OpenTable {
    fn is_row(&self, depth: usize) -> bool {
        depth == self.depth + 1
    }

    fn is_cell(&self, depth: usize) -> bool {
        self.row.is_some() && depth == self.depth + 2
    }

    fn is_cell_paragraph(&self, depth: usize) -> bool {
        self.cell.is_some() && depth == self.depth + 3
    }

    fn is_cell_property(&self, depth: usize, parent: Option<&[u8]>) -> bool {
        self.cell.is_some() && depth == self.depth + 4 && parent == Some(b"w:tcPr".as_slice())
    }

    fn start_cell(&mut self) {
        self.cell = Some(Vec::new());
        self.span = 1;
        self.continues = false;
    }

    fn set_cell_property(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        let val = e
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == b"w:val")
            .map(|a| String::from_utf8_lossy(&a.value).into_owned());

        match e.name().as_ref() {
            b"w:gridSpan" => {
                self.span = val
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(1)
                    .clamp(1, MAX_GRID_COLUMNS);
            }
            b"w:vMerge" => {
                self.continues = val.as_deref() != Some("restart");
            }
            _ => {}
        }
    }

    /// Lay the cell out on the table grid: a spanned cell repeats across its
    /// columns and a merge continuation repeats the text above it.
    fn finish_cell(&mut self, paragraphs: Vec<String>) {
        let span = std::mem::replace(&mut self.span, 1).max(1);
        let continues = std::mem::take(&mut self.continues);
        self.cell = None;

        let Some(row) = self.row.as_mut() else {
            return;
        };
        if continues {
            let start = row.len();
            for col in start..start + span {
                let text = self
                    .rows
                    .last()
                    .and_then(|above| above.get(col))
                    .cloned()
                    .unwrap_or_default();
                row.push(text);
            }
        } else {
            let text = paragraphs.join("\n");
            row.extend(std::iter::repeat(text).take(span));
        }
    }
}

/// Parse `word/document.xml`.
///
/// Paragraphs and tables are the direct children of `w:body`. A cell's
/// text is its direct paragraphs joined with newlines.
fn parse_document(xml: &str) -> Result<FlowDocument> {
    let mut doc = FlowDocument::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraph: Option<OpenParagraph> = None;
    let mut table: Option<OpenTable> = None;
    let mut opaque_depth: Option<usize> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                let depth = stack.len();
                let parent = stack.last().map(Vec::as_slice);

                match name.as_slice() {
                    b"w:p" if parent == Some(b"w:body".as_slice()) => {
                        paragraph = Some(OpenParagraph::new(depth, ParagraphOwner::Body));
                    }
                    b"w:p" if table.as_ref().is_some_and(|t| t.is_cell_paragraph(depth)) => {
                        paragraph = Some(OpenParagraph::new(depth, ParagraphOwner::Cell));
                    }
                    b"w:r" => {
                        if let Some(p) = paragraph
                            .as_mut()
                            .filter(|p| p.run.is_none() && p.accepts_run(depth, parent))
                        {
                            p.run = Some(depth);
                        }
                    }
                    b"w:tbl" if parent == Some(b"w:body".as_slice()) => {
                        table = Some(OpenTable {
                            depth,
                            ..Default::default()
                        });
                    }
                    b"w:tr" => {
                        if let Some(t) = table.as_mut().filter(|t| t.is_row(depth)) {
                            t.row = Some(Vec::new());
                        }
                    }
                    b"w:tc" => {
                        if let Some(t) = table.as_mut().filter(|t| t.is_cell(depth)) {
                            t.start_cell();
                        }
                    }
                    n if paragraph.is_some()
                        && opaque_depth.is_none()
                        && OPAQUE_ELEMENTS.contains(&n) =>
                    {
                        opaque_depth = Some(depth);
                    }
                    _ => {}
                }

                stack.push(name);
            }
            Ok(quick_xml::events::Event::Empty(e)) => {
                let depth = stack.len();
                let parent = stack.last().map(Vec::as_slice);

                match e.name().as_ref() {
                    b"w:p" if parent == Some(b"w:body".as_slice()) => {
                        doc.paragraphs.push(String::new());
                    }
                    b"w:p" => {
                        if let Some(t) = table.as_mut().filter(|t| t.is_cell_paragraph(depth)) {
                            if let Some(cell) = t.cell.as_mut() {
                                cell.push(String::new());
                            }
                        }
                    }
                    b"w:tbl" if parent == Some(b"w:body".as_slice()) => {
                        doc.tables.push(Table::new());
                    }
                    b"w:tc" => {
                        if let Some(t) = table.as_mut().filter(|t| t.is_cell(depth)) {
                            t.start_cell();
                            t.finish_cell(Vec::new());
                        }
                    }
                    b"w:gridSpan" | b"w:vMerge" => {
                        if let Some(t) = table
                            .as_mut()
                            .filter(|t| t.is_cell_property(depth, parent))
                        {
                            t.set_cell_property(&e);
                        }
                    }
                    b"w:tr" => {
                        if let Some(t) = table.as_mut().filter(|t| t.is_row(depth)) {
                            t.rows.push(Vec::new());
                        }
                    }
                    name if parent == Some(b"w:r".as_slice()) && opaque_depth.is_none() => {
                        if let Some(p) = paragraph.as_mut().filter(|p| p.run == Some(depth - 1)) {
                            match name {
                                b"w:tab" => p.text.push('\t'),
                                b"w:br" | b"w:cr" => p.text.push('\n'),
                                b"w:noBreakHyphen" => p.text.push('-'),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Text(e)) => {
                let in_text = stack.last().map(Vec::as_slice) == Some(b"w:t".as_slice());
                if in_text && opaque_depth.is_none() {
                    let run_depth = stack.len().checked_sub(2);
                    if let Some(p) = paragraph
                        .as_mut()
                        .filter(|p| p.run.is_some() && p.run == run_depth)
                    {
                        let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                        p.text.push_str(&text);
                    }
                }
            }
            Ok(quick_xml::events::Event::End(_)) => {
                let name = stack.pop().unwrap_or_default();
                let depth = stack.len();

                if opaque_depth == Some(depth) {
                    opaque_depth = None;
                }

                if let Some(p) = paragraph.as_mut().filter(|p| p.run == Some(depth)) {
                    p.run = None;
                }

                if paragraph.as_ref().is_some_and(|p| p.depth == depth) {
                    if let Some(p) = paragraph.take() {
                        match p.owner {
                            ParagraphOwner::Body => doc.paragraphs.push(p.text),
                            ParagraphOwner::Cell => {
                                if let Some(cell) = table.as_mut().and_then(|t| t.cell.as_mut()) {
                                    cell.push(p.text);
                                }
                            }
                        }
                    }
                    buf.clear();
                    continue;
                }

                if let Some(t) = table.as_mut() {
                    match name.as_slice() {
                        b"w:tc" if t.is_cell(depth) => {
                            let paragraphs = t.cell.take().unwrap_or_default();
                            t.finish_cell(paragraphs);
                        }
                        b"w:tr" if t.is_row(depth) => {
                            if let Some(row) = t.row.take() {
                                t.rows.push(row);
                            }
                        }
                        b"w:tbl" if t.depth == depth => {
                            let rows = std::mem::take(&mut t.rows);
                            doc.tables.push(Table { rows });
                            table = None;
                        }
                        _ => {}
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(doc)
}
