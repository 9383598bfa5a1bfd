//! XLSX workbook reader.

use crate::container::Package;
use crate::error::{Error, Result};
use crate::model::{CellValue, SerialDate, Sheet, SheetBuilder, Workbook};
use std::collections::HashMap;
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::styles::Styles;

const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Sheet entry from `xl/workbook.xml`.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Reader for XLSX (Excel) workbooks.
pub struct XlsxReader {
    package: Package,
    shared_strings: SharedStrings,
    styles: Styles,
    sheets: Vec<SheetInfo>,
    /// Relationship id -> sheet part name
    sheet_parts: HashMap<String, String>,
}

impl XlsxReader {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    fn from_package(mut package: Package) -> Result<Self> {
        let workbook_xml = package.read_xml(WORKBOOK_PART)?;
        let sheets = parse_workbook(&workbook_xml)?;
        let sheet_parts = package.part_targets(WORKBOOK_PART)?;

        let shared_strings = match package.read_optional_xml("xl/sharedStrings.xml")? {
            Some(xml) => SharedStrings::parse(&xml)?,
            None => SharedStrings::default(),
        };
        let styles = package
            .read_optional_xml("xl/styles.xml")?
            .map(|xml| Styles::parse(&xml))
            .unwrap_or_default();

        Ok(Self {
            package,
            shared_strings,
            styles,
            sheets,
            sheet_parts,
        })
    }

    /// Sheet names in declaration order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Read every sheet into a [`Workbook`].
    pub fn read(&mut self) -> Result<Workbook> {
        let mut workbook = Workbook::new();

        for info in self.sheets.clone() {
            let xml = match self.sheet_parts.get(&info.rel_id) {
                Some(part) => self.package.read_optional_xml(part)?,
                None => None,
            };
            let sheet = match xml {
                Some(xml) => self.parse_sheet(&info.name, &xml)?,
                None => SheetBuilder::new(info.name).build(),
            };
            workbook.sheets.push(sheet);
        }

        Ok(workbook)
    }

    /// Parse a worksheet part.
    fn parse_sheet(&self, name: &str, xml: &str) -> Result<Sheet> {
        let mut builder = SheetBuilder::new(name);
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut row: u32 = 0;
        let mut col: usize = 0;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_formula = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        row = row_number(&e).unwrap_or(row.saturating_add(1));
                        col = 0;
                        builder.touch_row(row);
                    }
                    b"c" => {
                        let pending = PendingCell::from_start(&e, col);
                        col = pending.col;
                        cell = Some(pending);
                    }
                    b"f" => {
                        if let Some(pending) = cell.as_mut() {
                            pending.formula = Some(String::new());
                        }
                        in_formula = true;
                    }
                    b"v" | b"t" if cell.is_some() && !in_formula => in_value = true,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        row = row_number(&e).unwrap_or(row.saturating_add(1));
                        col = 0;
                    }
                    b"c" => {
                        let pending = PendingCell::from_start(&e, col);
                        builder.set(row, pending.col, CellValue::Empty);
                        col = pending.col + 1;
                    }
                    _ => {}
                },
                Ok(quick_xml::events::Event::Text(e)) if in_value || in_formula => {
                    if let Some(pending) = cell.as_mut() {
                        let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                        match pending.formula.as_mut() {
                            Some(formula) if in_formula => formula.push_str(&text),
                            _ => pending.raw.push_str(&text),
                        }
                    }
                }
                Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            let value = self.resolve(&pending)?;
                            builder.set(row, pending.col, value);
                            col = pending.col + 1;
                        }
                    }
                    b"f" => in_formula = false,
                    b"v" | b"t" => in_value = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(format!("sheet '{}': {}", name, e))),
                _ => {}
            }
            buf.clear();
        }

        Ok(builder.build())
    }

    /// Turn the raw cell text into a typed value.
    ///
    /// A cell with formula text shows the formula. Shared-formula followers
    /// carry an empty `<f/>` and keep their cached value.
    fn resolve(&self, cell: &PendingCell) -> Result<CellValue> {
        if let Some(formula) = cell.formula.as_deref().filter(|f| !f.is_empty()) {
            return Ok(CellValue::Text(format!("={}", formula)));
        }

        let raw = cell.raw.as_str();
        let value = match cell.cell_type.as_deref() {
            Some("s") => {
                let index: usize = raw.trim().parse().map_err(|_| {
                    Error::InvalidData(format!("bad shared string index '{}'", raw))
                })?;
                let text = self.shared_strings.get(index).ok_or_else(|| {
                    Error::InvalidData(format!("shared string {} out of range", index))
                })?;
                CellValue::Text(text.to_string())
            }
            Some("inlineStr") | Some("str") => CellValue::Text(raw.to_string()),
            Some("b") => CellValue::Boolean(raw.trim() == "1"),
            // Error literals and ISO dates keep their stored text
            Some("e") | Some("d") => CellValue::Text(raw.to_string()),
            _ if raw.trim().is_empty() => CellValue::Empty,
            _ => {
                let number: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidData(format!("bad numeric cell '{}'", raw)))?;
                match cell.style {
                    Some(style) if self.styles.is_date_style(style) => {
                        CellValue::DateTime(SerialDate(number))
                    }
                    _ => CellValue::Number(number),
                }
            }
        };
        Ok(value)
    }
}

/// A `<c>` element whose value is still being collected.
#[derive(Debug)]
struct PendingCell {
    col: usize,
    cell_type: Option<String>,
    style: Option<usize>,
    raw: String,
    formula: Option<String>,
}

impl PendingCell {
    /// `next_col` is used when the cell carries no `r` reference.
    fn from_start(e: &quick_xml::events::BytesStart<'_>, next_col: usize) -> Self {
        let mut cell = Self {
            col: next_col,
            cell_type: None,
            style: None,
            raw: String::new(),
            formula: None,
        };

        for attr in e.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value);
            match attr.key.as_ref() {
                b"r" => {
                    if let Some(col) = column_index(&value) {
                        cell.col = col;
                    }
                }
                b"t" => cell.cell_type = Some(value.into_owned()),
                b"s" => cell.style = value.parse().ok(),
                _ => {}
            }
        }

        cell
    }
}

fn row_number(e: &quick_xml::events::BytesStart<'_>) -> Option<u32> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
}

/// 0-based column index of an A1-style reference: `A1` -> 0, `AB12` -> 27.
pub(crate) fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .collect();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let number = letters.iter().fold(0usize, |acc, &b| {
        acc * 26 + usize::from(b.to_ascii_uppercase() - b'A' + 1)
    });
    Some(number - 1)
}

/// Sheet entries from `xl/workbook.xml`, in declaration order.
fn parse_workbook(xml: &str) -> Result<Vec<SheetInfo>> {
    let mut sheets = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                if e.local_name().as_ref() == b"sheet" =>
            {
                let mut name = String::new();
                let mut rel_id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => {
                            name = attr
                                .unescape_value()
                                .map(|v| v.into_owned())
                                .unwrap_or_else(|_| {
                                    String::from_utf8_lossy(&attr.value).into_owned()
                                });
                        }
                        // r:id, whatever the relationships prefix is
                        key if key.ends_with(b":id") => {
                            rel_id = String::from_utf8_lossy(&attr.value).into_owned();
                        }
                        _ => {}
                    }
                }

                if !name.is_empty() {
                    sheets.push(SheetInfo { name, rel_id });
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}
