//! In-memory OOXML packages for unit tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Zip the given (part name, content) pairs.
pub fn zip_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Builder for a minimal workbook.
#[derive(Default)]
pub struct XlsxFixture {
    sheets: Vec<(String, String)>,
    shared_strings: Option<Vec<String>>,
    date_style: bool,
}

impl XlsxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet whose `<sheetData>` holds `rows_xml`.
    pub fn sheet(mut self, name: &str, rows_xml: &str) -> Self {
        self.sheets.push((name.to_string(), rows_xml.to_string()));
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = Some(strings.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Make style index 1 a date format (built-in numFmtId 14).
    pub fn date_style(mut self) -> Self {
        self.date_style = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut parts: Vec<(String, String)> = Vec::new();

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for (i, (name, rows)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            workbook.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_attr(name),
                n,
                n
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            ));
            parts.push((
                format!("xl/worksheets/sheet{}.xml", n),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    rows
                ),
            ));
        }
        workbook.push_str("</sheets></workbook>");
        rels.push_str("</Relationships>");
        parts.push(("xl/workbook.xml".to_string(), workbook));
        parts.push(("xl/_rels/workbook.xml.rels".to_string(), rels));

        if let Some(strings) = &self.shared_strings {
            let items: String = strings
                .iter()
                .map(|s| format!("<si><t>{}</t></si>", escape_attr(s)))
                .collect();
            parts.push((
                "xl/sharedStrings.xml".to_string(),
                format!(
                    r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
                    items
                ),
            ));
        }

        if self.date_style {
            parts.push((
                "xl/styles.xml".to_string(),
                r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#
                    .to_string(),
            ));
        }

        let borrowed: Vec<(&str, &str)> = parts
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_str()))
            .collect();
        zip_parts(&borrowed)
    }
}

/// Wrap body XML in a minimal `word/document.xml` package.
pub fn docx_with_body(body_xml: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><w:body>{}</w:body></w:document>"#,
        body_xml
    );
    zip_parts(&[("word/document.xml", &document)])
}
