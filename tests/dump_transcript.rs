//! End-to-end transcripts for workbooks and documents written to disk.
//!
//! Run with: cargo test --test dump_transcript

use docdump::{run, DocumentDumper, Outcome, RunSummary, Targets};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_package(path: &Path, parts: &[(&str, String)]) {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    std::fs::write(path, zip.finish().unwrap().into_inner()).unwrap();
}

/// Workbook with one sheet per (name, sheetData rows) pair.
fn write_workbook(path: &Path, sheets: &[(&str, &str)], shared: &[&str]) {
    let mut workbook = String::from(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut parts = Vec::new();

    for (i, (name, rows)) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            name, n, n
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
        parts.push((
            format!("xl/worksheets/sheet{}.xml", n),
            format!(
                r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                rows
            ),
        ));
    }
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    let strings: String = shared
        .iter()
        .map(|s| format!("<si><t>{}</t></si>", s))
        .collect();

    let mut all = vec![
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", rels),
        (
            "xl/sharedStrings.xml",
            format!(
                r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#,
                strings
            ),
        ),
    ];
    all.extend(parts.iter().map(|(n, c)| (n.as_str(), c.clone())));
    write_package(path, &all);
}

fn write_document(path: &Path, body: &str) {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        body
    );
    write_package(path, &[("word/document.xml", document)]);
}

fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl><w:tblPr/>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in *row {
            xml.push_str(&format!("<w:tc>{}</w:tc>", paragraph(cell)));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

fn run_to_string(targets: &Targets) -> (RunSummary, String) {
    let mut out = Vec::new();
    let summary = run(targets, &mut out).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

struct Fixture {
    _dir: tempfile::TempDir,
    xlsx: PathBuf,
    docx: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("요구사항정의서.xlsx");
    let docx = dir.path().join("수행계획서.docx");

    write_workbook(
        &xlsx,
        &[
            (
                "기능",
                r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" s="0"/></row>
<row r="3"><c r="A3" t="s"><v>2</v></c><c r="C3"><v>3</v></c></row>"#,
            ),
            ("Empty", ""),
            (
                "비기능",
                r#"<row r="4"><c r="B4" t="b"><v>1</v></c><c r="C4" t="str"><f>1/2</f><v>0.5</v></c></row>"#,
            ),
        ],
        &["ID", "이름", "REQ-001"],
    );

    write_document(
        &docx,
        &[
            paragraph("프로젝트 수행계획서"),
            paragraph("   "),
            "<w:p/>".to_string(),
            paragraph(" 1. 개요"),
            table(&[&["구분", "내용", "비고"], &["일정", "", "v1.0"]]),
            paragraph("끝"),
            table(&[&["single"]]),
        ]
        .concat(),
    );

    Fixture {
        _dir: dir,
        xlsx,
        docx,
    }
}

#[test]
fn test_full_transcript() {
    let fx = fixture();
    let targets = Targets::new(&fx.xlsx, &fx.docx);
    let (summary, out) = run_to_string(&targets);

    assert_eq!(
        summary,
        RunSummary {
            tabular: Outcome::Dumped,
            flow: Outcome::Dumped,
        }
    );

    let expected = format!(
        "=== Reading Excel file: {} ===\n\
         \n\
         \n--- Sheet: 기능 ---\n\
         (ID, 이름, )\n\
         (REQ-001, , 3)\n\
         \n--- Sheet: Empty ---\n\
         \n--- Sheet: 비기능 ---\n\
         (, TRUE, =1/2)\n\
         \n\n=== Reading Word document: {} ===\n\
         \n\
         프로젝트 수행계획서\n\
         \u{20}1. 개요\n\
         끝\n\
         \n--- Tables ---\n\
         \nTable 1:\n\
         구분 | 내용 | 비고\n\
         일정 |  | v1.0\n\
         \nTable 2:\n\
         single\n",
        fx.xlsx.display(),
        fx.docx.display()
    );
    assert_eq!(out, expected);
}

#[test]
fn test_no_blank_rows_printed() {
    let fx = fixture();
    let (_, out) = run_to_string(&Targets::new(&fx.xlsx, &fx.docx));

    for line in out.lines().filter(|l| l.starts_with('(')) {
        let inner = &line[1..line.len() - 1];
        assert!(inner.split(", ").any(|cell| !cell.is_empty()), "{}", line);
    }
}

#[test]
fn test_sheet_headers_in_source_order() {
    let fx = fixture();
    let (_, out) = run_to_string(&Targets::new(&fx.xlsx, &fx.docx));

    let headers: Vec<&str> = out
        .lines()
        .filter_map(|l| l.strip_prefix("--- Sheet: "))
        .collect();
    assert_eq!(headers, vec!["기능 ---", "Empty ---", "비기능 ---"]);
}

#[test]
fn test_table_rows_keep_cell_count() {
    let fx = fixture();
    let (_, out) = run_to_string(&Targets::new(&fx.xlsx, &fx.docx));

    let tables = out.split("--- Tables ---").nth(1).unwrap();
    let first = tables.split("Table 2:").next().unwrap();
    for row in first.lines().filter(|l| l.contains(" | ")) {
        assert_eq!(row.split(" | ").count(), 3, "{}", row);
    }
}

#[test]
fn test_missing_targets() {
    let dir = tempfile::tempdir().unwrap();
    let targets = Targets::default().with_base_dir(dir.path());
    let (summary, out) = run_to_string(&targets);

    assert_eq!(summary.tabular, Outcome::NotFound);
    assert_eq!(summary.flow, Outcome::NotFound);
    assert_eq!(out.lines().count(), 2);
    assert!(out.starts_with("Excel file not found: "));
    assert!(out.contains("\nWord file not found: "));
}

#[test]
fn test_broken_workbook_reports_each_backend() {
    let fx = fixture();
    std::fs::write(&fx.xlsx, b"not a zip archive").unwrap();

    let (summary, out) = run_to_string(&Targets::new(&fx.xlsx, &fx.docx));

    assert_eq!(summary.tabular, Outcome::NoBackend);
    assert_eq!(summary.flow, Outcome::Dumped);
    assert!(out.contains("Error with ooxml-xlsx: "));
    assert_eq!(
        out.matches("No suitable library found for reading Excel files")
            .count(),
        1
    );
    assert!(out.contains("프로젝트 수행계획서"));
}

#[test]
fn test_dumper_without_backends() {
    let fx = fixture();
    let mut dumper = DocumentDumper::with_backends(Vec::new(), Vec::new(), Vec::new());
    let summary = dumper.run(&Targets::new(&fx.xlsx, &fx.docx)).unwrap();

    assert_eq!(summary.tabular, Outcome::NoBackend);
    assert_eq!(summary.flow, Outcome::NoBackend);

    let out = String::from_utf8(dumper.into_inner()).unwrap();
    assert!(out.contains("=== Reading Excel file: "));
    assert!(out.contains("No suitable library found for reading Excel files\n"));
    assert!(out.ends_with("No suitable library found for reading Word documents\n"));
}
