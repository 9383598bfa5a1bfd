//! ZIP package access shared by the native OOXML backends.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Component, Path};

/// Magic bytes of an OLE compound file (legacy .xls/.doc, or an encrypted OOXML file).
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// An OOXML package opened from disk or memory.
///
/// Parts are addressed by their ZIP entry name without a leading slash,
/// e.g. `xl/workbook.xml` or `word/document.xml`.
pub struct Package {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl Package {
    /// Open a package from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a package from an in-memory buffer.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.starts_with(&OLE_MAGIC) {
            return Err(Error::UnsupportedFormat(
                "OLE compound file (legacy or password-protected Office document)".to_string(),
            ));
        }
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self { archive })
    }

    /// Check if a part exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a part and decode it as XML text.
    pub fn read_xml(&mut self, name: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| Error::MissingComponent(name.to_string()))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes)
    }

    /// Read an optional part; a missing part yields `None`.
    pub fn read_optional_xml(&mut self, name: &str) -> Result<Option<String>> {
        if !self.has_part(name) {
            return Ok(None);
        }
        self.read_xml(name).map(Some)
    }

    /// Relationship targets of `part`, keyed by relationship id and resolved
    /// to package part names. External targets are left out.
    pub fn part_targets(&mut self, part: &str) -> Result<HashMap<String, String>> {
        let Some(xml) = self.read_optional_xml(&rels_part_for(part))? else {
            return Ok(HashMap::new());
        };

        let mut targets = HashMap::new();
        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).into_owned(),
                            b"Target" => {
                                target = String::from_utf8_lossy(&attr.value).into_owned()
                            }
                            b"TargetMode" => {
                                external = attr.value.eq_ignore_ascii_case(b"external")
                            }
                            _ => {}
                        }
                    }

                    if !id.is_empty() && !target.is_empty() && !external {
                        targets.insert(id, resolve_target(part, &target));
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(targets)
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("parts", &self.archive.len())
            .finish()
    }
}

/// `xl/workbook.xml` -> `xl/_rels/workbook.xml.rels`
fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that declares it.
pub fn resolve_target(base_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut result = Path::new(base_part)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    for component in Path::new(target).components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(c) => result.push(c),
            _ => {}
        }
    }

    path_to_part_name(&result)
}

fn path_to_part_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Decode XML bytes, honoring a UTF-8 or UTF-16 byte order mark.
///
/// Documents without a BOM are read as UTF-8, falling back to UTF-16 when
/// the byte pattern looks like it, and finally to lossy UTF-8.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::InvalidData(e.to_string()));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| relabel_utf16_declaration(&s));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| relabel_utf16_declaration(&s));
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            decode_utf16(bytes, u16::from_le_bytes).map(|s| relabel_utf16_declaration(&s))
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            decode_utf16(bytes, u16::from_be_bytes).map(|s| relabel_utf16_declaration(&s))
        }
        Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(e.to_string()))
}

/// The text is UTF-8 once decoded; a stale `encoding="UTF-16"` in the XML
/// declaration would make quick-xml misread it.
fn relabel_utf16_declaration(content: &str) -> String {
    let Some(end) = content
        .starts_with("<?xml")
        .then(|| content.find("?>"))
        .flatten()
    else {
        return content.to_string();
    };

    let (decl, rest) = content.split_at(end + 2);
    let decl = decl
        .replace("\"UTF-16\"", "\"UTF-8\"")
        .replace("'UTF-16'", "'UTF-8'")
        .replace("\"utf-16\"", "\"UTF-8\"")
        .replace("'utf-16'", "'UTF-8'");
    format!("{}{}", decl, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::zip_parts;

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_target("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
        assert_eq!(
            resolve_target("xl/worksheets/sheet1.xml", "../drawings/drawing1.xml"),
            "xl/drawings/drawing1.xml"
        );
    }

    #[test]
    fn test_rels_part_for() {
        assert_eq!(rels_part_for("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(rels_part_for("workbook.xml"), "_rels/workbook.xml.rels");
    }

    #[test]
    fn test_part_targets_skip_external() {
        let data = zip_parts(&[(
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#,
        )]);

        let mut package = Package::from_bytes(data).unwrap();
        let targets = package.part_targets("xl/workbook.xml").unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets["rId1"], "xl/worksheets/sheet1.xml");
    }

    #[test]
    fn test_missing_part() {
        let mut package = Package::from_bytes(zip_parts(&[("a.xml", "<a/>")])).unwrap();
        assert!(package.has_part("a.xml"));
        assert!(package.read_optional_xml("b.xml").unwrap().is_none());
        assert!(matches!(
            package.read_xml("b.xml"),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_rejects_ole_and_garbage() {
        let mut ole = OLE_MAGIC.to_vec();
        ole.extend_from_slice(&[0; 504]);
        assert!(matches!(
            Package::from_bytes(ole),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Package::from_bytes(b"not a zip".to_vec()),
            Err(Error::ZipArchive(_))
        ));
    }

    #[test]
    fn test_decode_utf8_bom() {
        let bytes = [&[0xEF, 0xBB, 0xBF][..], "<a>한글</a>".as_bytes()].concat();
        assert_eq!(decode_xml_bytes(&bytes).unwrap(), "<a>한글</a>");
    }

    #[test]
    fn test_decode_utf16_le_with_declaration() {
        let text = r#"<?xml version="1.0" encoding="UTF-16"?><a>x</a>"#;
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert!(decoded.contains("encoding=\"UTF-8\""));
        assert!(decoded.ends_with("<a>x</a>"));
    }

    #[test]
    fn test_decode_utf16_be_without_bom() {
        let mut bytes = Vec::new();
        for unit in "<a>x</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_xml_bytes(&bytes).unwrap(), "<a>x</a>");
    }
}
