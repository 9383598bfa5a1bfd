//! XLSX number formats, used to tell dates apart from plain numbers.

use std::collections::HashMap;

/// Number-format information parsed from `xl/styles.xml`.
#[derive(Debug, Default)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    /// Cell formats (`cellXfs/xf`): style index -> numFmtId
    cell_xfs: Vec<u32>,
}

impl Styles {
    /// Parse styles from `xl/styles.xml` content.
    ///
    /// Stops at the first XML error, keeping the formats read so far.
    pub fn parse(xml: &str) -> Self {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_num_fmts = false;
        let mut in_cell_xfs = false;

        loop {
            buf.clear();
            let (e, is_start) = match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(e)) => (e, true),
                Ok(quick_xml::events::Event::Empty(e)) => (e, false),
                Ok(quick_xml::events::Event::End(e)) => {
                    match e.local_name().as_ref() {
                        b"numFmts" => in_num_fmts = false,
                        b"cellXfs" => in_cell_xfs = false,
                        _ => {}
                    }
                    continue;
                }
                Ok(quick_xml::events::Event::Eof) | Err(_) => break,
                Ok(_) => continue,
            };

            match e.local_name().as_ref() {
                b"numFmts" if is_start => in_num_fmts = true,
                b"cellXfs" if is_start => in_cell_xfs = true,
                b"numFmt" if in_num_fmts => {
                    let mut id = None;
                    let mut code = String::new();
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"numFmtId" => id = String::from_utf8_lossy(&attr.value).parse().ok(),
                            b"formatCode" => {
                                code = attr
                                    .unescape_value()
                                    .map(|v| v.into_owned())
                                    .unwrap_or_default()
                            }
                            _ => {}
                        }
                    }
                    if let Some(id) = id {
                        styles.num_fmts.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => {
                    let num_fmt_id = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"numFmtId")
                        .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
                        .unwrap_or(0);
                    styles.cell_xfs.push(num_fmt_id);
                }
                _ => {}
            }
        }

        styles
    }

    /// Whether the cell style at `style_index` formats numbers as dates or times.
    pub fn is_date_style(&self, style_index: usize) -> bool {
        self.cell_xfs
            .get(style_index)
            .is_some_and(|&id| self.is_date_format(id))
    }

    /// Check if a numFmtId represents a date or time format.
    pub fn is_date_format(&self, num_fmt_id: u32) -> bool {
        // Built-in: 14-22 dates, 45-47 times
        if (14..=22).contains(&num_fmt_id) || (45..=47).contains(&num_fmt_id) {
            return true;
        }
        self.num_fmts
            .get(&num_fmt_id)
            .is_some_and(|code| is_date_format_code(code))
    }
}

/// A format code is a date/time format when it uses d, m, y, h or s
/// outside of quoted literals, `[...]` sections and escaped characters.
fn is_date_format_code(format_code: &str) -> bool {
    // Only the positive-number section decides
    let section = format_code.split(';').next().unwrap_or_default();

    let mut in_bracket = false;
    let mut in_quote = false;
    let mut escaped = false;

    for c in section.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '"' => in_quote = !in_quote,
            _ if in_quote => {}
            '\\' => escaped = true,
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            _ if in_bracket => {}
            'd' | 'D' | 'm' | 'M' | 'y' | 'Y' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }

    false
}
