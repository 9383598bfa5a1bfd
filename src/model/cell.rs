//! Spreadsheet cell values.

use std::fmt;

/// The scalar value of one spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    /// No value stored at this position.
    #[default]
    Empty,
    /// Text, including error literals such as `#DIV/0!`.
    Text(String),
    Number(f64),
    Boolean(bool),
    /// A number carrying a date or time number format.
    DateTime(SerialDate),
}

impl CellValue {
    /// Check if the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write_number(f, *n),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::DateTime(d) => write!(f, "{}", d),
        }
    }
}

/// Integral values print without a fractional part.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

/// An Excel serial date: days since 1899-12-30, fraction is the time of day.
///
/// Serial 60 is the nonexistent 1900-02-29 that Excel keeps for Lotus 1-2-3
/// compatibility, so serials above it are shifted by one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerialDate(pub f64);

impl SerialDate {
    /// Calendar date as (year, month, day), or `None` before 1900-01-01.
    pub fn ymd(&self) -> Option<(i64, u32, u32)> {
        if !self.0.is_finite() || self.0 < 1.0 {
            return None;
        }
        let serial = self.0.floor() as i64;
        if serial == 60 {
            return Some((1900, 2, 29));
        }
        let days = if serial > 60 { serial - 1 } else { serial };
        // 1900-01-01 (serial 1) is day 693_901 counted from 0000-03-01
        Some(civil_from_days(days + 693_900))
    }

    /// Time of day as (hour, minute, second), or `None` at midnight.
    pub fn hms(&self) -> Option<(u32, u32, u32)> {
        let seconds = (self.0.fract() * 86_400.0).round() as u32;
        if seconds == 0 || seconds >= 86_400 {
            return None;
        }
        Some((seconds / 3600, (seconds % 3600) / 60, seconds % 60))
    }
}

impl fmt::Display for SerialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ymd(), self.hms()) {
            (Some((y, m, d)), Some((hh, mm, ss))) => {
                write!(f, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}", y, m, d, hh, mm, ss)
            }
            (Some((y, m, d)), None) => write!(f, "{:04}-{:02}-{:02}", y, m, d),
            // Pure times (serial < 1) have no calendar date
            (None, Some((hh, mm, ss))) => write!(f, "{:02}:{:02}:{:02}", hh, mm, ss),
            (None, None) => write_number(f, self.0),
        }
    }
}

/// Days counted from 0000-03-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let era = days.div_euclid(146_097);
    let doe = days.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
