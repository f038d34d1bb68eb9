//! Cell coordinates, values and cells.

use super::RichText;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest column index SpreadsheetML allows (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;
/// Largest row index SpreadsheetML allows.
pub const MAX_ROW: u32 = 1_048_576;

/// Convert a column index (1-based) to its letters, e.g. 28 -> "AB".
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert column letters to a 1-based index, e.g. "AB" -> 28.
pub fn column_index(letters: &str) -> Result<u32> {
    if letters.is_empty() || letters.len() > 3 {
        return Err(Error::InvalidReference(letters.to_string()));
    }
    let mut index = 0u32;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidReference(letters.to_string()));
        }
        index = index * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    if index > MAX_COLUMN {
        return Err(Error::InvalidReference(letters.to_string()));
    }
    Ok(index)
}

/// A single cell coordinate. Both indices are 1-based.
///
/// Ordering is row-major so that a sorted map of cells reads like the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellReference {
    pub column: u32,
    pub row: u32,
}

impl CellReference {
    /// Create a reference from 1-based column and row indices.
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Parse an A1-style reference; `$` anchors are accepted and dropped.
    pub fn parse(text: &str) -> Result<Self> {
        let cleaned = text.trim().replace('$', "");
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::InvalidReference(text.to_string()))?;
        let (letters, digits) = cleaned.split_at(split);

        let column = column_index(letters).map_err(|_| Error::InvalidReference(text.to_string()))?;
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidReference(text.to_string()))?;
        if row == 0 || row > MAX_ROW {
            return Err(Error::InvalidReference(text.to_string()));
        }

        Ok(Self { column, row })
    }

    /// Column letters of this reference.
    pub fn column_letters(&self) -> String {
        column_letters(self.column)
    }
}

impl Ord for CellReference {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.column).cmp(&(other.row, other.column))
    }
}

impl PartialOrd for CellReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.row)
    }
}

impl FromStr for CellReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CellReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// A rectangular block of cells, e.g. `A1:C3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeReference {
    pub top_left: CellReference,
    pub bottom_right: CellReference,
}

impl RangeReference {
    /// Create a range from two corners in any order.
    pub fn new(a: CellReference, b: CellReference) -> Self {
        Self {
            top_left: CellReference::new(a.column.min(b.column), a.row.min(b.row)),
            bottom_right: CellReference::new(a.column.max(b.column), a.row.max(b.row)),
        }
    }

    /// Parse `A1:B2` or a single-cell `A1`.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once(':') {
            Some((start, end)) => Ok(Self::new(
                CellReference::parse(start)?,
                CellReference::parse(end)?,
            )),
            None => {
                let cell = CellReference::parse(text)?;
                Ok(Self::new(cell, cell))
            }
        }
    }

    /// Number of columns covered.
    pub fn width(&self) -> u32 {
        self.bottom_right.column - self.top_left.column + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> u32 {
        self.bottom_right.row - self.top_left.row + 1
    }

    /// Whether `cell` lies inside the range.
    pub fn contains(&self, cell: &CellReference) -> bool {
        (self.top_left.column..=self.bottom_right.column).contains(&cell.column)
            && (self.top_left.row..=self.bottom_right.row).contains(&cell.row)
    }
}

impl fmt::Display for RangeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.top_left == self.bottom_right {
            write!(f, "{}", self.top_left)
        } else {
            write!(f, "{}:{}", self.top_left, self.bottom_right)
        }
    }
}

impl FromStr for RangeReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for RangeReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RangeReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// The value stored in a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Empty,
    /// Entry of the shared string table, dereferenced at load time.
    SharedString { index: usize, text: RichText },
    /// Inline string (`t="inlineStr"`).
    InlineString(String),
    /// Cached string result of a formula (`t="str"`).
    FormulaString(String),
    Number(f64),
    Boolean(bool),
    /// Error code such as `#DIV/0!`.
    Error(String),
    /// ISO 8601 date text (`t="d"`).
    Date(String),
}

impl CellValue {
    /// Whether the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Textual content of string-like values.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::SharedString { text, .. } => Some(text.plain_text()),
            CellValue::InlineString(s) | CellValue::FormulaString(s) => Some(Cow::Borrowed(s)),
            _ => None,
        }
    }

    /// Numeric content.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean content.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// SpreadsheetML type code this value was read from.
    pub fn type_code(&self) -> &'static str {
        match self {
            CellValue::Empty => "",
            CellValue::SharedString { .. } => "s",
            CellValue::InlineString(_) => "inlineStr",
            CellValue::FormulaString(_) => "str",
            CellValue::Number(_) => "n",
            CellValue::Boolean(_) => "b",
            CellValue::Error(_) => "e",
            CellValue::Date(_) => "d",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::SharedString { text, .. } => write!(f, "{}", text),
            CellValue::InlineString(s) | CellValue::FormulaString(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::Error(e) => f.write_str(e),
            CellValue::Date(d) => f.write_str(d),
        }
    }
}

/// A populated cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub reference: CellReference,

    #[serde(default, skip_serializing_if = "CellValue::is_empty")]
    pub value: CellValue,

    /// Index into the stylesheet's cell formats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_id: Option<usize>,

    /// Formula text without the leading `=`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Cell {
    /// Create an empty cell at `reference`.
    pub fn new(reference: CellReference) -> Self {
        Self {
            reference,
            value: CellValue::Empty,
            format_id: None,
            formula: None,
        }
    }

    /// Whether the cell carries a formula.
    pub fn has_formula(&self) -> bool {
        self.formula.is_some()
    }
}
