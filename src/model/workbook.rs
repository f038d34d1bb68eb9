//! Workbook model: the root of everything a read produces.

use super::{CellFormat, DocumentProperties, RichText, Stylesheet, Theme, Worksheet};
use crate::manifest::Manifest;
use serde::{Deserialize, Serialize};

/// Date system used to interpret serial date numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Calendar {
    /// Serial 1 is 1900-01-01, with the fictitious 1900-02-29 at serial 60.
    #[default]
    Windows1900,
    /// Serial 0 is 1904-01-01.
    Mac1904,
}

impl Calendar {
    /// Convert a serial date number to ISO 8601 text (`YYYY-MM-DD`, with a
    /// `Thh:mm:ss` suffix when there is a time component).
    pub fn serial_to_iso(&self, serial: f64) -> Option<String> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }

        let whole = serial.floor() as i64;
        let days_since_1900 = match self {
            // serial 60 is the Lotus 1-2-3 leap day that never existed
            Calendar::Windows1900 if whole > 60 => whole - 1,
            Calendar::Windows1900 => whole,
            Calendar::Mac1904 => whole + 1462 - 1,
        };
        let (year, month, day) = days_to_ymd(days_since_1900)?;

        let time_fraction = serial.fract();
        if time_fraction > 0.0001 {
            let total_seconds = (time_fraction * 86400.0).round() as u32;
            let hours = total_seconds / 3600;
            let minutes = (total_seconds % 3600) / 60;
            let seconds = total_seconds % 60;
            Some(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                year, month, day, hours, minutes, seconds
            ))
        } else {
            Some(format!("{:04}-{:02}-{:02}", year, month, day))
        }
    }
}

/// Convert a day count where 1 is 1900-01-01 to (year, month, day).
fn days_to_ymd(days: i64) -> Option<(i32, u32, u32)> {
    if days < 1 {
        return None;
    }

    let mut year = 1900;
    let mut remaining = days;
    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining <= days_in_year {
            break;
        }
        remaining -= days_in_year;
        year += 1;
    }

    let month_lengths = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u32;
    for &length in &month_lengths {
        if remaining <= length {
            break;
        }
        remaining -= length;
        month += 1;
    }

    Some((year, month, remaining.max(1) as u32))
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Sheet visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

/// Which kind of part a sheet was read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetKind {
    #[default]
    Worksheet,
    Chartsheet,
    Dialogsheet,
}

/// One entry of the workbook's `<sheets>` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDescriptor {
    pub title: String,
    /// `sheetId` attribute.
    pub id: u32,
    /// Position in the `<sheets>` list.
    pub index: usize,
    /// Relationship id of the sheet part.
    pub rel_id: String,
    #[serde(default)]
    pub state: SheetState,
}

/// `<fileVersion>` metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_edited: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rup_build: Option<u32>,
}

/// Window geometry of the first `<workbookView>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookView {
    #[serde(default)]
    pub x_window: i32,
    #[serde(default)]
    pub y_window: i32,
    #[serde(default)]
    pub window_width: u32,
    #[serde(default)]
    pub window_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_ratio: Option<u32>,
    #[serde(default)]
    pub active_tab: usize,
}

/// A `<definedName>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinedName {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_sheet_id: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

/// A complete workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub properties: DocumentProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_version: Option<FileVersion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<WorkbookView>,

    #[serde(default)]
    pub calendar: Calendar,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_path: Option<String>,

    /// The workbook declares the `x15` namespace.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub x15_enabled: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_calculation_properties: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_arch_id: bool,

    #[serde(default)]
    pub manifest: Manifest,

    /// Sheet list in workbook order.
    #[serde(default)]
    pub sheets: Vec<SheetDescriptor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defined_names: Vec<DefinedName>,

    #[serde(default)]
    pub shared_strings: Vec<RichText>,

    #[serde(default)]
    pub stylesheet: Stylesheet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,

    /// Populated worksheets, ordered like [`sheets`](Self::sheets).
    #[serde(default)]
    pub worksheets: Vec<Worksheet>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Worksheet by title.
    pub fn sheet_by_title(&self, title: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.title == title)
    }

    /// Worksheet by `sheetId`.
    pub fn sheet_by_id(&self, id: u32) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.id == id)
    }

    /// Descriptor of the sheet whose part has relationship id `rel_id`.
    pub fn sheet_descriptor_by_rel_id(&self, rel_id: &str) -> Option<&SheetDescriptor> {
        self.sheets.iter().find(|s| s.rel_id == rel_id)
    }

    /// Titles in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.title.as_str()).collect()
    }

    /// Cell format at `index`.
    pub fn cell_format(&self, index: usize) -> Option<&CellFormat> {
        self.stylesheet.format(index)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
