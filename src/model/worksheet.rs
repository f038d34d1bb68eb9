//! Worksheet model.

use super::{Cell, CellReference, CellValue, RangeReference, SheetKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-row overrides from `<row>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom_height: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    /// Column span `(min, max)` used by this row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<(u32, u32)>,
}

/// Per-column overrides from `<col>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom_width: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<usize>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub header: f64,
    pub footer: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 1.0,
            bottom: 1.0,
            left: 0.75,
            right: 0.75,
            header: 0.5,
            footer: 0.5,
        }
    }
}

/// How a pane split behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneState {
    Frozen,
    FrozenSplit,
    Split,
    #[default]
    Normal,
}

/// Which pane is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneCorner {
    BottomLeft,
    BottomRight,
    #[default]
    TopLeft,
    TopRight,
}

/// Frozen or split panes of a sheet view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pane {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_left_cell: Option<CellReference>,
    #[serde(default)]
    pub state: PaneState,
    #[serde(default)]
    pub active_pane: PaneCorner,
    #[serde(default)]
    pub x_split: f64,
    #[serde(default)]
    pub y_split: f64,
}

/// One `<sheetView>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetView {
    #[serde(default)]
    pub workbook_view_id: u32,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tab_selected: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane: Option<Pane>,
}

/// `<sheetFormatPr>` defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetFormatProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_col_width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_col_width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_row_height: Option<f64>,
}

/// A populated worksheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    /// `sheetId` from the workbook part.
    pub id: u32,
    pub title: String,

    #[serde(default)]
    pub kind: SheetKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<RangeReference>,

    #[serde(default)]
    pub cells: BTreeMap<CellReference, Cell>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_cells: Vec<RangeReference>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub row_properties: BTreeMap<u32, RowProperties>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub column_properties: BTreeMap<u32, ColumnProperties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_filter: Option<RangeReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_margins: Option<PageMargins>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<SheetView>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_properties: Option<SheetFormatProperties>,

    /// The sheet declares the `x14ac` namespace.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub x14ac_enabled: bool,
}

impl Worksheet {
    /// Create an empty worksheet.
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Cell at `reference`, if populated.
    pub fn cell(&self, reference: &str) -> Option<&Cell> {
        let reference = CellReference::parse(reference).ok()?;
        self.cells.get(&reference)
    }

    /// Cell at `reference`, created empty on first access.
    pub fn cell_mut(&mut self, reference: CellReference) -> &mut Cell {
        self.cells
            .entry(reference)
            .or_insert_with(|| Cell::new(reference))
    }

    /// Value at `reference`; empty when the cell is absent.
    pub fn value(&self, reference: &str) -> CellValue {
        self.cell(reference)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Record a merged region.
    pub fn merge_cells(&mut self, range: RangeReference) {
        self.merged_cells.push(range);
    }

    /// Row properties, created on first reference.
    pub fn row_properties_mut(&mut self, row: u32) -> &mut RowProperties {
        self.row_properties.entry(row).or_default()
    }

    /// Column properties, created on first reference.
    pub fn column_properties_mut(&mut self, column: u32) -> &mut ColumnProperties {
        self.column_properties.entry(column).or_default()
    }

    /// Range covering every populated cell.
    pub fn used_range(&self) -> Option<RangeReference> {
        let first = self.cells.keys().next()?;
        let (mut min_col, mut max_col) = (first.column, first.column);
        let mut max_row = first.row;
        for reference in self.cells.keys() {
            min_col = min_col.min(reference.column);
            max_col = max_col.max(reference.column);
            max_row = max_row.max(reference.row);
        }
        Some(RangeReference::new(
            CellReference::new(min_col, first.row),
            CellReference::new(max_col, max_row),
        ))
    }

    /// Populated cells in row-major order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, Vec<&Cell>)> {
        let mut rows: BTreeMap<u32, Vec<&Cell>> = BTreeMap::new();
        for cell in self.cells.values() {
            rows.entry(cell.reference.row).or_default().push(cell);
        }
        rows.into_iter()
    }
}
