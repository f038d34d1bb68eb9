//! Worksheet part reader (`xl/worksheets/sheetN.xml`).

use super::shared_strings::read_string_item;
use super::ReadOptions;
use crate::error::{Error, Result};
use crate::model::{
    Cell, CellReference, CellValue, PageMargins, Pane, PaneCorner, PaneState, RangeReference,
    RichText, SheetFormatProperties, SheetKind, SheetView, Workbook, Worksheet, MAX_COLUMN,
    MAX_ROW,
};
use crate::xml::{parse_value, StartTag, XmlReader};

const X14AC_NAMESPACE: &str = "http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac";

/// Tables a cell may refer to while its sheet is being read.
struct CellContext<'w> {
    shared_strings: &'w [RichText],
    format_count: usize,
    values_only: bool,
}

/// Read the worksheet reached through relationship `rel_id` and insert it
/// into `workbook.worksheets` at its position in the sheet list.
pub(crate) fn read_worksheet(
    xml: &str,
    part: &str,
    rel_id: &str,
    options: &ReadOptions,
    workbook: &mut Workbook,
) -> Result<()> {
    let mut worksheet = new_sheet(workbook, rel_id, SheetKind::Worksheet)?;

    let context = CellContext {
        shared_strings: &workbook.shared_strings,
        format_count: workbook.stylesheet.formats.len(),
        values_only: options.values_only,
    };

    let mut reader = XmlReader::new(xml, part);
    let root = reader.expect_root("worksheet")?;
    if root.namespaces().iter().any(|(_, uri)| uri == X14AC_NAMESPACE) {
        worksheet.x14ac_enabled = true;
    }

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "dimension" => {
                worksheet.dimension = Some(RangeReference::parse(child.required("ref")?)?);
                reader.skip_to_end()?;
            }
            "sheetViews" => {
                while let Some(view) = reader.next_child()? {
                    if view.name() == "sheetView" {
                        worksheet.views.push(read_sheet_view(&mut reader, &view)?);
                    } else {
                        reader.skip_to_end()?;
                    }
                }
            }
            "sheetFormatPr" => {
                worksheet.format_properties = Some(SheetFormatProperties {
                    base_col_width: child.parse_attr("baseColWidth")?,
                    default_col_width: child.parse_attr("defaultColWidth")?,
                    default_row_height: child.parse_attr("defaultRowHeight")?,
                });
                reader.skip_to_end()?;
            }
            "cols" => read_columns(&mut reader, &mut worksheet)?,
            "sheetData" => read_sheet_data(&mut reader, &mut worksheet, &context)?,
            "mergeCells" => {
                let declared = child.parse_attr::<usize>("count")?;
                while let Some(merge) = reader.next_child()? {
                    if merge.name() == "mergeCell" {
                        worksheet.merge_cells(RangeReference::parse(merge.required("ref")?)?);
                    }
                    reader.skip_to_end()?;
                }
                if let Some(declared) = declared {
                    let parsed = worksheet.merged_cells.len();
                    if declared != parsed {
                        return Err(Error::count_mismatch("mergeCells", declared, parsed));
                    }
                }
            }
            "autoFilter" => {
                worksheet.auto_filter = Some(RangeReference::parse(child.required("ref")?)?);
                reader.skip_to_end()?;
            }
            "pageMargins" => {
                worksheet.page_margins = Some(read_page_margins(&child)?);
                reader.skip_to_end()?;
            }
            other => {
                log::trace!("Skipping <{}> in {}", other, part);
                reader.skip_to_end()?;
            }
        }
    }

    log::trace!(
        "Read {} cells into sheet {:?}",
        worksheet.cells.len(),
        worksheet.title
    );
    insert_in_order(workbook, worksheet);
    Ok(())
}

/// Insert an empty sheet of `kind` for a chartsheet or dialogsheet part,
/// keeping `worksheets` aligned with the sheet list.
pub(crate) fn insert_placeholder_sheet(
    workbook: &mut Workbook,
    rel_id: &str,
    kind: SheetKind,
) -> Result<()> {
    let worksheet = new_sheet(workbook, rel_id, kind)?;
    log::debug!("Sheet {:?} is a {:?}, body not read", worksheet.title, kind);
    insert_in_order(workbook, worksheet);
    Ok(())
}

fn new_sheet(workbook: &Workbook, rel_id: &str, kind: SheetKind) -> Result<Worksheet> {
    let descriptor = workbook.sheet_descriptor_by_rel_id(rel_id).ok_or_else(|| {
        Error::InvalidFile(format!("no sheet in the workbook uses relationship {}", rel_id))
    })?;

    let mut worksheet = Worksheet::new(descriptor.id, descriptor.title.clone());
    worksheet.kind = kind;
    Ok(worksheet)
}

/// Keep `worksheets` sorted by each sheet's position in the sheet list,
/// whatever order the relationships were listed in.
fn insert_in_order(workbook: &mut Workbook, worksheet: Worksheet) {
    let sheets = &workbook.sheets;
    let order = |id: u32| {
        sheets
            .iter()
            .find(|s| s.id == id)
            .map_or(usize::MAX, |s| s.index)
    };

    let target = order(worksheet.id);
    let position = workbook
        .worksheets
        .iter()
        .take_while(|w| order(w.id) < target)
        .count();
    workbook.worksheets.insert(position, worksheet);
}

fn read_sheet_view(reader: &mut XmlReader<'_>, tag: &StartTag) -> Result<SheetView> {
    let mut view = SheetView {
        workbook_view_id: tag.parse_attr("workbookViewId")?.unwrap_or(0),
        tab_selected: tag.bool_attr("tabSelected").unwrap_or(false),
        pane: None,
    };

    while let Some(child) = reader.next_child()? {
        if child.name() == "pane" {
            view.pane = Some(Pane {
                top_left_cell: child
                    .attr("topLeftCell")
                    .map(CellReference::parse)
                    .transpose()?,
                state: match child.attr("state") {
                    Some("frozen") => PaneState::Frozen,
                    Some("frozenSplit") => PaneState::FrozenSplit,
                    Some("split") => PaneState::Split,
                    _ => PaneState::Normal,
                },
                active_pane: match child.attr("activePane") {
                    Some("bottomLeft") => PaneCorner::BottomLeft,
                    Some("bottomRight") => PaneCorner::BottomRight,
                    Some("topRight") => PaneCorner::TopRight,
                    _ => PaneCorner::TopLeft,
                },
                x_split: child.parse_attr("xSplit")?.unwrap_or(0.0),
                y_split: child.parse_attr("ySplit")?.unwrap_or(0.0),
            });
        }
        reader.skip_to_end()?;
    }

    Ok(view)
}

fn read_columns(reader: &mut XmlReader<'_>, worksheet: &mut Worksheet) -> Result<()> {
    while let Some(col) = reader.next_child()? {
        if col.name() == "col" {
            let min: u32 = col.required_parse("min")?;
            let max: u32 = col.required_parse("max")?;
            let width: Option<f64> = col.parse_attr("width")?;
            let custom_width = col.bool_attr("customWidth").unwrap_or(false);
            let style: Option<usize> = col.parse_attr("style")?;
            let hidden = col.bool_attr("hidden").unwrap_or(false);

            // every column in the range gets this element's own values
            for column in min.max(1)..=max.min(MAX_COLUMN) {
                let props = worksheet.column_properties_mut(column);
                props.width = width;
                props.custom_width = custom_width;
                props.style = style;
                props.hidden = hidden;
            }
        }
        reader.skip_to_end()?;
    }
    Ok(())
}

/// Parse `spans="1:3"` (or several space-separated spans) to `(min, max)`.
fn parse_spans(spans: &str) -> Result<(u32, u32)> {
    let mut bounds: Option<(u32, u32)> = None;
    for span in spans.split_whitespace() {
        let (min, max) = span
            .split_once(':')
            .ok_or_else(|| Error::invalid_value("row@spans", spans))?;
        let min: u32 = parse_value("row@spans", min)?;
        let max: u32 = parse_value("row@spans", max)?;
        if min == 0 || max > MAX_COLUMN || min > max {
            return Err(Error::invalid_value("row@spans", spans));
        }
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(min), hi.max(max)),
            None => (min, max),
        });
    }
    bounds.ok_or_else(|| Error::invalid_value("row@spans", spans))
}

fn read_sheet_data(
    reader: &mut XmlReader<'_>,
    worksheet: &mut Worksheet,
    context: &CellContext<'_>,
) -> Result<()> {
    let mut last_row = 0u32;

    while let Some(row_tag) = reader.next_child()? {
        if row_tag.name() != "row" {
            reader.skip_to_end()?;
            continue;
        }

        let row = match row_tag.attr("r") {
            Some(text) => parse_value::<u32>("row@r", text)?,
            None => last_row
                .checked_add(1)
                .ok_or_else(|| Error::invalid_value("row@r", "(after last row)"))?,
        };
        if row == 0 || row > MAX_ROW {
            return Err(Error::invalid_value("row@r", row.to_string()));
        }
        last_row = row;

        let span = match row_tag.attr("spans") {
            Some(spans) => Some(parse_spans(spans)?),
            None => worksheet
                .dimension
                .map(|d| (d.top_left.column, d.bottom_right.column)),
        };

        let height: Option<f64> = row_tag.parse_attr("ht")?;
        let custom_height = row_tag.bool_attr("customHeight").unwrap_or(false);
        let hidden = row_tag.bool_attr("hidden").unwrap_or(false);
        if height.is_some() || custom_height || hidden || row_tag.has_attr("spans") {
            let props = worksheet.row_properties_mut(row);
            props.height = height;
            props.custom_height = custom_height;
            props.hidden = hidden;
            props.span = span;
        }

        let mut next_column = span.map_or(1, |(min, _)| min);
        while let Some(cell_tag) = reader.next_child()? {
            if cell_tag.name() != "c" {
                reader.skip_to_end()?;
                continue;
            }

            let reference = match cell_tag.attr("r") {
                Some(r) => CellReference::parse(r)?,
                None if next_column <= MAX_COLUMN => CellReference::new(next_column, row),
                None => return Err(Error::invalid_value("c@r", "(past last column)")),
            };
            next_column = reference.column + 1;

            let cell = read_cell(reader, &cell_tag, reference, context)?;
            worksheet.cells.insert(reference, cell);
        }
    }

    Ok(())
}

fn read_cell(
    reader: &mut XmlReader<'_>,
    tag: &StartTag,
    reference: CellReference,
    context: &CellContext<'_>,
) -> Result<Cell> {
    let mut cell = Cell::new(reference);
    let type_code = tag.attr("t").unwrap_or("n");

    if let Some(format_id) = tag.parse_attr::<usize>("s")? {
        if format_id >= context.format_count {
            return Err(Error::IndexOutOfRange {
                table: "cellXfs",
                index: format_id,
                len: context.format_count,
            });
        }
        cell.format_id = Some(format_id);
    }

    let mut value: Option<String> = None;
    let mut formula: Option<String> = None;
    let mut shared_formula = false;
    let mut inline: Option<String> = None;

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "v" => value = Some(reader.read_text()?),
            "f" => {
                shared_formula = child.attr("t") == Some("shared");
                formula = Some(reader.read_text()?);
            }
            "is" => {
                // only the first run of an inline string is kept
                let text = read_string_item(reader)?;
                inline = Some(text.runs.into_iter().next().map(|r| r.text).unwrap_or_default());
            }
            _ => reader.skip_to_end()?,
        }
    }

    if let Some(text) = formula.as_deref().filter(|_| !shared_formula && !context.values_only) {
        cell.formula = Some(text.strip_prefix('=').unwrap_or(text).to_string());
        return Ok(cell);
    }

    cell.value = match type_code {
        "inlineStr" => CellValue::InlineString(inline.unwrap_or_default()),
        "str" => CellValue::FormulaString(value.unwrap_or_default()),
        "s" if formula.is_none() => match value {
            Some(v) => {
                let index: usize = parse_value("shared string index", &v)?;
                let text = context.shared_strings.get(index).ok_or(Error::IndexOutOfRange {
                    table: "sharedStrings",
                    index,
                    len: context.shared_strings.len(),
                })?;
                CellValue::SharedString {
                    index,
                    text: text.clone(),
                }
            }
            None => CellValue::Empty,
        },
        "b" => match value {
            Some(v) => CellValue::Boolean(v.trim() != "0"),
            None => CellValue::Empty,
        },
        "d" => match value {
            Some(v) => CellValue::Date(v),
            None => CellValue::Empty,
        },
        _ => match value.as_deref().map(str::trim) {
            Some(v) if v.starts_with('#') => CellValue::Error(v.to_string()),
            Some(v) if !v.is_empty() => CellValue::Number(parse_value("cell value", v)?),
            _ => CellValue::Empty,
        },
    };

    Ok(cell)
}

fn read_page_margins(tag: &StartTag) -> Result<PageMargins> {
    let defaults = PageMargins::default();
    Ok(PageMargins {
        top: tag.parse_attr("top")?.unwrap_or(defaults.top),
        bottom: tag.parse_attr("bottom")?.unwrap_or(defaults.bottom),
        left: tag.parse_attr("left")?.unwrap_or(defaults.left),
        right: tag.parse_attr("right")?.unwrap_or(defaults.right),
        header: tag.parse_attr("header")?.unwrap_or(defaults.header),
        footer: tag.parse_attr("footer")?.unwrap_or(defaults.footer),
    })
}
