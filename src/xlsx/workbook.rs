//! Workbook part reader (`xl/workbook.xml`).

use crate::error::Result;
use crate::model::{
    Calendar, DefinedName, FileVersion, SheetDescriptor, SheetState, Workbook, WorkbookView,
};
use crate::xml::{StartTag, XmlReader};

const X15_NAMESPACE: &str = "http://schemas.microsoft.com/office/spreadsheetml/2010/11/main";

/// Read workbook-level metadata and the sheet list into `workbook`.
pub(crate) fn read_workbook_part(xml: &str, part: &str, workbook: &mut Workbook) -> Result<()> {
    let mut reader = XmlReader::new(xml, part);
    let root = reader.expect_root("workbook")?;

    if root.namespaces().iter().any(|(_, uri)| uri == X15_NAMESPACE) {
        workbook.x15_enabled = true;
    }

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "fileVersion" => {
                workbook.file_version = Some(FileVersion {
                    app_name: child.attr("appName").map(str::to_string),
                    last_edited: child.parse_attr("lastEdited")?,
                    lowest_edited: child.parse_attr("lowestEdited")?,
                    rup_build: child.parse_attr("rupBuild")?,
                });
                reader.skip_to_end()?;
            }
            "workbookPr" => {
                if child.bool_attr("date1904").unwrap_or(false) {
                    workbook.calendar = Calendar::Mac1904;
                }
                reader.skip_to_end()?;
            }
            "AlternateContent" => {
                if let Some(path) = find_absolute_path(&mut reader)? {
                    workbook.absolute_path = Some(path);
                }
            }
            "bookViews" => {
                while let Some(view) = reader.next_child()? {
                    // only the first view is kept
                    if view.name() == "workbookView" && workbook.view.is_none() {
                        workbook.view = Some(read_workbook_view(&view)?);
                    }
                    reader.skip_to_end()?;
                }
            }
            "sheets" => {
                while let Some(sheet) = reader.next_child()? {
                    if sheet.name() == "sheet" {
                        let index = workbook.sheets.len();
                        workbook.sheets.push(read_sheet_descriptor(&sheet, index)?);
                    }
                    reader.skip_to_end()?;
                }
            }
            "definedNames" => {
                while let Some(name) = reader.next_child()? {
                    if name.name() != "definedName" {
                        reader.skip_to_end()?;
                        continue;
                    }
                    workbook.defined_names.push(DefinedName {
                        name: name.required("name")?.to_string(),
                        local_sheet_id: name.parse_attr("localSheetId")?,
                        hidden: name.bool_attr("hidden").unwrap_or(false),
                        value: reader.read_text()?,
                    });
                }
            }
            "calcPr" => {
                workbook.has_calculation_properties = true;
                reader.skip_to_end()?;
            }
            "extLst" => {
                if contains_element(&mut reader, "ArchID")? {
                    workbook.has_arch_id = true;
                }
            }
            other => {
                log::trace!("Skipping <{}> in {}", other, part);
                reader.skip_to_end()?;
            }
        }
    }

    log::debug!(
        "Workbook lists {} sheets: {:?}",
        workbook.sheets.len(),
        workbook.sheet_names()
    );
    Ok(())
}

fn read_sheet_descriptor(tag: &StartTag, index: usize) -> Result<SheetDescriptor> {
    let state = match tag.attr("state") {
        Some("hidden") => SheetState::Hidden,
        Some("veryHidden") => SheetState::VeryHidden,
        _ => SheetState::Visible,
    };

    Ok(SheetDescriptor {
        title: tag.required("name")?.to_string(),
        id: tag.required_parse("sheetId")?,
        index,
        rel_id: tag.required("r:id")?.to_string(),
        state,
    })
}

fn read_workbook_view(tag: &StartTag) -> Result<WorkbookView> {
    Ok(WorkbookView {
        x_window: tag.parse_attr("xWindow")?.unwrap_or(0),
        y_window: tag.parse_attr("yWindow")?.unwrap_or(0),
        window_width: tag.parse_attr("windowWidth")?.unwrap_or(0),
        window_height: tag.parse_attr("windowHeight")?.unwrap_or(0),
        tab_ratio: tag.parse_attr("tabRatio")?,
        active_tab: tag.parse_attr("activeTab")?.unwrap_or(0),
    })
}

/// `url` of the first `absPath` below the current element.
fn find_absolute_path(reader: &mut XmlReader<'_>) -> Result<Option<String>> {
    let mut path = None;
    while let Some(child) = reader.next_child()? {
        if child.name() == "absPath" && path.is_none() {
            path = child.attr("url").map(str::to_string);
            reader.skip_to_end()?;
        } else if let Some(nested) = find_absolute_path(reader)? {
            path.get_or_insert(nested);
        }
    }
    Ok(path)
}

/// Whether an element named `name` appears below the current element.
/// Consumes the current element.
fn contains_element(reader: &mut XmlReader<'_>, name: &str) -> Result<bool> {
    let mut found = false;
    while let Some(child) = reader.next_child()? {
        if child.name() == name {
            found = true;
            reader.skip_to_end()?;
        } else if contains_element(reader, name)? {
            found = true;
        }
    }
    Ok(found)
}
