//! Document property parts: core (`docProps/core.xml`), extended
//! (`docProps/app.xml`) and custom (`docProps/custom.xml`).

use crate::error::Result;
use crate::model::{CustomProperty, DateTime, Workbook};
use crate::xml::{is_true, parse_value, XmlReader};

/// Read Dublin Core metadata into `workbook.properties`.
pub(crate) fn read_core_properties(xml: &str, part: &str, workbook: &mut Workbook) -> Result<()> {
    let mut reader = XmlReader::new(xml, part);
    reader.expect_root("coreProperties")?;
    let props = &mut workbook.properties;

    while let Some(child) = reader.next_child()? {
        let text = reader.read_text()?;
        let value = text.trim();
        if value.is_empty() {
            continue;
        }

        match child.name() {
            "title" => props.title = Some(value.to_string()),
            "subject" => props.subject = Some(value.to_string()),
            "creator" => props.creator = Some(value.to_string()),
            "description" => props.description = Some(value.to_string()),
            "category" => props.category = Some(value.to_string()),
            "lastModifiedBy" => props.last_modified_by = Some(value.to_string()),
            "created" => props.created = Some(DateTime::parse_w3cdtf(value)?),
            "modified" => props.modified = Some(DateTime::parse_w3cdtf(value)?),
            "keywords" => {
                props.keywords = value
                    .split([',', ';'])
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            other => log::trace!("Ignoring core property <{}>", other),
        }
    }

    Ok(())
}

/// Read application metadata into `workbook.properties`.
pub(crate) fn read_extended_properties(
    xml: &str,
    part: &str,
    workbook: &mut Workbook,
) -> Result<()> {
    let mut reader = XmlReader::new(xml, part);
    reader.expect_root("Properties")?;
    let props = &mut workbook.properties;

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "TitlesOfParts" => props.titles_of_parts = read_string_vector(&mut reader)?,
            // HeadingPairs and anything else carrying a nested vector
            "HeadingPairs" => reader.skip_to_end()?,
            name => {
                let text = reader.read_text()?;
                let value = text.trim();
                match name {
                    "Application" => props.application = Some(value.to_string()),
                    "AppVersion" => props.app_version = Some(value.to_string()),
                    "Company" if !value.is_empty() => props.company = Some(value.to_string()),
                    "DocSecurity" => props.doc_security = Some(parse_value("DocSecurity", value)?),
                    "ScaleCrop" => props.scale_crop = is_true(value),
                    "SharedDoc" => props.shared_doc = is_true(value),
                    "HyperlinksChanged" => props.hyperlinks_changed = is_true(value),
                    "LinksUpToDate" => props.links_up_to_date = is_true(value),
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

/// Strings of the `vt:vector` inside the current element.
fn read_string_vector(reader: &mut XmlReader<'_>) -> Result<Vec<String>> {
    let mut items = Vec::new();
    while let Some(child) = reader.next_child()? {
        if child.name() != "vector" {
            reader.skip_to_end()?;
            continue;
        }
        while let Some(item) = reader.next_child()? {
            match item.name() {
                "lpstr" | "lpwstr" => items.push(reader.read_text()?),
                _ => reader.skip_to_end()?,
            }
        }
    }
    Ok(items)
}

/// Read user-defined properties. Every value is kept as its text form.
pub(crate) fn read_custom_properties(
    xml: &str,
    part: &str,
    workbook: &mut Workbook,
) -> Result<()> {
    let mut reader = XmlReader::new(xml, part);
    reader.expect_root("Properties")?;

    while let Some(child) = reader.next_child()? {
        if child.name() != "property" {
            reader.skip_to_end()?;
            continue;
        }

        let name = child.required("name")?.to_string();
        let mut value = String::new();
        while reader.next_child()?.is_some() {
            value = reader.read_text()?;
        }
        workbook
            .properties
            .custom
            .push(CustomProperty { name, value });
    }

    Ok(())
}
