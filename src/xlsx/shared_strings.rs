//! Shared string table reader (`xl/sharedStrings.xml`).

use super::styles::read_font;
use crate::error::{Error, Result};
use crate::model::{RichText, TextRun, Workbook};
use crate::xml::XmlReader;

/// Read the shared string table into `workbook.shared_strings`.
///
/// Each `<si>` becomes one entry, so cell indices stay aligned with the
/// table even when an item is empty.
pub(crate) fn read_shared_strings(xml: &str, part: &str, workbook: &mut Workbook) -> Result<()> {
    let mut reader = XmlReader::new(xml, part);
    let root = reader.expect_root("sst")?;
    let unique_count = root.parse_attr::<usize>("uniqueCount")?;

    let mut strings = Vec::new();
    while let Some(child) = reader.next_child()? {
        if child.name() == "si" {
            strings.push(read_string_item(&mut reader)?);
        } else {
            reader.skip_to_end()?;
        }
    }

    if let Some(declared) = unique_count {
        if declared != strings.len() {
            return Err(Error::count_mismatch("sst", declared, strings.len()));
        }
    }

    log::trace!("Read {} shared strings from {}", strings.len(), part);
    workbook.shared_strings = strings;
    Ok(())
}

/// Read the body of an `<si>` or `<is>` element.
pub(crate) fn read_string_item(reader: &mut XmlReader<'_>) -> Result<RichText> {
    let mut text = RichText::default();

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "t" => text.push(TextRun::plain(reader.read_text()?)),
            "r" => text.push(read_run(reader)?),
            // phonetic runs and settings
            _ => reader.skip_to_end()?,
        }
    }

    Ok(text)
}

fn read_run(reader: &mut XmlReader<'_>) -> Result<TextRun> {
    let mut run = TextRun::default();

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "rPr" => run.properties = Some(read_font(reader)?),
            "t" => run.text.push_str(&reader.read_text()?),
            _ => reader.skip_to_end()?,
        }
    }

    Ok(run)
}
