//! Theme part reader (`xl/theme/theme1.xml`).
//!
//! Only the color scheme is kept; cell colors refer to it by index.

use crate::error::Result;
use crate::model::{Theme, Workbook};
use crate::xml::XmlReader;

/// Read the theme part into `workbook.theme`.
pub(crate) fn read_theme(xml: &str, part: &str, workbook: &mut Workbook) -> Result<()> {
    let mut reader = XmlReader::new(xml, part);
    let root = reader.expect_root("theme")?;

    let mut theme = Theme::default();
    if let Some(name) = root.attr("name") {
        theme.name = name.to_string();
    }

    while let Some(child) = reader.next_child()? {
        if child.name() != "themeElements" {
            reader.skip_to_end()?;
            continue;
        }

        while let Some(element) = reader.next_child()? {
            if element.name() != "clrScheme" {
                reader.skip_to_end()?;
                continue;
            }

            if let Some(name) = element.attr("name") {
                theme.colors.name = name.to_string();
            }
            while let Some(slot) = reader.next_child()? {
                let value = read_slot_color(&mut reader)?;
                match (theme.colors.slot_mut(slot.name()), value) {
                    (Some(target), Some(value)) => *target = value,
                    (None, _) => log::trace!("Ignoring color slot <{}>", slot.qualified_name()),
                    _ => {}
                }
            }
        }
    }

    workbook.theme = Some(theme);
    Ok(())
}

/// Color of one scheme slot: `srgbClr@val`, or the last computed value of a
/// system color.
fn read_slot_color(reader: &mut XmlReader<'_>) -> Result<Option<String>> {
    let mut color = None;
    while let Some(child) = reader.next_child()? {
        match child.name() {
            "srgbClr" => color = child.attr("val").map(str::to_string),
            "sysClr" => color = child.attr("lastClr").map(str::to_string),
            _ => {}
        }
        reader.skip_to_end()?;
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Facet">
  <a:themeElements>
    <a:clrScheme name="Facet">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="2C3C43"/></a:dk2>
      <a:lt2><a:srgbClr val="EBEBEB"/></a:lt2>
      <a:accent1><a:srgbClr val="90C226"/></a:accent1>
      <a:accent2><a:srgbClr val="54A021"/></a:accent2>
      <a:accent3><a:srgbClr val="E6B91E"/></a:accent3>
      <a:accent4><a:srgbClr val="E76618"/></a:accent4>
      <a:accent5><a:srgbClr val="C42F1A"/></a:accent5>
      <a:accent6><a:srgbClr val="918655"/></a:accent6>
      <a:hlink><a:srgbClr val="99CA3C"/></a:hlink>
      <a:folHlink><a:srgbClr val="A9D55F"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="Facet">
      <a:majorFont><a:latin typeface="Trebuchet MS"/></a:majorFont>
      <a:minorFont><a:latin typeface="Trebuchet MS"/></a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="Facet"><a:fillStyleLst/></a:fmtScheme>
  </a:themeElements>
  <a:objectDefaults/>
  <a:extraClrSchemeLst/>
</a:theme>"#;

    #[test]
    fn test_read_color_scheme() {
        let mut workbook = Workbook::new();
        read_theme(THEME, "xl/theme/theme1.xml", &mut workbook).unwrap();

        let theme = workbook.theme.unwrap();
        assert_eq!(theme.name, "Facet");
        assert_eq!(theme.colors.name, "Facet");
        assert_eq!(theme.colors.dk2, "2C3C43");
        assert_eq!(theme.colors.fol_hlink, "A9D55F");
        assert_eq!(theme.color_by_index(0), Some("FFFFFF"));
        assert_eq!(theme.color_by_index(1), Some("000000"));
        assert_eq!(theme.color_by_index(4), Some("90C226"));
    }

    #[test]
    fn test_missing_slots_keep_defaults() {
        let xml = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
            <a:themeElements><a:clrScheme name="Partial">
                <a:accent1><a:srgbClr val="123456"/></a:accent1>
            </a:clrScheme></a:themeElements>
        </a:theme>"#;
        let mut workbook = Workbook::new();
        read_theme(xml, "xl/theme/theme1.xml", &mut workbook).unwrap();

        let theme = workbook.theme.unwrap();
        assert_eq!(theme.name, "Office Theme");
        assert_eq!(theme.colors.accent1, "123456");
        assert_eq!(theme.colors.accent2, "C0504D");
    }
}
