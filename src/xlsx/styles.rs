//! Styles part reader (`xl/styles.xml`).
//!
//! Component tables (number formats, fonts, fills, borders) are read in
//! whatever order they appear. `xf` records only hold positions into those
//! tables, so they are collected first and resolved into cell styles and
//! cell formats once the whole part has been read.

use crate::error::{Error, Result};
use crate::model::{
    Alignment, Border, BorderProperty, BorderSide, CellFormat, CellStyle, Color, ColorKind, Fill,
    Font, GradientFill, GradientStop, NumberFormat, PatternFill, Protection, StyleComponent,
    Stylesheet, UnderlineStyle, Workbook,
};
use crate::xml::{StartTag, XmlReader};

const X14AC_NAMESPACE: &str = "http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac";

/// One `<xf>` element before resolution: each component is a position (or
/// an inline value) plus its applied flag.
#[derive(Debug, Default)]
struct FormattingRecord {
    alignment: (Alignment, bool),
    border_id: (usize, bool),
    fill_id: (usize, bool),
    font_id: (usize, bool),
    number_format_id: (u32, bool),
    protection: (Protection, bool),
    /// `xfId` of a `cellXfs` record.
    style_id: Option<usize>,
}

/// One `<cellStyle>` element.
#[derive(Debug)]
struct StyleData {
    name: String,
    builtin_id: Option<u32>,
}

/// Read the styles part into `workbook.stylesheet`.
pub(crate) fn read_stylesheet(xml: &str, part: &str, workbook: &mut Workbook) -> Result<()> {
    let mut reader = XmlReader::new(xml, part);
    let root = reader.expect_root("styleSheet")?;

    if root.namespaces().iter().any(|(_, uri)| uri == X14AC_NAMESPACE) {
        workbook.x15_enabled = true;
    }

    let mut stylesheet = Stylesheet::default();
    let mut style_datas: Vec<StyleData> = Vec::new();
    let mut style_records: Vec<FormattingRecord> = Vec::new();
    let mut format_records: Vec<FormattingRecord> = Vec::new();

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "numFmts" => {
                stylesheet.number_formats = read_number_formats(&mut reader)?;
            }
            "fonts" => {
                stylesheet.fonts = read_table(&mut reader, "font", |r, _| read_font(r))?;
                check_count(&child, "fonts", stylesheet.fonts.len())?;
            }
            "fills" => {
                stylesheet.fills = read_table(&mut reader, "fill", |r, _| read_fill(r))?;
                check_count(&child, "fills", stylesheet.fills.len())?;
            }
            "borders" => {
                stylesheet.borders = read_table(&mut reader, "border", read_border)?;
                check_count(&child, "borders", stylesheet.borders.len())?;
            }
            "colors" => {
                stylesheet.indexed_colors = read_indexed_colors(&mut reader)?;
            }
            "cellStyleXfs" => {
                style_records = read_table(&mut reader, "xf", |r, tag| {
                    read_formatting_record(r, tag, false)
                })?;
                check_count(&child, "cellStyleXfs", style_records.len())?;
            }
            "cellXfs" => {
                format_records = read_table(&mut reader, "xf", |r, tag| {
                    read_formatting_record(r, tag, true)
                })?;
                check_count(&child, "cellXfs", format_records.len())?;
            }
            "cellStyles" => {
                style_datas = read_table(&mut reader, "cellStyle", |r, tag| {
                    let data = StyleData {
                        name: tag.required("name")?.to_string(),
                        builtin_id: tag.parse_attr("builtinId")?,
                    };
                    r.skip_to_end()?;
                    Ok(data)
                })?;
                check_count(&child, "cellStyles", style_datas.len())?;
            }
            // dxfs, tableStyles, extLst and anything newer
            other => {
                log::trace!("Skipping <{}> in {}", other, part);
                reader.skip_to_end()?;
            }
        }
    }

    resolve_styles(&mut stylesheet, &style_datas, &style_records)?;
    resolve_formats(&mut stylesheet, &format_records)?;

    workbook.stylesheet = stylesheet;
    Ok(())
}

/// Compare a container's declared `count` with what was parsed.
fn check_count(tag: &StartTag, element: &str, parsed: usize) -> Result<()> {
    match tag.parse_attr::<usize>("count")? {
        Some(declared) if declared != parsed => {
            Err(Error::count_mismatch(element, declared, parsed))
        }
        _ => Ok(()),
    }
}

/// Read every `item` child of the current element with `read_item`, which
/// must consume the child's end tag. Other children are skipped.
fn read_table<T>(
    reader: &mut XmlReader<'_>,
    item: &str,
    mut read_item: impl FnMut(&mut XmlReader<'_>, &StartTag) -> Result<T>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while let Some(child) = reader.next_child()? {
        if child.name() == item {
            items.push(read_item(reader, &child)?);
        } else {
            reader.skip_to_end()?;
        }
    }
    Ok(items)
}

fn read_number_formats(reader: &mut XmlReader<'_>) -> Result<Vec<NumberFormat>> {
    read_table(reader, "numFmt", |r, tag| {
        let format = NumberFormat::new(
            tag.required_parse("numFmtId")?,
            tag.required("formatCode")?,
        );
        r.skip_to_end()?;
        Ok(format)
    })
}

/// Read a `color`-like element's attributes.
pub(crate) fn read_color(tag: &StartTag) -> Result<Color> {
    let kind = if tag.bool_attr("auto").unwrap_or(false) {
        ColorKind::Auto
    } else if let Some(rgb) = tag.attr("rgb") {
        ColorKind::Rgb(rgb.to_string())
    } else if let Some(theme) = tag.parse_attr("theme")? {
        ColorKind::Theme(theme)
    } else if let Some(indexed) = tag.parse_attr("indexed")? {
        ColorKind::Indexed(indexed)
    } else {
        ColorKind::Auto
    };

    Ok(Color {
        kind,
        tint: tag.parse_attr("tint")?,
    })
}

/// Read the children of a `font` or `rPr` element.
pub(crate) fn read_font(reader: &mut XmlReader<'_>) -> Result<Font> {
    let mut font = Font::default();

    while let Some(child) = reader.next_child()? {
        // toggles like <b/> default to on
        let flag = child.bool_attr("val").unwrap_or(true);
        match child.name() {
            "b" => font.bold = flag,
            "i" => font.italic = flag,
            "strike" => font.strikethrough = flag,
            "u" => {
                font.underline = Some(
                    child
                        .parse_attr::<UnderlineStyle>("val")?
                        .unwrap_or(UnderlineStyle::Single),
                )
            }
            "sz" => font.size = Some(child.required_parse("val")?),
            "name" | "rFont" => font.name = Some(child.required("val")?.to_string()),
            "color" => font.color = Some(read_color(&child)?),
            "family" => font.family = Some(child.required_parse("val")?),
            "scheme" => font.scheme = Some(child.required_parse("val")?),
            "charset" => font.charset = Some(child.required_parse("val")?),
            "vertAlign" => font.vertical_align = Some(child.required_parse("val")?),
            _ => {}
        }
        reader.skip_to_end()?;
    }

    Ok(font)
}

fn read_fill(reader: &mut XmlReader<'_>) -> Result<Fill> {
    let mut fill = Fill::default();

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "patternFill" => {
                let mut pattern = PatternFill {
                    pattern: child.parse_attr("patternType")?.unwrap_or_default(),
                    ..Default::default()
                };
                while let Some(color) = reader.next_child()? {
                    match color.name() {
                        "fgColor" => pattern.foreground = Some(read_color(&color)?),
                        "bgColor" => pattern.background = Some(read_color(&color)?),
                        _ => {}
                    }
                    reader.skip_to_end()?;
                }
                fill = Fill::Pattern(pattern);
            }
            "gradientFill" => {
                let mut gradient = GradientFill {
                    gradient_type: child.parse_attr("type")?.unwrap_or_default(),
                    degree: child.parse_attr("degree")?.unwrap_or(0.0),
                    left: child.parse_attr("left")?.unwrap_or(0.0),
                    right: child.parse_attr("right")?.unwrap_or(0.0),
                    top: child.parse_attr("top")?.unwrap_or(0.0),
                    bottom: child.parse_attr("bottom")?.unwrap_or(0.0),
                    stops: Vec::new(),
                };
                gradient.stops = read_table(reader, "stop", |r, stop| {
                    let position = stop.required_parse("position")?;
                    let color = read_color(&r.expect_child("color")?)?;
                    r.skip_to_end()?;
                    r.skip_to_end()?;
                    Ok(GradientStop { position, color })
                })?;
                fill = Fill::Gradient(gradient);
            }
            _ => reader.skip_to_end()?,
        }
    }

    Ok(fill)
}

fn read_border(reader: &mut XmlReader<'_>, tag: &StartTag) -> Result<Border> {
    let mut border = Border {
        diagonal_up: tag.bool_attr("diagonalUp").unwrap_or(false),
        diagonal_down: tag.bool_attr("diagonalDown").unwrap_or(false),
        ..Default::default()
    };

    while let Some(child) = reader.next_child()? {
        let Ok(side) = child.name().parse::<BorderSide>() else {
            reader.skip_to_end()?;
            continue;
        };

        let mut property = BorderProperty {
            style: child.parse_attr("style")?.unwrap_or_default(),
            color: None,
        };
        while let Some(color) = reader.next_child()? {
            if color.name() == "color" {
                property.color = Some(read_color(&color)?);
            }
            reader.skip_to_end()?;
        }
        border.sides.insert(side, property);
    }

    Ok(border)
}

fn read_indexed_colors(reader: &mut XmlReader<'_>) -> Result<Vec<Color>> {
    let mut colors = Vec::new();
    while let Some(child) = reader.next_child()? {
        if child.name() == "indexedColors" {
            colors = read_table(reader, "rgbColor", |r, tag| {
                let color = read_color(tag)?;
                r.skip_to_end()?;
                Ok(color)
            })?;
        } else {
            reader.skip_to_end()?;
        }
    }
    Ok(colors)
}

fn read_alignment(tag: &StartTag) -> Result<Alignment> {
    Ok(Alignment {
        horizontal: tag.parse_attr("horizontal")?,
        vertical: tag.parse_attr("vertical")?,
        wrap_text: tag.bool_attr("wrapText").unwrap_or(false),
        shrink_to_fit: tag.bool_attr("shrinkToFit").unwrap_or(false),
        indent: tag.parse_attr("indent")?,
        text_rotation: tag.parse_attr("textRotation")?,
    })
}

fn read_protection(tag: &StartTag) -> Protection {
    Protection {
        locked: tag.bool_attr("locked").unwrap_or(true),
        hidden: tag.bool_attr("hidden").unwrap_or(false),
    }
}

fn read_formatting_record(
    reader: &mut XmlReader<'_>,
    tag: &StartTag,
    in_cell_xfs: bool,
) -> Result<FormattingRecord> {
    // an explicit apply* attribute wins; without one the component applies
    let applied = |attribute: &str| tag.bool_attr(attribute).unwrap_or(true);

    let mut record = FormattingRecord {
        alignment: (Alignment::default(), applied("applyAlignment")),
        border_id: (tag.parse_attr("borderId")?.unwrap_or(0), applied("applyBorder")),
        fill_id: (tag.parse_attr("fillId")?.unwrap_or(0), applied("applyFill")),
        font_id: (tag.parse_attr("fontId")?.unwrap_or(0), applied("applyFont")),
        number_format_id: (
            tag.parse_attr("numFmtId")?.unwrap_or(0),
            applied("applyNumberFormat"),
        ),
        protection: (Protection::default(), applied("applyProtection")),
        style_id: None,
    };

    if in_cell_xfs {
        record.style_id = tag.parse_attr("xfId")?;
    }

    while let Some(child) = reader.next_child()? {
        match child.name() {
            "alignment" => record.alignment.0 = read_alignment(&child)?,
            "protection" => record.protection.0 = read_protection(&child),
            _ => {}
        }
        reader.skip_to_end()?;
    }

    Ok(record)
}

/// Component at `index`. An empty table answers the default index 0 with
/// the default component.
fn component<T: Clone + Default>(table: &[T], name: &'static str, index: usize) -> Result<T> {
    match table.get(index) {
        Some(value) => Ok(value.clone()),
        None if table.is_empty() && index == 0 => Ok(T::default()),
        None => Err(Error::IndexOutOfRange {
            table: name,
            index,
            len: table.len(),
        }),
    }
}

/// Pair style records with named `cellStyle` entries by position.
fn resolve_styles(
    stylesheet: &mut Stylesheet,
    style_datas: &[StyleData],
    records: &[FormattingRecord],
) -> Result<()> {
    for (position, record) in records.iter().enumerate() {
        let data = style_datas.get(position);
        let name = match data {
            Some(data) => data.name.clone(),
            None => {
                let name = format!("Style {}", position);
                log::warn!(
                    "Style record {} has no matching cellStyle, naming it {:?}",
                    position,
                    name
                );
                name
            }
        };

        let style = CellStyle {
            name,
            builtin_id: data.and_then(|d| d.builtin_id),
            alignment: StyleComponent::new(record.alignment.0.clone(), record.alignment.1),
            border: StyleComponent::new(
                component(&stylesheet.borders, "border", record.border_id.0)?,
                record.border_id.1,
            ),
            fill: StyleComponent::new(
                component(&stylesheet.fills, "fill", record.fill_id.0)?,
                record.fill_id.1,
            ),
            font: StyleComponent::new(
                component(&stylesheet.fonts, "font", record.font_id.0)?,
                record.font_id.1,
            ),
            number_format: StyleComponent::new(
                stylesheet.lookup_number_format(record.number_format_id.0),
                record.number_format_id.1,
            ),
            protection: StyleComponent::new(record.protection.0.clone(), record.protection.1),
        };
        stylesheet.styles.push(style);
    }
    Ok(())
}

/// Build cell formats, each bound to its style by name.
fn resolve_formats(stylesheet: &mut Stylesheet, records: &[FormattingRecord]) -> Result<()> {
    for record in records {
        let style = match record.style_id {
            Some(id) => match stylesheet.styles.get(id) {
                Some(style) => Some(style.name.clone()),
                None => {
                    return Err(Error::IndexOutOfRange {
                        table: "cellStyleXfs",
                        index: id,
                        len: stylesheet.styles.len(),
                    })
                }
            },
            None => stylesheet.styles.first().map(|s| s.name.clone()),
        };

        let format = CellFormat {
            style,
            alignment: StyleComponent::new(record.alignment.0.clone(), record.alignment.1),
            border: StyleComponent::new(
                component(&stylesheet.borders, "border", record.border_id.0)?,
                record.border_id.1,
            ),
            fill: StyleComponent::new(
                component(&stylesheet.fills, "fill", record.fill_id.0)?,
                record.fill_id.1,
            ),
            font: StyleComponent::new(
                component(&stylesheet.fonts, "font", record.font_id.0)?,
                record.font_id.1,
            ),
            number_format: StyleComponent::new(
                stylesheet.lookup_number_format(record.number_format_id.0),
                record.number_format_id.1,
            ),
            protection: StyleComponent::new(record.protection.0.clone(), record.protection.1),
        };
        stylesheet.formats.push(format);
    }
    Ok(())
}
