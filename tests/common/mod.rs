//! Builds XLSX packages in memory for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const SHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
pub const TEMPLATE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml";

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Package assembled part by part; [`build`](Self::build) writes the ZIP.
#[derive(Debug, Clone)]
pub struct XlsxBuilder {
    sheets: Vec<(String, String)>,
    shared_strings: Option<String>,
    styles: Option<String>,
    theme: Option<String>,
    core: Option<String>,
    app: Option<String>,
    custom: Option<String>,
    workbook_content_type: String,
    workbook_extra: String,
    reverse_sheet_relationships: bool,
    extra_parts: Vec<(String, Vec<u8>)>,
    omitted_parts: Vec<String>,
}

impl Default for XlsxBuilder {
    fn default() -> Self {
        Self {
            sheets: Vec::new(),
            shared_strings: None,
            styles: None,
            theme: None,
            core: None,
            app: None,
            custom: None,
            workbook_content_type: SHEET_CONTENT_TYPE.to_string(),
            workbook_extra: String::new(),
            reverse_sheet_relationships: false,
            extra_parts: Vec::new(),
            omitted_parts: Vec::new(),
        }
    }
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet; `body` is the XML inside `<worksheet>`.
    pub fn sheet(mut self, title: &str, body: &str) -> Self {
        self.sheets.push((title.to_string(), body.to_string()));
        self
    }

    /// Shared string table with one plain `<si>` per entry.
    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        let items: String = strings
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", s))
            .collect();
        self.shared_strings = Some(format!(
            r#"<sst xmlns="{}" count="{}" uniqueCount="{}">{}</sst>"#,
            MAIN_NS,
            strings.len(),
            strings.len(),
            items
        ));
        self
    }

    /// Shared string part as raw XML.
    pub fn shared_strings_xml(mut self, xml: &str) -> Self {
        self.shared_strings = Some(xml.to_string());
        self
    }

    pub fn styles(mut self, xml: &str) -> Self {
        self.styles = Some(xml.to_string());
        self
    }

    pub fn theme(mut self, xml: &str) -> Self {
        self.theme = Some(xml.to_string());
        self
    }

    pub fn core_properties(mut self, xml: &str) -> Self {
        self.core = Some(xml.to_string());
        self
    }

    pub fn app_properties(mut self, xml: &str) -> Self {
        self.app = Some(xml.to_string());
        self
    }

    pub fn custom_properties(mut self, xml: &str) -> Self {
        self.custom = Some(xml.to_string());
        self
    }

    /// Content type declared for `xl/workbook.xml`.
    pub fn workbook_content_type(mut self, content_type: &str) -> Self {
        self.workbook_content_type = content_type.to_string();
        self
    }

    /// Extra XML placed in `<workbook>` before `<sheets>`.
    pub fn workbook_extra(mut self, xml: &str) -> Self {
        self.workbook_extra = xml.to_string();
        self
    }

    /// List sheet relationships last-to-first in the workbook's `.rels`.
    pub fn reverse_sheet_relationships(mut self) -> Self {
        self.reverse_sheet_relationships = true;
        self
    }

    /// Add an arbitrary part.
    pub fn part(mut self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.extra_parts.push((name.to_string(), content.into()));
        self
    }

    /// Leave a generated part out of the archive.
    pub fn omit(mut self, name: &str) -> Self {
        self.omitted_parts.push(name.to_string());
        self
    }

    /// Write the package.
    pub fn build(&self) -> Vec<u8> {
        let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
        let mut overrides = vec![("/xl/workbook.xml".to_string(), self.workbook_content_type.clone())];

        // package root relationships
        let mut root_rels = vec![relationship("rId1", "officeDocument", "xl/workbook.xml")];
        for (id, (part, kind, content)) in [
            ("docProps/core.xml", "package/2006/relationships/metadata/core-properties", &self.core),
            ("docProps/app.xml", "officeDocument/2006/relationships/extended-properties", &self.app),
            ("docProps/custom.xml", "officeDocument/2006/relationships/custom-properties", &self.custom),
        ]
        .iter()
        .enumerate()
        {
            if let Some(xml) = content {
                root_rels.push(format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/{}" Target="{}"/>"#,
                    id + 2,
                    kind,
                    part
                ));
                parts.push((part.to_string(), xml.as_bytes().to_vec()));
            }
        }
        parts.push(("_rels/.rels".to_string(), relationships(&root_rels).into_bytes()));

        // workbook and its relationships
        let mut sheet_rels = Vec::new();
        let mut sheet_entries = String::new();
        for (i, (title, body)) in self.sheets.iter().enumerate() {
            let number = i + 1;
            let part = format!("xl/worksheets/sheet{}.xml", number);
            sheet_rels.push(relationship(
                &format!("rId{}", number),
                "worksheet",
                &format!("worksheets/sheet{}.xml", number),
            ));
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                title, number, number
            ));
            overrides.push((
                format!("/{}", part),
                "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"
                    .to_string(),
            ));
            parts.push((
                part,
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{}" xmlns:r="{}">{}</worksheet>"#,
                    MAIN_NS, REL_NS, body
                )
                .into_bytes(),
            ));
        }
        if self.reverse_sheet_relationships {
            sheet_rels.reverse();
        }

        let mut workbook_rels = sheet_rels;
        let next_id = self.sheets.len() + 1;
        for (offset, (kind, target, content)) in [
            ("sharedStrings", "sharedStrings.xml", &self.shared_strings),
            ("styles", "styles.xml", &self.styles),
            ("theme", "theme/theme1.xml", &self.theme),
        ]
        .iter()
        .enumerate()
        {
            if let Some(xml) = content {
                workbook_rels.push(relationship(
                    &format!("rId{}", next_id + offset),
                    kind,
                    target,
                ));
                parts.push((format!("xl/{}", target), xml.as_bytes().to_vec()));
            }
        }
        parts.push((
            "xl/_rels/workbook.xml.rels".to_string(),
            relationships(&workbook_rels).into_bytes(),
        ));
        parts.push((
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{}" xmlns:r="{}">{}<sheets>{}</sheets></workbook>"#,
                MAIN_NS, REL_NS, self.workbook_extra, sheet_entries
            )
            .into_bytes(),
        ));

        // content types
        let override_entries: String = overrides
            .iter()
            .map(|(part, content_type)| {
                format!(
                    r#"<Override PartName="{}" ContentType="{}"/>"#,
                    part, content_type
                )
            })
            .collect();
        parts.push((
            "[Content_Types].xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  {}
</Types>"#,
                override_entries
            )
            .into_bytes(),
        ));

        parts.extend(self.extra_parts.iter().cloned());

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            for (name, content) in &parts {
                if self.omitted_parts.contains(name) {
                    continue;
                }
                zip.start_file(name.as_str(), options).unwrap();
                zip.write_all(content).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer.into_inner()
    }
}

fn relationship(id: &str, kind: &str, target: &str) -> String {
    format!(
        r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/{}" Target="{}"/>"#,
        id, kind, target
    )
}

fn relationships(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        entries.concat()
    )
}

/// Stylesheet with two fonts, a custom number format at 164 and four cell
/// formats: default, bold, built-in date (14) and custom (164).
pub const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1"><numFmt numFmtId="164" formatCode="0.0%"/></numFmts>
  <fonts count="2">
    <font><sz val="11"/><name val="Calibri"/></font>
    <font><b/><sz val="11"/><name val="Calibri"/></font>
  </fonts>
  <fills count="2">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
  </fills>
  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="5">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
    <xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
    <xf numFmtId="163" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#;
