//! End-to-end reads of packages assembled in memory.

mod common;

use common::{XlsxBuilder, STYLES_XML, TEMPLATE_CONTENT_TYPE};
use std::io::Write;
use xlsheet::model::{Calendar, CellValue, Font, SheetState};
use xlsheet::{load_bytes, load_bytes_with_options, load_file, Error, ReadOptions, XlsxReader};

fn row(cells: &str) -> String {
    format!("<sheetData><row r=\"1\">{}</row></sheetData>", cells)
}

#[test]
fn test_hello_world() {
    let data = XlsxBuilder::new()
        .sheet("Sheet1", &row(r#"<c r="A1" t="s"><v>0</v></c>"#))
        .shared_strings(&["Hello"])
        .build();

    let workbook = load_bytes(data).unwrap();
    assert_eq!(workbook.sheet_names(), ["Sheet1"]);
    assert_eq!(workbook.shared_strings.len(), 1);

    let sheet = workbook.sheet_by_title("Sheet1").unwrap();
    let value = sheet.value("A1");
    assert_eq!(value.as_text().as_deref(), Some("Hello"));
    assert_eq!(value.to_string(), "Hello");

    assert_eq!(
        workbook.manifest.content_type("xl/workbook.xml"),
        Some(common::SHEET_CONTENT_TYPE)
    );
}

#[test]
fn test_sheet_order_follows_workbook_list() {
    let data = XlsxBuilder::new()
        .sheet("Alpha", "<sheetData/>")
        .sheet("Beta", "<sheetData/>")
        .sheet("Gamma", "<sheetData/>")
        .reverse_sheet_relationships()
        .build();

    let workbook = load_bytes(data).unwrap();
    let titles: Vec<&str> = workbook.worksheets.iter().map(|w| w.title.as_str()).collect();
    assert_eq!(titles, ["Alpha", "Beta", "Gamma"]);
    assert_eq!(workbook.sheet_names(), titles);
}

#[test]
fn test_formula_and_values_only() {
    let data = XlsxBuilder::new()
        .sheet(
            "Sheet1",
            &row(r#"<c r="A1"><v>2</v></c><c r="B1"><f>A1*21</f><v>42</v></c>"#),
        )
        .build();

    let workbook = load_bytes(data.clone()).unwrap();
    let cell = workbook.worksheets[0].cell("B1").unwrap();
    assert_eq!(cell.formula.as_deref(), Some("A1*21"));
    assert!(cell.value.is_empty());

    let options = ReadOptions::new().with_values_only(true);
    let workbook = load_bytes_with_options(data, options).unwrap();
    let cell = workbook.worksheets[0].cell("B1").unwrap();
    assert!(!cell.has_formula());
    assert_eq!(cell.value, CellValue::Number(42.0));
}

#[test]
fn test_merge_count_mismatch() {
    let data = XlsxBuilder::new()
        .sheet(
            "Sheet1",
            r#"<sheetData/><mergeCells count="2"><mergeCell ref="A1:B1"/></mergeCells>"#,
        )
        .build();

    match load_bytes(data) {
        Err(Error::CountMismatch {
            element,
            declared,
            parsed,
        }) => {
            assert_eq!(element, "mergeCells");
            assert_eq!((declared, parsed), (2, 1));
        }
        other => panic!("expected count mismatch, got {:?}", other),
    }
}

#[test]
fn test_shared_string_count_mismatch() {
    let data = XlsxBuilder::new()
        .sheet("Sheet1", "<sheetData/>")
        .shared_strings_xml(
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" uniqueCount="3"><si><t>a</t></si><si><t>b</t></si></sst>"#,
        )
        .build();

    let error = load_bytes(data).unwrap_err();
    assert!(matches!(error, Error::CountMismatch { .. }));
    assert!(error.to_string().contains("counts don't match"));
}

#[test]
fn test_missing_package_structure() {
    let no_types = XlsxBuilder::new()
        .sheet("Sheet1", "<sheetData/>")
        .omit("[Content_Types].xml")
        .build();
    assert!(matches!(load_bytes(no_types), Err(Error::MissingPart(_))));

    let no_root_rels = XlsxBuilder::new()
        .sheet("Sheet1", "<sheetData/>")
        .omit("_rels/.rels")
        .build();
    assert!(matches!(load_bytes(no_root_rels), Err(Error::MissingPart(_))));
}

#[test]
fn test_strict_relationship_targets() {
    let sheet_rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/" TargetMode="External"/>
</Relationships>"#;
    let data = XlsxBuilder::new()
        .sheet("Sheet1", "<sheetData/>")
        .part("xl/worksheets/_rels/sheet1.xml.rels", sheet_rels)
        .build();

    match load_bytes(data.clone()) {
        Err(Error::MissingPart(part)) => assert!(part.starts_with("xl/drawings/drawing1.xml")),
        other => panic!("expected missing part, got {:?}", other),
    }

    let lenient = ReadOptions::new().with_strict_relationships(false);
    let workbook = load_bytes_with_options(data, lenient).unwrap();
    let drawing = workbook
        .manifest
        .relationship("xl/worksheets/sheet1.xml", "rId1")
        .unwrap();
    assert_eq!(drawing.target_path(), "xl/drawings/drawing1.xml");
    assert!(workbook
        .manifest
        .relationship("xl/worksheets/sheet1.xml", "rId2")
        .unwrap()
        .is_external());
}

#[test]
fn test_wrong_document_type() {
    let macro_enabled = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";
    let data = XlsxBuilder::new()
        .sheet("Sheet1", "<sheetData/>")
        .workbook_content_type(macro_enabled)
        .build();

    match load_bytes(data) {
        Err(Error::InvalidFile(content_type)) => assert_eq!(content_type, macro_enabled),
        other => panic!("expected invalid file, got {:?}", other),
    }
}

#[test]
fn test_template_is_accepted() {
    let data = XlsxBuilder::new()
        .sheet("Sheet1", &row(r#"<c r="A1"><v>1</v></c>"#))
        .workbook_content_type(TEMPLATE_CONTENT_TYPE)
        .build();

    let workbook = load_bytes(data).unwrap();
    assert_eq!(workbook.worksheets[0].value("A1"), CellValue::Number(1.0));
}

#[test]
fn test_cell_formats_keep_their_indices() {
    let data = XlsxBuilder::new()
        .sheet(
            "Sheet1",
            &row(
                r#"<c r="A1" s="1"><v>1</v></c><c r="B1" s="2"><v>44197</v></c><c r="C1" s="3"><v>0.25</v></c><c r="D1" s="4"><v>7</v></c>"#,
            ),
        )
        .styles(STYLES_XML)
        .build();

    let workbook = load_bytes(data).unwrap();
    let sheet = &workbook.worksheets[0];
    assert_eq!(workbook.stylesheet.formats.len(), 5);

    let bold = sheet.cell("A1").unwrap().format_id.unwrap();
    let format = workbook.cell_format(bold).unwrap();
    assert!(format.font.value.bold);
    assert_eq!(format.style.as_deref(), Some("Normal"));
    let plain = Font {
        name: Some("Calibri".into()),
        size: Some(11.0),
        ..Default::default()
    };
    assert_eq!(workbook.cell_format(0).unwrap().font.value, plain);

    let date = sheet.cell("B1").unwrap().format_id.unwrap();
    assert!(workbook.stylesheet.is_date_format(date));
    let serial = sheet.value("B1").as_f64().unwrap();
    assert_eq!(
        workbook.calendar.serial_to_iso(serial).as_deref(),
        Some("2021-01-01")
    );

    // 164 is the first custom id; 163 falls back to a built-in or General
    let custom = workbook.cell_format(3).unwrap();
    assert_eq!(custom.number_format.value.id, 164);
    assert_eq!(custom.number_format.value.format_code, "0.0%");
    let below = workbook.cell_format(4).unwrap();
    assert_eq!(below.number_format.value.id, 163);
    assert_eq!(below.number_format.value.format_code, "General");
}

#[test]
fn test_style_index_without_styles_part() {
    let data = XlsxBuilder::new()
        .sheet("Sheet1", &row(r#"<c r="A1" s="1"><v>1</v></c>"#))
        .build();

    assert!(matches!(
        load_bytes(data),
        Err(Error::IndexOutOfRange { table: "cellXfs", index: 1, len: 0 })
    ));
}

#[test]
fn test_column_widths() {
    let data = XlsxBuilder::new()
        .sheet(
            "Sheet1",
            r#"<cols><col min="1" max="1" width="8" customWidth="1"/><col min="2" max="4" width="25.5" customWidth="1"/></cols><sheetData/>"#,
        )
        .build();

    let workbook = load_bytes(data).unwrap();
    let columns = &workbook.worksheets[0].column_properties;
    assert_eq!(columns[&1].width, Some(8.0));
    for column in 2..=4 {
        assert_eq!(columns[&column].width, Some(25.5));
    }
    assert!(!columns.contains_key(&5));
}

#[test]
fn test_reread_replaces_previous_contents() {
    let first = XlsxBuilder::new()
        .sheet("One", "<sheetData/>")
        .sheet("Two", "<sheetData/>")
        .shared_strings(&["x", "y"])
        .build();
    let second = XlsxBuilder::new().sheet("Only", "<sheetData/>").build();

    let mut workbook = XlsxReader::from_bytes(first).unwrap().read().unwrap();
    assert_eq!(workbook.worksheets.len(), 2);

    XlsxReader::from_bytes(second)
        .unwrap()
        .read_into(&mut workbook)
        .unwrap();
    assert_eq!(workbook.sheet_names(), ["Only"]);
    assert_eq!(workbook.worksheets.len(), 1);
    assert!(workbook.shared_strings.is_empty());
}

#[test]
fn test_load_from_path() {
    let data = XlsxBuilder::new()
        .sheet("Sheet1", &row(r#"<c r="A1" t="b"><v>1</v></c>"#))
        .build();

    let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let workbook = load_file(file.path()).unwrap();
    assert_eq!(workbook.worksheets[0].value("A1"), CellValue::Boolean(true));
}

#[test]
fn test_theme_and_calendar() {
    let theme = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Custom">
  <a:themeElements><a:clrScheme name="Custom">
    <a:dk1><a:sysClr val="windowText" lastClr="111111"/></a:dk1>
    <a:accent1><a:srgbClr val="ABCDEF"/></a:accent1>
  </a:clrScheme></a:themeElements>
</a:theme>"#;
    let data = XlsxBuilder::new()
        .sheet("Sheet1", "<sheetData/>")
        .theme(theme)
        .workbook_extra(r#"<workbookPr date1904="1"/>"#)
        .build();

    let workbook = load_bytes(data).unwrap();
    let theme = workbook.theme.as_ref().unwrap();
    assert_eq!(theme.name, "Custom");
    assert_eq!(theme.color_by_index(1), Some("111111"));
    assert_eq!(theme.color_by_index(4), Some("ABCDEF"));
    assert_eq!(workbook.calendar, Calendar::Mac1904);
}

#[test]
fn test_document_properties() {
    let core = r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:creator>Ada</dc:creator>
  <cp:lastModifiedBy>Grace</cp:lastModifiedBy>
  <dcterms:created xsi:type="dcterms:W3CDTF">2023-04-01T09:30:00Z</dcterms:created>
</cp:coreProperties>"#;
    let app = r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <Application>Microsoft Excel</Application>
  <TitlesOfParts><vt:vector size="1" baseType="lpstr"><vt:lpstr>Sheet1</vt:lpstr></vt:vector></TitlesOfParts>
</Properties>"#;
    let custom = r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="2" name="Owner"><vt:lpwstr>Finance</vt:lpwstr></property>
</Properties>"#;

    let data = XlsxBuilder::new()
        .sheet("Sheet1", "<sheetData/>")
        .core_properties(core)
        .app_properties(app)
        .custom_properties(custom)
        .build();

    let workbook = load_bytes(data).unwrap();
    let props = &workbook.properties;
    assert_eq!(props.creator.as_deref(), Some("Ada"));
    assert_eq!(props.last_modified_by.as_deref(), Some("Grace"));
    assert_eq!(props.created.unwrap().to_string(), "2023-04-01T09:30:00Z");
    assert_eq!(props.application.as_deref(), Some("Microsoft Excel"));
    assert_eq!(props.titles_of_parts, ["Sheet1"]);
    assert_eq!(props.custom_property("Owner"), Some("Finance"));
}

#[test]
fn test_json_output() {
    let data = XlsxBuilder::new()
        .sheet("Visible", &row(r#"<c r="A1" t="inlineStr"><is><t>inline</t></is></c>"#))
        .build();
    let workbook = load_bytes(data).unwrap();
    assert_eq!(workbook.sheets[0].state, SheetState::Visible);

    let json: serde_json::Value = serde_json::from_str(&workbook.to_json().unwrap()).unwrap();
    let cell = &json["worksheets"][0]["cells"]["A1"];
    assert_eq!(cell["reference"], "A1");
    assert_eq!(cell["value"]["type"], "inlineString");
    assert_eq!(cell["value"]["value"], "inline");
}
