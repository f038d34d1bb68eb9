//! Benchmarks for xlsheet reading performance.
//!
//! Run with: cargo bench
//!
//! Workbooks are generated with a growing number of rows; each row mixes
//! shared strings, numbers, booleans and a formula.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

/// Creates a synthetic XLSX workbook with the given number of rows.
fn create_test_xlsx(row_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
  <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
  <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
    )
    .unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
    )
    .unwrap();

    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
    )
    .unwrap();

    zip.start_file("xl/styles.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="1"><fill><patternFill patternType="none"/></fill></fills>
  <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="3">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#,
    )
    .unwrap();

    const LABELS: usize = 50;
    let mut strings = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
        row_count, LABELS
    );
    for i in 0..LABELS {
        strings.push_str(&format!("<si><t>Label {}</t></si>", i));
    }
    strings.push_str("</sst>");
    zip.start_file("xl/sharedStrings.xml", options).unwrap();
    zip.write_all(strings.as_bytes()).unwrap();

    let mut sheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <dimension ref="A1:E{}"/>
  <sheetData>"#,
        row_count
    );
    for row in 1..=row_count {
        sheet.push_str(&format!(
            r#"<row r="{r}" spans="1:5"><c r="A{r}" t="s" s="1"><v>{label}</v></c><c r="B{r}"><v>{value}</v></c><c r="C{r}" s="2"><v>{date}</v></c><c r="D{r}" t="b"><v>{flag}</v></c><c r="E{r}"><f>B{r}*2</f><v>{double}</v></c></row>"#,
            r = row,
            label = row % LABELS,
            value = row as f64 * 1.5,
            date = 44197 + row % 365,
            flag = row % 2,
            double = row as f64 * 3.0,
        ));
    }
    sheet.push_str("</sheetData></worksheet>");
    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(sheet.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark full workbook reads at various sizes.
fn bench_xlsx_reading(c: &mut Criterion) {
    let mut group = c.benchmark_group("xlsx_reading");

    for row_count in [10, 100, 1000, 10000].iter() {
        let data = create_test_xlsx(*row_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = xlsheet::load_bytes(black_box(data.clone()));
            });
        });
    }

    group.finish();
}

/// Benchmark reads that keep cached values instead of formulas.
fn bench_values_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("values_only");

    for row_count in [100, 1000].iter() {
        let data = create_test_xlsx(*row_count);

        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let options = xlsheet::ReadOptions::new().with_values_only(true);
                let _ = xlsheet::load_bytes_with_options(black_box(data.clone()), options);
            });
        });
    }

    group.finish();
}

/// Benchmark JSON serialization of a loaded workbook.
fn bench_json_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_output");

    for row_count in [100, 1000].iter() {
        let data = create_test_xlsx(*row_count);
        let workbook = xlsheet::load_bytes(data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("rows", row_count),
            &workbook,
            |b, workbook| {
                b.iter(|| {
                    let _ = black_box(workbook).to_json_compact();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_xlsx_reading,
    bench_values_only,
    bench_json_output,
);
criterion_main!(benches);
