//! # xlsheet
//!
//! SpreadsheetML (.xlsx) reader that rebuilds a complete in-memory workbook:
//! package manifest, document properties, shared strings, styles, theme and
//! every worksheet's cells.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xlsheet::load_file;
//!
//! let workbook = load_file("report.xlsx")?;
//! for sheet in &workbook.worksheets {
//!     println!("{}: {} cells", sheet.title, sheet.cells.len());
//! }
//!
//! let sheet = workbook.sheet_by_title("Summary").expect("sheet exists");
//! println!("A1 = {}", sheet.value("A1"));
//! # Ok::<(), xlsheet::Error>(())
//! ```
//!
//! ## Reading from other sources
//!
//! ```no_run
//! use xlsheet::container::MemoryPackage;
//! use xlsheet::xlsx::{ReadOptions, XlsxReader};
//!
//! let package = MemoryPackage::new()
//!     .with_part("[Content_Types].xml", std::fs::read("unpacked/[Content_Types].xml")?)
//!     .with_part("_rels/.rels", std::fs::read("unpacked/_rels/.rels")?);
//!
//! let workbook = XlsxReader::new(package)
//!     .with_options(ReadOptions::new().with_strict_relationships(false))
//!     .read()?;
//! # Ok::<(), xlsheet::Error>(())
//! ```

pub mod container;
pub mod error;
pub mod manifest;
pub mod model;
pub mod xlsx;
pub mod xml;

// Re-exports
pub use container::{MemoryPackage, OoxmlContainer, PartSource};
pub use error::{Error, Result};
pub use manifest::{Manifest, Relationship, RelationshipType};
pub use model::{
    Cell, CellFormat, CellReference, CellStyle, CellValue, DocumentProperties, RangeReference,
    RichText, SheetDescriptor, Stylesheet, Workbook, Worksheet,
};
pub use xlsx::{ReadOptions, XlsxReader};

use std::path::Path;

/// Read an XLSX file with default options.
///
/// # Example
///
/// ```no_run
/// use xlsheet::load_file;
///
/// let workbook = load_file("book.xlsx")?;
/// println!("Sheets: {:?}", workbook.sheet_names());
/// # Ok::<(), xlsheet::Error>(())
/// ```
pub fn load_file(path: impl AsRef<Path>) -> Result<Workbook> {
    load_file_with_options(path, ReadOptions::default())
}

/// Read an XLSX file with options.
///
/// # Example
///
/// ```no_run
/// use xlsheet::{load_file_with_options, ReadOptions};
///
/// let options = ReadOptions::new().with_values_only(true);
/// let workbook = load_file_with_options("book.xlsx", options)?;
/// # Ok::<(), xlsheet::Error>(())
/// ```
pub fn load_file_with_options(path: impl AsRef<Path>, options: ReadOptions) -> Result<Workbook> {
    XlsxReader::open(path)?.with_options(options).read()
}

/// Read an XLSX file held in memory.
///
/// # Example
///
/// ```no_run
/// use xlsheet::load_bytes;
///
/// let data = std::fs::read("book.xlsx")?;
/// let workbook = load_bytes(data)?;
/// # Ok::<(), xlsheet::Error>(())
/// ```
pub fn load_bytes(data: Vec<u8>) -> Result<Workbook> {
    load_bytes_with_options(data, ReadOptions::default())
}

/// Read an XLSX file held in memory, with options.
pub fn load_bytes_with_options(data: Vec<u8>, options: ReadOptions) -> Result<Workbook> {
    XlsxReader::from_bytes(data)?.with_options(options).read()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bytes_rejects_non_zip() {
        let result = load_bytes(b"not a zip archive".to_vec());
        assert!(matches!(result, Err(Error::ZipArchive(_))));
    }

    #[test]
    fn test_load_file_missing() {
        let result = load_file("does/not/exist.xlsx");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
