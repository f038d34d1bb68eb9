//! XLSX (SpreadsheetML) workbook reader.
//!
//! A read walks the package's relationship graph in three passes: package
//! properties and the workbook part, then the shared string table, styles
//! and theme, and finally the sheets whose cells refer to those tables.
//!
//! # Example
//!
//! ```no_run
//! use xlsheet::xlsx::{ReadOptions, XlsxReader};
//!
//! let reader = XlsxReader::open("spreadsheet.xlsx")?
//!     .with_options(ReadOptions::new().with_values_only(true));
//! let workbook = reader.read()?;
//!
//! for sheet in &workbook.worksheets {
//!     println!("Sheet: {} ({} cells)", sheet.title, sheet.cells.len());
//! }
//! # Ok::<(), xlsheet::Error>(())
//! ```

mod options;
mod properties;
mod reader;
mod shared_strings;
mod styles;
mod theme;
mod workbook;
mod worksheet;

pub use options::ReadOptions;
pub use reader::{check_document_type, XlsxReader, WORKBOOK_CONTENT_TYPES};
