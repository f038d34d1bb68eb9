//! In-memory workbook model.
//!
//! The reader in [`crate::xlsx`] fills these structures; everything derives
//! `serde` traits so a loaded workbook can be dumped as JSON.

mod cell;
mod properties;
mod style;
mod text;
mod theme;
mod workbook;
mod worksheet;

pub use cell::*;
pub use properties::*;
pub use style::*;
pub use text::*;
pub use theme::*;
pub use workbook::*;
pub use worksheet::*;
