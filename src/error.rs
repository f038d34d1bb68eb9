//! Error types for the xlsheet library.

use std::io;
use thiserror::Error;

/// Result type alias for xlsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a workbook package.
///
/// Every variant is fatal: a read either produces a complete workbook or
/// fails with one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error reported by the XML tokenizer.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A part required by the package structure is absent.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The package is not a spreadsheet this reader accepts.
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// A declared `count`/`uniqueCount` disagrees with the parsed children.
    #[error("<{element}>: counts don't match (declared {declared}, parsed {parsed})")]
    CountMismatch {
        element: String,
        declared: usize,
        parsed: usize,
    },

    /// The XML grammar expected a different element at this position.
    #[error("Unexpected element in {part}: expected <{expected}>, found {found}")]
    UnexpectedElement {
        part: String,
        expected: String,
        found: String,
    },

    /// A required attribute is absent.
    #[error("Missing attribute {attribute} on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    /// Text could not be coerced to the expected value type.
    #[error("Invalid {what}: {value:?}")]
    InvalidValue { what: String, value: String },

    /// A cell or range reference is malformed.
    #[error("Invalid cell reference: {0:?}")]
    InvalidReference(String),

    /// An index names no entry in the table it refers to.
    #[error("{table} index {index} out of range ({len} entries)")]
    IndexOutOfRange {
        table: &'static str,
        index: usize,
        len: usize,
    },
}

impl Error {
    pub(crate) fn invalid_value(what: impl Into<String>, value: impl Into<String>) -> Self {
        Error::InvalidValue {
            what: what.into(),
            value: value.into(),
        }
    }

    pub(crate) fn count_mismatch(element: &str, declared: usize, parsed: usize) -> Self {
        Error::CountMismatch {
            element: element.to_string(),
            declared,
            parsed,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}
