//! Package part storage.
//!
//! A spreadsheet package is a set of named parts. [`PartSource`] is the narrow
//! interface the reader needs from it; [`OoxmlContainer`] provides it over a
//! ZIP archive and [`MemoryPackage`] over an in-memory map.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Byte-addressable access to the named parts of a package.
///
/// Part names use forward slashes and carry no leading `/`.
pub trait PartSource {
    /// Names of every part in the package.
    fn part_names(&self) -> Vec<String>;

    /// Check whether a part exists.
    fn has_part(&self, name: &str) -> bool;

    /// Read the raw bytes of a part.
    fn read_part(&self, name: &str) -> Result<Vec<u8>>;

    /// Read a part and decode it to a UTF-8 string.
    fn read_xml(&self, name: &str) -> Result<String> {
        decode_xml_bytes(&self.read_part(name)?)
    }
}

impl<P: PartSource + ?Sized> PartSource for &P {
    fn part_names(&self) -> Vec<String> {
        (**self).part_names()
    }

    fn has_part(&self, name: &str) -> bool {
        (**self).has_part(name)
    }

    fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        (**self).read_part(name)
    }
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => utf8_to_string(rest),
        [0xFF, 0xFE, rest @ ..] => Ok(relabel_utf16_declaration(decode_utf16(
            rest,
            u16::from_le_bytes,
        )?)),
        [0xFE, 0xFF, rest @ ..] => Ok(relabel_utf16_declaration(decode_utf16(
            rest,
            u16::from_be_bytes,
        )?)),
        // BOM-less UTF-16 still shows the zero high byte of the leading '<'
        [b'<', 0, _, 0, ..] => Ok(relabel_utf16_declaration(decode_utf16(
            bytes,
            u16::from_le_bytes,
        )?)),
        [0, b'<', 0, _, ..] => Ok(relabel_utf16_declaration(decode_utf16(
            bytes,
            u16::from_be_bytes,
        )?)),
        _ => utf8_to_string(bytes),
    }
}

fn utf8_to_string(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::invalid_value("UTF-8 part content", e.to_string()))
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::invalid_value("UTF-16 part content", e.to_string()))
}

/// The decoded text is UTF-8 now, so the declaration must stop claiming UTF-16.
fn relabel_utf16_declaration(content: String) -> String {
    if !content.starts_with("<?xml") {
        return content;
    }
    let Some(end) = content.find("?>") else {
        return content;
    };
    match content[..end].to_ascii_lowercase().find("utf-16") {
        Some(pos) => format!("{}UTF-8{}", &content[..pos], &content[pos + 6..]),
        None => content,
    }
}

/// Normalize a part name: forward slashes, no leading `/`.
pub fn normalize_part_name(name: &str) -> String {
    name.replace('\\', "/").trim_start_matches('/').to_string()
}

/// Resolve a relationship target against the part that owns the relationship.
///
/// `base` is the source part (empty or `/` for the package root). Absolute
/// targets start from the package root; `..` pops one directory.
pub fn resolve_path(base: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    let relative = match relative.strip_prefix('/') {
        Some(absolute) => absolute,
        None => {
            let base = base.trim_start_matches('/');
            if let Some(pos) = base.rfind('/') {
                segments.extend(base[..pos].split('/').filter(|s| !s.is_empty()));
            }
            relative
        }
    };

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Path of the relationships part belonging to `part` (root when empty).
pub fn rels_path_for(part: &str) -> String {
    let part = part.trim_start_matches('/');
    match part.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &part[..pos], &part[pos + 1..]),
        None => format!("_rels/{}.rels", part),
    }
}

/// Owner part of a relationships part, e.g. `xl/_rels/workbook.xml.rels`
/// belongs to `xl/workbook.xml`. Returns `None` for anything that is not
/// inside a `_rels` directory.
pub fn rels_owner(rels_path: &str) -> Option<String> {
    let (dir, file) = match rels_path.rfind('/') {
        Some(pos) => (&rels_path[..pos], &rels_path[pos + 1..]),
        None => return None,
    };
    let owner_file = file.strip_suffix(".rels")?;
    let owner_dir = if dir == "_rels" {
        ""
    } else {
        dir.strip_suffix("/_rels")?
    };

    if owner_dir.is_empty() {
        Some(owner_file.to_string())
    } else {
        Some(format!("{}/{}", owner_dir, owner_file))
    }
}

/// OOXML package backed by a ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
    /// Normalized part names in archive order.
    names: Vec<String>,
    /// Normalized part name to archive entry name.
    entries: HashMap<String, String>,
}

impl OoxmlContainer {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xlsheet::container::{OoxmlContainer, PartSource};
    ///
    /// let container = OoxmlContainer::open("book.xlsx")?;
    /// assert!(container.has_part("[Content_Types].xml"));
    /// # Ok::<(), xlsheet::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut names = Vec::new();
        let mut entries = HashMap::new();
        for entry in archive.file_names().filter(|name| !name.ends_with('/')) {
            let name = normalize_part_name(entry);
            if entries.insert(name.clone(), entry.to_string()).is_none() {
                names.push(name);
            }
        }
        Ok(Self {
            archive: RefCell::new(archive),
            names,
            entries,
        })
    }

    /// Create a package from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }
}

impl PartSource for OoxmlContainer {
    fn part_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn has_part(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_part_name(name))
    }

    fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        let name = normalize_part_name(name);
        let entry = self
            .entries
            .get(&name)
            .ok_or_else(|| Error::MissingPart(name.clone()))?;
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(entry)
            .map_err(|_| Error::MissingPart(name.clone()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("parts", &self.names.len())
            .finish()
    }
}

/// Package held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackage {
    parts: BTreeMap<String, Vec<u8>>,
}

impl MemoryPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a part.
    pub fn insert(&mut self, name: &str, content: impl Into<Vec<u8>>) {
        self.parts.insert(normalize_part_name(name), content.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_part(mut self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(name, content);
        self
    }
}

impl PartSource for MemoryPackage {
    fn part_names(&self) -> Vec<String> {
        self.parts.keys().cloned().collect()
    }

    fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(&normalize_part_name(name))
    }

    fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        let name = normalize_part_name(name);
        self.parts
            .get(&name)
            .cloned()
            .ok_or(Error::MissingPart(name))
    }
}
