//! Workbook orchestration: walks the relationship graph and hands each part
//! to its reader.

use super::properties::{read_core_properties, read_custom_properties, read_extended_properties};
use super::shared_strings::read_shared_strings;
use super::styles::read_stylesheet;
use super::theme::read_theme;
use super::workbook::read_workbook_part;
use super::worksheet::{insert_placeholder_sheet, read_worksheet};
use super::ReadOptions;
use crate::container::{OoxmlContainer, PartSource};
use crate::error::{Error, Result};
use crate::manifest::{Manifest, Relationship, RelationshipType, PACKAGE_ROOT};
use crate::model::{SheetKind, Workbook};
use std::path::Path;

/// Content types accepted for the main workbook part.
pub const WORKBOOK_CONTENT_TYPES: [&str; 2] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml",
];

type PartReader = fn(&str, &str, &mut Workbook) -> Result<()>;

/// Reader for SpreadsheetML packages.
///
/// Generic over where the parts come from; [`XlsxReader::open`] and
/// [`XlsxReader::from_bytes`] read ZIP archives.
pub struct XlsxReader<S = OoxmlContainer> {
    source: S,
    options: ReadOptions,
}

impl XlsxReader<OoxmlContainer> {
    /// Open an XLSX file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(OoxmlContainer::open(path)?))
    }

    /// Create a reader from the bytes of an XLSX file.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self::new(OoxmlContainer::from_bytes(data)?))
    }
}

impl<S: PartSource> XlsxReader<S> {
    /// Create a reader over any part source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: ReadOptions::default(),
        }
    }

    /// Set read options.
    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    /// Current read options.
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// The underlying part source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read the package into a new workbook.
    pub fn read(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        self.read_into(&mut workbook)?;
        Ok(workbook)
    }

    /// Read the package into `workbook`, replacing whatever it held.
    ///
    /// On error the workbook is left empty.
    pub fn read_into(&self, workbook: &mut Workbook) -> Result<()> {
        workbook.clear();
        let result = self.populate(workbook);
        if result.is_err() {
            workbook.clear();
        }
        result
    }

    fn populate(&self, workbook: &mut Workbook) -> Result<()> {
        let manifest = Manifest::read(&self.source, self.options.strict_relationships)?;
        log::debug!(
            "Manifest has {} relationships",
            manifest.relationship_count()
        );

        // Pass 0: package properties and the workbook part itself
        let mut workbook_part = None;
        for rel in manifest.relationships_from(PACKAGE_ROOT) {
            if rel.is_external() {
                skip(rel);
                continue;
            }
            let part = rel.target_path();
            match rel.rel_type {
                RelationshipType::CoreProperties => {
                    self.read_part(&part, workbook, read_core_properties)?
                }
                RelationshipType::ExtendedProperties => {
                    self.read_part(&part, workbook, read_extended_properties)?
                }
                RelationshipType::CustomProperties => {
                    self.read_part(&part, workbook, read_custom_properties)?
                }
                RelationshipType::OfficeDocument => {
                    check_document_type(manifest.content_type(&part))?;
                    self.read_part(&part, workbook, read_workbook_part)?;
                    workbook_part = Some(part);
                }
                _ => skip(rel),
            }
        }

        let workbook_part = workbook_part.ok_or_else(|| {
            Error::InvalidFile("package has no office document relationship".to_string())
        })?;
        let workbook_rels = manifest.relationships_from(&workbook_part);

        // Pass 1: tables that cells refer to
        for rel in workbook_rels.iter().filter(|r| !r.is_external()) {
            let part = rel.target_path();
            match rel.rel_type {
                RelationshipType::SharedStringTable => {
                    self.read_part(&part, workbook, read_shared_strings)?
                }
                RelationshipType::Styles => self.read_part(&part, workbook, read_stylesheet)?,
                RelationshipType::Theme => self.read_part(&part, workbook, read_theme)?,
                _ => {}
            }
        }

        // Pass 2: sheets
        for rel in workbook_rels {
            if rel.is_external() {
                skip(rel);
                continue;
            }
            match rel.rel_type {
                RelationshipType::Worksheet => {
                    let part = rel.target_path();
                    log::trace!("Reading {}", part);
                    let xml = self.source.read_xml(&part)?;
                    read_worksheet(&xml, &part, &rel.id, &self.options, workbook)?;
                }
                RelationshipType::Chartsheet => {
                    insert_placeholder_sheet(workbook, &rel.id, SheetKind::Chartsheet)?
                }
                RelationshipType::Dialogsheet => {
                    insert_placeholder_sheet(workbook, &rel.id, SheetKind::Dialogsheet)?
                }
                RelationshipType::SharedStringTable
                | RelationshipType::Styles
                | RelationshipType::Theme => {}
                _ => skip(rel),
            }
        }

        workbook.manifest = manifest;
        Ok(())
    }

    fn read_part(&self, part: &str, workbook: &mut Workbook, read: PartReader) -> Result<()> {
        log::trace!("Reading {}", part);
        let xml = self.source.read_xml(part)?;
        read(&xml, part, workbook)
    }
}

/// Accept the workbook part only as a sheet or template.
pub fn check_document_type(content_type: Option<&str>) -> Result<()> {
    match content_type {
        Some(content_type) if WORKBOOK_CONTENT_TYPES.contains(&content_type) => Ok(()),
        Some(content_type) => Err(Error::InvalidFile(content_type.to_string())),
        None => Err(Error::InvalidFile(
            "workbook part has no content type".to_string(),
        )),
    }
}

fn skip(rel: &Relationship) {
    log::debug!(
        "Skipping {} relationship {} -> {}",
        rel.rel_type.label(),
        rel.id,
        rel.target
    );
}

impl<S> std::fmt::Debug for XlsxReader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxReader")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
