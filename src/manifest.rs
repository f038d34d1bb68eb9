//! Package relationship graph and content-type table.
//!
//! The manifest is built once per read from the package's `.rels` parts and
//! `[Content_Types].xml`. It answers which parts a given part relates to and
//! with what role, and what content type each part declares.

use crate::container::{normalize_part_name, rels_owner, resolve_path, PartSource};
use crate::error::{Error, Result};
use crate::xml::XmlReader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source name used for the package-level relationships in `_rels/.rels`.
pub const PACKAGE_ROOT: &str = "/";

const ROOT_RELS: &str = "_rels/.rels";
const CONTENT_TYPES: &str = "[Content_Types].xml";

/// Whether a relationship target lives inside the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

/// Role of a relationship, recognised by the last segment of its type URI so
/// that transitional and strict namespaces map to the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    OfficeDocument,
    CoreProperties,
    ExtendedProperties,
    CustomProperties,
    Thumbnail,
    Worksheet,
    Chartsheet,
    Dialogsheet,
    SharedStringTable,
    Styles,
    Theme,
    CalculationChain,
    Connections,
    CustomXmlMappings,
    ExternalWorkbookReferences,
    Metadata,
    PivotTable,
    PivotTableCacheDefinition,
    SharedWorkbookRevisionHeaders,
    SharedWorkbookUserData,
    VolatileDependencies,
    Comments,
    Drawing,
    Hyperlink,
    VbaProject,
    PrinterSettings,
    Unknown(String),
}

impl RelationshipType {
    /// Classify a relationship type URI.
    pub fn from_uri(uri: &str) -> Self {
        let last = uri.rsplit('/').next().unwrap_or(uri);
        match last {
            "officeDocument" => Self::OfficeDocument,
            "core-properties" => Self::CoreProperties,
            "extended-properties" => Self::ExtendedProperties,
            "custom-properties" => Self::CustomProperties,
            "thumbnail" => Self::Thumbnail,
            "worksheet" => Self::Worksheet,
            "chartsheet" => Self::Chartsheet,
            "dialogsheet" => Self::Dialogsheet,
            "sharedStrings" => Self::SharedStringTable,
            "styles" => Self::Styles,
            "theme" => Self::Theme,
            "calcChain" => Self::CalculationChain,
            "connections" => Self::Connections,
            "xmlMaps" => Self::CustomXmlMappings,
            "externalLink" => Self::ExternalWorkbookReferences,
            "sheetMetadata" => Self::Metadata,
            "pivotTable" => Self::PivotTable,
            "pivotCacheDefinition" => Self::PivotTableCacheDefinition,
            "revisionHeaders" => Self::SharedWorkbookRevisionHeaders,
            "usernames" => Self::SharedWorkbookUserData,
            "volatileDependencies" => Self::VolatileDependencies,
            "comments" => Self::Comments,
            "drawing" => Self::Drawing,
            "hyperlink" => Self::Hyperlink,
            "vbaProject" => Self::VbaProject,
            "printerSettings" => Self::PrinterSettings,
            _ => Self::Unknown(uri.to_string()),
        }
    }

    /// Short human-readable name.
    pub fn label(&self) -> &str {
        match self {
            Self::OfficeDocument => "officeDocument",
            Self::CoreProperties => "core-properties",
            Self::ExtendedProperties => "extended-properties",
            Self::CustomProperties => "custom-properties",
            Self::Thumbnail => "thumbnail",
            Self::Worksheet => "worksheet",
            Self::Chartsheet => "chartsheet",
            Self::Dialogsheet => "dialogsheet",
            Self::SharedStringTable => "sharedStrings",
            Self::Styles => "styles",
            Self::Theme => "theme",
            Self::CalculationChain => "calcChain",
            Self::Connections => "connections",
            Self::CustomXmlMappings => "xmlMaps",
            Self::ExternalWorkbookReferences => "externalLink",
            Self::Metadata => "sheetMetadata",
            Self::PivotTable => "pivotTable",
            Self::PivotTableCacheDefinition => "pivotCacheDefinition",
            Self::SharedWorkbookRevisionHeaders => "revisionHeaders",
            Self::SharedWorkbookUserData => "usernames",
            Self::VolatileDependencies => "volatileDependencies",
            Self::Comments => "comments",
            Self::Drawing => "drawing",
            Self::Hyperlink => "hyperlink",
            Self::VbaProject => "vbaProject",
            Self::PrinterSettings => "printerSettings",
            Self::Unknown(uri) => uri,
        }
    }
}

/// A typed edge from a source part (or the package root) to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1"), unique per source part.
    pub id: String,
    pub rel_type: RelationshipType,
    /// Type URI as written.
    pub type_uri: String,
    /// Owning part, or [`PACKAGE_ROOT`].
    pub source: String,
    /// Target as written in the `.rels` part.
    pub target: String,
    pub target_mode: TargetMode,
}

impl Relationship {
    /// Whether the target lives outside the package.
    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }

    /// Package part name of the target, resolved against the source part's
    /// directory. External targets are returned unchanged.
    pub fn target_path(&self) -> String {
        if self.is_external() {
            self.target.clone()
        } else {
            resolve_path(&self.source, &self.target)
        }
    }
}

/// Content-type table from `[Content_Types].xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypes {
    /// Lower-cased extension to content type.
    pub defaults: BTreeMap<String, String>,
    /// Normalized part name to content type.
    pub overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Content type of a part; an override wins over the extension default.
    pub fn get(&self, part: &str) -> Option<&str> {
        let part = normalize_part_name(part);
        if let Some(content_type) = self.overrides.get(&part) {
            return Some(content_type.as_str());
        }
        let file = part.rsplit('/').next().unwrap_or(&part);
        let (_, extension) = file.rsplit_once('.')?;
        self.defaults
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// All relationships of a package plus its content types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    relationships: BTreeMap<String, Vec<Relationship>>,
    content_types: ContentTypes,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the manifest of a package.
    ///
    /// `_rels/.rels` and `[Content_Types].xml` must exist. With `strict`,
    /// every internal relationship target must name a part in the package.
    pub fn read<S: PartSource + ?Sized>(source: &S, strict: bool) -> Result<Self> {
        let mut manifest = Self::new();

        if !source.has_part(ROOT_RELS) {
            return Err(Error::MissingPart(ROOT_RELS.to_string()));
        }
        manifest.read_relationships(source, ROOT_RELS, PACKAGE_ROOT)?;

        if !source.has_part(CONTENT_TYPES) {
            return Err(Error::MissingPart(CONTENT_TYPES.to_string()));
        }
        let xml = source.read_xml(CONTENT_TYPES)?;
        manifest.read_content_types(&xml)?;

        for name in source.part_names() {
            if name == ROOT_RELS || !name.ends_with(".rels") {
                continue;
            }
            match rels_owner(&name) {
                Some(owner) => manifest.read_relationships(source, &name, &owner)?,
                None => log::debug!("Ignoring relationships part outside _rels: {}", name),
            }
        }

        if strict {
            manifest.check_targets(source)?;
        }

        Ok(manifest)
    }

    fn read_relationships<S: PartSource + ?Sized>(
        &mut self,
        source: &S,
        rels_path: &str,
        owner: &str,
    ) -> Result<()> {
        log::trace!("Reading relationships {}", rels_path);
        let xml = source.read_xml(rels_path)?;
        for rel in parse_relationships(&xml, rels_path, owner)? {
            self.register_relationship(rel);
        }
        Ok(())
    }

    fn read_content_types(&mut self, xml: &str) -> Result<()> {
        let mut reader = XmlReader::new(xml, CONTENT_TYPES);
        reader.expect_root("Types")?;

        while let Some(child) = reader.next_child()? {
            match child.name() {
                "Default" => {
                    let extension = child.required("Extension")?;
                    let content_type = child.required("ContentType")?;
                    self.register_default_type(extension, content_type);
                }
                "Override" => {
                    let part = child.required("PartName")?;
                    let content_type = child.required("ContentType")?;
                    self.register_override_type(part, content_type);
                }
                _ => {}
            }
            reader.skip_to_end()?;
        }
        Ok(())
    }

    fn check_targets<S: PartSource + ?Sized>(&self, source: &S) -> Result<()> {
        for rel in self.relationships() {
            if rel.is_external() {
                continue;
            }
            let target = rel.target_path();
            if !source.has_part(&target) {
                return Err(Error::MissingPart(format!(
                    "{} (target of {} in {})",
                    target, rel.id, rel.source
                )));
            }
        }
        Ok(())
    }

    /// Add a relationship.
    pub fn register_relationship(&mut self, rel: Relationship) {
        self.relationships
            .entry(rel.source.clone())
            .or_default()
            .push(rel);
    }

    /// Register a default content type for a file extension.
    pub fn register_default_type(&mut self, extension: &str, content_type: &str) {
        self.content_types.defaults.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            content_type.to_string(),
        );
    }

    /// Register a content type for one exact part.
    pub fn register_override_type(&mut self, part: &str, content_type: &str) {
        self.content_types
            .overrides
            .insert(normalize_part_name(part), content_type.to_string());
    }

    /// Relationships owned by `source`, in file order.
    pub fn relationships_from(&self, source: &str) -> &[Relationship] {
        let key = if source.is_empty() || source == PACKAGE_ROOT {
            PACKAGE_ROOT.to_string()
        } else {
            normalize_part_name(source)
        };
        self.relationships
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look a relationship up by source part and id.
    pub fn relationship(&self, source: &str, id: &str) -> Option<&Relationship> {
        self.relationships_from(source).iter().find(|r| r.id == id)
    }

    /// First relationship of a given type owned by `source`.
    pub fn relationship_of_type(
        &self,
        source: &str,
        rel_type: &RelationshipType,
    ) -> Option<&Relationship> {
        self.relationships_from(source)
            .iter()
            .find(|r| &r.rel_type == rel_type)
    }

    /// Every relationship in the package.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values().flatten()
    }

    /// Number of relationships in the package.
    pub fn relationship_count(&self) -> usize {
        self.relationships.values().map(Vec::len).sum()
    }

    /// Content type declared for a part.
    pub fn content_type(&self, part: &str) -> Option<&str> {
        self.content_types.get(part)
    }

    /// The content-type table.
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.relationships.clear();
        self.content_types = ContentTypes::default();
    }
}

/// Parse one `.rels` part owned by `owner`.
pub fn parse_relationships(xml: &str, part: &str, owner: &str) -> Result<Vec<Relationship>> {
    let mut reader = XmlReader::new(xml, part);
    reader.expect_root("Relationships")?;

    let mut rels = Vec::new();
    while let Some(child) = reader.next_child()? {
        if child.name() == "Relationship" {
            let type_uri = child.required("Type")?.to_string();
            let target_mode = match child.attr("TargetMode") {
                Some("External") => TargetMode::External,
                _ => TargetMode::Internal,
            };
            rels.push(Relationship {
                id: child.required("Id")?.to_string(),
                rel_type: RelationshipType::from_uri(&type_uri),
                type_uri,
                source: owner.to_string(),
                target: child.required("Target")?.to_string(),
                target_mode,
            });
        }
        reader.skip_to_end()?;
    }
    Ok(rels)
}
