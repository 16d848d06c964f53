//! Relationships parsing and resolution for OPC packages
//!
//! Every part may have a companion `.rels` part listing typed references to
//! other parts or external resources. The package root's relationships
//! (`_rels/.rels`) point at the main document part; the document part's own
//! relationships point at styles, images, hyperlinks and so on.
//!
//! # Example
//!
//! ```
//! use docxkit_ooxml::relationships::{rels_path_for, resolve_target};
//!
//! assert_eq!(rels_path_for(""), "_rels/.rels");
//! assert_eq!(rels_path_for("word/document.xml"), "word/_rels/document.xml.rels");
//! assert_eq!(resolve_target("word/document.xml", "media/image1.png"), "word/media/image1.png");
//! ```

use crate::archive::FileMap;
use crate::error::{OoxmlError, Result};
use crate::namespace::{self, NsFamily};
use crate::xml::{Attrs, XmlReader, XmlValue, XmlWriter};

/// Path of the package root relationships part
pub const ROOT_RELS_PATH: &str = "_rels/.rels";

const TYPE_PREFIX: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/";

/// Main document relationship type
pub const TYPE_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
/// Hyperlink relationship type
pub const TYPE_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
/// Image relationship type
pub const TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
/// Styles relationship type
pub const TYPE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
/// Numbering relationship type
pub const TYPE_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
/// Settings relationship type
pub const TYPE_SETTINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
/// Font table relationship type
pub const TYPE_FONT_TABLE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/fontTable";
/// Header relationship type
pub const TYPE_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
/// Footer relationship type
pub const TYPE_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";

/// Semantic role of a relationship, independent of the namespace family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelType {
    OfficeDocument,
    Hyperlink,
    Image,
    Styles,
    Numbering,
    Settings,
    FontTable,
    Header,
    Footer,
    Other,
}

impl RelType {
    /// Classify a relationship type URI (transitional or strict)
    pub fn classify(uri: &str) -> Self {
        let uri = namespace::to_transitional(uri);
        match uri.strip_prefix(TYPE_PREFIX) {
            Some("officeDocument") => RelType::OfficeDocument,
            Some("hyperlink") => RelType::Hyperlink,
            Some("image") => RelType::Image,
            Some("styles") => RelType::Styles,
            Some("numbering") => RelType::Numbering,
            Some("settings") => RelType::Settings,
            Some("fontTable") => RelType::FontTable,
            Some("header") => RelType::Header,
            Some("footer") => RelType::Footer,
            _ => RelType::Other,
        }
    }
}

/// Whether a relationship target lives inside the package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    Internal,
    External,
}

impl XmlValue for TargetMode {
    fn parse_xml(raw: &str) -> Option<Self> {
        match raw {
            "Internal" => Some(TargetMode::Internal),
            "External" => Some(TargetMode::External),
            _ => None,
        }
    }

    fn to_xml(&self) -> Option<std::borrow::Cow<'_, str>> {
        Some(std::borrow::Cow::Borrowed(match self {
            TargetMode::Internal => "Internal",
            TargetMode::External => "External",
        }))
    }
}

/// One typed reference from a part to a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Identifier, unique within its relationships part (`rId1`)
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative to the source part's directory) or URL
    pub target: String,
    /// Target mode; absent means internal
    pub target_mode: Option<TargetMode>,
}

impl Relationship {
    /// Semantic role of this relationship
    pub fn kind(&self) -> RelType {
        RelType::classify(&self.rel_type)
    }

    /// True for relationships pointing outside the package
    pub fn is_external(&self) -> bool {
        self.target_mode == Some(TargetMode::External)
    }
}

/// The parsed contents of one `.rels` part
///
/// Keeps declaration order for deterministic serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    /// Path of the part these relationships belong to (`""` for the package root)
    pub relative_path: String,
    items: Vec<Relationship>,
}

impl Relationships {
    /// Empty relationships for the given source part
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            items: Vec::new(),
        }
    }

    /// Parse a `.rels` part describing `part_path`
    pub fn parse(part_path: &str, xml: &[u8]) -> Result<Self> {
        let rels_path = rels_path_for(part_path);
        let mut reader = XmlReader::new(xml, rels_path.as_str());
        let root = reader.expect_root(NsFamily::PackageRel, "Relationships")?;

        let mut items = Vec::new();
        while let Some(tag) = reader.next_element(&root)? {
            if tag.family == NsFamily::PackageRel && tag.local == "Relationship" {
                let id: String = reader.required_attr(&tag, "Id")?;
                let rel_type: String = reader.required_attr(&tag, "Type")?;
                let target: String = reader.required_attr(&tag, "Target")?;
                let target_mode = reader.attr(&tag, "TargetMode")?;
                reader.skip(&tag)?;
                items.push(Relationship {
                    id,
                    rel_type,
                    target,
                    target_mode,
                });
            } else {
                reader.skip_unknown(&root, &tag)?;
            }
        }

        Ok(Self {
            relative_path: part_path.to_string(),
            items,
        })
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new();
        w.declaration()?;
        w.start(
            "Relationships",
            Attrs::new().with_raw("xmlns", namespace::PACKAGE_RELATIONSHIPS),
        )?;
        for rel in &self.items {
            w.empty(
                "Relationship",
                Attrs::new()
                    .with("Id", &rel.id)
                    .with("Type", &rel.rel_type)
                    .with("Target", &rel.target)
                    .with("TargetMode", &rel.target_mode),
            )?;
        }
        w.end("Relationships")?;
        w.into_inner()
    }

    /// Append a relationship with a caller-chosen id
    pub fn push(&mut self, rel: Relationship) {
        self.items.push(rel);
    }

    /// Remove a relationship by id, returning it
    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let index = self.items.iter().position(|r| r.id == id)?;
        Some(self.items.remove(index))
    }

    /// Look up a relationship by id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Target of a relationship by id
    pub fn target(&self, id: &str) -> Option<&str> {
        self.get(id).map(|r| r.target.as_str())
    }

    /// First relationship of the given kind
    pub fn find_by_kind(&self, kind: RelType) -> Option<&Relationship> {
        self.items.iter().find(|r| r.kind() == kind)
    }

    /// Check if a relationship ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Highest numeric `rIdN` suffix in use, or 0
    pub fn max_id_number(&self) -> u32 {
        self.items
            .iter()
            .filter_map(|r| extract_id_number(&r.id))
            .max()
            .unwrap_or(0)
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Companion relationships-part path: `{dir}/_rels/{file}.rels`
pub fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Resolve a relationship target against the directory of the referencing part
///
/// Targets starting with `/` are package-absolute. `.` and `..` segments are
/// collapsed; `..` never climbs above the package root.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    let target = target.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();

    if !target.starts_with('/') {
        if let Some((dir, _)) = source_part.rsplit_once('/') {
            segments.extend(dir.split('/').filter(|s| !s.is_empty()));
        }
    }

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Express a package path as a target relative to the source part's directory
///
/// Only handles the common case of a target under the source's directory;
/// anything else is returned package-absolute.
pub fn relative_target(source_part: &str, part_path: &str) -> String {
    match source_part.rsplit_once('/') {
        Some((dir, _)) => match part_path.strip_prefix(dir).and_then(|r| r.strip_prefix('/')) {
            Some(rest) => rest.to_string(),
            None => format!("/{}", part_path),
        },
        None => part_path.to_string(),
    }
}

/// Result of walking root relationships to the main document part
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Package root relationships
    pub root_rels: Relationships,
    /// Resolved path of the main document part
    pub part_path: String,
    /// The document part's relationships (empty when the package has none)
    pub document_rels: Relationships,
}

/// Walk `_rels/.rels` → officeDocument relationship → document part
pub fn resolve_document_part(files: &FileMap) -> Result<ResolvedDocument> {
    let root_xml = files
        .get(ROOT_RELS_PATH)
        .ok_or_else(|| OoxmlError::MissingRelationshipsPart(ROOT_RELS_PATH.to_string()))?;
    let root_rels = Relationships::parse("", root_xml)?;
    tracing::debug!(count = root_rels.len(), "parsed root relationships");

    let office = root_rels
        .find_by_kind(RelType::OfficeDocument)
        .ok_or(OoxmlError::OfficeDocumentNotFound)?;
    let part_path = resolve_target("", &office.target);
    tracing::debug!(part = %part_path, "located main document part");

    let document_rels = load_part_relationships(files, &part_path)?;

    for rel in document_rels.iter().filter(|r| !r.is_external()) {
        let resolved = resolve_target(&part_path, &rel.target);
        if !files.contains(&resolved) {
            tracing::warn!(id = %rel.id, target = %resolved, "relationship target missing from package");
        }
    }

    Ok(ResolvedDocument {
        root_rels,
        part_path,
        document_rels,
    })
}

/// Relationships of a non-root part; an absent `.rels` part is treated as empty
pub fn load_part_relationships(files: &FileMap, part_path: &str) -> Result<Relationships> {
    let rels_path = rels_path_for(part_path);
    match files.get(&rels_path) {
        Some(xml) => Relationships::parse(part_path, xml),
        None => {
            tracing::debug!(part = %part_path, "no part relationships, using empty set");
            Ok(Relationships::new(part_path))
        }
    }
}

/// Extract the numeric portion from a relationship ID (e.g., "rId5" -> 5)
pub(crate) fn extract_id_number(id: &str) -> Option<u32> {
    id.strip_prefix("rId")
        .or_else(|| id.strip_prefix("RId"))
        .or_else(|| id.strip_prefix("rid"))
        .and_then(|num_str| num_str.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
            <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
        </Relationships>"#;

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for(""), "_rels/.rels");
        assert_eq!(rels_path_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_path_for("word/sub/header1.xml"), "word/sub/_rels/header1.xml.rels");
        assert_eq!(rels_path_for("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::parse("word/document.xml", RELS).unwrap();

        assert_eq!(rels.relative_path, "word/document.xml");
        assert_eq!(rels.len(), 2);
        assert_eq!(rels.target("rId1"), Some("https://example.com"));
        assert!(rels.get("rId1").unwrap().is_external());
        assert_eq!(rels.get("rId2").unwrap().kind(), RelType::Styles);
        let ids: Vec<&str> = rels.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId2"]);
    }

    #[test]
    fn test_wrong_root_is_malformed() {
        let err = Relationships::parse("", b"<Types/>").unwrap_err();
        assert!(matches!(err, OoxmlError::MalformedXml { ref part, .. } if part == "_rels/.rels"));
    }

    #[test]
    fn test_not_well_formed_is_malformed() {
        let xml = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="t" Target="x.xml"></Oops></Relationships>"#;
        let err = Relationships::parse("", xml).unwrap_err();
        assert!(matches!(err, OoxmlError::MalformedXml { .. }));
    }

    #[test]
    fn test_serialize_reparses() {
        let rels = Relationships::parse("word/document.xml", RELS).unwrap();
        let xml = rels.to_xml().unwrap();
        let text = String::from_utf8(xml.clone()).unwrap();
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(text.contains(r#"TargetMode="External""#));

        let reparsed = Relationships::parse("word/document.xml", &xml).unwrap();
        assert_eq!(reparsed, rels);
    }

    #[test]
    fn test_xml_escaping_in_serialization() {
        let mut rels = Relationships::new("word/document.xml");
        rels.push(Relationship {
            id: "rId1".into(),
            rel_type: TYPE_HYPERLINK.into(),
            target: "https://example.com/?a=1&b=\"2\"".into(),
            target_mode: Some(TargetMode::External),
        });
        let xml = rels.to_xml().unwrap();
        assert!(String::from_utf8_lossy(&xml).contains("&amp;"));
        let reparsed = Relationships::parse("word/document.xml", &xml).unwrap();
        assert_eq!(reparsed.target("rId1"), Some("https://example.com/?a=1&b=\"2\""));
    }

    #[test]
    fn test_strict_relationship_types() {
        assert_eq!(
            RelType::classify("http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument"),
            RelType::OfficeDocument
        );
        assert_eq!(RelType::classify(TYPE_IMAGE), RelType::Image);
        assert_eq!(RelType::classify("urn:custom"), RelType::Other);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("", "/word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word/document.xml", "media/a.png"), "word/media/a.png");
        assert_eq!(resolve_target("word/header1.xml", "../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("word/document.xml", "/docProps/core.xml"), "docProps/core.xml");
        assert_eq!(resolve_target("word/document.xml", "./styles.xml"), "word/styles.xml");
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(relative_target("word/document.xml", "word/media/image1.png"), "media/image1.png");
        assert_eq!(relative_target("word/document.xml", "docProps/app.xml"), "/docProps/app.xml");
        assert_eq!(relative_target("", "word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_extract_id_number() {
        assert_eq!(extract_id_number("rId1"), Some(1));
        assert_eq!(extract_id_number("rId123"), Some(123));
        assert_eq!(extract_id_number("RId5"), Some(5));
        assert_eq!(extract_id_number("rid10"), Some(10));
        assert_eq!(extract_id_number("invalid"), None);
        assert_eq!(extract_id_number("rIdabc"), None);
    }

    #[test]
    fn test_resolve_document_part_errors() {
        let files = FileMap::new();
        assert!(matches!(
            resolve_document_part(&files).unwrap_err(),
            OoxmlError::MissingRelationshipsPart(ref p) if p == "_rels/.rels"
        ));

        let mut files = FileMap::new();
        files.set(
            ROOT_RELS_PATH,
            br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#.to_vec(),
        );
        assert!(matches!(
            resolve_document_part(&files).unwrap_err(),
            OoxmlError::OfficeDocumentNotFound
        ));
    }

    #[test]
    fn test_resolve_document_part_tolerates_missing_document_rels() {
        let mut files = FileMap::new();
        files.set(
            ROOT_RELS_PATH,
            format!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}" Target="/word/main.xml"/></Relationships>"#,
                TYPE_OFFICE_DOCUMENT
            )
            .into_bytes(),
        );
        let resolved = resolve_document_part(&files).unwrap();
        assert_eq!(resolved.part_path, "word/main.xml");
        assert!(resolved.document_rels.is_empty());
        assert_eq!(resolved.document_rels.relative_path, "word/main.xml");
    }
}
