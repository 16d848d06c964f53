//! The `[Content_Types].xml` part
//!
//! Maps file extensions (`Default`) and individual part names (`Override`)
//! to MIME content types.

use crate::error::Result;
use crate::namespace::{self, NsFamily};
use crate::xml::{Attrs, XmlReader, XmlWriter};

/// Path of the content types part
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Content type of relationships parts
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
/// Content type of the main document part
pub const DOCUMENT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Extension → content type default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultType {
    pub extension: String,
    pub content_type: String,
}

/// Part name → content type override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideType {
    /// Package-absolute part name (`/word/document.xml`)
    pub part_name: String,
    pub content_type: String,
}

/// Parsed content types, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    pub defaults: Vec<DefaultType>,
    pub overrides: Vec<OverrideType>,
}

impl ContentTypes {
    /// Content types for a package holding just a main document at `document_part`
    pub fn minimal(document_part: &str) -> Self {
        let mut types = Self::default();
        types.add_default("rels", RELATIONSHIPS);
        types.add_default("xml", "application/xml");
        types.set_override(document_part, DOCUMENT_MAIN);
        types
    }

    /// Parse `[Content_Types].xml`
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = XmlReader::new(xml, CONTENT_TYPES_PATH);
        let root = reader.expect_root(NsFamily::ContentTypes, "Types")?;
        let mut types = Self::default();

        while let Some(tag) = reader.next_element(&root)? {
            match (tag.family, tag.local.as_str()) {
                (NsFamily::ContentTypes, "Default") => {
                    types.defaults.push(DefaultType {
                        extension: reader.required_attr(&tag, "Extension")?,
                        content_type: reader.required_attr(&tag, "ContentType")?,
                    });
                    reader.skip(&tag)?;
                }
                (NsFamily::ContentTypes, "Override") => {
                    types.overrides.push(OverrideType {
                        part_name: reader.required_attr(&tag, "PartName")?,
                        content_type: reader.required_attr(&tag, "ContentType")?,
                    });
                    reader.skip(&tag)?;
                }
                _ => reader.skip_unknown(&root, &tag)?,
            }
        }
        Ok(types)
    }

    /// Serialize to `[Content_Types].xml`
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new();
        w.declaration()?;
        w.start("Types", Attrs::new().with_raw("xmlns", namespace::CONTENT_TYPES))?;
        for d in &self.defaults {
            w.empty(
                "Default",
                Attrs::new()
                    .with("Extension", &d.extension)
                    .with("ContentType", &d.content_type),
            )?;
        }
        for o in &self.overrides {
            w.empty(
                "Override",
                Attrs::new()
                    .with("PartName", &o.part_name)
                    .with("ContentType", &o.content_type),
            )?;
        }
        w.end("Types")?;
        w.into_inner()
    }

    /// Whether a default exists for the extension (case-insensitive)
    pub fn has_default(&self, extension: &str) -> bool {
        self.defaults
            .iter()
            .any(|d| d.extension.eq_ignore_ascii_case(extension))
    }

    /// Register a default for an extension unless one exists
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        if !self.has_default(extension) {
            self.defaults.push(DefaultType {
                extension: extension.to_ascii_lowercase(),
                content_type: content_type.to_string(),
            });
        }
    }

    /// Set the override for a part (given as a package path, with or without leading `/`)
    pub fn set_override(&mut self, part_path: &str, content_type: &str) {
        let part_name = format!("/{}", part_path.trim_start_matches('/'));
        match self.overrides.iter_mut().find(|o| o.part_name == part_name) {
            Some(existing) => existing.content_type = content_type.to_string(),
            None => self.overrides.push(OverrideType {
                part_name,
                content_type: content_type.to_string(),
            }),
        }
    }

    /// Effective content type of a part: override first, then extension default
    pub fn content_type_of(&self, part_path: &str) -> Option<&str> {
        let part_name = format!("/{}", part_path.trim_start_matches('/'));
        if let Some(o) = self.overrides.iter().find(|o| o.part_name == part_name) {
            return Some(&o.content_type);
        }
        let extension = part_path.rsplit_once('.').map(|(_, e)| e)?;
        self.defaults
            .iter()
            .find(|d| d.extension.eq_ignore_ascii_case(extension))
            .map(|d| d.content_type.as_str())
    }
}

/// Get the MIME content type for an image extension
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        "tiff" | "tif" => "image/tiff",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
