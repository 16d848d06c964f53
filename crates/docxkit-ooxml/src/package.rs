//! DOCX package assembly
//!
//! [`Package`] ties the archive, relationship and document layers together.
//! Loading unpacks the container, walks the relationship chain to the main
//! document part and decodes it; the decoded parts are removed from the
//! working file map and every other part is carried through unchanged.
//! Saving renders the typed parts back to bytes, merges them into the file
//! map and writes the archive.

use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::archive::FileMap;
use crate::config::PackageOptions;
use crate::content_types::{content_type_for_extension, ContentTypes, CONTENT_TYPES_PATH};
use crate::error::{OoxmlError, Result};
use crate::namespace;
use crate::relationships::{
    rels_path_for, resolve_document_part, resolve_target, Relationship, Relationships,
    TargetMode, ROOT_RELS_PATH, TYPE_HYPERLINK, TYPE_IMAGE, TYPE_OFFICE_DOCUMENT,
};
use crate::wml::Document;

/// Main document part of a package created from scratch
pub const DEFAULT_DOCUMENT_PATH: &str = "word/document.xml";

/// An unpacked WordprocessingML package
#[derive(Debug, Clone)]
pub struct Package {
    /// Parts not regenerated from the model, plus the last rendered parts
    files: FileMap,
    options: PackageOptions,
    root_rels: Relationships,
    document_path: String,
    document_rels: Relationships,
    content_types: ContentTypes,
    document: Document,
    /// Next number handed out as `rId{n}`; never decreases
    next_rel_id: u32,
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

impl Package {
    /// A fresh package holding an empty document
    pub fn new() -> Self {
        Self::with_options(PackageOptions::default())
    }

    /// A fresh package written back with `options`
    pub fn with_options(options: PackageOptions) -> Self {
        let mut root_rels = Relationships::new("");
        root_rels.push(Relationship {
            id: "rId1".to_string(),
            rel_type: TYPE_OFFICE_DOCUMENT.to_string(),
            target: DEFAULT_DOCUMENT_PATH.to_string(),
            target_mode: None,
        });

        Self {
            files: FileMap::new(),
            options,
            root_rels,
            document_path: DEFAULT_DOCUMENT_PATH.to_string(),
            document_rels: Relationships::new(DEFAULT_DOCUMENT_PATH),
            content_types: ContentTypes::minimal(DEFAULT_DOCUMENT_PATH),
            document: Document::new(),
            next_rel_id: 1,
        }
    }

    /// Open a package from a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, PackageOptions::default())
    }

    /// Open a package from a file with explicit options
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: PackageOptions) -> Result<Self> {
        Self::unpack(FileMap::open(path)?, options)
    }

    /// Unpack a package from container bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(bytes, PackageOptions::default())
    }

    /// Unpack a package from container bytes with explicit options
    pub fn from_bytes_with_options(bytes: &[u8], options: PackageOptions) -> Result<Self> {
        Self::unpack(FileMap::from_bytes(bytes)?, options)
    }

    /// Unpack a package from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, PackageOptions::default())
    }

    /// Unpack a package from any seekable reader with explicit options
    pub fn from_reader_with_options<R: Read + Seek>(
        reader: R,
        options: PackageOptions,
    ) -> Result<Self> {
        Self::unpack(FileMap::from_reader(reader)?, options)
    }

    fn unpack(mut files: FileMap, options: PackageOptions) -> Result<Self> {
        if options.normalize_namespaces {
            normalize_parts(&mut files);
        }

        let resolved = resolve_document_part(&files)?;
        let document_path = resolved.part_path;

        let document_xml = files
            .get(&document_path)
            .ok_or_else(|| OoxmlError::MissingPart(document_path.clone()))?;
        let document = Document::parse(document_xml, &document_path)?;

        let content_types = match files.get(CONTENT_TYPES_PATH) {
            Some(xml) => ContentTypes::parse(xml)?,
            None => {
                tracing::debug!("no content types part, synthesising one");
                ContentTypes::minimal(&document_path)
            }
        };

        files.remove(&document_path);
        files.remove(&rels_path_for(&document_path));
        files.remove(ROOT_RELS_PATH);
        files.remove(CONTENT_TYPES_PATH);

        if !options.keep_unknown_parts {
            let referenced = referenced_parts(&resolved.root_rels, &resolved.document_rels);
            files.retain(|path| referenced.iter().any(|p| p == path));
        }

        let next_rel_id = resolved.document_rels.max_id_number() + 1;
        tracing::debug!(
            part = %document_path,
            blocks = document.body.children.len(),
            passthrough = files.len(),
            "unpacked package"
        );

        Ok(Self {
            files,
            options,
            root_rels: resolved.root_rels,
            document_path,
            document_rels: resolved.document_rels,
            content_types,
            document,
            next_rel_id,
        })
    }

    /// Render the modelled parts to bytes without touching the package
    ///
    /// Returns the main document part, its relationships, the root
    /// relationships and the content types, keyed by archive path.
    pub fn render_parts(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let parts = vec![
            (self.document_path.clone(), self.document.to_xml()?),
            (
                rels_path_for(&self.document_path),
                self.document_rels.to_xml()?,
            ),
            (ROOT_RELS_PATH.to_string(), self.root_rels.to_xml()?),
            (CONTENT_TYPES_PATH.to_string(), self.content_types.to_xml()?),
        ];
        tracing::debug!(count = parts.len(), "rendered modelled parts");
        Ok(parts)
    }

    /// Render the modelled parts and store them in the file map
    fn merge_rendered(&mut self) -> Result<()> {
        for (path, bytes) in self.render_parts()? {
            self.files.set(path, bytes);
        }
        Ok(())
    }

    /// Render and write the package, returning the container bytes
    ///
    /// The rendered parts stay in the file map afterwards.
    pub fn pack(&mut self) -> Result<Vec<u8>> {
        self.merge_rendered()?;
        self.files.to_bytes(self.options.compression)
    }

    /// Save the package to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.merge_rendered()?;
        self.files.write_to_file(path, self.options.compression)
    }

    /// Save the package to a file
    pub fn save_to<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.save(path)
    }

    /// Write the package to any seekable writer
    pub fn write<W: Write + Seek>(&mut self, writer: W) -> Result<()> {
        self.merge_rendered()?;
        self.files.write_to(writer, self.options.compression)
    }

    /// Same as [`pack`](Self::pack)
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.pack()
    }

    /// Add a relationship from the main document part and return its id
    pub fn add_relationship(
        &mut self,
        rel_type: &str,
        target: &str,
        target_mode: Option<TargetMode>,
    ) -> String {
        let id = format!("rId{}", self.next_rel_id);
        self.next_rel_id += 1;
        self.document_rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode,
        });
        tracing::debug!(id = %id, target = %target, "added relationship");
        id
    }

    /// Remove a document relationship; its id is not handed out again
    pub fn remove_relationship(&mut self, id: &str) -> Option<Relationship> {
        self.document_rels.remove(id)
    }

    /// Add an external hyperlink relationship and return its id
    pub fn add_hyperlink(&mut self, url: &str) -> String {
        self.add_relationship(TYPE_HYPERLINK, url, Some(TargetMode::External))
    }

    /// Store an image under the document's `media/` directory and return the
    /// relationship id to reference it with (`r:embed`)
    pub fn add_picture(&mut self, bytes: Vec<u8>, file_name: &str) -> String {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let mut index = 1;
        let target = loop {
            let target = format!("media/image{index}.{extension}");
            if !self.files.contains(&self.resolve(&target)) {
                break target;
            }
            index += 1;
        };

        let part_path = self.resolve(&target);
        self.files.set(&part_path, bytes);
        self.content_types
            .add_default(&extension, content_type_for_extension(&extension));
        tracing::debug!(part = %part_path, "stored picture");

        self.add_relationship(TYPE_IMAGE, &target, None)
    }

    /// The decoded main document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the main document
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Archive path of the main document part
    pub fn document_path(&self) -> &str {
        &self.document_path
    }

    /// Relationships of the main document part
    pub fn relationships(&self) -> &Relationships {
        &self.document_rels
    }

    /// Package root relationships
    pub fn root_relationships(&self) -> &Relationships {
        &self.root_rels
    }

    /// Content types of the package
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Options this package was opened with
    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// Parts carried through unchanged (plus the rendered parts after a save)
    pub fn files(&self) -> &FileMap {
        &self.files
    }

    /// Media parts stored next to the main document
    pub fn media(&self) -> impl Iterator<Item = (&str, &[u8])> {
        let prefix = format!("{}/", self.resolve("media"));
        self.files
            .iter()
            .filter(move |(path, _)| path.starts_with(&prefix))
    }

    /// Resolve a target relative to the main document part
    fn resolve(&self, target: &str) -> String {
        resolve_target(&self.document_path, target)
    }
}

/// Rewrite strict namespace URIs in every XML part
fn normalize_parts(files: &mut FileMap) {
    let rewritten: Vec<(String, Vec<u8>)> = files
        .iter()
        .filter(|(path, _)| path.ends_with(".xml") || path.ends_with(".rels"))
        .filter_map(|(path, bytes)| match namespace::normalize_strict(bytes) {
            std::borrow::Cow::Owned(normalized) => Some((path.to_string(), normalized)),
            std::borrow::Cow::Borrowed(_) => None,
        })
        .collect();
    if !rewritten.is_empty() {
        tracing::debug!(count = rewritten.len(), "normalized strict namespaces");
    }
    for (path, bytes) in rewritten {
        files.set(path, bytes);
    }
}

/// Internal targets of the root and document relationships
fn referenced_parts(root_rels: &Relationships, document_rels: &Relationships) -> Vec<String> {
    let internal = |rels: &Relationships| -> Vec<String> {
        rels.iter()
            .filter(|r| !r.is_external())
            .map(|r| resolve_target(&rels.relative_path, &r.target))
            .collect()
    };
    let mut parts = internal(root_rels);
    parts.extend(internal(document_rels));
    parts
}
