//! Archive handling for DOCX packages
//!
//! A DOCX file is a ZIP archive of parts. [`FileMap`] holds every part's
//! bytes keyed by its archive-relative path (forward slashes, no leading
//! slash). Output is written in sorted path order so that saving unchanged
//! content twice produces the same entries in the same order.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::config::Compression;
use crate::error::{OoxmlError, Result};

/// All parts of an unpacked package, keyed by normalized path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    files: BTreeMap<String, Vec<u8>>,
}

impl FileMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a ZIP file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Unpack container bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Unpack from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).map_err(OoxmlError::ArchiveCorrupt)?;
        let mut files = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i).map_err(OoxmlError::ArchiveCorrupt)?;
            if file.is_dir() {
                continue;
            }
            let name = normalize_path(file.name());

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        tracing::debug!(parts = files.len(), "unpacked archive");
        Ok(Self { files })
    }

    /// Get a part's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Check if a part exists
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Set or replace a part's contents
    pub fn set(&mut self, path: impl AsRef<str>, contents: Vec<u8>) {
        self.files.insert(normalize_path(path.as_ref()), contents);
    }

    /// Remove a part
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// Keep only the parts for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.files.retain(|path, _| keep(path));
    }

    /// Part paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    /// Parts in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the map holds no parts
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write the archive to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, compression: Compression) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file, compression)
    }

    /// Write the archive to container bytes
    pub fn to_bytes(&self, compression: Compression) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer, compression)?;
        Ok(buffer.into_inner())
    }

    /// Write the archive to any writer
    ///
    /// Entries are written in lexicographic path order. The ZIP writer
    /// finalizes its central directory on drop as well, so an early error
    /// still leaves a closed archive behind.
    pub fn write_to<W: Write + Seek>(&self, writer: W, compression: Compression) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        // Fixed timestamps keep repeated saves byte-identical
        let options = SimpleFileOptions::default()
            .compression_method(match compression {
                Compression::Deflated => CompressionMethod::Deflated,
                Compression::Stored => CompressionMethod::Stored,
            })
            .last_modified_time(DateTime::default());

        for (path, contents) in &self.files {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Normalize an archive entry name: forward slashes, no leading slash
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}
