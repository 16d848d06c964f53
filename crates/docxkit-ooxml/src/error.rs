//! Error types for OOXML operations

use thiserror::Error;

/// Errors that can occur while unpacking, decoding, encoding or packing a document
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// The container could not be opened as a ZIP archive
    #[error("Archive is corrupt: {0}")]
    ArchiveCorrupt(#[source] zip::result::ZipError),

    /// Error writing the ZIP archive
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error emitting XML
    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A required relationships part is absent
    #[error("Relationships part not found: {0}")]
    MissingRelationshipsPart(String),

    /// The root relationships do not point at a main document part
    #[error("No officeDocument relationship in package root relationships")]
    OfficeDocumentNotFound,

    /// A part referenced by a relationship is absent from the archive
    #[error("Part not found: {0}")]
    MissingPart(String),

    /// A part's bytes are not well-formed XML, or not the expected document
    #[error("Malformed XML in {part}: {message}")]
    MalformedXml { part: String, message: String },

    /// The XML stream ended inside an open element
    #[error("Unexpected end of {part} inside <{element}>")]
    UnexpectedEof { part: String, element: String },

    /// A typed attribute value failed to parse
    #[error("Invalid value {value:?} for {field} in {part}")]
    InvalidAttributeValue {
        part: String,
        field: String,
        value: String,
    },

    /// A required attribute is absent
    #[error("Missing attribute {attribute} on <{element}> in {part}")]
    MissingAttribute {
        part: String,
        element: String,
        attribute: String,
    },

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl OoxmlError {
    pub(crate) fn malformed(part: impl Into<String>, message: impl ToString) -> Self {
        OoxmlError::MalformedXml {
            part: part.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
