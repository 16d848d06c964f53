//! # docxkit-ooxml
//!
//! Reading and writing of WordprocessingML (.docx) packages.
//!
//! This crate provides functionality to:
//! - Unpack a DOCX container and resolve its relationship graph
//! - Decode the main document part into a typed tree of paragraphs, runs,
//!   tables and properties
//! - Build or edit that tree and write a conformant package back
//!
//! Both the transitional and the strict OOXML namespace families are read;
//! output is always transitional.
//!
//! ## Example: Reading a Document
//!
//! ```no_run
//! use docxkit_ooxml::Package;
//!
//! let package = Package::open("document.docx")?;
//! for paragraph in package.document().paragraphs() {
//!     println!("{}", paragraph.plain_text());
//! }
//! # Ok::<(), docxkit_ooxml::OoxmlError>(())
//! ```
//!
//! ## Example: Writing a Document
//!
//! ```no_run
//! use docxkit_ooxml::{Package, Paragraph};
//!
//! let mut package = Package::new();
//! package
//!     .document_mut()
//!     .add_paragraph(Paragraph::with_text("Hello, world!"));
//! package.save("hello.docx")?;
//! # Ok::<(), docxkit_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod config;
pub mod content_types;
pub mod error;
pub mod namespace;
pub mod package;
pub mod relationships;
pub mod wml;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_utils;

pub use archive::FileMap;
pub use config::{Compression, PackageOptions};
pub use content_types::ContentTypes;
pub use error::{OoxmlError, Result};
pub use package::Package;
pub use relationships::{RelType, Relationship, Relationships, TargetMode};
pub use wml::{Block, Body, Document, Paragraph, ParagraphChild, Run, RunChild, Table};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
