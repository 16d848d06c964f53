//! WordprocessingML document model
//!
//! Typed nodes for the main document part. Property containers encode
//! their children in schema sequence order; content containers keep the
//! order they were read in. Elements outside the modelled subset are
//! skipped on decode.

pub mod document;
pub mod drawing;
pub mod paragraph;
pub mod properties;
pub mod run;
pub mod section;
pub mod simple_types;
pub mod table;

pub use document::{Block, Body, Document};
pub use drawing::{Anchor, Drawing, DrawingKind, Inline};
pub use paragraph::{
    BookmarkEnd, BookmarkStart, Hyperlink, Paragraph, ParagraphChild, ParagraphProperty,
    ProofError, RunTrackChange, SimpleField,
};
pub use properties::{Border, Shading, Spacing, TableBorders, TableWidth, TrackChange};
pub use run::{Run, RunChild, RunProperty, Text};
pub use section::{HdrFtrKind, HdrFtrReference, SectionProperty};
pub use simple_types::Measure;
pub use table::{
    Cell, CellProperty, CellRevision, Row, RowContent, RowProperty, Table, TableContent,
    TableProperty,
};
