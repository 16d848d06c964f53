//! docxkit CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docxkit, including:
//! - Inspect: List the parts, relationships and blocks of a package
//! - Text: Print the plain text of a package
//! - Roundtrip: Unpack and pack a package, verifying the decoded tree
//! - New: Create a package from paragraphs of text
//!
//! # Library Usage
//!
//! ```ignore
//! use docxkit_cli::{load_options, roundtrip_command};
//!
//! let options = load_options(None)?;
//! let report = roundtrip_command(&input, &output, options)?;
//! assert!(report.identical);
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Show what a package contains
//! docxkit inspect report.docx
//!
//! # Rewrite a package through the typed model
//! docxkit roundtrip report.docx --output copy.docx
//!
//! # Create a package
//! docxkit new --output hello.docx --text "Hello, world!"
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    inspect_command, inspect_report, load_options, new_command, roundtrip_command, text_command,
};
pub use app::{run_cli, RoundtripReport, DEFAULT_CONFIG_FILE};
