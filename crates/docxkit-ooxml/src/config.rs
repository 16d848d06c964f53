//! Package options
//!
//! Options controlling how a package is unpacked and written back. They can
//! be built in code or loaded from a TOML file:
//!
//! ```toml
//! compression = "stored"
//! normalize_namespaces = true
//! keep_unknown_parts = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// ZIP entry compression used when writing a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Deflate every entry
    #[default]
    Deflated,
    /// Store entries uncompressed
    Stored,
}

/// Options for [`Package`](crate::Package)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    /// Compression for written entries
    pub compression: Compression,
    /// Rewrite strict-conformance namespace URIs to transitional ones before decoding
    pub normalize_namespaces: bool,
    /// Carry parts the package does not model through to the output unchanged
    pub keep_unknown_parts: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            normalize_namespaces: true,
            keep_unknown_parts: true,
        }
    }
}

impl PackageOptions {
    /// Parse options from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load options from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
