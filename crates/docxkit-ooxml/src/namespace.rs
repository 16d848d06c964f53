//! OOXML namespace URIs for the transitional and strict conformance classes
//!
//! Documents saved as "Strict Open XML" use `http://purl.oclc.org/ooxml/...`
//! URIs for every qualified name. Decoding accepts both families directly
//! (see [`NsFamily::classify`]); [`normalize_strict`] additionally rewrites
//! strict URIs to their transitional equivalents before parsing. Output is
//! always transitional.

use std::borrow::Cow;

/// WordprocessingML main namespace (transitional)
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Relationship references inside document parts (transitional)
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// DrawingML WordprocessingML drawing (transitional)
pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
/// DrawingML main (transitional)
pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// DrawingML picture (transitional)
pub const PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
/// Markup compatibility
pub const MC: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
/// Word 2010 extensions (`w14:paraId` and friends)
pub const W14: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
/// The reserved `xml:` prefix
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Package relationships part namespace (shared by both families)
pub const PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
/// Content types part namespace
pub const CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// WordprocessingML main namespace (strict)
pub const W_STRICT: &str = "http://purl.oclc.org/ooxml/wordprocessingml/main";
/// Relationship references inside document parts (strict)
pub const R_STRICT: &str = "http://purl.oclc.org/ooxml/officeDocument/relationships";
/// DrawingML WordprocessingML drawing (strict)
pub const WP_STRICT: &str = "http://purl.oclc.org/ooxml/drawingml/wordprocessingDrawing";
/// DrawingML main (strict)
pub const A_STRICT: &str = "http://purl.oclc.org/ooxml/drawingml/main";
/// DrawingML picture (strict)
pub const PIC_STRICT: &str = "http://purl.oclc.org/ooxml/drawingml/picture";

/// Marker shared by every strict URI
const STRICT_MARKER: &str = "http://purl.oclc.org/ooxml/";

/// Strict → transitional replacements, longest prefixes first
const STRICT_TO_TRANSITIONAL: &[(&str, &str)] = &[
    (R_STRICT, R),
    (W_STRICT, W),
    (WP_STRICT, WP),
    (PIC_STRICT, PIC),
    (A_STRICT, A),
    (
        "http://purl.oclc.org/ooxml/drawingml/chart",
        "http://schemas.openxmlformats.org/drawingml/2006/chart",
    ),
    (
        "http://purl.oclc.org/ooxml/officeDocument/math",
        "http://schemas.openxmlformats.org/officeDocument/2006/math",
    ),
    (
        "http://purl.oclc.org/ooxml/officeDocument/sharedTypes",
        "http://schemas.openxmlformats.org/officeDocument/2006/sharedTypes",
    ),
    (
        "http://purl.oclc.org/ooxml/officeDocument/extendedProperties",
        "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
    ),
];

/// Namespace family of a resolved element or attribute name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NsFamily {
    /// WordprocessingML main (`w:`)
    Wml,
    /// Relationship references (`r:`)
    Rel,
    /// WordprocessingML drawing (`wp:`)
    WpDrawing,
    /// DrawingML main (`a:`)
    Drawing,
    /// DrawingML picture (`pic:`)
    Picture,
    /// Package relationships (`.rels` parts)
    PackageRel,
    /// Content types part
    ContentTypes,
    /// The `xml:` prefix
    Xml,
    /// Unprefixed name with no default namespace in scope
    None,
    /// Anything else (extensions, markup compatibility, ...)
    Other,
}

impl NsFamily {
    /// Classify a namespace URI, accepting both transitional and strict forms
    pub fn classify(uri: Option<&str>) -> Self {
        match uri {
            None => NsFamily::None,
            Some(W) | Some(W_STRICT) => NsFamily::Wml,
            Some(R) | Some(R_STRICT) => NsFamily::Rel,
            Some(WP) | Some(WP_STRICT) => NsFamily::WpDrawing,
            Some(A) | Some(A_STRICT) => NsFamily::Drawing,
            Some(PIC) | Some(PIC_STRICT) => NsFamily::Picture,
            Some(PACKAGE_RELATIONSHIPS) => NsFamily::PackageRel,
            Some(CONTENT_TYPES) => NsFamily::ContentTypes,
            Some(XML) => NsFamily::Xml,
            Some(_) => NsFamily::Other,
        }
    }
}

/// Whether a namespace URI belongs to the strict conformance class
pub fn is_strict(uri: &str) -> bool {
    uri.starts_with(STRICT_MARKER)
}

/// Rewrite strict namespace URIs in an XML part to their transitional form
///
/// Returns the input unchanged (borrowed) when it contains no strict URI.
pub fn normalize_strict(xml: &[u8]) -> Cow<'_, [u8]> {
    let marker = STRICT_MARKER.as_bytes();
    if !xml.windows(marker.len()).any(|w| w == marker) {
        return Cow::Borrowed(xml);
    }

    let mut out = Cow::Borrowed(xml);
    for (strict, transitional) in STRICT_TO_TRANSITIONAL {
        if let Some(replaced) = replace_bytes(&out, strict.as_bytes(), transitional.as_bytes()) {
            out = Cow::Owned(replaced);
        }
    }
    out
}

/// Replace every occurrence of `needle`; `None` when there is none
///
/// Works on raw bytes, so content that is not valid UTF-8 passes through untouched.
fn replace_bytes(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Option<Vec<u8>> {
    let mut rest = haystack;
    let mut out: Option<Vec<u8>> = None;
    while let Some(pos) = rest.windows(needle.len()).position(|w| w == needle) {
        let buf = out.get_or_insert_with(|| Vec::with_capacity(haystack.len()));
        buf.extend_from_slice(&rest[..pos]);
        buf.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
    }
    let mut out = out?;
    out.extend_from_slice(rest);
    Some(out)
}

/// Map a strict URI to its transitional equivalent, if one is known
pub fn to_transitional(uri: &str) -> Cow<'_, str> {
    for (strict, transitional) in STRICT_TO_TRANSITIONAL {
        if let Some(rest) = uri.strip_prefix(strict) {
            return Cow::Owned(format!("{}{}", transitional, rest));
        }
    }
    Cow::Borrowed(uri)
}
