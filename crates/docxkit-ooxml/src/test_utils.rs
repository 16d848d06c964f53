//! Shared test utilities for docxkit-ooxml
//!
//! Fragment helpers for the node codecs and small fixture packages built
//! directly with the zip writer.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::namespace;
use crate::xml::{XmlElement, XmlReader, XmlWriter};

/// Namespace declarations injected into every decoded fragment
const FRAGMENT_NAMESPACES: &[(&str, &str)] = &[
    ("w", namespace::W),
    ("r", namespace::R),
    ("wp", namespace::WP),
    ("a", namespace::A),
    ("pic", namespace::PIC),
    ("w14", namespace::W14),
];

/// Decode an XML fragment such as `<w:p>...</w:p>` as `T`
///
/// The usual prefixes are declared on the fragment's root element, so test
/// inputs can be written without namespace boilerplate.
pub fn decode_fragment<T: XmlElement>(xml: &str) -> Result<T> {
    let xml = with_namespaces(xml);
    let mut reader = XmlReader::new(xml.as_bytes(), "fragment.xml");
    let root = reader.root()?;
    T::decode(&mut reader, &root)
}

/// Encode `node` as an element called `name` and return the markup
pub fn encode_fragment<T: XmlElement>(node: &T, name: &str) -> String {
    let mut writer = XmlWriter::new();
    node.encode(&mut writer, name).unwrap();
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

fn with_namespaces(xml: &str) -> String {
    let open = xml.find('<').unwrap();
    let name_end = xml[open + 1..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .map(|i| open + 1 + i)
        .unwrap();
    let decls: String = FRAGMENT_NAMESPACES
        .iter()
        .map(|(prefix, uri)| format!(r#" xmlns:{prefix}="{uri}""#))
        .collect();
    format!("{}{}{}", &xml[..name_end], decls, &xml[name_end..])
}

/// Build a package from `(path, content)` entries
pub fn build_package(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (path, content) in entries {
        zip.start_file(*path, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
    buffer.into_inner()
}

pub const CONTENT_TYPES_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

pub const ROOT_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

pub const EMPTY_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
</Relationships>"#;

pub const HELLO_DOCUMENT_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Hello, world!</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

/// Minimal valid package: one paragraph reading "Hello, world!"
pub fn minimal_package() -> Vec<u8> {
    build_package(&[
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("word/_rels/document.xml.rels", EMPTY_RELS_XML),
        ("word/document.xml", HELLO_DOCUMENT_XML),
    ])
}

/// Package with styles, an embedded PNG and an external hyperlink
pub fn package_with_media() -> Vec<u8> {
    let rels = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/" TargetMode="External"/>
</Relationships>"#;
    let document = br#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Pictures</w:t></w:r></w:p>
    <w:p><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="952500" cy="952500"/><wp:docPr id="1" name="Picture 1"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="image1.png"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rId4"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="952500" cy="952500"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>
    <w:p><w:hyperlink r:id="rId7"><w:r><w:t>example</w:t></w:r></w:hyperlink></w:p>
  </w:body>
</w:document>"#;
    let styles = br#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
</w:styles>"#;
    build_package(&[
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("word/_rels/document.xml.rels", rels),
        ("word/document.xml", document),
        ("word/styles.xml", styles),
        ("word/media/image1.png", PNG_1X1),
    ])
}

/// The same content as [`minimal_package`], written with strict namespaces
pub fn strict_package() -> Vec<u8> {
    let root_rels = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;
    let document = br#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://purl.oclc.org/ooxml/wordprocessingml/main" w:conformance="strict">
  <w:body>
    <w:p><w:r><w:t>Hello, world!</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
    build_package(&[
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", root_rels),
        ("word/document.xml", document),
    ])
}

/// A 1x1 transparent PNG
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Read one part of a package as a string
pub fn extract_part(docx: &[u8], path: &str) -> Option<String> {
    let files = crate::archive::FileMap::from_bytes(docx).unwrap();
    files
        .get(path)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_package_layout() {
        let docx = minimal_package();
        let document = extract_part(&docx, "word/document.xml").unwrap();
        assert!(document.contains("Hello, world!"));
        assert!(extract_part(&docx, "_rels/.rels").is_some());
        assert!(extract_part(&docx, "nonexistent.xml").is_none());
    }

    #[test]
    fn test_namespaces_are_injected_after_element_name() {
        let xml = with_namespaces(r#"<w:b w:val="0"/>"#);
        assert!(xml.starts_with(r#"<w:b xmlns:w=""#));
        assert!(xml.ends_with(r#" w:val="0"/>"#));
        assert_eq!(with_namespaces("<w:p/>").matches("xmlns:").count(), FRAGMENT_NAMESPACES.len());
    }
}
