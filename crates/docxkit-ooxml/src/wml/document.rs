//! Main document part (`w:document`)
//!
//! The root element carries the namespace declarations used throughout the
//! part. The standard prefixes are always declared on output; any other
//! declaration found on input is kept, together with the `mc:Ignorable`
//! list, so extension content written by other producers stays resolvable.

use crate::error::Result;
use crate::namespace::{self, NsFamily};
use crate::xml::{encode_opt, Attrs, StartTag, XmlElement, XmlReader, XmlWriter};

use super::paragraph::Paragraph;
use super::section::SectionProperty;
use super::table::Table;

/// Prefixes declared on every written document root
const STANDARD_NAMESPACES: &[(&str, &str)] = &[
    ("w", namespace::W),
    ("r", namespace::R),
    ("wp", namespace::WP),
    ("a", namespace::A),
    ("pic", namespace::PIC),
    ("mc", namespace::MC),
    ("w14", namespace::W14),
];

/// Block-level content of a body or table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl Block {
    /// Decode a block-level element, or `None` if `tag` is not one
    pub(crate) fn decode_child(reader: &mut XmlReader<'_>, tag: &StartTag) -> Result<Option<Self>> {
        if tag.family != NsFamily::Wml {
            return Ok(None);
        }
        let block = match tag.local.as_str() {
            "p" => Block::Paragraph(Paragraph::decode(reader, tag)?),
            "tbl" => Block::Table(Table::decode(reader, tag)?),
            _ => return Ok(None),
        };
        Ok(Some(block))
    }

    pub(crate) fn encode(&self, writer: &mut XmlWriter) -> Result<()> {
        match self {
            Block::Paragraph(p) => p.encode(writer, "w:p"),
            Block::Table(t) => t.encode(writer, "w:tbl"),
        }
    }

    /// This block's paragraphs, flattening tables
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        match self {
            Block::Paragraph(p) => vec![p],
            Block::Table(t) => t.paragraphs(),
        }
    }
}

/// Document body (`w:body`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    pub children: Vec<Block>,
    /// Properties of the final section
    pub section: Option<SectionProperty>,
}

impl XmlElement for Body {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut body = Body::default();
        while let Some(tag) = reader.next_element(start)? {
            if tag.is_w("sectPr") {
                body.section = Some(SectionProperty::decode(reader, &tag)?);
                continue;
            }
            match Block::decode_child(reader, &tag)? {
                Some(block) => body.children.push(block),
                None => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(body)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        for block in &self.children {
            block.encode(writer)?;
        }
        encode_opt(writer, "w:sectPr", &self.section)?;
        writer.end(name)
    }
}

/// The parsed main document part
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub body: Body,
    /// Root namespace declarations outside the standard set, as (prefix, uri)
    pub extra_namespaces: Vec<(String, String)>,
    /// Raw `mc:Ignorable` prefix list of the root element
    pub ignorable: Option<String>,
}

impl Document {
    /// Empty document with a US Letter section
    pub fn new() -> Self {
        Self {
            body: Body {
                children: Vec::new(),
                section: Some(SectionProperty::letter()),
            },
            ..Default::default()
        }
    }

    /// Parse the main document part
    pub fn parse(xml: &[u8], part: &str) -> Result<Self> {
        let mut reader = XmlReader::new(xml, part);
        let root = reader.expect_root(NsFamily::Wml, "document")?;

        let mut doc = Document {
            extra_namespaces: extra_namespaces(&root),
            ignorable: root.attr("Ignorable").map(str::to_string),
            ..Default::default()
        };
        while let Some(tag) = reader.next_element(&root)? {
            if tag.is_w("body") {
                doc.body = Body::decode(&mut reader, &tag)?;
            } else {
                reader.skip_unknown(&root, &tag)?;
            }
        }
        Ok(doc)
    }

    /// Serialize to the bytes of the main document part
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut attrs = Attrs::new();
        for (prefix, uri) in STANDARD_NAMESPACES {
            attrs = attrs.with_raw(format!("xmlns:{prefix}"), *uri);
        }
        for (prefix, uri) in &self.extra_namespaces {
            attrs = attrs.with_raw(format!("xmlns:{prefix}"), uri.clone());
        }
        if let Some(ignorable) = self.declared_ignorable() {
            attrs = attrs.with_raw("mc:Ignorable", ignorable);
        }

        let mut writer = XmlWriter::new();
        writer.declaration()?;
        writer.start("w:document", attrs)?;
        self.body.encode(&mut writer, "w:body")?;
        writer.end("w:document")?;
        writer.into_inner()
    }

    /// Append a paragraph to the body
    pub fn add_paragraph(&mut self, paragraph: Paragraph) -> &mut Self {
        self.body.children.push(Block::Paragraph(paragraph));
        self
    }

    /// Append a table to the body
    pub fn add_table(&mut self, table: Table) -> &mut Self {
        self.body.children.push(Block::Table(table));
        self
    }

    /// Get all paragraphs (flattening tables)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.children.iter().flat_map(|block| block.paragraphs())
    }

    /// Get plain text content
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Relationship ids of every embedded picture, in document order
    pub fn image_ids(&self) -> Vec<&str> {
        self.paragraphs()
            .flat_map(|p| p.runs())
            .flat_map(|r| r.embedded_images())
            .collect()
    }

    /// `mc:Ignorable` restricted to prefixes declared on the written root
    fn declared_ignorable(&self) -> Option<String> {
        let raw = self.ignorable.as_deref()?;
        let declared = |prefix: &str| {
            STANDARD_NAMESPACES.iter().any(|(p, _)| *p == prefix)
                || self.extra_namespaces.iter().any(|(p, _)| p == prefix)
        };
        let kept: Vec<&str> = raw.split_whitespace().filter(|&p| declared(p)).collect();
        if kept.is_empty() {
            None
        } else {
            Some(kept.join(" "))
        }
    }
}

/// Root declarations not covered by the standard set, strict URIs translated
fn extra_namespaces(root: &StartTag) -> Vec<(String, String)> {
    root.ns_decls
        .iter()
        .filter(|(prefix, _)| {
            !prefix.is_empty() && !STANDARD_NAMESPACES.iter().any(|(p, _)| *p == prefix.as_str())
        })
        .map(|(prefix, uri)| (prefix.clone(), namespace::to_transitional(uri).into_owned()))
        .collect()
}
