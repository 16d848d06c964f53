//! Pull reader over a single XML part
//!
//! Wraps quick-xml's namespace-aware reader and hands out owned start tags
//! whose element and attribute names are already resolved to a
//! [`NsFamily`]. Container decoders loop over [`XmlReader::next_element`]
//! until it returns `None` at the matching end tag.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{OoxmlError, Result};
use crate::namespace::NsFamily;
use crate::xml::value::XmlValue;

/// A resolved attribute
#[derive(Debug, Clone)]
pub struct Attr {
    /// Namespace family of the attribute name (unprefixed → `NsFamily::None`)
    pub family: NsFamily,
    /// Raw qualified name as written, e.g. `w:val`
    pub qname: String,
    /// Local name, e.g. `val`
    pub local: String,
    /// Unescaped value
    pub value: String,
}

/// An owned, resolved start tag
#[derive(Debug, Clone)]
pub struct StartTag {
    /// Namespace family of the element
    pub family: NsFamily,
    /// Resolved namespace URI
    pub ns: Option<String>,
    /// Local element name
    pub local: String,
    /// Attributes in document order, namespace declarations excluded
    pub attrs: Vec<Attr>,
    /// Namespace declarations (`xmlns:prefix`, value), default namespace as prefix ""
    pub ns_decls: Vec<(String, String)>,
    /// Self-closing tag (no content, no end event)
    pub empty: bool,
}

impl StartTag {
    /// True for a WordprocessingML element with the given local name
    pub fn is_w(&self, local: &str) -> bool {
        self.family == NsFamily::Wml && self.local == local
    }

    /// Find an attribute by local name, regardless of namespace
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Find an attribute by local name within a namespace family
    pub fn attr_in(&self, family: NsFamily, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.family == family && a.local == local)
            .map(|a| a.value.as_str())
    }

    /// A relationship-reference attribute (`r:id`, `r:embed`, ...)
    ///
    /// Falls back to a bare local-name match when no `r:`-qualified attribute
    /// is present.
    pub fn rel_attr(&self, local: &str) -> Option<&str> {
        self.attr_in(NsFamily::Rel, local).or_else(|| {
            self.attrs
                .iter()
                .find(|a| a.local == local && a.family != NsFamily::Wml)
                .map(|a| a.value.as_str())
        })
    }
}

/// Low-level event yielded by [`XmlReader`]
enum Step {
    Start(StartTag),
    Text(String),
    End,
    Eof,
}

/// Namespace-aware pull reader over one part's bytes
pub struct XmlReader<'a> {
    reader: NsReader<&'a [u8]>,
    buf: Vec<u8>,
    part: String,
}

impl<'a> XmlReader<'a> {
    /// Create a reader over `xml`; `part` names the part in error messages
    pub fn new(xml: &'a [u8], part: impl Into<String>) -> Self {
        let mut reader = NsReader::from_reader(xml);
        // Whitespace inside <w:t> is significant
        reader.config_mut().trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
            part: part.into(),
        }
    }

    /// Name of the part being read
    pub fn part(&self) -> &str {
        &self.part
    }

    /// Read up to and including the root element's start tag
    pub fn root(&mut self) -> Result<StartTag> {
        loop {
            match self.step()? {
                Step::Start(tag) => return Ok(tag),
                Step::Text(text) if text.trim().is_empty() => continue,
                Step::Text(_) => {
                    return Err(OoxmlError::malformed(
                        &self.part,
                        "text content before root element",
                    ))
                }
                Step::End => {
                    return Err(OoxmlError::malformed(&self.part, "unexpected end tag"))
                }
                Step::Eof => return Err(OoxmlError::malformed(&self.part, "no root element")),
            }
        }
    }

    /// Read the root element and check its local name
    pub fn expect_root(&mut self, family: NsFamily, local: &str) -> Result<StartTag> {
        let root = self.root()?;
        if root.family != family || root.local != local {
            return Err(OoxmlError::malformed(
                &self.part,
                format!("expected root <{}>, found <{}>", local, root.local),
            ));
        }
        Ok(root)
    }

    /// Next child element of `parent`, skipping text
    ///
    /// Returns `None` once `parent`'s end tag has been consumed.
    pub fn next_element(&mut self, parent: &StartTag) -> Result<Option<StartTag>> {
        if parent.empty {
            return Ok(None);
        }
        loop {
            match self.step()? {
                Step::Start(tag) => return Ok(Some(tag)),
                Step::Text(_) => continue,
                Step::End => return Ok(None),
                Step::Eof => return Err(self.eof(parent)),
            }
        }
    }

    /// Collect the text content of `parent`, skipping any nested elements
    pub fn read_text(&mut self, parent: &StartTag) -> Result<String> {
        let mut text = String::new();
        if parent.empty {
            return Ok(text);
        }
        loop {
            match self.step()? {
                Step::Start(tag) => self.skip(&tag)?,
                Step::Text(t) => text.push_str(&t),
                Step::End => return Ok(text),
                Step::Eof => return Err(self.eof(parent)),
            }
        }
    }

    /// Skip an element and its whole subtree
    pub fn skip(&mut self, tag: &StartTag) -> Result<()> {
        if tag.empty {
            return Ok(());
        }
        let mut depth = 1usize;
        loop {
            match self.step()? {
                Step::Start(child) if !child.empty => depth += 1,
                Step::Start(_) | Step::Text(_) => {}
                Step::End => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Step::Eof => return Err(self.eof(tag)),
            }
        }
    }

    /// Skip an element the decoder does not model
    pub fn skip_unknown(&mut self, parent: &StartTag, tag: &StartTag) -> Result<()> {
        tracing::trace!(
            part = %self.part,
            parent = %parent.local,
            element = %tag.local,
            ns = ?tag.ns,
            "skipping unrecognized element"
        );
        self.skip(tag)
    }

    /// Parse an optional typed attribute by local name
    pub fn attr<T: XmlValue>(&self, tag: &StartTag, local: &str) -> Result<Option<T>> {
        match tag.attr(local) {
            Some(raw) => self.parse_value(tag, local, raw).map(Some),
            None => Ok(None),
        }
    }

    /// Parse an optional typed relationship-reference attribute (`r:id`)
    pub fn rel_attr<T: XmlValue>(&self, tag: &StartTag, local: &str) -> Result<Option<T>> {
        match tag.rel_attr(local) {
            Some(raw) => self.parse_value(tag, local, raw).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a required typed attribute by local name
    pub fn required_attr<T: XmlValue>(&self, tag: &StartTag, local: &str) -> Result<T> {
        match tag.attr(local) {
            Some(raw) => self.parse_value(tag, local, raw),
            None => T::from_missing().ok_or_else(|| OoxmlError::MissingAttribute {
                part: self.part.clone(),
                element: tag.local.clone(),
                attribute: local.to_string(),
            }),
        }
    }

    fn parse_value<T: XmlValue>(&self, tag: &StartTag, local: &str, raw: &str) -> Result<T> {
        T::parse_xml(raw).ok_or_else(|| OoxmlError::InvalidAttributeValue {
            part: self.part.clone(),
            field: format!("{}@{}", tag.local, local),
            value: raw.to_string(),
        })
    }

    fn eof(&self, open: &StartTag) -> OoxmlError {
        OoxmlError::UnexpectedEof {
            part: self.part.clone(),
            element: open.local.clone(),
        }
    }

    fn step(&mut self) -> Result<Step> {
        loop {
            self.buf.clear();
            let (resolved, event) = self
                .reader
                .read_resolved_event_into(&mut self.buf)
                .map_err(|e| OoxmlError::malformed(&self.part, e))?;
            let ns = resolved_uri(resolved);
            let event = event.into_owned();

            match event {
                Event::Start(e) => return Ok(Step::Start(self.start_tag(&e, ns, false)?)),
                Event::Empty(e) => return Ok(Step::Start(self.start_tag(&e, ns, true)?)),
                Event::End(_) => return Ok(Step::End),
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| OoxmlError::malformed(&self.part, err))?;
                    return Ok(Step::Text(text.into_owned()));
                }
                Event::CData(e) => {
                    return Ok(Step::Text(String::from_utf8_lossy(&e).into_owned()));
                }
                Event::Eof => return Ok(Step::Eof),
                // Declarations, comments, processing instructions, doctypes
                _ => continue,
            }
        }
    }

    fn start_tag(&self, e: &BytesStart<'_>, ns: Option<String>, empty: bool) -> Result<StartTag> {
        let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        let mut ns_decls = Vec::new();

        for attr in e.attributes() {
            let attr = attr.map_err(|err| OoxmlError::malformed(&self.part, err))?;
            let value = attr
                .unescape_value()
                .map_err(|err| OoxmlError::malformed(&self.part, err))?
                .into_owned();
            let key = attr.key.as_ref();

            if key == b"xmlns" {
                ns_decls.push((String::new(), value));
                continue;
            }
            if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                ns_decls.push((String::from_utf8_lossy(prefix).into_owned(), value));
                continue;
            }

            let (resolved, local_name) = self.reader.resolve_attribute(attr.key);
            let family = NsFamily::classify(resolved_uri(resolved).as_deref());
            attrs.push(Attr {
                family,
                qname: String::from_utf8_lossy(key).into_owned(),
                local: String::from_utf8_lossy(local_name.as_ref()).into_owned(),
                value,
            });
        }

        Ok(StartTag {
            family: NsFamily::classify(ns.as_deref()),
            ns,
            local,
            attrs,
            ns_decls,
            empty,
        })
    }
}

fn resolved_uri(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            // Undeclared prefix: keep it recognisable but never match a known family
            Some(format!("urn:undeclared:{}", String::from_utf8_lossy(&prefix)))
        }
    }
}
