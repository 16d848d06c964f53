//! XML writer used by every node encoder
//!
//! A start tag is held back until the element receives content: an element
//! closed before any child or text was written is emitted self-closing.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::xml::value::XmlValue;

/// Ordered attribute list for one start tag
///
/// Absent optional values are dropped, so encoders can push every
/// schema attribute in order without branching.
#[derive(Debug, Default)]
pub struct Attrs {
    items: Vec<(Cow<'static, str>, String)>,
}

impl Attrs {
    /// Empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute; values whose encoding is empty-by-absence are skipped
    pub fn with<T: XmlValue>(mut self, name: &'static str, value: &T) -> Self {
        if let Some(text) = value.to_xml() {
            self.items.push((Cow::Borrowed(name), text.into_owned()));
        }
        self
    }

    /// Append an optional attribute
    pub fn with_opt<T: XmlValue>(self, name: &'static str, value: Option<&T>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    /// Append a raw, already formatted attribute
    pub fn with_raw(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<String>,
    ) -> Self {
        self.items.push((name.into(), value.into()));
        self
    }

    /// True when no attribute will be written
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Streaming XML writer over an in-memory buffer
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    /// Create a writer with an empty buffer
    pub fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
            pending: None,
        }
    }

    /// Write the standard `standalone="yes"` XML declaration
    pub fn declaration(&mut self) -> Result<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        self.inner.get_mut().extend_from_slice(b"\r\n");
        Ok(())
    }

    /// Open an element; it becomes self-closing if nothing is written into it
    pub fn start(&mut self, name: &str, attrs: Attrs) -> Result<()> {
        self.flush_pending()?;
        self.pending = Some(start_tag(name, attrs));
        Ok(())
    }

    /// Close the element opened by the matching [`start`](Self::start)
    pub fn end(&mut self, name: &str) -> Result<()> {
        match self.pending.take() {
            Some(start) => self.inner.write_event(Event::Empty(start))?,
            None => self.inner.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    /// Write a self-closing element
    pub fn empty(&mut self, name: &str, attrs: Attrs) -> Result<()> {
        self.flush_pending()?;
        self.inner.write_event(Event::Empty(start_tag(name, attrs)))?;
        Ok(())
    }

    /// Write escaped character data into the currently open element
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.flush_pending()?;
        if !text.is_empty() {
            self.inner.write_event(Event::Text(BytesText::new(text)))?;
        }
        Ok(())
    }

    /// Write `<name attrs>text</name>`
    pub fn text_element(&mut self, name: &str, attrs: Attrs, text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// Finish writing and return the bytes
    pub fn into_inner(mut self) -> Result<Vec<u8>> {
        self.flush_pending()?;
        Ok(self.inner.into_inner())
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(start) = self.pending.take() {
            self.inner.write_event(Event::Start(start))?;
        }
        Ok(())
    }
}

fn start_tag(name: &str, attrs: Attrs) -> BytesStart<'static> {
    let mut start = BytesStart::new(name.to_owned());
    for (key, value) in &attrs.items {
        start.push_attribute((key.as_ref(), value.as_str()));
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut XmlWriter) -> Result<()>) -> String {
        let mut w = XmlWriter::new();
        f(&mut w).unwrap();
        String::from_utf8(w.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_untouched_element_is_self_closing() {
        let xml = render(|w| {
            w.start("w:pPr", Attrs::new())?;
            w.end("w:pPr")
        });
        assert_eq!(xml, "<w:pPr/>");
    }

    #[test]
    fn test_nested_elements_and_attribute_order() {
        let xml = render(|w| {
            w.start("w:p", Attrs::new())?;
            w.empty(
                "w:spacing",
                Attrs::new()
                    .with("w:before", &120u32)
                    .with_opt::<u32>("w:after", None)
                    .with("w:line", &240i32),
            )?;
            w.end("w:p")
        });
        assert_eq!(xml, r#"<w:p><w:spacing w:before="120" w:line="240"/></w:p>"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(|w| w.text_element("w:t", Attrs::new(), "a < b & c"));
        assert_eq!(xml, "<w:t>a &lt; b &amp; c</w:t>");
    }
}
