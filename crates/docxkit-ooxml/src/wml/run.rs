//! Runs (`w:r`): uniformly formatted inline content

use crate::error::Result;
use crate::namespace::NsFamily;
use crate::xml::{
    encode_opt, xml_attributes, xml_sequence, Attrs, OnOff, StartTag, Val, XmlElement, XmlReader,
    XmlWriter,
};

use super::drawing::Drawing;
use super::properties::{
    Border, Color, EastAsianLayout, FitText, Fonts, Language, Shading, Underline,
};
use super::simple_types::*;

xml_sequence! {
    /// Run properties (`w:rPr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct RunProperty {
        // 1
        style: Val<String> => "rStyle",
        fonts: Fonts => "rFonts",
        bold: OnOff => "b",
        bold_cs: OnOff => "bCs",
        italic: OnOff => "i",
        italic_cs: OnOff => "iCs",
        caps: OnOff => "caps",
        small_caps: OnOff => "smallCaps",
        strike: OnOff => "strike",
        double_strike: OnOff => "dstrike",
        // 11
        outline: OnOff => "outline",
        shadow: OnOff => "shadow",
        emboss: OnOff => "emboss",
        imprint: OnOff => "imprint",
        no_proof: OnOff => "noProof",
        snap_to_grid: OnOff => "snapToGrid",
        vanish: OnOff => "vanish",
        web_hidden: OnOff => "webHidden",
        color: Color => "color",
        /// Character spacing adjustment in twentieths of a point
        spacing: Val<Measure> => "spacing",
        // 21
        /// Horizontal scaling percentage
        width: Val<u16> => "w",
        kern: Val<u32> => "kern",
        position: Val<i32> => "position",
        /// Font size in half-points
        size: Val<u32> => "sz",
        size_cs: Val<u32> => "szCs",
        highlight: Val<HighlightColor> => "highlight",
        underline: Underline => "u",
        effect: Val<TextEffect> => "effect",
        border: Border => "bdr",
        shading: Shading => "shd",
        // 31
        fit_text: FitText => "fitText",
        vertical_align: Val<VerticalAlignRun> => "vertAlign",
        rtl: OnOff => "rtl",
        complex_script: OnOff => "cs",
        emphasis: Val<Emphasis> => "em",
        language: Language => "lang",
        east_asian_layout: EastAsianLayout => "eastAsianLayout",
        spec_vanish: OnOff => "specVanish",
        office_math: OnOff => "oMath",
    }
}

/// Literal text (`w:t`, `w:delText`, `w:instrText`, `w:delInstrText`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    pub text: String,
    /// `xml:space="preserve"`
    pub preserve_space: bool,
}

impl Text {
    /// Text that keeps its leading and trailing whitespace when written
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let preserve_space = text.starts_with(char::is_whitespace)
            || text.ends_with(char::is_whitespace);
        Self {
            text,
            preserve_space,
        }
    }
}

impl XmlElement for Text {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let preserve_space = start.attr("space") == Some("preserve");
        let text = reader.read_text(start)?;
        Ok(Self {
            text,
            preserve_space,
        })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        let attrs = if self.preserve_space {
            Attrs::new().with_raw("xml:space", "preserve")
        } else {
            Attrs::new()
        };
        writer.text_element(name, attrs, &self.text)
    }
}

xml_attributes! {
    /// Break (`w:br`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Break {
        break_type: Option<BreakType> => "w:type",
        clear: Option<BreakClear> => "w:clear",
    }
}

xml_attributes! {
    /// Symbol character (`w:sym`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Symbol {
        font: Option<String> => "w:font",
        /// Hex character code
        char_code: Option<String> => "w:char",
    }
}

xml_attributes! {
    /// Complex field boundary (`w:fldChar`)
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FieldChar {
        char_type: FieldCharType => "w:fldCharType",
        lock: Option<bool> => "w:fldLock",
        dirty: Option<bool> => "w:dirty",
    }
}

xml_attributes! {
    /// Footnote or endnote reference (`w:footnoteReference`, `w:endnoteReference`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct NoteReference {
        custom_mark_follows: Option<bool> => "w:customMarkFollows",
        id: i64 => "w:id",
    }
}

xml_attributes! {
    /// Comment reference mark (`w:commentReference`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct CommentReference {
        id: i64 => "w:id",
    }
}

/// One piece of run content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunChild {
    Text(Text),
    DeletedText(Text),
    InstrText(Text),
    DeletedInstrText(Text),
    Break(Break),
    Tab,
    CarriageReturn,
    NoBreakHyphen,
    SoftHyphen,
    Drawing(Box<Drawing>),
    Symbol(Symbol),
    FieldChar(FieldChar),
    FootnoteReference(NoteReference),
    EndnoteReference(NoteReference),
    CommentReference(CommentReference),
    FootnoteRef,
    EndnoteRef,
    Separator,
    ContinuationSeparator,
    PageNumber,
    LastRenderedPageBreak,
    AnnotationRef,
    DayShort,
    MonthShort,
    YearShort,
    DayLong,
    MonthLong,
    YearLong,
}

impl RunChild {
    /// Content-less marker element for a local name
    fn marker(local: &str) -> Option<Self> {
        Some(match local {
            "tab" => RunChild::Tab,
            "cr" => RunChild::CarriageReturn,
            "noBreakHyphen" => RunChild::NoBreakHyphen,
            "softHyphen" => RunChild::SoftHyphen,
            "footnoteRef" => RunChild::FootnoteRef,
            "endnoteRef" => RunChild::EndnoteRef,
            "separator" => RunChild::Separator,
            "continuationSeparator" => RunChild::ContinuationSeparator,
            "pgNum" => RunChild::PageNumber,
            "lastRenderedPageBreak" => RunChild::LastRenderedPageBreak,
            "annotationRef" => RunChild::AnnotationRef,
            "dayShort" => RunChild::DayShort,
            "monthShort" => RunChild::MonthShort,
            "yearShort" => RunChild::YearShort,
            "dayLong" => RunChild::DayLong,
            "monthLong" => RunChild::MonthLong,
            "yearLong" => RunChild::YearLong,
            _ => return None,
        })
    }

    fn marker_name(&self) -> Option<&'static str> {
        Some(match self {
            RunChild::Tab => "w:tab",
            RunChild::CarriageReturn => "w:cr",
            RunChild::NoBreakHyphen => "w:noBreakHyphen",
            RunChild::SoftHyphen => "w:softHyphen",
            RunChild::FootnoteRef => "w:footnoteRef",
            RunChild::EndnoteRef => "w:endnoteRef",
            RunChild::Separator => "w:separator",
            RunChild::ContinuationSeparator => "w:continuationSeparator",
            RunChild::PageNumber => "w:pgNum",
            RunChild::LastRenderedPageBreak => "w:lastRenderedPageBreak",
            RunChild::AnnotationRef => "w:annotationRef",
            RunChild::DayShort => "w:dayShort",
            RunChild::MonthShort => "w:monthShort",
            RunChild::YearShort => "w:yearShort",
            RunChild::DayLong => "w:dayLong",
            RunChild::MonthLong => "w:monthLong",
            RunChild::YearLong => "w:yearLong",
            _ => return None,
        })
    }

    /// Decode a run content element; `None` when `tag` is not one
    fn decode_child(reader: &mut XmlReader<'_>, tag: &StartTag) -> Result<Option<Self>> {
        if tag.family != NsFamily::Wml {
            return Ok(None);
        }
        let child = match tag.local.as_str() {
            "t" => RunChild::Text(Text::decode(reader, tag)?),
            "delText" => RunChild::DeletedText(Text::decode(reader, tag)?),
            "instrText" => RunChild::InstrText(Text::decode(reader, tag)?),
            "delInstrText" => RunChild::DeletedInstrText(Text::decode(reader, tag)?),
            "br" => RunChild::Break(Break::decode(reader, tag)?),
            "drawing" => RunChild::Drawing(Box::new(Drawing::decode(reader, tag)?)),
            "sym" => RunChild::Symbol(Symbol::decode(reader, tag)?),
            "fldChar" => RunChild::FieldChar(FieldChar::decode(reader, tag)?),
            "footnoteReference" => RunChild::FootnoteReference(NoteReference::decode(reader, tag)?),
            "endnoteReference" => RunChild::EndnoteReference(NoteReference::decode(reader, tag)?),
            "commentReference" => {
                RunChild::CommentReference(CommentReference::decode(reader, tag)?)
            }
            local => match Self::marker(local) {
                Some(marker) => {
                    reader.skip(tag)?;
                    marker
                }
                None => return Ok(None),
            },
        };
        Ok(Some(child))
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<()> {
        match self {
            RunChild::Text(t) => t.encode(writer, "w:t"),
            RunChild::DeletedText(t) => t.encode(writer, "w:delText"),
            RunChild::InstrText(t) => t.encode(writer, "w:instrText"),
            RunChild::DeletedInstrText(t) => t.encode(writer, "w:delInstrText"),
            RunChild::Break(b) => b.encode(writer, "w:br"),
            RunChild::Drawing(d) => d.encode(writer, "w:drawing"),
            RunChild::Symbol(s) => s.encode(writer, "w:sym"),
            RunChild::FieldChar(f) => f.encode(writer, "w:fldChar"),
            RunChild::FootnoteReference(r) => r.encode(writer, "w:footnoteReference"),
            RunChild::EndnoteReference(r) => r.encode(writer, "w:endnoteReference"),
            RunChild::CommentReference(r) => r.encode(writer, "w:commentReference"),
            marker => match marker.marker_name() {
                Some(name) => writer.empty(name, Attrs::new()),
                None => Ok(()),
            },
        }
    }
}

/// A run of uniformly formatted content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub rsid_r_pr: Option<String>,
    pub rsid_del: Option<String>,
    pub rsid_r: Option<String>,
    pub property: Option<RunProperty>,
    pub children: Vec<RunChild>,
}

impl Run {
    /// Empty run
    pub fn new() -> Self {
        Self::default()
    }

    /// Run holding a single text element
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut run = Self::new();
        run.add_text(text);
        run
    }

    /// Append a text element
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(RunChild::Text(Text::new(text)));
        self
    }

    /// Run properties, created on first use
    pub fn property_mut(&mut self) -> &mut RunProperty {
        self.property.get_or_insert_with(RunProperty::default)
    }

    /// Visible text: text, tabs and breaks; deleted text and field codes are left out
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                RunChild::Text(t) => out.push_str(&t.text),
                RunChild::Tab => out.push('\t'),
                RunChild::Break(_) | RunChild::CarriageReturn => out.push('\n'),
                RunChild::NoBreakHyphen => out.push('-'),
                _ => {}
            }
        }
        out
    }

    /// Relationship ids of pictures embedded in this run
    pub fn embedded_images(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| match child {
            RunChild::Drawing(d) => d.embed_id(),
            _ => None,
        })
    }
}

impl XmlElement for Run {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut run = Run {
            rsid_r_pr: reader.attr(start, "rsidRPr")?,
            rsid_del: reader.attr(start, "rsidDel")?,
            rsid_r: reader.attr(start, "rsidR")?,
            ..Default::default()
        };
        while let Some(tag) = reader.next_element(start)? {
            if tag.is_w("rPr") {
                run.property = Some(RunProperty::decode(reader, &tag)?);
                continue;
            }
            match RunChild::decode_child(reader, &tag)? {
                Some(child) => run.children.push(child),
                None => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(run)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(
            name,
            Attrs::new()
                .with("w:rsidRPr", &self.rsid_r_pr)
                .with("w:rsidDel", &self.rsid_del)
                .with("w:rsidR", &self.rsid_r),
        )?;
        encode_opt(writer, "w:rPr", &self.property)?;
        for child in &self.children {
            child.encode(writer)?;
        }
        writer.end(name)
    }
}

/// Decode the runs of a run container, skipping any other content
pub(crate) fn decode_runs(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Vec<Run>> {
    let mut runs = Vec::new();
    while let Some(tag) = reader.next_element(start)? {
        if tag.is_w("r") {
            runs.push(Run::decode(reader, &tag)?);
        } else {
            reader.skip_unknown(start, &tag)?;
        }
    }
    Ok(runs)
}

/// Encode runs in order
pub(crate) fn encode_runs(writer: &mut XmlWriter, runs: &[Run]) -> Result<()> {
    for run in runs {
        run.encode(writer, "w:r")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{decode_fragment, encode_fragment};

    #[test]
    fn test_run_children_keep_order() {
        let run: Run = decode_fragment(
            r#"<w:r><w:t>a</w:t><w:tab/><w:t xml:space="preserve"> b</w:t><w:br w:type="page"/><w:cr/></w:r>"#,
        )
        .unwrap();
        assert_eq!(run.children.len(), 5);
        assert!(matches!(run.children[1], RunChild::Tab));
        assert!(matches!(
            run.children[3],
            RunChild::Break(Break { break_type: Some(BreakType::Page), .. })
        ));
        assert_eq!(run.plain_text(), "a\t b\n\n");
    }

    #[test]
    fn test_text_preserves_space() {
        let run: Run = decode_fragment(r#"<w:r><w:t xml:space="preserve"> x </w:t></w:r>"#).unwrap();
        assert_eq!(run.children[0], RunChild::Text(Text::new(" x ")));
        assert_eq!(
            encode_fragment(&run, "w:r"),
            r#"<w:r><w:t xml:space="preserve"> x </w:t></w:r>"#
        );
    }

    #[test]
    fn test_run_properties_in_schema_order() {
        // Written out of order in the source; re-emitted in schema order
        let run: Run = decode_fragment(
            r#"<w:r><w:rPr><w:sz w:val="28"/><w:b/><w:color w:val="FF0000"/><w:rStyle w:val="Strong"/></w:rPr><w:t>x</w:t></w:r>"#,
        )
        .unwrap();
        let props = run.property.as_ref().unwrap();
        assert!(props.bold.as_ref().unwrap().is_on());
        assert_eq!(props.size, Some(Val::new(28)));
        assert_eq!(
            encode_fragment(&run, "w:r"),
            r#"<w:r><w:rPr><w:rStyle w:val="Strong"/><w:b/><w:color w:val="FF0000"/><w:sz w:val="28"/></w:rPr><w:t>x</w:t></w:r>"#
        );
    }

    #[test]
    fn test_unknown_run_content_is_skipped() {
        let run: Run = decode_fragment(
            r#"<w:r><w:t>a</w:t><w:ruby><w:rt><w:r><w:t>hidden</w:t></w:r></w:rt></w:ruby><w:t>b</w:t></w:r>"#,
        )
        .unwrap();
        assert_eq!(run.plain_text(), "ab");
    }

    #[test]
    fn test_markers_are_self_closing() {
        let mut run = Run::new();
        run.children.push(RunChild::LastRenderedPageBreak);
        run.children.push(RunChild::FieldChar(FieldChar {
            char_type: FieldCharType::Begin,
            lock: None,
            dirty: None,
        }));
        run.children.push(RunChild::InstrText(Text::new(" PAGE ")));
        assert_eq!(
            encode_fragment(&run, "w:r"),
            r#"<w:r><w:lastRenderedPageBreak/><w:fldChar w:fldCharType="begin"/><w:instrText xml:space="preserve"> PAGE </w:instrText></w:r>"#
        );
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        let err = decode_fragment::<Run>(r#"<w:r><w:rPr><w:sz w:val="large"/></w:rPr></w:r>"#)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::OoxmlError::InvalidAttributeValue { ref field, ref value, .. }
                if field == "sz@val" && value == "large"
        ));
    }
}
