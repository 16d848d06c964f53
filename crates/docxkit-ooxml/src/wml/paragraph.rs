//! Paragraphs (`w:p`) and their inline content

use crate::error::Result;
use crate::namespace::NsFamily;
use crate::xml::{
    encode_opt, xml_attributes, xml_sequence, Attrs, OnOff, StartTag, Val, XmlElement, XmlReader,
    XmlWriter,
};

use super::properties::{
    ConditionalFormatting, FrameProperty, Indentation, NumberingProperty, ParagraphBorders,
    Shading, Spacing, Tabs, TrackChange,
};
use super::run::{decode_runs, encode_runs, Run, RunProperty};
use super::section::SectionProperty;
use super::simple_types::*;

xml_sequence! {
    /// Paragraph properties (`w:pPr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct ParagraphProperty {
        // 1
        style: Val<String> => "pStyle",
        keep_next: OnOff => "keepNext",
        keep_lines: OnOff => "keepLines",
        page_break_before: OnOff => "pageBreakBefore",
        frame: FrameProperty => "framePr",
        widow_control: OnOff => "widowControl",
        numbering: NumberingProperty => "numPr",
        suppress_line_numbers: OnOff => "suppressLineNumbers",
        borders: ParagraphBorders => "pBdr",
        shading: Shading => "shd",
        // 11
        tabs: Tabs => "tabs",
        suppress_auto_hyphens: OnOff => "suppressAutoHyphens",
        kinsoku: OnOff => "kinsoku",
        word_wrap: OnOff => "wordWrap",
        overflow_punct: OnOff => "overflowPunct",
        top_line_punct: OnOff => "topLinePunct",
        auto_space_de: OnOff => "autoSpaceDE",
        auto_space_dn: OnOff => "autoSpaceDN",
        bidi: OnOff => "bidi",
        adjust_right_ind: OnOff => "adjustRightInd",
        // 21
        snap_to_grid: OnOff => "snapToGrid",
        spacing: Spacing => "spacing",
        indentation: Indentation => "ind",
        contextual_spacing: OnOff => "contextualSpacing",
        mirror_indents: OnOff => "mirrorIndents",
        suppress_overlap: OnOff => "suppressOverlap",
        justification: Val<Justification> => "jc",
        text_direction: Val<TextDirection> => "textDirection",
        text_alignment: Val<TextAlignment> => "textAlignment",
        textbox_tight_wrap: Val<String> => "textboxTightWrap",
        // 31
        outline_level: Val<u8> => "outlineLvl",
        div_id: Val<i64> => "divId",
        conditional: ConditionalFormatting => "cnfStyle",
        /// Paragraph mark run properties
        run_property: RunProperty => "rPr",
        /// Section break ending at this paragraph
        section: Box<SectionProperty> => "sectPr",
    }
}

xml_attributes! {
    /// Start of a bookmarked range (`w:bookmarkStart`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct BookmarkStart {
        id: i64 => "w:id",
        name: String => "w:name",
        col_first: Option<i64> => "w:colFirst",
        col_last: Option<i64> => "w:colLast",
    }
}

xml_attributes! {
    /// End of a bookmarked range (`w:bookmarkEnd`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct BookmarkEnd {
        id: i64 => "w:id",
    }
}

xml_attributes! {
    /// Spelling or grammar mark (`w:proofErr`)
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ProofError {
        err_type: ProofErrType => "w:type",
    }
}

/// A hyperlink (`w:hyperlink`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hyperlink {
    pub target_frame: Option<String>,
    pub tooltip: Option<String>,
    pub doc_location: Option<String>,
    pub history: Option<bool>,
    /// Bookmark name for internal links
    pub anchor: Option<String>,
    /// Relationship id (`r:id`) of an external target
    pub id: Option<String>,
    pub runs: Vec<Run>,
}

impl XmlElement for Hyperlink {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        Ok(Self {
            target_frame: reader.attr(start, "tgtFrame")?,
            tooltip: reader.attr(start, "tooltip")?,
            doc_location: reader.attr(start, "docLocation")?,
            history: reader.attr(start, "history")?,
            anchor: reader.attr(start, "anchor")?,
            id: reader.rel_attr(start, "id")?,
            runs: decode_runs(reader, start)?,
        })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(
            name,
            Attrs::new()
                .with("w:tgtFrame", &self.target_frame)
                .with("w:tooltip", &self.tooltip)
                .with("w:docLocation", &self.doc_location)
                .with("w:history", &self.history)
                .with("w:anchor", &self.anchor)
                .with("r:id", &self.id),
        )?;
        encode_runs(writer, &self.runs)?;
        writer.end(name)
    }
}

/// A simple field (`w:fldSimple`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleField {
    /// Field instruction, e.g. ` PAGE `
    pub instr: String,
    pub lock: Option<bool>,
    pub dirty: Option<bool>,
    /// Cached field result
    pub runs: Vec<Run>,
}

impl XmlElement for SimpleField {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        Ok(Self {
            instr: reader.required_attr(start, "instr")?,
            lock: reader.attr(start, "fldLock")?,
            dirty: reader.attr(start, "dirty")?,
            runs: decode_runs(reader, start)?,
        })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(
            name,
            Attrs::new()
                .with("w:instr", &self.instr)
                .with("w:fldLock", &self.lock)
                .with("w:dirty", &self.dirty),
        )?;
        encode_runs(writer, &self.runs)?;
        writer.end(name)
    }
}

/// Tracked insertion or deletion of runs (`w:ins`, `w:del`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunTrackChange {
    pub change: TrackChange,
    pub runs: Vec<Run>,
}

impl XmlElement for RunTrackChange {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let change = TrackChange {
            id: reader.required_attr(start, "id")?,
            author: reader.required_attr(start, "author")?,
            date: reader.attr(start, "date")?,
        };
        let runs = decode_runs(reader, start)?;
        Ok(Self { change, runs })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(
            name,
            Attrs::new()
                .with("w:id", &self.change.id)
                .with("w:author", &self.change.author)
                .with("w:date", &self.change.date),
        )?;
        encode_runs(writer, &self.runs)?;
        writer.end(name)
    }
}

/// One piece of paragraph content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphChild {
    Run(Run),
    Hyperlink(Hyperlink),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
    ProofError(ProofError),
    SimpleField(SimpleField),
    Insertion(RunTrackChange),
    Deletion(RunTrackChange),
}

impl ParagraphChild {
    fn decode_child(reader: &mut XmlReader<'_>, tag: &StartTag) -> Result<Option<Self>> {
        if tag.family != NsFamily::Wml {
            return Ok(None);
        }
        let child = match tag.local.as_str() {
            "r" => ParagraphChild::Run(Run::decode(reader, tag)?),
            "hyperlink" => ParagraphChild::Hyperlink(Hyperlink::decode(reader, tag)?),
            "bookmarkStart" => ParagraphChild::BookmarkStart(BookmarkStart::decode(reader, tag)?),
            "bookmarkEnd" => ParagraphChild::BookmarkEnd(BookmarkEnd::decode(reader, tag)?),
            "proofErr" => ParagraphChild::ProofError(ProofError::decode(reader, tag)?),
            "fldSimple" => ParagraphChild::SimpleField(SimpleField::decode(reader, tag)?),
            "ins" => ParagraphChild::Insertion(RunTrackChange::decode(reader, tag)?),
            "del" => ParagraphChild::Deletion(RunTrackChange::decode(reader, tag)?),
            _ => return Ok(None),
        };
        Ok(Some(child))
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<()> {
        match self {
            ParagraphChild::Run(r) => r.encode(writer, "w:r"),
            ParagraphChild::Hyperlink(h) => h.encode(writer, "w:hyperlink"),
            ParagraphChild::BookmarkStart(b) => b.encode(writer, "w:bookmarkStart"),
            ParagraphChild::BookmarkEnd(b) => b.encode(writer, "w:bookmarkEnd"),
            ParagraphChild::ProofError(p) => p.encode(writer, "w:proofErr"),
            ParagraphChild::SimpleField(f) => f.encode(writer, "w:fldSimple"),
            ParagraphChild::Insertion(c) => c.encode(writer, "w:ins"),
            ParagraphChild::Deletion(c) => c.encode(writer, "w:del"),
        }
    }
}

/// A paragraph
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub rsid_r_pr: Option<String>,
    pub rsid_r: Option<String>,
    pub rsid_del: Option<String>,
    pub rsid_p: Option<String>,
    pub rsid_r_default: Option<String>,
    /// Word 2010 paragraph id (`w14:paraId`)
    pub para_id: Option<String>,
    /// Word 2010 text id (`w14:textId`)
    pub text_id: Option<String>,
    pub property: Option<ParagraphProperty>,
    pub children: Vec<ParagraphChild>,
}

impl Paragraph {
    /// Empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraph holding one run of text
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(Run::with_text(text));
        p
    }

    /// Append a run
    pub fn add_run(&mut self, run: Run) -> &mut Self {
        self.children.push(ParagraphChild::Run(run));
        self
    }

    /// Paragraph properties, created on first use
    pub fn property_mut(&mut self) -> &mut ParagraphProperty {
        self.property.get_or_insert_with(ParagraphProperty::default)
    }

    /// Referenced paragraph style id
    pub fn style_id(&self) -> Option<&str> {
        self.property
            .as_ref()
            .and_then(|p| p.style.as_ref())
            .map(|s| s.val.as_str())
    }

    /// All runs, including those inside hyperlinks, fields and insertions
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().flat_map(|child| {
            let runs: &[Run] = match child {
                ParagraphChild::Run(run) => std::slice::from_ref(run),
                ParagraphChild::Hyperlink(h) => &h.runs,
                ParagraphChild::SimpleField(f) => &f.runs,
                ParagraphChild::Insertion(c) => &c.runs,
                _ => &[],
            };
            runs.iter()
        })
    }

    /// Get plain text of this paragraph (deleted runs excluded)
    pub fn plain_text(&self) -> String {
        self.runs().map(|r| r.plain_text()).collect()
    }
}

impl XmlElement for Paragraph {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut p = Paragraph {
            rsid_r_pr: reader.attr(start, "rsidRPr")?,
            rsid_r: reader.attr(start, "rsidR")?,
            rsid_del: reader.attr(start, "rsidDel")?,
            rsid_p: reader.attr(start, "rsidP")?,
            rsid_r_default: reader.attr(start, "rsidRDefault")?,
            para_id: reader.attr(start, "paraId")?,
            text_id: reader.attr(start, "textId")?,
            ..Default::default()
        };
        while let Some(tag) = reader.next_element(start)? {
            if tag.is_w("pPr") {
                p.property = Some(ParagraphProperty::decode(reader, &tag)?);
                continue;
            }
            match ParagraphChild::decode_child(reader, &tag)? {
                Some(child) => p.children.push(child),
                None => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(p)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(
            name,
            Attrs::new()
                .with("w14:paraId", &self.para_id)
                .with("w14:textId", &self.text_id)
                .with("w:rsidR", &self.rsid_r)
                .with("w:rsidRPr", &self.rsid_r_pr)
                .with("w:rsidDel", &self.rsid_del)
                .with("w:rsidRDefault", &self.rsid_r_default)
                .with("w:rsidP", &self.rsid_p),
        )?;
        encode_opt(writer, "w:pPr", &self.property)?;
        for child in &self.children {
            child.encode(writer)?;
        }
        writer.end(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{decode_fragment, encode_fragment};

    #[test]
    fn test_children_keep_order() {
        let p: Paragraph = decode_fragment(
            r#"<w:p><w:bookmarkStart w:id="0" w:name="intro"/><w:r><w:t>See </w:t></w:r><w:hyperlink r:id="rId5"><w:r><w:t>docs</w:t></w:r></w:hyperlink><w:proofErr w:type="spellStart"/><w:bookmarkEnd w:id="0"/></w:p>"#,
        )
        .unwrap();
        assert_eq!(p.children.len(), 5);
        assert!(matches!(p.children[0], ParagraphChild::BookmarkStart(ref b) if b.name == "intro"));
        assert!(matches!(p.children[2], ParagraphChild::Hyperlink(ref h) if h.id.as_deref() == Some("rId5")));
        assert!(matches!(p.children[4], ParagraphChild::BookmarkEnd(BookmarkEnd { id: 0 })));
        assert_eq!(p.plain_text(), "See docs");
    }

    #[test]
    fn test_properties_roundtrip_in_schema_order() {
        let xml = r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:keepNext/><w:numPr><w:ilvl w:val="0"/><w:numId w:val="2"/></w:numPr><w:spacing w:before="240" w:after="60"/><w:ind w:left="720" w:hanging="360"/><w:jc w:val="center"/><w:outlineLvl w:val="0"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#;
        let p: Paragraph = decode_fragment(xml).unwrap();
        let props = p.property.as_ref().unwrap();
        assert_eq!(p.style_id(), Some("Heading1"));
        assert_eq!(props.justification, Some(Val::new(Justification::Center)));
        assert_eq!(props.indentation.as_ref().unwrap().hanging, Some(Measure::Twips(360)));
        assert_eq!(encode_fragment(&p, "w:p"), xml);
    }

    #[test]
    fn test_empty_paragraph_is_self_closing() {
        assert_eq!(encode_fragment(&Paragraph::new(), "w:p"), "<w:p/>");
    }

    #[test]
    fn test_tracked_changes_and_fields() {
        let p: Paragraph = decode_fragment(
            r#"<w:p><w:ins w:id="1" w:author="Ann" w:date="2024-01-01T00:00:00Z"><w:r><w:t>new</w:t></w:r></w:ins><w:del w:id="2" w:author="Bob"><w:r><w:delText>old</w:delText></w:r></w:del><w:fldSimple w:instr=" PAGE "><w:r><w:t>3</w:t></w:r></w:fldSimple></w:p>"#,
        )
        .unwrap();
        assert!(matches!(p.children[0], ParagraphChild::Insertion(ref c) if c.change.author == "Ann"));
        assert!(matches!(p.children[1], ParagraphChild::Deletion(ref c) if c.change.date.is_none()));
        assert_eq!(p.plain_text(), "new3");

        let again: Paragraph = decode_fragment(&encode_fragment(&p, "w:p")).unwrap();
        assert_eq!(again, p);
    }

    #[test]
    fn test_unknown_siblings_do_not_change_known_children() {
        let plain: Paragraph =
            decode_fragment(r#"<w:p><w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r></w:p>"#).unwrap();
        let noisy: Paragraph = decode_fragment(
            r#"<w:p><w:r><w:t>a</w:t></w:r><w:commentRangeStart w:id="1"/><w14:future xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"><w:r><w:t>x</w:t></w:r></w14:future><w:r><w:t>b</w:t></w:r></w:p>"#,
        )
        .unwrap();
        assert_eq!(plain, noisy);
    }
}
