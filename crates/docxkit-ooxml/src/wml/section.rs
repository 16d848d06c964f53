//! Section properties (`w:sectPr`)

use crate::error::Result;
use crate::namespace::NsFamily;
use crate::xml::{
    decode_into, encode_opt, xml_attributes, Attrs, OnOff, StartTag, Val, XmlElement, XmlReader,
    XmlWriter,
};

use super::simple_types::*;

/// Header or footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdrFtrKind {
    Header,
    Footer,
}

/// Reference to a header or footer part (`w:headerReference`, `w:footerReference`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdrFtrReference {
    pub kind: HdrFtrKind,
    pub ref_type: HdrFtrType,
    /// Relationship id of the header/footer part
    pub id: String,
}

impl HdrFtrReference {
    fn decode(reader: &mut XmlReader<'_>, tag: &StartTag, kind: HdrFtrKind) -> Result<Self> {
        let reference = Self {
            kind,
            ref_type: reader.required_attr(tag, "type")?,
            id: reader
                .rel_attr(tag, "id")?
                .ok_or_else(|| crate::OoxmlError::MissingAttribute {
                    part: reader.part().to_string(),
                    element: tag.local.clone(),
                    attribute: "r:id".to_string(),
                })?,
        };
        reader.skip(tag)?;
        Ok(reference)
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<()> {
        let name = match self.kind {
            HdrFtrKind::Header => "w:headerReference",
            HdrFtrKind::Footer => "w:footerReference",
        };
        writer.empty(
            name,
            Attrs::new().with("w:type", &self.ref_type).with("r:id", &self.id),
        )
    }
}

xml_attributes! {
    /// Page size in twentieths of a point (`w:pgSz`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct PageSize {
        w: Option<Measure> => "w:w",
        h: Option<Measure> => "w:h",
        orient: Option<PageOrientation> => "w:orient",
        code: Option<u32> => "w:code",
    }
}

xml_attributes! {
    /// Page margins in twentieths of a point (`w:pgMar`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct PageMargins {
        top: Option<Measure> => "w:top",
        right: Option<Measure> => "w:right",
        bottom: Option<Measure> => "w:bottom",
        left: Option<Measure> => "w:left",
        header: Option<Measure> => "w:header",
        footer: Option<Measure> => "w:footer",
        gutter: Option<Measure> => "w:gutter",
    }
}

xml_attributes! {
    /// Page numbering (`w:pgNumType`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct PageNumbering {
        fmt: Option<String> => "w:fmt",
        start: Option<i64> => "w:start",
        chap_style: Option<i64> => "w:chapStyle",
        chap_sep: Option<String> => "w:chapSep",
    }
}

xml_attributes! {
    /// Single column definition (`w:col`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Column {
        w: Option<Measure> => "w:w",
        space: Option<Measure> => "w:space",
    }
}

/// Column layout (`w:cols`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns {
    pub equal_width: Option<bool>,
    pub space: Option<Measure>,
    pub num: Option<u32>,
    pub separator: Option<bool>,
    pub columns: Vec<Column>,
}

impl XmlElement for Columns {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut cols = Self {
            equal_width: reader.attr(start, "equalWidth")?,
            space: reader.attr(start, "space")?,
            num: reader.attr(start, "num")?,
            separator: reader.attr(start, "sep")?,
            columns: Vec::new(),
        };
        while let Some(tag) = reader.next_element(start)? {
            if tag.is_w("col") {
                cols.columns.push(Column::decode(reader, &tag)?);
            } else {
                reader.skip_unknown(start, &tag)?;
            }
        }
        Ok(cols)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(
            name,
            Attrs::new()
                .with("w:equalWidth", &self.equal_width)
                .with("w:space", &self.space)
                .with("w:num", &self.num)
                .with("w:sep", &self.separator),
        )?;
        for col in &self.columns {
            col.encode(writer, "w:col")?;
        }
        writer.end(name)
    }
}

xml_attributes! {
    /// Document grid (`w:docGrid`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct DocGrid {
        grid_type: Option<DocGridType> => "w:type",
        line_pitch: Option<i32> => "w:linePitch",
        char_space: Option<i32> => "w:charSpace",
    }
}

/// Section properties
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionProperty {
    pub rsid_r_pr: Option<String>,
    pub rsid_del: Option<String>,
    pub rsid_r: Option<String>,
    pub rsid_sect: Option<String>,
    /// Header and footer references in document order
    pub references: Vec<HdrFtrReference>,
    pub section_type: Option<Val<SectionType>>,
    pub page_size: Option<PageSize>,
    pub page_margins: Option<PageMargins>,
    pub page_numbering: Option<PageNumbering>,
    pub columns: Option<Columns>,
    pub vertical_align: Option<Val<VerticalJc>>,
    pub title_page: Option<OnOff>,
    pub text_direction: Option<Val<TextDirection>>,
    pub bidi: Option<OnOff>,
    pub rtl_gutter: Option<OnOff>,
    pub doc_grid: Option<DocGrid>,
}

impl SectionProperty {
    /// US Letter portrait with one-inch margins
    pub fn letter() -> Self {
        Self {
            page_size: Some(PageSize {
                w: Some(Measure::Twips(12240)),
                h: Some(Measure::Twips(15840)),
                ..Default::default()
            }),
            page_margins: Some(PageMargins {
                top: Some(Measure::Twips(1440)),
                right: Some(Measure::Twips(1440)),
                bottom: Some(Measure::Twips(1440)),
                left: Some(Measure::Twips(1440)),
                header: Some(Measure::Twips(720)),
                footer: Some(Measure::Twips(720)),
                gutter: Some(Measure::Twips(0)),
            }),
            columns: Some(Columns {
                space: Some(Measure::Twips(720)),
                ..Default::default()
            }),
            doc_grid: Some(DocGrid {
                line_pitch: Some(360),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

impl XmlElement for SectionProperty {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut sect = SectionProperty {
            rsid_r_pr: reader.attr(start, "rsidRPr")?,
            rsid_del: reader.attr(start, "rsidDel")?,
            rsid_r: reader.attr(start, "rsidR")?,
            rsid_sect: reader.attr(start, "rsidSect")?,
            ..Default::default()
        };
        while let Some(tag) = reader.next_element(start)? {
            if tag.family != NsFamily::Wml {
                reader.skip_unknown(start, &tag)?;
                continue;
            }
            match tag.local.as_str() {
                "headerReference" => sect.references.push(HdrFtrReference::decode(
                    reader,
                    &tag,
                    HdrFtrKind::Header,
                )?),
                "footerReference" => sect.references.push(HdrFtrReference::decode(
                    reader,
                    &tag,
                    HdrFtrKind::Footer,
                )?),
                "type" => decode_into(&mut sect.section_type, reader, &tag)?,
                "pgSz" => decode_into(&mut sect.page_size, reader, &tag)?,
                "pgMar" => decode_into(&mut sect.page_margins, reader, &tag)?,
                "pgNumType" => decode_into(&mut sect.page_numbering, reader, &tag)?,
                "cols" => decode_into(&mut sect.columns, reader, &tag)?,
                "vAlign" => decode_into(&mut sect.vertical_align, reader, &tag)?,
                "titlePg" => decode_into(&mut sect.title_page, reader, &tag)?,
                "textDirection" => decode_into(&mut sect.text_direction, reader, &tag)?,
                "bidi" => decode_into(&mut sect.bidi, reader, &tag)?,
                "rtlGutter" => decode_into(&mut sect.rtl_gutter, reader, &tag)?,
                "docGrid" => decode_into(&mut sect.doc_grid, reader, &tag)?,
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(sect)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(
            name,
            Attrs::new()
                .with("w:rsidR", &self.rsid_r)
                .with("w:rsidRPr", &self.rsid_r_pr)
                .with("w:rsidDel", &self.rsid_del)
                .with("w:rsidSect", &self.rsid_sect),
        )?;
        for reference in &self.references {
            reference.encode(writer)?;
        }
        encode_opt(writer, "w:type", &self.section_type)?;
        encode_opt(writer, "w:pgSz", &self.page_size)?;
        encode_opt(writer, "w:pgMar", &self.page_margins)?;
        encode_opt(writer, "w:pgNumType", &self.page_numbering)?;
        encode_opt(writer, "w:cols", &self.columns)?;
        encode_opt(writer, "w:vAlign", &self.vertical_align)?;
        encode_opt(writer, "w:titlePg", &self.title_page)?;
        encode_opt(writer, "w:textDirection", &self.text_direction)?;
        encode_opt(writer, "w:bidi", &self.bidi)?;
        encode_opt(writer, "w:rtlGutter", &self.rtl_gutter)?;
        encode_opt(writer, "w:docGrid", &self.doc_grid)?;
        writer.end(name)
    }
}
