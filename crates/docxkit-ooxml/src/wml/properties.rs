//! Leaf property elements shared by paragraph, run, table and section properties
//!
//! Everything here is schema data: attribute-only elements declared with
//! [`xml_attributes!`] and simple ordered containers declared with
//! [`xml_sequence!`]. Attribute order in each declaration is the schema
//! order and therefore the output order.

use crate::error::Result;
use crate::xml::{xml_attributes, xml_sequence, Attrs, StartTag, XmlElement, XmlReader, XmlWriter};

use super::simple_types::*;

xml_attributes! {
    /// Border line (`w:top`, `w:left`, `w:between`, `w:bdr`, ...)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Border {
        /// Line style (`ST_Border`: `single`, `double`, `nil`, art borders, ...)
        val: String => "w:val",
        color: Option<String> => "w:color",
        theme_color: Option<String> => "w:themeColor",
        theme_tint: Option<String> => "w:themeTint",
        theme_shade: Option<String> => "w:themeShade",
        /// Width in eighths of a point
        sz: Option<u32> => "w:sz",
        /// Spacing in points
        space: Option<u32> => "w:space",
        shadow: Option<bool> => "w:shadow",
        frame: Option<bool> => "w:frame",
    }
}

impl Border {
    /// A single line of the given width (eighths of a point)
    pub fn single(sz: u32) -> Self {
        Self {
            val: "single".to_string(),
            color: Some("auto".to_string()),
            sz: Some(sz),
            space: Some(0),
            ..Default::default()
        }
    }
}

xml_attributes! {
    /// Cell, paragraph or run shading (`w:shd`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Shading {
        /// Pattern (`ST_Shd`: `clear`, `solid`, `pct25`, ...)
        val: String => "w:val",
        color: Option<String> => "w:color",
        theme_color: Option<String> => "w:themeColor",
        theme_tint: Option<String> => "w:themeTint",
        theme_shade: Option<String> => "w:themeShade",
        fill: Option<String> => "w:fill",
        theme_fill: Option<String> => "w:themeFill",
        theme_fill_tint: Option<String> => "w:themeFillTint",
        theme_fill_shade: Option<String> => "w:themeFillShade",
    }
}

xml_attributes! {
    /// Run color (`w:color`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Color {
        /// Hex RGB or `auto`
        val: String => "w:val",
        theme_color: Option<String> => "w:themeColor",
        theme_tint: Option<String> => "w:themeTint",
        theme_shade: Option<String> => "w:themeShade",
    }
}

xml_attributes! {
    /// Run fonts (`w:rFonts`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Fonts {
        hint: Option<FontHint> => "w:hint",
        ascii: Option<String> => "w:ascii",
        h_ansi: Option<String> => "w:hAnsi",
        east_asia: Option<String> => "w:eastAsia",
        cs: Option<String> => "w:cs",
        ascii_theme: Option<String> => "w:asciiTheme",
        h_ansi_theme: Option<String> => "w:hAnsiTheme",
        east_asia_theme: Option<String> => "w:eastAsiaTheme",
        cs_theme: Option<String> => "w:cstheme",
    }
}

xml_attributes! {
    /// Underline (`w:u`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Underline {
        val: Option<UnderlineType> => "w:val",
        color: Option<String> => "w:color",
        theme_color: Option<String> => "w:themeColor",
        theme_tint: Option<String> => "w:themeTint",
        theme_shade: Option<String> => "w:themeShade",
    }
}

xml_attributes! {
    /// Languages for proofing (`w:lang`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Language {
        val: Option<String> => "w:val",
        east_asia: Option<String> => "w:eastAsia",
        bidi: Option<String> => "w:bidi",
    }
}

xml_attributes! {
    /// East Asian typography (`w:eastAsianLayout`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct EastAsianLayout {
        id: Option<i64> => "w:id",
        combine: Option<bool> => "w:combine",
        combine_brackets: Option<CombineBrackets> => "w:combineBrackets",
        vert: Option<bool> => "w:vert",
        vert_compress: Option<bool> => "w:vertCompress",
    }
}

xml_attributes! {
    /// Fit text to a width (`w:fitText`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct FitText {
        /// Width in twentieths of a point
        val: u32 => "w:val",
        id: Option<i64> => "w:id",
    }
}

xml_attributes! {
    /// Paragraph spacing (`w:spacing` in paragraph properties)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Spacing {
        before: Option<Measure> => "w:before",
        before_lines: Option<i32> => "w:beforeLines",
        before_autospacing: Option<bool> => "w:beforeAutospacing",
        after: Option<Measure> => "w:after",
        after_lines: Option<i32> => "w:afterLines",
        after_autospacing: Option<bool> => "w:afterAutospacing",
        line: Option<Measure> => "w:line",
        line_rule: Option<LineSpacingRule> => "w:lineRule",
    }
}

xml_attributes! {
    /// Paragraph indentation (`w:ind`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Indentation {
        start: Option<Measure> => "w:start",
        start_chars: Option<i32> => "w:startChars",
        end: Option<Measure> => "w:end",
        end_chars: Option<i32> => "w:endChars",
        left: Option<Measure> => "w:left",
        left_chars: Option<i32> => "w:leftChars",
        right: Option<Measure> => "w:right",
        right_chars: Option<i32> => "w:rightChars",
        hanging: Option<Measure> => "w:hanging",
        hanging_chars: Option<i32> => "w:hangingChars",
        first_line: Option<Measure> => "w:firstLine",
        first_line_chars: Option<i32> => "w:firstLineChars",
    }
}

xml_attributes! {
    /// Text frame placement (`w:framePr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct FrameProperty {
        drop_cap: Option<String> => "w:dropCap",
        lines: Option<u32> => "w:lines",
        w: Option<Measure> => "w:w",
        h: Option<Measure> => "w:h",
        v_space: Option<Measure> => "w:vSpace",
        h_space: Option<Measure> => "w:hSpace",
        wrap: Option<String> => "w:wrap",
        h_anchor: Option<String> => "w:hAnchor",
        v_anchor: Option<String> => "w:vAnchor",
        x: Option<Measure> => "w:x",
        x_align: Option<String> => "w:xAlign",
        y: Option<Measure> => "w:y",
        y_align: Option<String> => "w:yAlign",
        h_rule: Option<HeightRule> => "w:hRule",
        anchor_lock: Option<bool> => "w:anchorLock",
    }
}

xml_attributes! {
    /// Conditional table style formatting (`w:cnfStyle`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct ConditionalFormatting {
        /// Legacy twelve-digit bit string
        val: Option<String> => "w:val",
        first_row: Option<bool> => "w:firstRow",
        last_row: Option<bool> => "w:lastRow",
        first_column: Option<bool> => "w:firstColumn",
        last_column: Option<bool> => "w:lastColumn",
        odd_v_band: Option<bool> => "w:oddVBand",
        even_v_band: Option<bool> => "w:evenVBand",
        odd_h_band: Option<bool> => "w:oddHBand",
        even_h_band: Option<bool> => "w:evenHBand",
        first_row_first_column: Option<bool> => "w:firstRowFirstColumn",
        first_row_last_column: Option<bool> => "w:firstRowLastColumn",
        last_row_first_column: Option<bool> => "w:lastRowFirstColumn",
        last_row_last_column: Option<bool> => "w:lastRowLastColumn",
    }
}

xml_attributes! {
    /// Numbering reference level or id (`w:ilvl`, `w:numId`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct DecimalNumber {
        val: i64 => "w:val",
    }
}

xml_sequence! {
    /// List numbering reference (`w:numPr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct NumberingProperty {
        level: DecimalNumber => "ilvl",
        num_id: DecimalNumber => "numId",
    }
}

impl NumberingProperty {
    /// Reference list `num_id` at `level`
    pub fn new(num_id: i64, level: i64) -> Self {
        Self {
            level: Some(DecimalNumber { val: level }),
            num_id: Some(DecimalNumber { val: num_id }),
        }
    }
}

xml_sequence! {
    /// Paragraph borders (`w:pBdr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct ParagraphBorders {
        top: Border => "top",
        left: Border => "left" | "start",
        bottom: Border => "bottom",
        right: Border => "right" | "end",
        between: Border => "between",
        bar: Border => "bar",
    }
}

xml_attributes! {
    /// A custom tab stop (`w:tab` inside `w:tabs`)
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TabStop {
        val: TabStopType => "w:val",
        leader: Option<TabLeader> => "w:leader",
        /// Position in twentieths of a point
        pos: Measure => "w:pos",
    }
}

/// Custom tab stops (`w:tabs`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tabs {
    pub stops: Vec<TabStop>,
}

impl XmlElement for Tabs {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut stops = Vec::new();
        while let Some(tag) = reader.next_element(start)? {
            if tag.is_w("tab") {
                stops.push(TabStop::decode(reader, &tag)?);
            } else {
                reader.skip_unknown(start, &tag)?;
            }
        }
        Ok(Self { stops })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        for stop in &self.stops {
            stop.encode(writer, "w:tab")?;
        }
        writer.end(name)
    }
}

xml_attributes! {
    /// A table measurement: width, indent, cell margin or spacing (`CT_TblWidth`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TableWidth {
        /// Value; a plain number, or a percentage string in strict documents
        w: Option<String> => "w:w",
        width_type: Option<TableWidthType> => "w:type",
    }
}

impl TableWidth {
    /// Width in twentieths of a point
    pub fn dxa(w: u32) -> Self {
        Self {
            w: Some(w.to_string()),
            width_type: Some(TableWidthType::Dxa),
        }
    }

    /// Automatic width
    pub fn auto() -> Self {
        Self {
            w: Some("0".to_string()),
            width_type: Some(TableWidthType::Auto),
        }
    }
}

xml_sequence! {
    /// Table borders (`w:tblBorders`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TableBorders {
        top: Border => "top",
        left: Border => "left" | "start",
        bottom: Border => "bottom",
        right: Border => "right" | "end",
        inside_h: Border => "insideH",
        inside_v: Border => "insideV",
    }
}

impl TableBorders {
    /// The same border on every edge and inside line
    pub fn all(border: Border) -> Self {
        Self {
            top: Some(border.clone()),
            left: Some(border.clone()),
            bottom: Some(border.clone()),
            right: Some(border.clone()),
            inside_h: Some(border.clone()),
            inside_v: Some(border),
        }
    }
}

xml_sequence! {
    /// Cell borders (`w:tcBorders`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct CellBorders {
        top: Border => "top",
        left: Border => "left" | "start",
        bottom: Border => "bottom",
        right: Border => "right" | "end",
        inside_h: Border => "insideH",
        inside_v: Border => "insideV",
        tl2br: Border => "tl2br",
        tr2bl: Border => "tr2bl",
    }
}

xml_sequence! {
    /// Cell margins (`w:tblCellMar`, `w:tcMar`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct CellMargins {
        top: TableWidth => "top",
        left: TableWidth => "left" | "start",
        bottom: TableWidth => "bottom",
        right: TableWidth => "right" | "end",
    }
}

xml_attributes! {
    /// Table layout (`w:tblLayout`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TableLayout {
        layout_type: Option<TableLayoutType> => "w:type",
    }
}

xml_attributes! {
    /// Which conditional table style parts apply (`w:tblLook`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TableLook {
        /// Legacy hex bit mask
        val: Option<String> => "w:val",
        first_row: Option<bool> => "w:firstRow",
        last_row: Option<bool> => "w:lastRow",
        first_column: Option<bool> => "w:firstColumn",
        last_column: Option<bool> => "w:lastColumn",
        no_h_band: Option<bool> => "w:noHBand",
        no_v_band: Option<bool> => "w:noVBand",
    }
}

xml_attributes! {
    /// Floating table position (`w:tblpPr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TablePositioning {
        left_from_text: Option<Measure> => "w:leftFromText",
        right_from_text: Option<Measure> => "w:rightFromText",
        top_from_text: Option<Measure> => "w:topFromText",
        bottom_from_text: Option<Measure> => "w:bottomFromText",
        vert_anchor: Option<String> => "w:vertAnchor",
        horz_anchor: Option<String> => "w:horzAnchor",
        tblp_x_spec: Option<String> => "w:tblpXSpec",
        tblp_x: Option<Measure> => "w:tblpX",
        tblp_y_spec: Option<String> => "w:tblpYSpec",
        tblp_y: Option<Measure> => "w:tblpY",
    }
}

xml_attributes! {
    /// Row height (`w:trHeight`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct RowHeight {
        val: Option<Measure> => "w:val",
        h_rule: Option<HeightRule> => "w:hRule",
    }
}

xml_attributes! {
    /// Revision marker: who changed what, and when (`w:cellIns`, `w:cellDel`, ...)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TrackChange {
        id: i64 => "w:id",
        author: String => "w:author",
        date: Option<String> => "w:date",
    }
}

xml_attributes! {
    /// Vertically merged cell revision (`w:cellMerge`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct CellMergeRevision {
        id: i64 => "w:id",
        author: String => "w:author",
        date: Option<String> => "w:date",
        v_merge: Option<AnnotationVMerge> => "w:vMerge",
        v_merge_orig: Option<AnnotationVMerge> => "w:vMergeOrig",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{decode_fragment, encode_fragment};

    #[test]
    fn test_attributes_written_in_schema_order() {
        let border = Border {
            val: "single".into(),
            sz: Some(4),
            color: Some("FF0000".into()),
            ..Default::default()
        };
        let xml = encode_fragment(&border, "w:top");
        assert_eq!(xml, r#"<w:top w:val="single" w:color="FF0000" w:sz="4"/>"#);
    }

    #[test]
    fn test_required_attribute_missing() {
        let err = decode_fragment::<TabStop>(r#"<w:tab w:val="left"/>"#).unwrap_err();
        assert!(matches!(
            err,
            crate::OoxmlError::MissingAttribute { ref attribute, .. } if attribute == "pos"
        ));
    }

    #[test]
    fn test_start_end_accepted_for_left_right() {
        let margins: CellMargins = decode_fragment(
            r#"<w:tcMar><w:start w:w="108" w:type="dxa"/><w:end w:w="0" w:type="auto"/></w:tcMar>"#,
        )
        .unwrap();
        assert_eq!(margins.left, Some(TableWidth::dxa(108)));
        assert_eq!(margins.right, Some(TableWidth::auto()));
        assert!(margins.top.is_none());

        let xml = encode_fragment(&margins, "w:tcMar");
        assert_eq!(
            xml,
            r#"<w:tcMar><w:left w:w="108" w:type="dxa"/><w:right w:w="0" w:type="auto"/></w:tcMar>"#
        );
    }

    #[test]
    fn test_tabs_keep_order() {
        let tabs: Tabs = decode_fragment(
            r#"<w:tabs><w:tab w:val="right" w:leader="dot" w:pos="9350"/><w:tab w:val="left" w:pos="720"/></w:tabs>"#,
        )
        .unwrap();
        let positions: Vec<i64> = tabs.stops.iter().map(|t| t.pos.to_twips()).collect();
        assert_eq!(positions, vec![9350, 720]);
        assert_eq!(tabs.stops[0].leader, Some(TabLeader::Dot));
    }

    #[test]
    fn test_empty_sequence_is_self_closing() {
        let xml = encode_fragment(&TableBorders::default(), "w:tblBorders");
        assert_eq!(xml, "<w:tblBorders/>");
    }

    #[test]
    fn test_numbering_reference() {
        let numbering: NumberingProperty =
            decode_fragment(r#"<w:numPr><w:ilvl w:val="1"/><w:numId w:val="3"/></w:numPr>"#)
                .unwrap();
        assert_eq!(numbering, NumberingProperty::new(3, 1));
    }
}
