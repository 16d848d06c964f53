//! Closed WordprocessingML value enumerations (`ST_*` simple types)

use std::borrow::Cow;
use std::fmt;

use crate::xml::value::xml_enum;
use crate::xml::XmlValue;

xml_enum! {
    /// Paragraph or table alignment (`ST_Jc`)
    pub enum Justification {
        Start => "start",
        Center => "center",
        End => "end",
        Both => "both",
        MediumKashida => "mediumKashida",
        Distribute => "distribute",
        NumTab => "numTab",
        HighKashida => "highKashida",
        LowKashida => "lowKashida",
        ThaiDistribute => "thaiDistribute",
        Left => "left",
        Right => "right",
    }
}

xml_enum! {
    /// Text flow direction (`ST_TextDirection`); strict spellings accepted
    pub enum TextDirection {
        LrTb => "lrTb" | "tb",
        TbRl => "tbRl" | "rl",
        BtLr => "btLr" | "lr",
        LrTbV => "lrTbV" | "tbV",
        TbRlV => "tbRlV" | "rlV",
        TbLrV => "tbLrV" | "lrV",
    }
}

xml_enum! {
    /// Vertical font alignment within a line (`ST_TextAlignment`)
    pub enum TextAlignment {
        Top => "top",
        Center => "center",
        Baseline => "baseline",
        Bottom => "bottom",
        Auto => "auto",
    }
}

xml_enum! {
    /// Superscript / subscript (`ST_VerticalAlignRun`)
    pub enum VerticalAlignRun {
        Baseline => "baseline",
        Superscript => "superscript",
        Subscript => "subscript",
    }
}

xml_enum! {
    /// Text highlight color (`ST_HighlightColor`)
    pub enum HighlightColor {
        Black => "black",
        Blue => "blue",
        Cyan => "cyan",
        Green => "green",
        Magenta => "magenta",
        Red => "red",
        Yellow => "yellow",
        White => "white",
        DarkBlue => "darkBlue",
        DarkCyan => "darkCyan",
        DarkGreen => "darkGreen",
        DarkMagenta => "darkMagenta",
        DarkRed => "darkRed",
        DarkYellow => "darkYellow",
        DarkGray => "darkGray",
        LightGray => "lightGray",
        None => "none",
    }
}

xml_enum! {
    /// Underline pattern (`ST_Underline`)
    pub enum UnderlineType {
        Single => "single",
        Words => "words",
        Double => "double",
        Thick => "thick",
        Dotted => "dotted",
        DottedHeavy => "dottedHeavy",
        Dash => "dash",
        DashedHeavy => "dashedHeavy",
        DashLong => "dashLong",
        DashLongHeavy => "dashLongHeavy",
        DotDash => "dotDash",
        DashDotHeavy => "dashDotHeavy",
        DotDotDash => "dotDotDash",
        DashDotDotHeavy => "dashDotDotHeavy",
        Wave => "wave",
        WavyHeavy => "wavyHeavy",
        WavyDouble => "wavyDouble",
        None => "none",
    }
}

xml_enum! {
    /// Animated text effect (`ST_TextEffect`)
    pub enum TextEffect {
        BlinkBackground => "blinkBackground",
        Lights => "lights",
        AntsBlack => "antsBlack",
        AntsRed => "antsRed",
        Shimmer => "shimmer",
        Sparkle => "sparkle",
        None => "none",
    }
}

xml_enum! {
    /// East Asian emphasis mark (`ST_Em`)
    pub enum Emphasis {
        None => "none",
        Dot => "dot",
        Comma => "comma",
        Circle => "circle",
        UnderDot => "underDot",
    }
}

xml_enum! {
    /// Kind of break (`ST_BrType`)
    pub enum BreakType {
        Page => "page",
        Column => "column",
        TextWrapping => "textWrapping",
    }
}

xml_enum! {
    /// Line break restart location (`ST_BrClear`)
    pub enum BreakClear {
        None => "none",
        Left => "left",
        Right => "right",
        All => "all",
    }
}

xml_enum! {
    /// Complex field character kind (`ST_FldCharType`)
    pub enum FieldCharType {
        Begin => "begin",
        Separate => "separate",
        End => "end",
    }
}

xml_enum! {
    /// Tab stop alignment (`ST_TabJc`)
    pub enum TabStopType {
        Clear => "clear",
        Start => "start",
        Center => "center",
        End => "end",
        Decimal => "decimal",
        Bar => "bar",
        Num => "num",
        Left => "left",
        Right => "right",
    }
}

xml_enum! {
    /// Tab leader character (`ST_TabTlc`)
    pub enum TabLeader {
        None => "none",
        Dot => "dot",
        Hyphen => "hyphen",
        Underscore => "underscore",
        Heavy => "heavy",
        MiddleDot => "middleDot",
    }
}

xml_enum! {
    /// Line spacing interpretation (`ST_LineSpacingRule`)
    pub enum LineSpacingRule {
        Auto => "auto",
        Exact => "exact",
        AtLeast => "atLeast",
    }
}

xml_enum! {
    /// Unit of a table measurement (`ST_TblWidth`)
    pub enum TableWidthType {
        Nil => "nil",
        Pct => "pct",
        Dxa => "dxa",
        Auto => "auto",
    }
}

xml_enum! {
    /// Table layout algorithm (`ST_TblLayoutType`)
    pub enum TableLayoutType {
        Fixed => "fixed",
        Autofit => "autofit",
    }
}

xml_enum! {
    /// Row height rule (`ST_HeightRule`)
    pub enum HeightRule {
        Auto => "auto",
        Exact => "exact",
        AtLeast => "atLeast",
    }
}

xml_enum! {
    /// Merged cell marker (`ST_Merge`)
    pub enum MergeType {
        Continue => "continue",
        Restart => "restart",
    }
}

xml_enum! {
    /// Vertical merge revision (`ST_AnnotationVMerge`)
    pub enum AnnotationVMerge {
        Cont => "cont",
        Rest => "rest",
    }
}

xml_enum! {
    /// Vertical alignment of cell or page content (`ST_VerticalJc`)
    pub enum VerticalJc {
        Top => "top",
        Center => "center",
        Both => "both",
        Bottom => "bottom",
    }
}

xml_enum! {
    /// Section start (`ST_SectionMark`)
    pub enum SectionType {
        NextPage => "nextPage",
        NextColumn => "nextColumn",
        Continuous => "continuous",
        EvenPage => "evenPage",
        OddPage => "oddPage",
    }
}

xml_enum! {
    /// Page orientation (`ST_PageOrientation`)
    pub enum PageOrientation {
        Portrait => "portrait",
        Landscape => "landscape",
    }
}

xml_enum! {
    /// Header / footer slot (`ST_HdrFtr`)
    pub enum HdrFtrType {
        Default => "default",
        Even => "even",
        First => "first",
    }
}

xml_enum! {
    /// Proofing mark kind (`ST_ProofErr`)
    pub enum ProofErrType {
        SpellStart => "spellStart",
        SpellEnd => "spellEnd",
        GramStart => "gramStart",
        GramEnd => "gramEnd",
    }
}

xml_enum! {
    /// Document grid kind (`ST_DocGrid`)
    pub enum DocGridType {
        Default => "default",
        Lines => "lines",
        LinesAndChars => "linesAndChars",
        SnapToChars => "snapToChars",
    }
}

xml_enum! {
    /// Font slot used for ambiguous characters (`ST_Hint`)
    pub enum FontHint {
        Default => "default",
        EastAsia => "eastAsia",
        Cs => "cs",
    }
}

xml_enum! {
    /// Bracket style for combined characters (`ST_CombineBrackets`)
    pub enum CombineBrackets {
        None => "none",
        Round => "round",
        Square => "square",
        Angle => "angle",
        Curly => "curly",
    }
}

xml_enum! {
    /// Sides text may wrap on around a floating drawing (`ST_WrapText`)
    pub enum WrapText {
        BothSides => "bothSides",
        Left => "left",
        Right => "right",
        Largest => "largest",
    }
}

/// Length attribute (`ST_TwipsMeasure`, `ST_SignedTwipsMeasure`)
///
/// Either a plain number in twentieths of a point or a universal measure
/// such as `12pt` or `2.5cm`, which is kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Measure {
    Twips(i64),
    Universal(String),
}

/// Units allowed in a universal measure, with twips per unit
const UNIVERSAL_UNITS: &[(&str, f64)] = &[
    ("mm", 1440.0 / 25.4),
    ("cm", 1440.0 / 2.54),
    ("in", 1440.0),
    ("pt", 20.0),
    ("pc", 240.0),
    ("pi", 240.0),
];

impl Measure {
    /// Value in twentieths of a point, converting universal measures
    pub fn to_twips(&self) -> i64 {
        match self {
            Measure::Twips(twips) => *twips,
            Measure::Universal(raw) => split_universal(raw)
                .map(|(number, per_unit)| (number * per_unit).round() as i64)
                .unwrap_or_default(),
        }
    }
}

fn split_universal(raw: &str) -> Option<(f64, f64)> {
    UNIVERSAL_UNITS.iter().find_map(|(unit, per_unit)| {
        let number = raw.strip_suffix(unit)?.parse::<f64>().ok()?;
        number.is_finite().then_some((number, *per_unit))
    })
}

impl From<i64> for Measure {
    fn from(twips: i64) -> Self {
        Measure::Twips(twips)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Twips(twips) => write!(f, "{twips}"),
            Measure::Universal(raw) => f.write_str(raw),
        }
    }
}

impl XmlValue for Measure {
    fn parse_xml(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(twips) = raw.parse() {
            return Some(Measure::Twips(twips));
        }
        split_universal(raw).map(|_| Measure::Universal(raw.to_string()))
    }

    fn to_xml(&self) -> Option<Cow<'_, str>> {
        Some(match self {
            Measure::Twips(twips) => Cow::Owned(twips.to_string()),
            Measure::Universal(raw) => Cow::Borrowed(raw.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlValue;

    #[test]
    fn test_strict_text_direction_aliases() {
        assert_eq!(TextDirection::parse_xml("tb"), Some(TextDirection::LrTb));
        assert_eq!(TextDirection::parse_xml("btLr"), Some(TextDirection::BtLr));
        assert_eq!(TextDirection::parse_xml("lr"), Some(TextDirection::BtLr));
        assert_eq!(TextDirection::BtLr.as_str(), "btLr");
    }

    #[test]
    fn test_unknown_spelling_is_rejected() {
        assert_eq!(Justification::parse_xml("middle"), None);
        assert_eq!(Justification::parse_xml("both"), Some(Justification::Both));
    }

    #[test]
    fn test_measure_keeps_universal_text() {
        assert_eq!(Measure::parse_xml("720"), Some(Measure::Twips(720)));
        assert_eq!(Measure::parse_xml("-360"), Some(Measure::Twips(-360)));

        let points = Measure::parse_xml("12pt").unwrap();
        assert_eq!(points, Measure::Universal("12pt".into()));
        assert_eq!(points.to_xml().as_deref(), Some("12pt"));
        assert_eq!(points.to_twips(), 240);
        assert_eq!(Measure::parse_xml("1in").unwrap().to_twips(), 1440);
        assert_eq!(Measure::parse_xml("2.54cm").unwrap().to_twips(), 1440);

        assert_eq!(Measure::parse_xml("large"), None);
        assert_eq!(Measure::parse_xml("pt"), None);
    }
}
