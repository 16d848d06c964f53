//! DrawingML pictures inside a run (`w:drawing`)
//!
//! ```xml
//! <w:drawing>
//!   <wp:inline|wp:anchor>
//!     <wp:extent cx="..." cy="..."/>               <!-- size in EMUs -->
//!     <wp:docPr id="..." name="..." descr="..."/>  <!-- alt text -->
//!     <a:graphic>
//!       <a:graphicData uri="...picture">
//!         <pic:pic>
//!           <pic:blipFill><a:blip r:embed="rIdN"/></pic:blipFill>
//!         </pic:pic>
//!       </a:graphicData>
//!     </a:graphic>
//!   </wp:inline|wp:anchor>
//! </w:drawing>
//! ```
//!
//! The `a:` and `pic:` namespaces are declared locally on `a:graphic` and
//! `pic:pic`, as Word does.

use crate::error::{OoxmlError, Result};
use crate::namespace::{self, NsFamily};
use crate::xml::{encode_opt, xml_attributes, Attrs, StartTag, XmlElement, XmlReader, XmlWriter};

use super::simple_types::WrapText;

/// EMUs per inch (914400)
pub const EMU_PER_INCH: i64 = 914400;

/// EMUs per pixel at 96 DPI (9525)
pub const EMU_PER_PIXEL: i64 = 9525;

/// `graphicData` URI of a picture
pub const PICTURE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Convert pixels to EMUs at 96 DPI
pub fn pixels_to_emu(pixels: i64) -> i64 {
    pixels * EMU_PER_PIXEL
}

/// Convert EMUs to pixels at 96 DPI
pub fn emu_to_pixels(emu: i64) -> i64 {
    (emu as f64 / EMU_PER_PIXEL as f64).round() as i64
}

xml_attributes! {
    /// Size in EMUs (`wp:extent`, `a:ext`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Extent {
        cx: i64 => "cx",
        cy: i64 => "cy",
    }
}

xml_attributes! {
    /// Extra space for effects such as shadows (`wp:effectExtent`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EffectExtent {
        l: i64 => "l",
        t: i64 => "t",
        r: i64 => "r",
        b: i64 => "b",
    }
}

xml_attributes! {
    /// A coordinate in EMUs (`wp:simplePos`, `wp:start`, `a:off`, ...)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Point {
        x: i64 => "x",
        y: i64 => "y",
    }
}

xml_attributes! {
    /// Drawing object properties (`wp:docPr`, `pic:cNvPr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct DocProperties {
        id: u32 => "id",
        name: String => "name",
        descr: Option<String> => "descr",
        hidden: Option<bool> => "hidden",
        title: Option<String> => "title",
    }
}

xml_attributes! {
    /// Image reference (`a:blip`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Blip {
        /// Relationship id of an embedded image part
        embed: Option<String> => "r:embed",
        /// Relationship id of a linked external image
        link: Option<String> => "r:link",
    }
}

/// Graphic frame locks (`wp:cNvGraphicFramePr/a:graphicFrameLocks`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphicFrameLocks {
    pub no_change_aspect: Option<bool>,
}

impl XmlElement for GraphicFrameLocks {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut locks = Self::default();
        while let Some(tag) = reader.next_element(start)? {
            if tag.family == NsFamily::Drawing && tag.local == "graphicFrameLocks" {
                locks.no_change_aspect = reader.attr(&tag, "noChangeAspect")?;
                reader.skip(&tag)?;
            } else {
                reader.skip_unknown(start, &tag)?;
            }
        }
        Ok(locks)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        writer.empty(
            "a:graphicFrameLocks",
            Attrs::new()
                .with_raw("xmlns:a", namespace::A)
                .with("noChangeAspect", &self.no_change_aspect),
        )?;
        writer.end(name)
    }
}

/// 2D transform (`a:xfrm`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transform2D {
    pub offset: Option<Point>,
    pub extent: Option<Extent>,
}

impl XmlElement for Transform2D {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut xfrm = Self::default();
        while let Some(tag) = reader.next_element(start)? {
            match (tag.family, tag.local.as_str()) {
                (NsFamily::Drawing, "off") => xfrm.offset = Some(Point::decode(reader, &tag)?),
                (NsFamily::Drawing, "ext") => xfrm.extent = Some(Extent::decode(reader, &tag)?),
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(xfrm)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        encode_opt(writer, "a:off", &self.offset)?;
        encode_opt(writer, "a:ext", &self.extent)?;
        writer.end(name)
    }
}

/// Shape properties of a picture (`pic:spPr`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShapeProperties {
    pub transform: Option<Transform2D>,
    /// Preset geometry name (`a:prstGeom/@prst`), usually `rect`
    pub preset_geometry: Option<String>,
}

impl XmlElement for ShapeProperties {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut sp = Self::default();
        while let Some(tag) = reader.next_element(start)? {
            match (tag.family, tag.local.as_str()) {
                (NsFamily::Drawing, "xfrm") => sp.transform = Some(Transform2D::decode(reader, &tag)?),
                (NsFamily::Drawing, "prstGeom") => {
                    sp.preset_geometry = Some(reader.required_attr(&tag, "prst")?);
                    reader.skip(&tag)?;
                }
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(sp)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        encode_opt(writer, "a:xfrm", &self.transform)?;
        if let Some(prst) = &self.preset_geometry {
            writer.start("a:prstGeom", Attrs::new().with("prst", prst))?;
            writer.empty("a:avLst", Attrs::new())?;
            writer.end("a:prstGeom")?;
        }
        writer.end(name)
    }
}

/// A picture (`pic:pic`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Picture {
    /// `pic:nvPicPr/pic:cNvPr`
    pub properties: DocProperties,
    pub blip: Blip,
    /// `a:stretch/a:fillRect` present in the blip fill
    pub stretch: bool,
    pub shape: ShapeProperties,
}

impl XmlElement for Picture {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut pic = Self::default();
        while let Some(tag) = reader.next_element(start)? {
            match (tag.family, tag.local.as_str()) {
                (NsFamily::Picture, "nvPicPr") => {
                    while let Some(child) = reader.next_element(&tag)? {
                        if child.family == NsFamily::Picture && child.local == "cNvPr" {
                            pic.properties = DocProperties::decode(reader, &child)?;
                        } else {
                            reader.skip_unknown(&tag, &child)?;
                        }
                    }
                }
                (NsFamily::Picture, "blipFill") => {
                    while let Some(child) = reader.next_element(&tag)? {
                        match (child.family, child.local.as_str()) {
                            (NsFamily::Drawing, "blip") => pic.blip = Blip::decode(reader, &child)?,
                            (NsFamily::Drawing, "stretch") => {
                                pic.stretch = true;
                                reader.skip(&child)?;
                            }
                            _ => reader.skip_unknown(&tag, &child)?,
                        }
                    }
                }
                (NsFamily::Picture, "spPr") => pic.shape = ShapeProperties::decode(reader, &tag)?,
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(pic)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new().with_raw("xmlns:pic", namespace::PIC))?;

        writer.start("pic:nvPicPr", Attrs::new())?;
        self.properties.encode(writer, "pic:cNvPr")?;
        writer.empty("pic:cNvPicPr", Attrs::new())?;
        writer.end("pic:nvPicPr")?;

        writer.start("pic:blipFill", Attrs::new())?;
        self.blip.encode(writer, "a:blip")?;
        if self.stretch {
            writer.start("a:stretch", Attrs::new())?;
            writer.empty("a:fillRect", Attrs::new())?;
            writer.end("a:stretch")?;
        }
        writer.end("pic:blipFill")?;

        self.shape.encode(writer, "pic:spPr")?;
        writer.end(name)
    }
}

/// Graphic payload (`a:graphic/a:graphicData`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Graphic {
    pub uri: String,
    /// Present when the payload is a picture; other payloads are not modelled
    pub picture: Option<Picture>,
}

impl XmlElement for Graphic {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut graphic = Self::default();
        while let Some(tag) = reader.next_element(start)? {
            if tag.family == NsFamily::Drawing && tag.local == "graphicData" {
                graphic.uri = reader.required_attr(&tag, "uri")?;
                while let Some(child) = reader.next_element(&tag)? {
                    if child.family == NsFamily::Picture && child.local == "pic" {
                        graphic.picture = Some(Picture::decode(reader, &child)?);
                    } else {
                        tracing::warn!(
                            uri = %graphic.uri,
                            element = %child.local,
                            "dropping graphic payload that is not a picture"
                        );
                        reader.skip(&child)?;
                    }
                }
            } else {
                reader.skip_unknown(start, &tag)?;
            }
        }
        Ok(graphic)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new().with_raw("xmlns:a", namespace::A))?;
        writer.start("a:graphicData", Attrs::new().with("uri", &self.uri))?;
        encode_opt(writer, "pic:pic", &self.picture)?;
        writer.end("a:graphicData")?;
        writer.end(name)
    }
}

/// Horizontal or vertical anchor position (`wp:positionH`, `wp:positionV`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Base the position is relative to (`page`, `margin`, `column`, ...)
    pub relative_from: String,
    pub placement: Placement,
}

/// Either an alignment or an absolute offset, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// `wp:align`
    Align(String),
    /// `wp:posOffset` in EMUs
    Offset(i64),
}

impl XmlElement for Position {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let relative_from = reader.required_attr(start, "relativeFrom")?;
        let mut placement = None;
        while let Some(tag) = reader.next_element(start)? {
            let member = match (tag.family, tag.local.as_str()) {
                (NsFamily::WpDrawing, "align") => Placement::Align(reader.read_text(&tag)?),
                (NsFamily::WpDrawing, "posOffset") => {
                    let raw = reader.read_text(&tag)?;
                    let offset = raw.trim().parse().map_err(|_| OoxmlError::InvalidAttributeValue {
                        part: reader.part().to_string(),
                        field: format!("{}/posOffset", start.local),
                        value: raw.clone(),
                    })?;
                    Placement::Offset(offset)
                }
                _ => {
                    reader.skip_unknown(start, &tag)?;
                    continue;
                }
            };
            if placement.is_some() {
                tracing::warn!(element = %start.local, "dropping second placement of a choice group");
            } else {
                placement = Some(member);
            }
        }
        Ok(Self {
            relative_from,
            placement: placement.unwrap_or(Placement::Offset(0)),
        })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new().with("relativeFrom", &self.relative_from))?;
        match &self.placement {
            Placement::Align(align) => writer.text_element("wp:align", Attrs::new(), align)?,
            Placement::Offset(offset) => {
                writer.text_element("wp:posOffset", Attrs::new(), &offset.to_string())?
            }
        }
        writer.end(name)
    }
}

/// Wrap polygon for tight and through wrapping (`wp:wrapPolygon`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WrapPolygon {
    pub edited: Option<bool>,
    pub start: Point,
    pub line_to: Vec<Point>,
}

impl XmlElement for WrapPolygon {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut polygon = Self {
            edited: reader.attr(start, "edited")?,
            ..Default::default()
        };
        while let Some(tag) = reader.next_element(start)? {
            match (tag.family, tag.local.as_str()) {
                (NsFamily::WpDrawing, "start") => polygon.start = Point::decode(reader, &tag)?,
                (NsFamily::WpDrawing, "lineTo") => polygon.line_to.push(Point::decode(reader, &tag)?),
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(polygon)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new().with("edited", &self.edited))?;
        self.start.encode(writer, "wp:start")?;
        for point in &self.line_to {
            point.encode(writer, "wp:lineTo")?;
        }
        writer.end(name)
    }
}

/// Distances from surrounding text, in EMUs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WrapDistances {
    pub top: Option<u32>,
    pub bottom: Option<u32>,
    pub left: Option<u32>,
    pub right: Option<u32>,
}

impl WrapDistances {
    fn read(reader: &XmlReader<'_>, tag: &StartTag) -> Result<Self> {
        Ok(Self {
            top: reader.attr(tag, "distT")?,
            bottom: reader.attr(tag, "distB")?,
            left: reader.attr(tag, "distL")?,
            right: reader.attr(tag, "distR")?,
        })
    }

    fn attrs(&self, attrs: Attrs) -> Attrs {
        attrs
            .with("distT", &self.top)
            .with("distB", &self.bottom)
            .with("distL", &self.left)
            .with("distR", &self.right)
    }
}

/// Text wrapping around an anchored drawing (choice group)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrap {
    None,
    Square {
        wrap_text: WrapText,
        distances: WrapDistances,
    },
    Tight {
        wrap_text: WrapText,
        distances: WrapDistances,
        polygon: WrapPolygon,
    },
    Through {
        wrap_text: WrapText,
        distances: WrapDistances,
        polygon: WrapPolygon,
    },
    TopAndBottom {
        distances: WrapDistances,
    },
}

impl Wrap {
    fn decode_child(reader: &mut XmlReader<'_>, tag: &StartTag) -> Result<Option<Self>> {
        if tag.family != NsFamily::WpDrawing {
            return Ok(None);
        }
        let wrap = match tag.local.as_str() {
            "wrapNone" => {
                reader.skip(tag)?;
                Wrap::None
            }
            "wrapSquare" => {
                let wrap = Wrap::Square {
                    wrap_text: reader.required_attr(tag, "wrapText")?,
                    distances: WrapDistances::read(reader, tag)?,
                };
                reader.skip(tag)?;
                wrap
            }
            "wrapTopAndBottom" => {
                let wrap = Wrap::TopAndBottom {
                    distances: WrapDistances::read(reader, tag)?,
                };
                reader.skip(tag)?;
                wrap
            }
            local @ ("wrapTight" | "wrapThrough") => {
                let wrap_text = reader.required_attr(tag, "wrapText")?;
                let distances = WrapDistances::read(reader, tag)?;
                let mut polygon = WrapPolygon::default();
                while let Some(child) = reader.next_element(tag)? {
                    if child.family == NsFamily::WpDrawing && child.local == "wrapPolygon" {
                        polygon = WrapPolygon::decode(reader, &child)?;
                    } else {
                        reader.skip_unknown(tag, &child)?;
                    }
                }
                if local == "wrapTight" {
                    Wrap::Tight {
                        wrap_text,
                        distances,
                        polygon,
                    }
                } else {
                    Wrap::Through {
                        wrap_text,
                        distances,
                        polygon,
                    }
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(wrap))
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<()> {
        match self {
            Wrap::None => writer.empty("wp:wrapNone", Attrs::new()),
            Wrap::Square {
                wrap_text,
                distances,
            } => writer.empty(
                "wp:wrapSquare",
                distances.attrs(Attrs::new().with("wrapText", wrap_text)),
            ),
            Wrap::TopAndBottom { distances } => {
                writer.empty("wp:wrapTopAndBottom", distances.attrs(Attrs::new()))
            }
            Wrap::Tight {
                wrap_text,
                distances,
                polygon,
            }
            | Wrap::Through {
                wrap_text,
                distances,
                polygon,
            } => {
                let name = if matches!(self, Wrap::Tight { .. }) {
                    "wp:wrapTight"
                } else {
                    "wp:wrapThrough"
                };
                let attrs = Attrs::new()
                    .with("wrapText", wrap_text)
                    .with("distL", &distances.left)
                    .with("distR", &distances.right);
                writer.start(name, attrs)?;
                polygon.encode(writer, "wp:wrapPolygon")?;
                writer.end(name)
            }
        }
    }
}

/// Content shared by inline and anchored drawings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrawingContent {
    pub extent: Extent,
    pub effect_extent: Option<EffectExtent>,
    pub doc_properties: DocProperties,
    pub frame_locks: Option<GraphicFrameLocks>,
    pub graphic: Graphic,
}

impl DrawingContent {
    /// Try to consume a shared child; returns false when `tag` is not one
    fn decode_child(&mut self, reader: &mut XmlReader<'_>, tag: &StartTag) -> Result<bool> {
        match (tag.family, tag.local.as_str()) {
            (NsFamily::WpDrawing, "extent") => self.extent = Extent::decode(reader, tag)?,
            (NsFamily::WpDrawing, "effectExtent") => {
                self.effect_extent = Some(EffectExtent::decode(reader, tag)?)
            }
            (NsFamily::WpDrawing, "docPr") => self.doc_properties = DocProperties::decode(reader, tag)?,
            (NsFamily::WpDrawing, "cNvGraphicFramePr") => {
                self.frame_locks = Some(GraphicFrameLocks::decode(reader, tag)?)
            }
            (NsFamily::Drawing, "graphic") => self.graphic = Graphic::decode(reader, tag)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Drawing flowing inline with text (`wp:inline`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inline {
    pub distances: WrapDistances,
    pub content: DrawingContent,
}

/// Floating drawing (`wp:anchor`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub distances: WrapDistances,
    pub use_simple_pos: Option<bool>,
    pub relative_height: Option<u32>,
    pub behind_doc: Option<bool>,
    pub locked: Option<bool>,
    pub layout_in_cell: Option<bool>,
    pub hidden: Option<bool>,
    pub allow_overlap: Option<bool>,
    pub simple_pos: Point,
    pub position_h: Position,
    pub position_v: Position,
    pub wrap: Wrap,
    pub content: DrawingContent,
}

/// Inline or anchored placement (choice group)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawingKind {
    Inline(Inline),
    Anchor(Box<Anchor>),
}

/// A drawing run child (`w:drawing`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawing {
    pub kind: DrawingKind,
}

impl Drawing {
    /// An inline picture showing the image behind relationship `rel_id`
    pub fn inline_picture(rel_id: impl Into<String>, id: u32, name: &str, cx: i64, cy: i64) -> Self {
        let extent = Extent { cx, cy };
        let properties = DocProperties {
            id,
            name: name.to_string(),
            ..Default::default()
        };
        Self {
            kind: DrawingKind::Inline(Inline {
                distances: WrapDistances {
                    top: Some(0),
                    bottom: Some(0),
                    left: Some(0),
                    right: Some(0),
                },
                content: DrawingContent {
                    extent,
                    effect_extent: None,
                    doc_properties: properties.clone(),
                    frame_locks: Some(GraphicFrameLocks {
                        no_change_aspect: Some(true),
                    }),
                    graphic: Graphic {
                        uri: PICTURE_URI.to_string(),
                        picture: Some(Picture {
                            properties: DocProperties { id: 0, ..properties },
                            blip: Blip {
                                embed: Some(rel_id.into()),
                                link: None,
                            },
                            stretch: true,
                            shape: ShapeProperties {
                                transform: Some(Transform2D {
                                    offset: Some(Point::default()),
                                    extent: Some(extent),
                                }),
                                preset_geometry: Some("rect".to_string()),
                            },
                        }),
                    },
                },
            }),
        }
    }

    /// Shared content of either placement
    pub fn content(&self) -> &DrawingContent {
        match &self.kind {
            DrawingKind::Inline(inline) => &inline.content,
            DrawingKind::Anchor(anchor) => &anchor.content,
        }
    }

    /// Relationship id of the embedded picture, if any
    pub fn embed_id(&self) -> Option<&str> {
        self.content()
            .graphic
            .picture
            .as_ref()
            .and_then(|p| p.blip.embed.as_deref())
    }

    /// Alt text from `wp:docPr/@descr`
    pub fn description(&self) -> Option<&str> {
        self.content().doc_properties.descr.as_deref()
    }

    fn decode_inline(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Inline> {
        let mut inline = Inline {
            distances: WrapDistances::read(reader, start)?,
            content: DrawingContent::default(),
        };
        while let Some(tag) = reader.next_element(start)? {
            if !inline.content.decode_child(reader, &tag)? {
                reader.skip_unknown(start, &tag)?;
            }
        }
        Ok(inline)
    }

    fn decode_anchor(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Anchor> {
        let mut anchor = Anchor {
            distances: WrapDistances::read(reader, start)?,
            use_simple_pos: reader.attr(start, "simplePos")?,
            relative_height: reader.attr(start, "relativeHeight")?,
            behind_doc: reader.attr(start, "behindDoc")?,
            locked: reader.attr(start, "locked")?,
            layout_in_cell: reader.attr(start, "layoutInCell")?,
            hidden: reader.attr(start, "hidden")?,
            allow_overlap: reader.attr(start, "allowOverlap")?,
            simple_pos: Point::default(),
            position_h: Position {
                relative_from: "column".to_string(),
                placement: Placement::Offset(0),
            },
            position_v: Position {
                relative_from: "paragraph".to_string(),
                placement: Placement::Offset(0),
            },
            wrap: Wrap::None,
            content: DrawingContent::default(),
        };
        let mut wrap_seen = false;
        while let Some(tag) = reader.next_element(start)? {
            match (tag.family, tag.local.as_str()) {
                (NsFamily::WpDrawing, "simplePos") => anchor.simple_pos = Point::decode(reader, &tag)?,
                (NsFamily::WpDrawing, "positionH") => anchor.position_h = Position::decode(reader, &tag)?,
                (NsFamily::WpDrawing, "positionV") => anchor.position_v = Position::decode(reader, &tag)?,
                _ => {
                    if anchor.content.decode_child(reader, &tag)? {
                        continue;
                    }
                    match Wrap::decode_child(reader, &tag)? {
                        Some(wrap) if !wrap_seen => {
                            anchor.wrap = wrap;
                            wrap_seen = true;
                        }
                        Some(_) => {
                            tracing::warn!(element = %tag.local, "dropping second wrap of a choice group")
                        }
                        None => reader.skip_unknown(start, &tag)?,
                    }
                }
            }
        }
        Ok(anchor)
    }
}

fn encode_content_head(writer: &mut XmlWriter, content: &DrawingContent) -> Result<()> {
    content.extent.encode(writer, "wp:extent")?;
    encode_opt(writer, "wp:effectExtent", &content.effect_extent)
}

fn encode_content_tail(writer: &mut XmlWriter, content: &DrawingContent) -> Result<()> {
    content.doc_properties.encode(writer, "wp:docPr")?;
    encode_opt(writer, "wp:cNvGraphicFramePr", &content.frame_locks)?;
    content.graphic.encode(writer, "a:graphic")
}

impl XmlElement for Drawing {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut kind = None;
        while let Some(tag) = reader.next_element(start)? {
            let member = match (tag.family, tag.local.as_str()) {
                (NsFamily::WpDrawing, "inline") => DrawingKind::Inline(Self::decode_inline(reader, &tag)?),
                (NsFamily::WpDrawing, "anchor") => {
                    DrawingKind::Anchor(Box::new(Self::decode_anchor(reader, &tag)?))
                }
                _ => {
                    reader.skip_unknown(start, &tag)?;
                    continue;
                }
            };
            if kind.is_some() {
                tracing::warn!("dropping second placement in w:drawing");
            } else {
                kind = Some(member);
            }
        }
        let kind = kind.ok_or_else(|| {
            OoxmlError::malformed(reader.part(), "w:drawing without wp:inline or wp:anchor")
        })?;
        Ok(Self { kind })
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        match &self.kind {
            DrawingKind::Inline(inline) => {
                writer.start("wp:inline", inline.distances.attrs(Attrs::new()))?;
                encode_content_head(writer, &inline.content)?;
                encode_content_tail(writer, &inline.content)?;
                writer.end("wp:inline")?;
            }
            DrawingKind::Anchor(anchor) => {
                let attrs = anchor
                    .distances
                    .attrs(Attrs::new())
                    .with("simplePos", &anchor.use_simple_pos)
                    .with("relativeHeight", &anchor.relative_height)
                    .with("behindDoc", &anchor.behind_doc)
                    .with("locked", &anchor.locked)
                    .with("layoutInCell", &anchor.layout_in_cell)
                    .with("hidden", &anchor.hidden)
                    .with("allowOverlap", &anchor.allow_overlap);
                writer.start("wp:anchor", attrs)?;
                anchor.simple_pos.encode(writer, "wp:simplePos")?;
                anchor.position_h.encode(writer, "wp:positionH")?;
                anchor.position_v.encode(writer, "wp:positionV")?;
                encode_content_head(writer, &anchor.content)?;
                anchor.wrap.encode(writer)?;
                encode_content_tail(writer, &anchor.content)?;
                writer.end("wp:anchor")?;
            }
        }
        writer.end(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{decode_fragment, encode_fragment};

    const ANCHOR: &str = r#"<w:drawing><wp:anchor distT="0" distB="0" distL="114300" distR="114300" simplePos="0" relativeHeight="251658240" behindDoc="1" locked="0" layoutInCell="1" allowOverlap="1"><wp:simplePos x="0" y="0"/><wp:positionH relativeFrom="page"><wp:align>center</wp:align></wp:positionH><wp:positionV relativeFrom="paragraph"><wp:posOffset>-457200</wp:posOffset></wp:positionV><wp:extent cx="7560000" cy="10692000"/><wp:wrapNone/><wp:docPr id="7" name="Cover" descr="Cover art"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="0" name="cover.png"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rId9"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:anchor></w:drawing>"#;

    #[test]
    fn test_inline_picture_roundtrip() {
        let drawing = Drawing::inline_picture("rId4", 1, "image1.png", 952500, 476250);
        let xml = encode_fragment(&drawing, "w:drawing");
        assert!(xml.contains(r#"<a:blip r:embed="rId4"/>"#));
        assert!(xml.contains(r#"<wp:extent cx="952500" cy="476250"/>"#));

        let decoded: Drawing = decode_fragment(&xml).unwrap();
        assert_eq!(decoded, drawing);
        assert_eq!(decoded.embed_id(), Some("rId4"));
    }

    #[test]
    fn test_anchor_decodes() {
        let drawing: Drawing = decode_fragment(ANCHOR).unwrap();
        let DrawingKind::Anchor(anchor) = &drawing.kind else {
            panic!("expected anchor");
        };
        assert_eq!(anchor.behind_doc, Some(true));
        assert_eq!(anchor.position_h.placement, Placement::Align("center".into()));
        assert_eq!(anchor.position_v.placement, Placement::Offset(-457200));
        assert_eq!(anchor.wrap, Wrap::None);
        assert_eq!(drawing.embed_id(), Some("rId9"));
        assert_eq!(drawing.description(), Some("Cover art"));

        let again: Drawing = decode_fragment(&encode_fragment(&drawing, "w:drawing")).unwrap();
        assert_eq!(again, drawing);
    }

    #[test]
    fn test_second_wrap_is_dropped() {
        let xml = ANCHOR.replace(
            "<wp:wrapNone/>",
            r#"<wp:wrapSquare wrapText="bothSides"/><wp:wrapTopAndBottom/>"#,
        );
        let drawing: Drawing = decode_fragment(&xml).unwrap();
        let DrawingKind::Anchor(anchor) = &drawing.kind else {
            panic!("expected anchor");
        };
        assert!(matches!(anchor.wrap, Wrap::Square { wrap_text: WrapText::BothSides, .. }));
    }

    #[test]
    fn test_chart_payload_keeps_uri() {
        const CHART_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
        let xml = format!(
            r#"<a:graphic><a:graphicData uri="{CHART_URI}"><c:chart xmlns:c="{CHART_URI}" r:id="rId8"/></a:graphicData></a:graphic>"#
        );
        let graphic: Graphic = decode_fragment(&xml).unwrap();
        assert_eq!(graphic.uri, CHART_URI);
        assert!(graphic.picture.is_none());

        let written = encode_fragment(&graphic, "a:graphic");
        assert!(written.contains(&format!(r#"<a:graphicData uri="{CHART_URI}"/>"#)));
    }

    #[test]
    fn test_drawing_without_placement_is_malformed() {
        let err = decode_fragment::<Drawing>("<w:drawing/>").unwrap_err();
        assert!(matches!(err, OoxmlError::MalformedXml { .. }));
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(pixels_to_emu(100), 952500);
        assert_eq!(emu_to_pixels(952500), 100);
    }
}
