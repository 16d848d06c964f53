//! Tables (`w:tbl`), rows and cells

use crate::error::Result;
use crate::namespace::NsFamily;
use crate::xml::{
    decode_into, encode_opt, xml_attributes, xml_sequence, Attrs, OnOff, StartTag, Val,
    XmlElement, XmlReader, XmlWriter,
};

use super::document::Block;
use super::paragraph::{BookmarkEnd, BookmarkStart, Paragraph};
use super::properties::{
    CellBorders, CellMargins, CellMergeRevision, ConditionalFormatting, RowHeight, Shading,
    TableBorders, TableLayout, TableLook, TablePositioning, TableWidth, TrackChange,
};
use super::simple_types::*;

xml_sequence! {
    /// Table properties (`w:tblPr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TableProperty {
        // 1
        style: Val<String> => "tblStyle",
        positioning: TablePositioning => "tblpPr",
        overlap: Val<String> => "tblOverlap",
        bidi_visual: OnOff => "bidiVisual",
        // 5
        style_row_band_size: Val<i64> => "tblStyleRowBandSize",
        style_col_band_size: Val<i64> => "tblStyleColBandSize",
        width: TableWidth => "tblW",
        justification: Val<Justification> => "jc",
        cell_spacing: TableWidth => "tblCellSpacing",
        // 10
        indentation: TableWidth => "tblInd",
        borders: TableBorders => "tblBorders",
        shading: Shading => "shd",
        layout: TableLayout => "tblLayout",
        cell_margins: CellMargins => "tblCellMar",
        // 15
        look: TableLook => "tblLook",
        caption: Val<String> => "tblCaption",
        description: Val<String> => "tblDescription",
    }
}

xml_sequence! {
    /// Row-level overrides of table properties (`w:tblPrEx`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TablePropertyExceptions {
        width: TableWidth => "tblW",
        justification: Val<Justification> => "jc",
        cell_spacing: TableWidth => "tblCellSpacing",
        indentation: TableWidth => "tblInd",
        borders: TableBorders => "tblBorders",
        shading: Shading => "shd",
        layout: TableLayout => "tblLayout",
        cell_margins: CellMargins => "tblCellMar",
        look: TableLook => "tblLook",
    }
}

xml_sequence! {
    /// Row properties (`w:trPr`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct RowProperty {
        conditional: ConditionalFormatting => "cnfStyle",
        div_id: Val<i64> => "divId",
        grid_before: Val<u32> => "gridBefore",
        grid_after: Val<u32> => "gridAfter",
        width_before: TableWidth => "wBefore",
        width_after: TableWidth => "wAfter",
        cant_split: OnOff => "cantSplit",
        height: RowHeight => "trHeight",
        header: OnOff => "tblHeader",
        cell_spacing: TableWidth => "tblCellSpacing",
        justification: Val<Justification> => "jc",
        hidden: OnOff => "hidden",
    }
}

xml_attributes! {
    /// One grid column (`w:gridCol`)
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct GridColumn {
        /// Width in twentieths of a point
        w: Option<Measure> => "w:w",
    }
}

fn decode_grid_columns(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Vec<GridColumn>> {
    let mut columns = Vec::new();
    while let Some(tag) = reader.next_element(start)? {
        if tag.is_w("gridCol") {
            columns.push(GridColumn::decode(reader, &tag)?);
        } else {
            reader.skip_unknown(start, &tag)?;
        }
    }
    Ok(columns)
}

fn encode_grid_columns(writer: &mut XmlWriter, columns: &[GridColumn]) -> Result<()> {
    columns
        .iter()
        .try_for_each(|col| col.encode(writer, "w:gridCol"))
}

/// Revised grid recorded by change tracking (`w:tblGridChange`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGridChange {
    pub id: i64,
    /// Grid columns before the change
    pub columns: Vec<GridColumn>,
}

impl XmlElement for TableGridChange {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut change = Self {
            id: reader.required_attr(start, "id")?,
            columns: Vec::new(),
        };
        while let Some(tag) = reader.next_element(start)? {
            if tag.is_w("tblGrid") {
                change.columns = decode_grid_columns(reader, &tag)?;
            } else {
                reader.skip_unknown(start, &tag)?;
            }
        }
        Ok(change)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new().with("w:id", &self.id))?;
        writer.start("w:tblGrid", Attrs::new())?;
        encode_grid_columns(writer, &self.columns)?;
        writer.end("w:tblGrid")?;
        writer.end(name)
    }
}

/// Column grid (`w:tblGrid`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGrid {
    pub columns: Vec<GridColumn>,
    pub change: Option<TableGridChange>,
}

impl TableGrid {
    /// Grid from column widths in twentieths of a point
    pub fn from_widths(widths: &[u32]) -> Self {
        Self {
            columns: widths
                .iter()
                .map(|&w| GridColumn {
                    w: Some(Measure::Twips(i64::from(w))),
                })
                .collect(),
            change: None,
        }
    }
}

impl XmlElement for TableGrid {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut grid = Self::default();
        while let Some(tag) = reader.next_element(start)? {
            if tag.family != NsFamily::Wml {
                reader.skip_unknown(start, &tag)?;
                continue;
            }
            match tag.local.as_str() {
                "gridCol" => grid.columns.push(GridColumn::decode(reader, &tag)?),
                "tblGridChange" => decode_into(&mut grid.change, reader, &tag)?,
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(grid)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        encode_grid_columns(writer, &self.columns)?;
        encode_opt(writer, "w:tblGridChange", &self.change)?;
        writer.end(name)
    }
}

/// Cell-level revision; at most one per cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRevision {
    Insertion(TrackChange),
    Deletion(TrackChange),
    Merge(CellMergeRevision),
}

impl CellRevision {
    fn element_name(&self) -> &'static str {
        match self {
            CellRevision::Insertion(_) => "w:cellIns",
            CellRevision::Deletion(_) => "w:cellDel",
            CellRevision::Merge(_) => "w:cellMerge",
        }
    }

    fn encode(&self, writer: &mut XmlWriter) -> Result<()> {
        let name = self.element_name();
        match self {
            CellRevision::Insertion(c) | CellRevision::Deletion(c) => c.encode(writer, name),
            CellRevision::Merge(m) => m.encode(writer, name),
        }
    }
}

/// Cell properties (`w:tcPr`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellProperty {
    // 1
    pub conditional: Option<ConditionalFormatting>,
    pub width: Option<TableWidth>,
    pub grid_span: Option<Val<u32>>,
    pub h_merge: Option<Val<Option<MergeType>>>,
    pub v_merge: Option<Val<Option<MergeType>>>,
    // 6
    pub borders: Option<CellBorders>,
    pub shading: Option<Shading>,
    pub no_wrap: Option<OnOff>,
    pub margins: Option<CellMargins>,
    pub text_direction: Option<Val<TextDirection>>,
    // 11
    pub fit_text: Option<OnOff>,
    pub vertical_align: Option<Val<VerticalJc>>,
    pub hide_mark: Option<OnOff>,
    pub revision: Option<CellRevision>,
}

impl CellProperty {
    fn set_revision(&mut self, tag: &StartTag, revision: CellRevision) {
        match &self.revision {
            Some(existing) => tracing::warn!(
                kept = existing.element_name(),
                dropped = %tag.local,
                "dropping second cell revision of a choice group"
            ),
            None => self.revision = Some(revision),
        }
    }
}

impl XmlElement for CellProperty {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut pr = CellProperty::default();
        while let Some(tag) = reader.next_element(start)? {
            if tag.family != NsFamily::Wml {
                reader.skip_unknown(start, &tag)?;
                continue;
            }
            match tag.local.as_str() {
                "cnfStyle" => decode_into(&mut pr.conditional, reader, &tag)?,
                "tcW" => decode_into(&mut pr.width, reader, &tag)?,
                "gridSpan" => decode_into(&mut pr.grid_span, reader, &tag)?,
                "hMerge" => decode_into(&mut pr.h_merge, reader, &tag)?,
                "vMerge" => decode_into(&mut pr.v_merge, reader, &tag)?,
                "tcBorders" => decode_into(&mut pr.borders, reader, &tag)?,
                "shd" => decode_into(&mut pr.shading, reader, &tag)?,
                "noWrap" => decode_into(&mut pr.no_wrap, reader, &tag)?,
                "tcMar" => decode_into(&mut pr.margins, reader, &tag)?,
                "textDirection" => decode_into(&mut pr.text_direction, reader, &tag)?,
                "tcFitText" => decode_into(&mut pr.fit_text, reader, &tag)?,
                "vAlign" => decode_into(&mut pr.vertical_align, reader, &tag)?,
                "hideMark" => decode_into(&mut pr.hide_mark, reader, &tag)?,
                "cellIns" => {
                    let change = TrackChange::decode(reader, &tag)?;
                    pr.set_revision(&tag, CellRevision::Insertion(change));
                }
                "cellDel" => {
                    let change = TrackChange::decode(reader, &tag)?;
                    pr.set_revision(&tag, CellRevision::Deletion(change));
                }
                "cellMerge" => {
                    let merge = CellMergeRevision::decode(reader, &tag)?;
                    pr.set_revision(&tag, CellRevision::Merge(merge));
                }
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(pr)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        encode_opt(writer, "w:cnfStyle", &self.conditional)?;
        encode_opt(writer, "w:tcW", &self.width)?;
        encode_opt(writer, "w:gridSpan", &self.grid_span)?;
        encode_opt(writer, "w:hMerge", &self.h_merge)?;
        encode_opt(writer, "w:vMerge", &self.v_merge)?;
        encode_opt(writer, "w:tcBorders", &self.borders)?;
        encode_opt(writer, "w:shd", &self.shading)?;
        encode_opt(writer, "w:noWrap", &self.no_wrap)?;
        encode_opt(writer, "w:tcMar", &self.margins)?;
        encode_opt(writer, "w:textDirection", &self.text_direction)?;
        encode_opt(writer, "w:tcFitText", &self.fit_text)?;
        encode_opt(writer, "w:vAlign", &self.vertical_align)?;
        encode_opt(writer, "w:hideMark", &self.hide_mark)?;
        if let Some(revision) = &self.revision {
            revision.encode(writer)?;
        }
        writer.end(name)
    }
}

/// A table cell (`w:tc`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub property: Option<CellProperty>,
    /// Block content; Word requires at least one paragraph
    pub content: Vec<Block>,
}

impl Cell {
    /// Cell holding a single paragraph of text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            property: None,
            content: vec![Block::Paragraph(Paragraph::with_text(text))],
        }
    }

    /// Cell properties, created on first use
    pub fn property_mut(&mut self) -> &mut CellProperty {
        self.property.get_or_insert_with(CellProperty::default)
    }

    /// Paragraphs of this cell, including those of nested tables
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.content.iter().flat_map(|block| block.paragraphs()).collect()
    }
}

impl XmlElement for Cell {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut cell = Cell::default();
        while let Some(tag) = reader.next_element(start)? {
            if tag.is_w("tcPr") {
                cell.property = Some(CellProperty::decode(reader, &tag)?);
                continue;
            }
            match Block::decode_child(reader, &tag)? {
                Some(block) => cell.content.push(block),
                None => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(cell)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        encode_opt(writer, "w:tcPr", &self.property)?;
        for block in &self.content {
            block.encode(writer)?;
        }
        writer.end(name)
    }
}

/// One piece of row content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowContent {
    Cell(Cell),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
}

/// A table row (`w:tr`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub rsid_r_pr: Option<String>,
    pub rsid_r: Option<String>,
    pub rsid_del: Option<String>,
    pub rsid_tr: Option<String>,
    pub para_id: Option<String>,
    pub text_id: Option<String>,
    pub exceptions: Option<TablePropertyExceptions>,
    pub property: Option<RowProperty>,
    pub contents: Vec<RowContent>,
}

impl Row {
    /// Row of text cells
    pub fn with_cells<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contents: texts
                .into_iter()
                .map(|t| RowContent::Cell(Cell::with_text(t)))
                .collect(),
            ..Default::default()
        }
    }

    /// Cells of this row in order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.contents.iter().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            _ => None,
        })
    }
}

impl XmlElement for Row {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut row = Row {
            rsid_r_pr: reader.attr(start, "rsidRPr")?,
            rsid_r: reader.attr(start, "rsidR")?,
            rsid_del: reader.attr(start, "rsidDel")?,
            rsid_tr: reader.attr(start, "rsidTr")?,
            para_id: reader.attr(start, "paraId")?,
            text_id: reader.attr(start, "textId")?,
            ..Default::default()
        };
        while let Some(tag) = reader.next_element(start)? {
            if tag.family != NsFamily::Wml {
                reader.skip_unknown(start, &tag)?;
                continue;
            }
            match tag.local.as_str() {
                "tblPrEx" => decode_into(&mut row.exceptions, reader, &tag)?,
                "trPr" => decode_into(&mut row.property, reader, &tag)?,
                "tc" => row.contents.push(RowContent::Cell(Cell::decode(reader, &tag)?)),
                "bookmarkStart" => row
                    .contents
                    .push(RowContent::BookmarkStart(BookmarkStart::decode(reader, &tag)?)),
                "bookmarkEnd" => row
                    .contents
                    .push(RowContent::BookmarkEnd(BookmarkEnd::decode(reader, &tag)?)),
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(row)
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
                .with("w:rsidTr", &self.rsid_tr),
        )?;
        encode_opt(writer, "w:tblPrEx", &self.exceptions)?;
        encode_opt(writer, "w:trPr", &self.property)?;
        for content in &self.contents {
            match content {
                RowContent::Cell(cell) => cell.encode(writer, "w:tc")?,
                RowContent::BookmarkStart(b) => b.encode(writer, "w:bookmarkStart")?,
                RowContent::BookmarkEnd(b) => b.encode(writer, "w:bookmarkEnd")?,
            }
        }
        writer.end(name)
    }
}

/// Bookmark markers placed before the table properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeMarkup {
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
}

/// One piece of table content after the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableContent {
    Row(Row),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
}

/// A table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// Markup read ahead of `w:tblPr`
    pub range_markup: Vec<RangeMarkup>,
    pub property: TableProperty,
    pub grid: TableGrid,
    /// Rows and row-level markup in document order
    pub contents: Vec<TableContent>,
}

impl Table {
    /// Empty table over the given column widths (twentieths of a point)
    pub fn new(column_widths: &[u32]) -> Self {
        Self {
            property: TableProperty {
                width: Some(TableWidth::auto()),
                look: Some(TableLook {
                    first_row: Some(true),
                    no_v_band: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            },
            grid: TableGrid::from_widths(column_widths),
            ..Default::default()
        }
    }

    /// Append a row
    pub fn add_row(&mut self, row: Row) -> &mut Self {
        self.contents.push(TableContent::Row(row));
        self
    }

    /// Rows in order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.contents.iter().filter_map(|c| match c {
            TableContent::Row(row) => Some(row),
            _ => None,
        })
    }

    /// Rows in order, mutably
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.contents.iter_mut().filter_map(|c| match c {
            TableContent::Row(row) => Some(row),
            _ => None,
        })
    }

    /// Paragraphs of every cell, row by row
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.rows()
            .flat_map(|row| row.cells())
            .flat_map(|cell| cell.paragraphs())
            .collect()
    }
}

impl XmlElement for Table {
    fn decode(reader: &mut XmlReader<'_>, start: &StartTag) -> Result<Self> {
        let mut table = Table::default();
        // Bookmarks count as leading markup until properties, grid or a row appear
        let mut leading = true;
        while let Some(tag) = reader.next_element(start)? {
            if tag.family != NsFamily::Wml {
                reader.skip_unknown(start, &tag)?;
                continue;
            }
            match tag.local.as_str() {
                "tblPr" => {
                    table.property = TableProperty::decode(reader, &tag)?;
                    leading = false;
                }
                "tblGrid" => {
                    table.grid = TableGrid::decode(reader, &tag)?;
                    leading = false;
                }
                "tr" => {
                    table.contents.push(TableContent::Row(Row::decode(reader, &tag)?));
                    leading = false;
                }
                "bookmarkStart" => {
                    let mark = BookmarkStart::decode(reader, &tag)?;
                    if leading {
                        table.range_markup.push(RangeMarkup::BookmarkStart(mark));
                    } else {
                        table.contents.push(TableContent::BookmarkStart(mark));
                    }
                }
                "bookmarkEnd" => {
                    let mark = BookmarkEnd::decode(reader, &tag)?;
                    if leading {
                        table.range_markup.push(RangeMarkup::BookmarkEnd(mark));
                    } else {
                        table.contents.push(TableContent::BookmarkEnd(mark));
                    }
                }
                _ => reader.skip_unknown(start, &tag)?,
            }
        }
        Ok(table)
    }

    fn encode(&self, writer: &mut XmlWriter, name: &str) -> Result<()> {
        writer.start(name, Attrs::new())?;
        for markup in &self.range_markup {
            match markup {
                RangeMarkup::BookmarkStart(b) => b.encode(writer, "w:bookmarkStart")?,
                RangeMarkup::BookmarkEnd(b) => b.encode(writer, "w:bookmarkEnd")?,
            }
        }
        self.property.encode(writer, "w:tblPr")?;
        self.grid.encode(writer, "w:tblGrid")?;
        for content in &self.contents {
            match content {
                TableContent::Row(row) => row.encode(writer, "w:tr")?,
                TableContent::BookmarkStart(b) => b.encode(writer, "w:bookmarkStart")?,
                TableContent::BookmarkEnd(b) => b.encode(writer, "w:bookmarkEnd")?,
            }
        }
        writer.end(name)
    }
}
