//! Behaviour of the document codec that holds across element kinds:
//! content order, choice groups, namespace families and unknown markup.

use docxkit_ooxml::wml::{
    Block, CellRevision, Document, DrawingKind, Measure, ParagraphChild, RowContent, RunChild,
    TableContent,
};
use docxkit_ooxml::{OoxmlError, Table};

const TRANSITIONAL: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#;

const STRICT: &str = r#"xmlns:w="http://purl.oclc.org/ooxml/wordprocessingml/main" xmlns:r="http://purl.oclc.org/ooxml/officeDocument/relationships" xmlns:wp="http://purl.oclc.org/ooxml/drawingml/wordprocessingDrawing" xmlns:a="http://purl.oclc.org/ooxml/drawingml/main" xmlns:pic="http://purl.oclc.org/ooxml/drawingml/picture""#;

const INLINE_PICTURE: &str = r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="952500" cy="952500"/><wp:docPr id="1" name="Picture 1"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="image1.png"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rId4"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#;

fn parse_with(namespaces: &str, body: &str) -> Document {
    let xml = format!("<w:document {namespaces}><w:body>{body}</w:body></w:document>");
    Document::parse(xml.as_bytes(), "word/document.xml").unwrap()
}

fn parse(body: &str) -> Document {
    parse_with(TRANSITIONAL, body)
}

fn reparse(doc: &Document) -> Document {
    let xml = doc.to_xml().unwrap();
    Document::parse(&xml, "word/document.xml").unwrap()
}

fn serialized(doc: &Document) -> String {
    String::from_utf8(doc.to_xml().unwrap()).unwrap()
}

fn first_table(doc: &Document) -> &Table {
    doc.body
        .children
        .iter()
        .find_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
        .expect("document has a table")
}

#[test]
fn body_keeps_paragraphs_and_tables_interleaved() {
    let doc = parse(
        r#"<w:p><w:r><w:t>one</w:t></w:r></w:p><w:tbl><w:tblPr/><w:tblGrid><w:gridCol w:w="100"/></w:tblGrid><w:tr><w:tc><w:p><w:r><w:t>two</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>three</w:t></w:r></w:p>"#,
    );
    let kinds: Vec<&str> = doc
        .body
        .children
        .iter()
        .map(|block| match block {
            Block::Paragraph(_) => "p",
            Block::Table(_) => "tbl",
        })
        .collect();
    assert_eq!(kinds, ["p", "tbl", "p"]);
    assert_eq!(doc.plain_text(), "one\n\ntwo\n\nthree");

    let again = reparse(&doc);
    assert_eq!(again.body, doc.body);
}

#[test]
fn paragraph_children_keep_their_order() {
    let doc = parse(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="intro"/><w:r><w:t>a</w:t></w:r><w:hyperlink w:anchor="intro"><w:r><w:t>b</w:t></w:r></w:hyperlink><w:bookmarkEnd w:id="0"/><w:r><w:t>c</w:t></w:r></w:p>"#,
    );
    let Block::Paragraph(paragraph) = &doc.body.children[0] else {
        panic!("expected a paragraph");
    };
    let kinds: Vec<&str> = paragraph
        .children
        .iter()
        .map(|child| match child {
            ParagraphChild::Run(_) => "r",
            ParagraphChild::Hyperlink(_) => "hyperlink",
            ParagraphChild::BookmarkStart(_) => "bookmarkStart",
            ParagraphChild::BookmarkEnd(_) => "bookmarkEnd",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, ["bookmarkStart", "r", "hyperlink", "bookmarkEnd", "r"]);

    let xml = serialized(&doc);
    let start = xml.find("<w:bookmarkStart").unwrap();
    let link = xml.find("<w:hyperlink").unwrap();
    let end = xml.find("<w:bookmarkEnd").unwrap();
    assert!(start < link && link < end);
}

#[test]
fn run_content_keeps_its_order() {
    let doc = parse(r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#);
    let paragraph = doc.paragraphs().next().unwrap();
    let run = paragraph.runs().next().unwrap();
    assert!(matches!(
        run.children[..],
        [
            RunChild::Text(_),
            RunChild::Tab,
            RunChild::Text(_),
            RunChild::Break(_),
            RunChild::Text(_)
        ]
    ));
    assert_eq!(reparse(&doc).body, doc.body);
}

#[test]
fn row_content_keeps_bookmarks_between_cells() {
    let doc = parse(
        r#"<w:tbl><w:tblPr/><w:tblGrid><w:gridCol w:w="100"/><w:gridCol w:w="100"/></w:tblGrid><w:tr><w:tc><w:p/></w:tc><w:bookmarkStart w:id="3" w:name="cell"/><w:tc><w:p/></w:tc><w:bookmarkEnd w:id="3"/></w:tr></w:tbl>"#,
    );
    let table = first_table(&doc);
    let kinds: Vec<&str> = table
        .rows()
        .next()
        .unwrap()
        .contents
        .iter()
        .map(|content| match content {
            RowContent::Cell(_) => "tc",
            RowContent::BookmarkStart(_) => "bookmarkStart",
            RowContent::BookmarkEnd(_) => "bookmarkEnd",
        })
        .collect();
    assert_eq!(kinds, ["tc", "bookmarkStart", "tc", "bookmarkEnd"]);
    assert_eq!(reparse(&doc).body, doc.body);
}

#[test]
fn table_content_keeps_bookmarks_around_rows() {
    let rows = r#"<w:bookmarkStart w:id="1" w:name="before"/><w:tblPr/><w:tblGrid><w:gridCol w:w="100"/></w:tblGrid><w:bookmarkStart w:id="2" w:name="first"/><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc></w:tr><w:bookmarkEnd w:id="2"/><w:tr><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr><w:bookmarkEnd w:id="1"/>"#;
    let doc = parse(&format!("<w:tbl>{rows}</w:tbl>"));
    let table = first_table(&doc);
    assert_eq!(table.range_markup.len(), 1);
    let kinds: Vec<&str> = table
        .contents
        .iter()
        .map(|content| match content {
            TableContent::Row(_) => "tr",
            TableContent::BookmarkStart(_) => "bookmarkStart",
            TableContent::BookmarkEnd(_) => "bookmarkEnd",
        })
        .collect();
    assert_eq!(kinds, ["bookmarkStart", "tr", "bookmarkEnd", "tr", "bookmarkEnd"]);

    let xml = serialized(&doc);
    let markers = [
        r#"w:name="before""#,
        "<w:tblPr",
        r#"w:name="first""#,
        ">a<",
        r#"<w:bookmarkEnd w:id="2"/>"#,
        ">b<",
        r#"<w:bookmarkEnd w:id="1"/>"#,
    ];
    let positions: Vec<usize> = markers.iter().map(|m| xml.find(m).unwrap()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "order changed: {xml}");
    assert_eq!(reparse(&doc).body, doc.body);
}

#[test]
fn universal_measures_are_kept_as_written() {
    let doc = parse(
        r#"<w:p><w:pPr><w:spacing w:before="6pt" w:after="120"/><w:ind w:left="0.5in" w:hanging="360"/></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
    );
    let paragraph = doc.paragraphs().next().unwrap();
    let indentation = paragraph.property.as_ref().unwrap().indentation.as_ref().unwrap();
    assert_eq!(indentation.left.as_ref().map(Measure::to_twips), Some(720));

    let xml = serialized(&doc);
    assert!(xml.contains(r#"w:before="6pt""#));
    assert!(xml.contains(r#"w:left="0.5in""#));
    assert_eq!(reparse(&doc).body, doc.body);
}

#[test]
fn property_children_are_written_in_schema_order() {
    // jc is read before pStyle; it must come back after it
    let doc = parse(
        r#"<w:p><w:pPr><w:jc w:val="center"/><w:keepNext/><w:pStyle w:val="Title"/></w:pPr><w:r><w:rPr><w:sz w:val="28"/><w:b/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
    );
    let xml = serialized(&doc);
    let style = xml.find("<w:pStyle").unwrap();
    let keep = xml.find("<w:keepNext").unwrap();
    let jc = xml.find("<w:jc").unwrap();
    assert!(style < keep && keep < jc);

    let bold = xml.find("<w:b/>").unwrap();
    let size = xml.find("<w:sz ").unwrap();
    assert!(bold < size);
}

#[test]
fn only_first_cell_revision_is_kept() {
    let doc = parse(
        r#"<w:tbl><w:tblPr/><w:tblGrid><w:gridCol/></w:tblGrid><w:tr><w:tc><w:tcPr><w:cellIns w:id="1" w:author="A"/><w:cellDel w:id="2" w:author="B"/></w:tcPr><w:p/></w:tc></w:tr></w:tbl>"#,
    );
    let table = first_table(&doc);
    let cell = table.rows().next().unwrap().cells().next().unwrap();
    let revision = cell.property.as_ref().and_then(|pr| pr.revision.as_ref());
    assert!(matches!(revision, Some(CellRevision::Insertion(_))));

    let xml = serialized(&doc);
    assert!(xml.contains("<w:cellIns"));
    assert!(!xml.contains("<w:cellDel"));
}

#[test]
fn only_first_drawing_placement_is_kept() {
    let anchor = r#"<wp:anchor distT="0" distB="0" distL="0" distR="0" simplePos="0" relativeHeight="0" behindDoc="0" locked="0" layoutInCell="1" allowOverlap="1"><wp:simplePos x="0" y="0"/><wp:positionH relativeFrom="page"><wp:posOffset>0</wp:posOffset></wp:positionH><wp:positionV relativeFrom="page"><wp:posOffset>0</wp:posOffset></wp:positionV><wp:extent cx="1" cy="1"/><wp:wrapNone/><wp:docPr id="2" name="Second"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"/></a:graphic></wp:anchor>"#;
    let drawing = INLINE_PICTURE.replace("</wp:inline>", &format!("</wp:inline>{anchor}"));
    let doc = parse(&format!("<w:p><w:r>{drawing}</w:r></w:p>"));

    let run = doc.paragraphs().next().unwrap().runs().next().unwrap();
    let RunChild::Drawing(drawing) = &run.children[0] else {
        panic!("expected a drawing");
    };
    assert!(matches!(drawing.kind, DrawingKind::Inline(_)));
    assert_eq!(doc.image_ids(), ["rId4"]);
}

#[test]
fn strict_and_transitional_decode_alike() {
    let body = format!(
        r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Hi</w:t></w:r><w:r>{INLINE_PICTURE}</w:r></w:p><w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid><w:gridCol w:w="2000"/></w:tblGrid><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#
    );
    let transitional = parse_with(TRANSITIONAL, &body);
    let strict = parse_with(STRICT, &body);
    assert_eq!(strict.body, transitional.body);
    assert_eq!(strict.image_ids(), ["rId4"]);

    // Output is always transitional
    let xml = serialized(&strict);
    assert!(xml.contains("http://schemas.openxmlformats.org/wordprocessingml/2006/main"));
    assert!(!xml.contains("purl.oclc.org"));
}

#[test]
fn unknown_elements_are_skipped_everywhere() {
    let doc = parse(
        r#"<w:customXml w:element="x"><w:p/></w:customXml>
        <w:p>
          <w:pPr><w:pStyle w:val="Body"/><w:futureProp w:val="1"/><w14:glow xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"/></w:pPr>
          <w:r><w:rPr><w:i/><w:sparkle/></w:rPr><w:t>kept</w:t></w:r>
          <w:permStart w:id="1"/>
        </w:p>
        <w:tbl>
          <w:tblPr><w:tblStyle w:val="Grid"/><w:tblMystery/></w:tblPr>
          <w:tblGrid><w:gridCol w:w="100"/></w:tblGrid>
          <w:tr><w:customXml/><w:tc><w:tcPr><w:tcW w:w="100" w:type="dxa"/><w:oddity/></w:tcPr><w:p/></w:tc></w:tr>
        </w:tbl>"#,
    );

    assert_eq!(doc.body.children.len(), 2);
    let paragraph = doc.paragraphs().next().unwrap();
    assert_eq!(paragraph.style_id(), Some("Body"));
    assert_eq!(paragraph.children.len(), 1);
    let run = paragraph.runs().next().unwrap();
    assert!(run.property.as_ref().unwrap().italic.is_some());
    assert_eq!(paragraph.plain_text(), "kept");

    let table = first_table(&doc);
    assert_eq!(table.property.style.as_ref().map(|v| v.val.as_str()), Some("Grid"));
    assert_eq!(table.rows().next().unwrap().contents.len(), 1);
    let cell = table.rows().next().unwrap().cells().next().unwrap();
    let width = cell.property.as_ref().unwrap().width.as_ref().unwrap();
    assert_eq!(width.w.as_deref(), Some("100"));

    let xml = serialized(&doc);
    for dropped in ["futureProp", "glow", "sparkle", "permStart", "tblMystery", "oddity", "customXml"] {
        assert!(!xml.contains(dropped), "{dropped} was written back");
    }
}

#[test]
fn decode_encode_decode_is_stable() {
    let doc = parse(
        r#"<w:p w:rsidR="00A1B2C3"><w:pPr><w:spacing w:before="120" w:after="0"/><w:ind w:left="720"/></w:pPr><w:r><w:rPr><w:color w:val="FF0000"/><w:u w:val="single"/></w:rPr><w:t xml:space="preserve"> padded </w:t></w:r><w:ins w:id="4" w:author="Editor"><w:r><w:t>added</w:t></w:r></w:ins></w:p><w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#,
    );
    let once = reparse(&doc);
    assert_eq!(once.body, doc.body);
    assert_eq!(serialized(&once), serialized(&doc));
    assert!(serialized(&doc).contains(r#"<w:t xml:space="preserve"> padded </w:t>"#));
}

#[test]
fn unclosed_paragraph_is_an_error() {
    let xml = format!("<w:document {TRANSITIONAL}><w:body><w:p><w:r><w:t>x</w:t></w:r></w:body></w:document>");
    let err = Document::parse(xml.as_bytes(), "word/document.xml").unwrap_err();
    assert!(matches!(err, OoxmlError::MalformedXml { .. }));
}
