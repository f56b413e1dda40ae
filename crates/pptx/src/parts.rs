//! XML parts of a PresentationML package.
//!
//! Each function returns one complete part. The package always has one
//! slide master, one blank layout, and one theme; slides reference the layout.

use deck_core::{Bullet, Paragraph, Presentation, Shape, Slide};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_MAIN: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Empty group-shape header every shape tree starts with.
const SP_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// First relationship id used for slides in `presentation.xml.rels`.
pub const FIRST_SLIDE_REL: usize = 3;

/// Paragraph indent for bulleted and numbered items, in EMUs.
const BULLET_INDENT: i64 = 342_900;

pub fn content_types(slide_count: usize) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            n
        );
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

/// Build a relationships part from (id, type suffix, target) triples.
fn relationships(rels: &[(String, &str, String)]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id, kind, target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn package_rels() -> String {
    relationships(&[
        (
            "rId1".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            "ppt/presentation.xml".to_string(),
        ),
        (
            "rId2".to_string(),
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml".to_string(),
        ),
        (
            "rId3".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties",
            "docProps/app.xml".to_string(),
        ),
    ])
}

pub fn presentation_rels(slide_count: usize) -> String {
    let master = format!("{}/slideMaster", REL_BASE);
    let theme = format!("{}/theme", REL_BASE);
    let slide = format!("{}/slide", REL_BASE);

    let mut rels = vec![
        (
            "rId1".to_string(),
            master.as_str(),
            "slideMasters/slideMaster1.xml".to_string(),
        ),
        ("rId2".to_string(), theme.as_str(), "theme/theme1.xml".to_string()),
    ];
    for n in 1..=slide_count {
        rels.push((
            format!("rId{}", n + FIRST_SLIDE_REL - 1),
            slide.as_str(),
            format!("slides/slide{}.xml", n),
        ));
    }
    relationships(&rels)
}

pub fn presentation(document: &Presentation) -> String {
    let (cx, cy) = document.layout().dimensions();

    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<p:presentation {} saveSubsetFonts="1">"#, NS_MAIN);
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    if document.slide_count() > 0 {
        xml.push_str("<p:sldIdLst>");
        for n in 0..document.slide_count() {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + n,
                n + FIRST_SLIDE_REL
            );
        }
        xml.push_str("</p:sldIdLst>");
    }

    let _ = write!(xml, r#"<p:sldSz cx="{}" cy="{}"/>"#, cx, cy);
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

pub fn slide_master() -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    let _ = write!(xml, "<p:sldMaster {}>", NS_MAIN);
    let _ = write!(xml, "<p:cSld><p:spTree>{}</p:spTree></p:cSld>", SP_TREE_HEADER);
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" "#,
        r#"accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" "#,
        r#"accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#
    ));
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("</p:sldMaster>");
    xml
}

pub fn slide_master_rels() -> String {
    relationships(&[
        (
            "rId1".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
            "../slideLayouts/slideLayout1.xml".to_string(),
        ),
        (
            "rId2".to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme",
            "../theme/theme1.xml".to_string(),
        ),
    ])
}

pub fn slide_layout() -> String {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<p:sldLayout {} type="blank" preserve="1">"#, NS_MAIN);
    let _ = write!(
        xml,
        r#"<p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld>"#,
        SP_TREE_HEADER
    );
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

pub fn slide_layout_rels() -> String {
    relationships(&[(
        "rId1".to_string(),
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
        "../slideMasters/slideMaster1.xml".to_string(),
    )])
}

pub fn theme() -> String {
    const COLORS: &[(&str, &str)] = &[
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ];
    const SOLID: &str = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;

    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">"#);
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (name, rgb) in COLORS {
        let _ = write!(xml, r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, name, rgb);
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    xml.push_str(r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#);
    xml.push_str(r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#);
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#);
    for _ in 0..3 {
        xml.push_str(SOLID);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        let _ = write!(xml, r#"<a:ln w="{}">{}</a:ln>"#, width, SOLID);
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(SOLID);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme>");

    xml.push_str("</a:themeElements></a:theme>");
    xml
}

pub fn slide(slide: &Slide) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    let _ = write!(xml, "<p:sld {}>", NS_MAIN);
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(SP_TREE_HEADER);

    for (i, shape) in slide.shapes.iter().enumerate() {
        // id 1 is the group shape itself
        write_shape(&mut xml, shape, i + 2);
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

pub fn slide_rels() -> String {
    relationships(&[(
        "rId1".to_string(),
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
        "../slideLayouts/slideLayout1.xml".to_string(),
    )])
}

fn write_shape(xml: &mut String, shape: &Shape, id: usize) {
    let f = &shape.frame;
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
        id,
        xml_text(&shape.name)
    );
    let _ = write!(
        xml,
        r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#,
        f.x,
        f.y,
        f.cx.max(0),
        f.cy.max(0)
    );
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0" anchor="t"><a:noAutofit/></a:bodyPr><a:lstStyle/>"#);

    let size = (shape.style.font_size * 100.0).round().clamp(100.0, 400_000.0) as u32;
    let face = xml_text(&shape.style.font_face);
    let run_props = format!(
        r#"lang="en-US" sz="{}" b="{}" dirty="0""#,
        size,
        if shape.style.bold { 1 } else { 0 }
    );

    for paragraph in &shape.paragraphs {
        write_paragraph(xml, paragraph, &run_props, &face);
    }

    xml.push_str("</p:txBody></p:sp>");
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph, run_props: &str, face: &str) {
    xml.push_str("<a:p>");
    match paragraph.bullet {
        Bullet::None => {}
        Bullet::Disc => {
            let _ = write!(
                xml,
                r#"<a:pPr marL="{0}" indent="-{0}"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/></a:pPr>"#,
                BULLET_INDENT
            );
        }
        Bullet::Numbered => {
            let _ = write!(
                xml,
                r#"<a:pPr marL="{0}" indent="-{0}"><a:buFont typeface="+mj-lt"/><a:buAutoNum type="arabicPeriod"/></a:pPr>"#,
                BULLET_INDENT
            );
        }
    }

    if paragraph.text.is_empty() {
        let _ = write!(xml, "<a:endParaRPr {}/>", run_props);
    } else {
        let _ = write!(
            xml,
            r#"<a:r><a:rPr {}><a:latin typeface="{}"/></a:rPr><a:t>{}</a:t></a:r>"#,
            run_props,
            face,
            xml_text(&paragraph.text)
        );
    }
    xml.push_str("</a:p>");
}

pub fn app_properties(document: &Presentation, application: &str) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    let _ = write!(
        xml,
        "<Application>{}</Application><PresentationFormat>{}</PresentationFormat><Slides>{}</Slides>",
        xml_text(application),
        document.layout().name(),
        document.slide_count()
    );
    xml.push_str("</Properties>");
    xml
}

pub fn core_properties(creator: &str) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    let _ = write!(xml, "<dc:creator>{}</dc:creator>", xml_text(creator));
    xml.push_str("</cp:coreProperties>");
    xml
}

/// Escape text for XML, dropping control characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect();
    escape(&cleaned).into_owned()
}
