//! XML for every part of a picture-only presentation package.
//!
//! Each function returns one complete part. The set is the smallest that
//! PowerPoint, Keynote and LibreOffice open without repair: one master, one
//! blank layout, one theme, then a slide per picture.

use std::fmt::Write;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";

/// First slide id PowerPoint accepts.
pub const FIRST_SLIDE_ID: u32 = 256;
/// Master and layout ids share a space that starts at 2^31.
const MASTER_ID: u32 = 2_147_483_648;
const LAYOUT_ID: u32 = 2_147_483_649;

/// Portrait letter, the size PowerPoint writes for notes pages.
const NOTES_CX: i64 = 6_858_000;
const NOTES_CY: i64 = 9_144_000;

/// Escape the five XML special characters.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn root_open(tag: &str, extra: &str) -> String {
    format!(r#"{XML_DECL}<{tag} xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"{extra}>"#)
}

/// Group shape header every shape tree starts with.
fn empty_group_header() -> &'static str {
    concat!(
        r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
        r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    )
}

// =========================================================================
// Package-level parts
// =========================================================================

pub fn content_types(slide_count: usize) -> String {
    let mut xml = String::with_capacity(2048 + slide_count * 160);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
    xml.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);

    let overrides = [
        ("/ppt/presentation.xml", format!("{CT_PML}.presentation.main+xml")),
        ("/ppt/slideMasters/slideMaster1.xml", format!("{CT_PML}.slideMaster+xml")),
        ("/ppt/slideLayouts/slideLayout1.xml", format!("{CT_PML}.slideLayout+xml")),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml".to_string()),
        ("/ppt/presProps.xml", format!("{CT_PML}.presProps+xml")),
        ("/ppt/viewProps.xml", format!("{CT_PML}.viewProps+xml")),
        ("/ppt/tableStyles.xml", format!("{CT_PML}.tableStyles+xml")),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml".to_string()),
        ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string()),
    ];
    for (part, content_type) in &overrides {
        let _ = write!(xml, r#"<Override PartName="{part}" ContentType="{content_type}"/>"#);
    }
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_PML}.slide+xml"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

fn relationships(rels: &[(String, String, String)]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target) in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn rel(id: impl Into<String>, kind: &str, target: impl Into<String>) -> (String, String, String) {
    (id.into(), format!("{REL_BASE}/{kind}"), target.into())
}

/// `_rels/.rels`
pub fn root_rels() -> String {
    relationships(&[
        rel("rId1", "officeDocument", "ppt/presentation.xml"),
        (
            "rId2".to_string(),
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
                .to_string(),
            "docProps/core.xml".to_string(),
        ),
        rel("rId3", "extended-properties", "docProps/app.xml"),
    ])
}

pub fn core_properties(title: &str, creator: &str) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title><dc:creator>{creator}</dc:creator>",
            "</cp:coreProperties>"
        ),
        decl = XML_DECL,
        title = escape_xml(title),
        creator = escape_xml(creator),
    )
}

pub fn app_properties(application: &str, slide_count: usize) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>{app}</Application><Slides>{slides}</Slides>",
            "</Properties>"
        ),
        decl = XML_DECL,
        app = escape_xml(application),
        slides = slide_count,
    )
}

// =========================================================================
// Presentation
// =========================================================================

/// Relationship id of slide `n` (1-based) in `presentation.xml.rels`.
///
/// `rId1` is the master; slides follow in order.
pub fn presentation_slide_rid(n: usize) -> String {
    format!("rId{}", n + 1)
}

pub fn presentation(slide_width_emu: i64, slide_height_emu: i64, slide_count: usize) -> String {
    let mut xml = root_open("p:presentation", r#" saveSubsetFonts="1""#);
    let _ = write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="{MASTER_ID}" r:id="rId1"/></p:sldMasterIdLst>"#
    );
    xml.push_str("<p:sldIdLst>");
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<p:sldId id="{}" r:id="{}"/>"#,
            FIRST_SLIDE_ID as usize + n - 1,
            presentation_slide_rid(n)
        );
    }
    xml.push_str("</p:sldIdLst>");
    let _ = write!(
        xml,
        r#"<p:sldSz cx="{slide_width_emu}" cy="{slide_height_emu}"/><p:notesSz cx="{NOTES_CX}" cy="{NOTES_CY}"/>"#
    );
    xml.push_str("</p:presentation>");
    xml
}

pub fn presentation_rels(slide_count: usize) -> String {
    let mut rels = vec![rel("rId1", "slideMaster", "slideMasters/slideMaster1.xml")];
    for n in 1..=slide_count {
        rels.push(rel(
            presentation_slide_rid(n),
            "slide",
            format!("slides/slide{n}.xml"),
        ));
    }
    let next = slide_count + 2;
    rels.push(rel(format!("rId{next}"), "presProps", "presProps.xml"));
    rels.push(rel(format!("rId{}", next + 1), "viewProps", "viewProps.xml"));
    rels.push(rel(format!("rId{}", next + 2), "theme", "theme/theme1.xml"));
    rels.push(rel(format!("rId{}", next + 3), "tableStyles", "tableStyles.xml"));
    relationships(&rels)
}

pub fn pres_props() -> String {
    let mut xml = root_open("p:presentationPr", "");
    xml.push_str("</p:presentationPr>");
    xml
}

pub fn view_props() -> String {
    let mut xml = root_open("p:viewPr", "");
    xml.push_str("</p:viewPr>");
    xml
}

pub fn table_styles() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="{NS_A}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

// =========================================================================
// Master, layout, theme
// =========================================================================

/// The master has no background element, so slides show the viewer's
/// default (white) behind letterboxed pictures.
pub fn slide_master() -> String {
    let mut xml = root_open("p:sldMaster", "");
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(empty_group_header());
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
        r#"hlink="hlink" folHlink="folHlink"/>"#
    ));
    let _ = write!(
        xml,
        r#"<p:sldLayoutIdLst><p:sldLayoutId id="{LAYOUT_ID}" r:id="rId1"/></p:sldLayoutIdLst>"#
    );
    xml.push_str("</p:sldMaster>");
    xml
}

pub fn slide_master_rels() -> String {
    relationships(&[
        rel("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
        rel("rId2", "theme", "../theme/theme1.xml"),
    ])
}

pub fn slide_layout() -> String {
    let mut xml = root_open("p:sldLayout", r#" type="blank" preserve="1""#);
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(empty_group_header());
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

pub fn slide_layout_rels() -> String {
    relationships(&[rel("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")])
}

/// Office default palette and fonts; three entries per style list is the
/// schema minimum.
pub fn theme() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<a:theme xmlns:a="{NS_A}" name="Office Theme">"#);
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    let palette = [
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
    for (slot, rgb) in palette {
        let _ = write!(xml, r#"<a:{slot}><a:srgbClr val="{rgb}"/></a:{slot}>"#);
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    for (kind, face) in [("majorFont", "Calibri Light"), ("minorFont", "Calibri")] {
        let _ = write!(
            xml,
            r#"<a:{kind}><a:latin typeface="{face}"/><a:ea typeface=""/><a:cs typeface=""/></a:{kind}>"#
        );
    }
    xml.push_str("</a:fontScheme>");

    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    let _ = write!(xml, "<a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        let _ = write!(
            xml,
            r#"<a:ln w="{width}" cap="flat" cmpd="sng" algn="ctr">{solid}<a:prstDash val="solid"/></a:ln>"#
        );
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst>");
    let _ = write!(xml, "<a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    xml
}

// =========================================================================
// Slides
// =========================================================================

/// Position and size of a picture, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmuRect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Relationship id of the picture inside each slide's rels; `rId1` is the layout.
pub const PICTURE_RID: &str = "rId2";

/// A slide whose only content is one picture.
pub fn picture_slide(rect: EmuRect, description: &str) -> String {
    let mut xml = root_open("p:sld", "");
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(empty_group_header());

    xml.push_str("<p:pic>");
    let _ = write!(
        xml,
        r#"<p:nvPicPr><p:cNvPr id="2" name="Picture 1" descr="{}"/>"#,
        escape_xml(description)
    );
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
    let _ = write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{PICTURE_RID}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#
    );
    let _ = write!(
        xml,
        r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        rect.x, rect.y, rect.cx, rect.cy
    );
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#);
    xml.push_str("</p:pic>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

pub fn picture_slide_rels(media_file_name: &str) -> String {
    relationships(&[
        rel("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
        rel(PICTURE_RID, "image", format!("../media/{media_file_name}")),
    ])
}
