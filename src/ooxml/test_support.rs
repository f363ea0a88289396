//! In-memory package fixtures for unit tests.
//!
//! Packages are written with the `zip` crate's writer so every reader test
//! goes through the same inflate path as a real file.

use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Zip text members into a package.
pub fn zip_package(entries: &[(&str, &str)]) -> Vec<u8> {
    let entries: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, body)| (*name, body.as_bytes()))
        .collect();
    zip_package_bytes(&entries)
}

/// Zip binary members (for example an embedded workbook) into a package.
pub fn zip_package_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, body) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

const XLSX_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#;

const XLSX_PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

/// Build a minimal `.xlsx`: each sheet is `(name, sheetData inner XML)`.
/// Shared strings are written only when `shared_strings` is non-empty.
pub fn xlsx_bytes(sheets: &[(&str, &str)], shared_strings: &[&str]) -> Vec<u8> {
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut members: Vec<(String, String)> = Vec::new();

    for (i, (name, cells)) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            name, n, n
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
        members.push((
            format!("xl/worksheets/sheet{}.xml", n),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                cells
            ),
        ));
    }
    workbook.push_str("</sheets></workbook>");

    if !shared_strings.is_empty() {
        rels.push_str(
            r#"<Relationship Id="rIdSst" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        );
        let mut sst = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            shared_strings.len()
        );
        for s in shared_strings {
            sst.push_str(&format!("<si><t>{}</t></si>", s));
        }
        sst.push_str("</sst>");
        members.push(("xl/sharedStrings.xml".to_string(), sst));
    }
    rels.push_str("</Relationships>");

    let mut entries: Vec<(&str, &str)> = vec![
        ("[Content_Types].xml", XLSX_CONTENT_TYPES),
        ("_rels/.rels", XLSX_PACKAGE_RELS),
        ("xl/workbook.xml", workbook.as_str()),
        ("xl/_rels/workbook.xml.rels", rels.as_str()),
    ];
    entries.extend(members.iter().map(|(n, b)| (n.as_str(), b.as_str())));
    zip_package(&entries)
}

const PML_NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// One slide of a [`PptxFixture`].
#[derive(Debug, Default, Clone)]
pub struct FixtureSlide {
    /// Shape nodes placed inside `p:spTree`
    pub shapes: String,
    /// Extra `Relationship` elements; `rId1` is taken by the layout
    pub rels: String,
}

/// A minimal presentation: one master, one layout, any number of slides.
#[derive(Debug, Default, Clone)]
pub struct PptxFixture {
    pub master_shapes: String,
    /// Children of `p:sldMaster` after `p:cSld` (for example `p:txStyles`)
    pub master_extra: String,
    pub layout_shapes: String,
    /// Inner XML of `p:defaultTextStyle`; omitted when empty
    pub default_text_style: String,
    pub slides: Vec<FixtureSlide>,
    /// Extra members as `(zip path, bytes)`: charts, images, workbooks
    pub parts: Vec<(String, Vec<u8>)>,
}

fn rels_xml(rels: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}">{}</Relationships>"#,
        REL_NS, rels
    )
}

/// `Relationship` element of a standard type (`slideLayout`, `image`, ...).
pub fn relationship(r_id: &str, kind: &str, target: &str) -> String {
    format!(
        r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
        r_id, REL_TYPE, kind, target
    )
}

fn part_xml(root: &str, shapes: &str, extra: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:{root} {PML_NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld>{extra}</p:{root}>"#
    )
}

impl PptxFixture {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut members: Vec<(String, Vec<u8>)> = Vec::new();
        let mut add = |name: &str, body: String| members.push((name.to_string(), body.into_bytes()));

        add(
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Default Extension="xlsx" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#
                .to_string(),
        );
        add(
            "_rels/.rels",
            rels_xml(&relationship("rId1", "officeDocument", "ppt/presentation.xml")),
        );

        let mut pres_rels = relationship("rId1", "slideMaster", "slideMasters/slideMaster1.xml");
        let mut sld_ids = String::new();
        for i in 0..self.slides.len() {
            let r_id = format!("rId{}", i + 2);
            pres_rels.push_str(&relationship(
                &r_id,
                "slide",
                &format!("slides/slide{}.xml", i + 1),
            ));
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, r_id));
        }
        let default_text_style = if self.default_text_style.is_empty() {
            String::new()
        } else {
            format!("<p:defaultTextStyle>{}</p:defaultTextStyle>", self.default_text_style)
        };
        add(
            "ppt/presentation.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {PML_NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{sld_ids}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/>{default_text_style}</p:presentation>"#
            ),
        );
        add("ppt/_rels/presentation.xml.rels", rels_xml(&pres_rels));

        add(
            "ppt/slideMasters/slideMaster1.xml",
            part_xml("sldMaster", &self.master_shapes, &self.master_extra),
        );
        add(
            "ppt/slideLayouts/slideLayout1.xml",
            part_xml("sldLayout", &self.layout_shapes, ""),
        );
        add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            rels_xml(&relationship("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")),
        );

        for (i, slide) in self.slides.iter().enumerate() {
            add(
                &format!("ppt/slides/slide{}.xml", i + 1),
                part_xml("sld", &slide.shapes, ""),
            );
            let mut rels = relationship("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml");
            rels.push_str(&slide.rels);
            add(&format!("ppt/slides/_rels/slide{}.xml.rels", i + 1), rels_xml(&rels));
        }

        members.extend(self.parts.iter().cloned());
        let entries: Vec<(&str, &[u8])> = members
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_slice()))
            .collect();
        zip_package_bytes(&entries)
    }
}
