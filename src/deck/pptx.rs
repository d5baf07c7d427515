//! Deck builder: realizes a resolved plan as a PPTX archive.
//!
//! PPTX files are ZIP archives of OOXML parts. The builder walks a
//! [`DeckPlan`] and emits one title slide plus one slide per content entry,
//! entirely in memory. Any failure aborts the whole build; a partially
//! constructed archive is never returned.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::constants::{bullets, canvas, placeholder as placeholder_const};
use crate::deck::plan::{
    BodyPlan, DeckPlan, PlaceholderPlan, ResolvedBackground, ResolvedFont, TextPlan,
};
use crate::deck::DeckArtifact;
use crate::template::{Alignment, BorderStyle, BoxGeometry, Rgb};

/// Errors that can occur while constructing the deck archive
#[derive(Debug, Error)]
pub enum BuildError {
    /// An I/O error occurred while writing archive contents
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP container could not be written
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A slide XML part could not be produced
    #[error("XML error: {0}")]
    Xml(String),
}

/// Map any XML writer failure into [`BuildError::Xml`].
fn xml(e: impl std::fmt::Display) -> BuildError {
    BuildError::Xml(e.to_string())
}

/// Slide canvas width in EMU.
const CANVAS_CX: i64 = 9_144_000;
/// Slide canvas height in EMU.
const CANVAS_CY: i64 = 6_858_000;

/// Build a complete PPTX archive from a resolved plan.
pub fn build_deck(plan: &DeckPlan) -> Result<DeckArtifact, BuildError> {
    let media = collect_media(plan);
    let slide_count = plan.slide_count();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    write_content_types(&mut zip, options, slide_count, &media)?;
    write_root_rels(&mut zip, options)?;
    write_app_props(&mut zip, options, slide_count)?;
    write_core_props(&mut zip, options, &plan.title)?;
    write_presentation(&mut zip, options, slide_count)?;
    write_presentation_rels(&mut zip, options, slide_count)?;
    write_static_parts(&mut zip, options)?;

    for entry in media.values() {
        zip.start_file(format!("ppt/media/{}", entry.part), options)?;
        zip.write_all(&entry.bytes)?;
    }

    let mut slides = Vec::with_capacity(slide_count);
    slides.push(SlideShapes {
        background: &plan.title_slide.background,
        title: &plan.title_slide.title,
        body: None,
        image: plan.title_slide.image.as_ref(),
    });
    for slide in &plan.content_slides {
        slides.push(SlideShapes {
            background: &slide.background,
            title: &slide.title,
            body: slide.body.as_ref(),
            image: slide.image.as_ref(),
        });
    }

    for (index, shapes) in slides.iter().enumerate() {
        let number = index + 1;
        zip.start_file(format!("ppt/slides/slide{number}.xml"), options)?;
        zip.write_all(&slide_xml(shapes)?)?;

        zip.start_file(format!("ppt/slides/_rels/slide{number}.xml.rels"), options)?;
        zip.write_all(&slide_rels_xml(shapes, &media)?)?;
    }

    let cursor = zip.finish()?;
    Ok(DeckArtifact::new(cursor.into_inner(), slide_count))
}

/// One embedded media part, shared by every slide that references it.
struct MediaEntry {
    part: String,
    extension: &'static str,
    content_type: &'static str,
    bytes: Vec<u8>,
}

/// Collect background images into deduplicated media parts keyed by their
/// template-relative source path.
fn collect_media(plan: &DeckPlan) -> HashMap<String, MediaEntry> {
    let mut media = HashMap::new();
    let backgrounds = std::iter::once(&plan.title_slide.background)
        .chain(plan.content_slides.iter().map(|s| &s.background));

    for background in backgrounds {
        if let ResolvedBackground::Image { source, asset } = background {
            if !media.contains_key(source) {
                let number = media.len() + 1;
                media.insert(
                    source.clone(),
                    MediaEntry {
                        part: format!("image{number}.{}", asset.format.extension()),
                        extension: asset.format.extension(),
                        content_type: asset.format.content_type(),
                        bytes: asset.bytes.clone(),
                    },
                );
            }
        }
    }
    media
}

/// The shapes to draw on one slide, in z-order.
struct SlideShapes<'a> {
    background: &'a ResolvedBackground,
    title: &'a TextPlan,
    body: Option<&'a BodyPlan>,
    image: Option<&'a PlaceholderPlan>,
}

/// Inches to EMU.
#[allow(clippy::cast_possible_truncation)]
fn emu_inches(inches: f64) -> i64 {
    (inches * canvas::EMU_PER_INCH).round() as i64
}

/// Points to EMU (line widths).
#[allow(clippy::cast_possible_truncation)]
fn emu_points(points: f32) -> i64 {
    (f64::from(points) * canvas::EMU_PER_POINT).round() as i64
}

/// Points to the hundredths-of-a-point integers DrawingML uses for font
/// sizes and paragraph spacing.
#[allow(clippy::cast_possible_truncation)]
fn centipoints(points: f32) -> i64 {
    (f64::from(points) * 100.0).round() as i64
}

/// DrawingML alignment attribute value.
const fn algn(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "l",
        Alignment::Center => "ctr",
        Alignment::Right => "r",
    }
}

/// Start tag with attributes.
fn elem<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut e = BytesStart::new(name);
    for attr in attrs {
        e.push_attribute(*attr);
    }
    e
}

/// One styled paragraph inside a text body.
struct Paragraph<'a> {
    text: &'a str,
    alignment: Alignment,
    size_pt: f32,
    bold: bool,
    italic: bool,
    color: Option<Rgb>,
    typeface: Option<&'a str>,
    space_before_pt: Option<f32>,
    space_after_pt: Option<f32>,
}

impl<'a> Paragraph<'a> {
    /// Paragraph carrying a title or body run.
    fn from_font(text: &'a str, font: &'a ResolvedFont) -> Self {
        Self {
            text,
            alignment: font.alignment,
            size_pt: font.size,
            bold: font.bold,
            italic: false,
            color: Some(font.color),
            typeface: Some(&font.name),
            space_before_pt: None,
            space_after_pt: None,
        }
    }
}

type XmlWriter = Writer<Vec<u8>>;

fn write_paragraph(w: &mut XmlWriter, p: &Paragraph<'_>) -> Result<(), BuildError> {
    w.write_event(Event::Start(elem("a:p", &[]))).map_err(xml)?;

    let has_spacing = p.space_before_pt.is_some() || p.space_after_pt.is_some();
    let ppr = elem("a:pPr", &[("algn", algn(p.alignment))]);
    if has_spacing {
        w.write_event(Event::Start(ppr)).map_err(xml)?;
        if let Some(before) = p.space_before_pt {
            write_spacing(w, "a:spcBef", before)?;
        }
        if let Some(after) = p.space_after_pt {
            write_spacing(w, "a:spcAft", after)?;
        }
        w.write_event(Event::End(BytesEnd::new("a:pPr"))).map_err(xml)?;
    } else {
        w.write_event(Event::Empty(ppr)).map_err(xml)?;
    }

    w.write_event(Event::Start(elem("a:r", &[]))).map_err(xml)?;

    let size = centipoints(p.size_pt).to_string();
    let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-US"), ("sz", &size), ("dirty", "0")];
    if p.bold {
        attrs.push(("b", "1"));
    }
    if p.italic {
        attrs.push(("i", "1"));
    }
    let rpr = elem("a:rPr", &attrs);

    if p.color.is_some() || p.typeface.is_some() {
        w.write_event(Event::Start(rpr)).map_err(xml)?;
        if let Some(color) = p.color {
            write_solid_fill(w, color)?;
        }
        if let Some(typeface) = p.typeface {
            w.write_event(Event::Empty(elem("a:latin", &[("typeface", typeface)])))
                .map_err(xml)?;
        }
        w.write_event(Event::End(BytesEnd::new("a:rPr"))).map_err(xml)?;
    } else {
        w.write_event(Event::Empty(rpr)).map_err(xml)?;
    }

    w.write_event(Event::Start(elem("a:t", &[]))).map_err(xml)?;
    w.write_event(Event::Text(BytesText::new(p.text))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("a:t"))).map_err(xml)?;

    w.write_event(Event::End(BytesEnd::new("a:r"))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("a:p"))).map_err(xml)?;
    Ok(())
}

fn write_spacing(w: &mut XmlWriter, tag: &str, points: f32) -> Result<(), BuildError> {
    let val = centipoints(points).to_string();
    w.write_event(Event::Start(elem(tag, &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:spcPts", &[("val", val.as_str())])))
        .map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new(tag))).map_err(xml)?;
    Ok(())
}

fn write_solid_fill(w: &mut XmlWriter, color: Rgb) -> Result<(), BuildError> {
    let hex = color.to_hex();
    w.write_event(Event::Start(elem("a:solidFill", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:srgbClr", &[("val", hex.as_str())])))
        .map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("a:solidFill"))).map_err(xml)?;
    Ok(())
}

fn write_xfrm(w: &mut XmlWriter, frame: BoxGeometry) -> Result<(), BuildError> {
    let x = emu_inches(frame.left).to_string();
    let y = emu_inches(frame.top).to_string();
    let cx = emu_inches(frame.width).to_string();
    let cy = emu_inches(frame.height).to_string();

    w.write_event(Event::Start(elem("a:xfrm", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:off", &[("x", x.as_str()), ("y", y.as_str())])))
        .map_err(xml)?;
    w.write_event(Event::Empty(elem("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])))
        .map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("a:xfrm"))).map_err(xml)?;
    Ok(())
}

fn write_rect_geom(w: &mut XmlWriter) -> Result<(), BuildError> {
    w.write_event(Event::Start(elem("a:prstGeom", &[("prst", "rect")])))
        .map_err(xml)?;
    w.write_event(Event::Empty(elem("a:avLst", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("a:prstGeom"))).map_err(xml)?;
    Ok(())
}

/// Non-visual shape properties shared by every shape we emit.
fn write_nv_sp_pr(w: &mut XmlWriter, id: usize, name: &str) -> Result<(), BuildError> {
    let id = id.to_string();
    w.write_event(Event::Start(elem("p:nvSpPr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("p:cNvPr", &[("id", id.as_str()), ("name", name)])))
        .map_err(xml)?;
    w.write_event(Event::Empty(elem("p:cNvSpPr", &[("txBox", "1")])))
        .map_err(xml)?;
    w.write_event(Event::Empty(elem("p:nvPr", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:nvSpPr"))).map_err(xml)?;
    Ok(())
}

/// A word-wrapped text box containing `paragraphs`.
fn write_text_box(
    w: &mut XmlWriter,
    id: usize,
    name: &str,
    frame: BoxGeometry,
    paragraphs: &[Paragraph<'_>],
) -> Result<(), BuildError> {
    w.write_event(Event::Start(elem("p:sp", &[]))).map_err(xml)?;
    write_nv_sp_pr(w, id, name)?;

    w.write_event(Event::Start(elem("p:spPr", &[]))).map_err(xml)?;
    write_xfrm(w, frame)?;
    write_rect_geom(w)?;
    w.write_event(Event::Empty(elem("a:noFill", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:spPr"))).map_err(xml)?;

    w.write_event(Event::Start(elem("p:txBody", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:bodyPr", &[("wrap", "square")])))
        .map_err(xml)?;
    w.write_event(Event::Empty(elem("a:lstStyle", &[]))).map_err(xml)?;
    for paragraph in paragraphs {
        write_paragraph(w, paragraph)?;
    }
    w.write_event(Event::End(BytesEnd::new("p:txBody"))).map_err(xml)?;

    w.write_event(Event::End(BytesEnd::new("p:sp"))).map_err(xml)?;
    Ok(())
}

/// The bordered image placeholder rectangle with icon and prompt caption.
fn write_placeholder(
    w: &mut XmlWriter,
    id: usize,
    placeholder: &PlaceholderPlan,
) -> Result<(), BuildError> {
    w.write_event(Event::Start(elem("p:sp", &[]))).map_err(xml)?;

    let id_string = id.to_string();
    w.write_event(Event::Start(elem("p:nvSpPr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem(
        "p:cNvPr",
        &[("id", id_string.as_str()), ("name", "Image Placeholder")],
    )))
    .map_err(xml)?;
    w.write_event(Event::Empty(elem("p:cNvSpPr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("p:nvPr", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:nvSpPr"))).map_err(xml)?;

    w.write_event(Event::Start(elem("p:spPr", &[]))).map_err(xml)?;
    write_xfrm(w, placeholder.frame)?;
    write_rect_geom(w)?;
    write_solid_fill(w, placeholder.style.fill_color)?;

    let width = emu_points(placeholder.style.border_width).to_string();
    w.write_event(Event::Start(elem("a:ln", &[("w", width.as_str())])))
        .map_err(xml)?;
    write_solid_fill(w, placeholder.style.border_color)?;
    if placeholder.style.border_style == BorderStyle::Dashed {
        w.write_event(Event::Empty(elem("a:prstDash", &[("val", "dash")])))
            .map_err(xml)?;
    }
    w.write_event(Event::End(BytesEnd::new("a:ln"))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:spPr"))).map_err(xml)?;

    w.write_event(Event::Start(elem("p:txBody", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem(
        "a:bodyPr",
        &[("wrap", "square"), ("anchor", "ctr")],
    )))
    .map_err(xml)?;
    w.write_event(Event::Empty(elem("a:lstStyle", &[]))).map_err(xml)?;

    write_paragraph(
        w,
        &Paragraph {
            text: placeholder_const::ICON,
            alignment: Alignment::Center,
            size_pt: placeholder_const::ICON_SIZE,
            bold: false,
            italic: false,
            color: None,
            typeface: None,
            space_before_pt: None,
            space_after_pt: Some(placeholder_const::ICON_SPACE_AFTER_PT),
        },
    )?;
    write_paragraph(
        w,
        &Paragraph {
            text: &placeholder.prompt,
            alignment: Alignment::Center,
            size_pt: placeholder_const::PROMPT_SIZE,
            bold: false,
            italic: true,
            color: Some(placeholder_const::PROMPT_COLOR.into()),
            typeface: None,
            space_before_pt: None,
            space_after_pt: None,
        },
    )?;

    w.write_event(Event::End(BytesEnd::new("p:txBody"))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:sp"))).map_err(xml)?;
    Ok(())
}

/// Full-canvas background picture, first in the shape tree so it sits
/// behind every other shape.
fn write_background_picture(w: &mut XmlWriter, id: usize) -> Result<(), BuildError> {
    let id = id.to_string();
    w.write_event(Event::Start(elem("p:pic", &[]))).map_err(xml)?;

    w.write_event(Event::Start(elem("p:nvPicPr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem(
        "p:cNvPr",
        &[("id", id.as_str()), ("name", "Background")],
    )))
    .map_err(xml)?;
    w.write_event(Event::Empty(elem("p:cNvPicPr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("p:nvPr", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:nvPicPr"))).map_err(xml)?;

    w.write_event(Event::Start(elem("p:blipFill", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:blip", &[("r:embed", "rId2")])))
        .map_err(xml)?;
    w.write_event(Event::Start(elem("a:stretch", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:fillRect", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("a:stretch"))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:blipFill"))).map_err(xml)?;

    w.write_event(Event::Start(elem("p:spPr", &[]))).map_err(xml)?;
    let cx = CANVAS_CX.to_string();
    let cy = CANVAS_CY.to_string();
    w.write_event(Event::Start(elem("a:xfrm", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:off", &[("x", "0"), ("y", "0")])))
        .map_err(xml)?;
    w.write_event(Event::Empty(elem("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])))
        .map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("a:xfrm"))).map_err(xml)?;
    write_rect_geom(w)?;
    w.write_event(Event::End(BytesEnd::new("p:spPr"))).map_err(xml)?;

    w.write_event(Event::End(BytesEnd::new("p:pic"))).map_err(xml)?;
    Ok(())
}

/// Serialize one slide to XML.
fn slide_xml(shapes: &SlideShapes<'_>) -> Result<Vec<u8>, BuildError> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml)?;

    w.write_event(Event::Start(elem(
        "p:sld",
        &[
            ("xmlns:a", "http://schemas.openxmlformats.org/drawingml/2006/main"),
            ("xmlns:r", "http://schemas.openxmlformats.org/officeDocument/2006/relationships"),
            ("xmlns:p", "http://schemas.openxmlformats.org/presentationml/2006/main"),
        ],
    )))
    .map_err(xml)?;
    w.write_event(Event::Start(elem("p:cSld", &[]))).map_err(xml)?;

    if let ResolvedBackground::Solid(color) = shapes.background {
        w.write_event(Event::Start(elem("p:bg", &[]))).map_err(xml)?;
        w.write_event(Event::Start(elem("p:bgPr", &[]))).map_err(xml)?;
        write_solid_fill(&mut w, *color)?;
        w.write_event(Event::Empty(elem("a:effectLst", &[]))).map_err(xml)?;
        w.write_event(Event::End(BytesEnd::new("p:bgPr"))).map_err(xml)?;
        w.write_event(Event::End(BytesEnd::new("p:bg"))).map_err(xml)?;
    }

    w.write_event(Event::Start(elem("p:spTree", &[]))).map_err(xml)?;
    w.write_event(Event::Start(elem("p:nvGrpSpPr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("p:cNvPr", &[("id", "1"), ("name", "")])))
        .map_err(xml)?;
    w.write_event(Event::Empty(elem("p:cNvGrpSpPr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("p:nvPr", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:nvGrpSpPr"))).map_err(xml)?;
    w.write_event(Event::Empty(elem("p:grpSpPr", &[]))).map_err(xml)?;

    let mut next_id = 2;
    if matches!(shapes.background, ResolvedBackground::Image { .. }) {
        write_background_picture(&mut w, next_id)?;
        next_id += 1;
    }

    write_text_box(
        &mut w,
        next_id,
        "Title",
        shapes.title.frame,
        &[Paragraph::from_font(&shapes.title.text, &shapes.title.font)],
    )?;
    next_id += 1;

    if let Some(body) = shapes.body {
        let bulleted: Vec<String> = body
            .points
            .iter()
            .map(|point| format!("{}{point}", bullets::GLYPH))
            .collect();
        let paragraphs: Vec<Paragraph<'_>> = bulleted
            .iter()
            .map(|text| Paragraph {
                space_before_pt: Some(body.spacing_pt),
                space_after_pt: Some(body.spacing_pt),
                ..Paragraph::from_font(text, &body.font)
            })
            .collect();
        write_text_box(&mut w, next_id, "Content", body.frame, &paragraphs)?;
        next_id += 1;
    }

    if let Some(placeholder) = shapes.image {
        write_placeholder(&mut w, next_id, placeholder)?;
    }

    w.write_event(Event::End(BytesEnd::new("p:spTree"))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:cSld"))).map_err(xml)?;

    w.write_event(Event::Start(elem("p:clrMapOvr", &[]))).map_err(xml)?;
    w.write_event(Event::Empty(elem("a:masterClrMapping", &[]))).map_err(xml)?;
    w.write_event(Event::End(BytesEnd::new("p:clrMapOvr"))).map_err(xml)?;

    w.write_event(Event::End(BytesEnd::new("p:sld"))).map_err(xml)?;
    Ok(w.into_inner())
}

/// Relationships for one slide: its layout, plus its background image.
fn slide_rels_xml(
    shapes: &SlideShapes<'_>,
    media: &HashMap<String, MediaEntry>,
) -> Result<Vec<u8>, BuildError> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml)?;
    w.write_event(Event::Start(elem(
        "Relationships",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/relationships")],
    )))
    .map_err(xml)?;

    w.write_event(Event::Empty(elem(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout",
            ),
            ("Target", "../slideLayouts/slideLayout1.xml"),
        ],
    )))
    .map_err(xml)?;

    if let ResolvedBackground::Image { source, .. } = shapes.background {
        if let Some(entry) = media.get(source) {
            let target = format!("../media/{}", entry.part);
            w.write_event(Event::Empty(elem(
                "Relationship",
                &[
                    ("Id", "rId2"),
                    (
                        "Type",
                        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image",
                    ),
                    ("Target", target.as_str()),
                ],
            )))
            .map_err(xml)?;
        }
    }

    w.write_event(Event::End(BytesEnd::new("Relationships"))).map_err(xml)?;
    Ok(w.into_inner())
}

type Archive = ZipWriter<Cursor<Vec<u8>>>;

fn write_content_types(
    zip: &mut Archive,
    options: FileOptions,
    slide_count: usize,
    media: &HashMap<String, MediaEntry>,
) -> Result<(), BuildError> {
    zip.start_file("[Content_Types].xml", options)?;

    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml)?;
    w.write_event(Event::Start(elem(
        "Types",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
    )))
    .map_err(xml)?;

    let mut defaults: Vec<(&str, &str)> = vec![
        ("rels", "application/vnd.openxmlformats-package.relationships+xml"),
        ("xml", "application/xml"),
    ];
    for entry in media.values() {
        if !defaults.iter().any(|(ext, _)| *ext == entry.extension) {
            defaults.push((entry.extension, entry.content_type));
        }
    }
    for (extension, content_type) in defaults {
        w.write_event(Event::Empty(elem(
            "Default",
            &[("Extension", extension), ("ContentType", content_type)],
        )))
        .map_err(xml)?;
    }

    let mut overrides: Vec<(String, &str)> = vec![
        (
            "/ppt/presentation.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
        ),
        (
            "/ppt/slideMasters/slideMaster1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml",
        ),
        (
            "/ppt/slideLayouts/slideLayout1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml",
        ),
        (
            "/ppt/theme/theme1.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.theme+xml",
        ),
        (
            "/docProps/app.xml".to_string(),
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
        (
            "/docProps/core.xml".to_string(),
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
    ];
    for number in 1..=slide_count {
        overrides.push((
            format!("/ppt/slides/slide{number}.xml"),
            "application/vnd.openxmlformats-officedocument.presentationml.slide+xml",
        ));
    }
    for (part, content_type) in &overrides {
        w.write_event(Event::Empty(elem(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", content_type)],
        )))
        .map_err(xml)?;
    }

    w.write_event(Event::End(BytesEnd::new("Types"))).map_err(xml)?;
    zip.write_all(&w.into_inner())?;
    Ok(())
}

fn write_root_rels(zip: &mut Archive, options: FileOptions) -> Result<(), BuildError> {
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#,
    )?;
    Ok(())
}

fn write_app_props(
    zip: &mut Archive,
    options: FileOptions,
    slide_count: usize,
) -> Result<(), BuildError> {
    zip.start_file("docProps/app.xml", options)?;
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <Application>DeckForge</Application>
  <PresentationFormat>On-screen Show (4:3)</PresentationFormat>
  <Slides>{slide_count}</Slides>
  <Notes>0</Notes>
  <HiddenSlides>0</HiddenSlides>
  <ScaleCrop>false</ScaleCrop>
  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>16.0000</AppVersion>
</Properties>"#
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_core_props(zip: &mut Archive, options: FileOptions, title: &str) -> Result<(), BuildError> {
    zip.start_file("docProps/core.xml", options)?;
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let escaped_title = escape_text(title);
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{escaped_title}</dc:title>
  <dc:creator>DeckForge</dc:creator>
  <cp:lastModifiedBy>DeckForge</cp:lastModifiedBy>
  <cp:revision>1</cp:revision>
  <dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>
</cp:coreProperties>"#
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_presentation(
    zip: &mut Archive,
    options: FileOptions,
    slide_count: usize,
) -> Result<(), BuildError> {
    zip.start_file("ppt/presentation.xml", options)?;
    let mut slide_ids = String::new();
    for number in 1..=slide_count {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + number,
            number + 2
        ));
    }
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">
  <p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
  <p:sldIdLst>{slide_ids}</p:sldIdLst>
  <p:sldSz cx="{CANVAS_CX}" cy="{CANVAS_CY}" type="screen4x3"/>
  <p:notesSz cx="{CANVAS_CY}" cy="{CANVAS_CX}"/>
</p:presentation>"#
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_presentation_rels(
    zip: &mut Archive,
    options: FileOptions,
    slide_count: usize,
) -> Result<(), BuildError> {
    zip.start_file("ppt/_rels/presentation.xml.rels", options)?;

    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml)?;
    w.write_event(Event::Start(elem(
        "Relationships",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/relationships")],
    )))
    .map_err(xml)?;

    w.write_event(Event::Empty(elem(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster",
            ),
            ("Target", "slideMasters/slideMaster1.xml"),
        ],
    )))
    .map_err(xml)?;
    w.write_event(Event::Empty(elem(
        "Relationship",
        &[
            ("Id", "rId2"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme",
            ),
            ("Target", "theme/theme1.xml"),
        ],
    )))
    .map_err(xml)?;

    for number in 1..=slide_count {
        let id = format!("rId{}", number + 2);
        let target = format!("slides/slide{number}.xml");
        w.write_event(Event::Empty(elem(
            "Relationship",
            &[
                ("Id", id.as_str()),
                (
                    "Type",
                    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide",
                ),
                ("Target", target.as_str()),
            ],
        )))
        .map_err(xml)?;
    }

    w.write_event(Event::End(BytesEnd::new("Relationships"))).map_err(xml)?;
    zip.write_all(&w.into_inner())?;
    Ok(())
}

/// Slide master, layout, theme, and their relationship parts. These are
/// fixed boilerplate: all real styling is carried on the slides themselves.
fn write_static_parts(zip: &mut Archive, options: FileOptions) -> Result<(), BuildError> {
    zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld>
    <p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>
    <p:spTree>
      <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>
</p:sldMaster>"#,
    )?;

    zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
</Relationships>"#,
    )?;

    zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1">
  <p:cSld name="Blank">
    <p:spTree>
      <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
    )?;

    zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#,
    )?;

    zip.start_file("ppt/theme/theme1.xml", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="DeckForge Theme">
  <a:themeElements>
    <a:clrScheme name="DeckForge">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="DeckForge">
      <a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
      <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="DeckForge">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#,
    )?;

    Ok(())
}

/// Escape text interpolated into the hand-written document property parts.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::content::{ImagePromptMap, PresentationContent, SlideContent, SlideKey};
    use crate::deck::assets::AssetCatalog;
    use crate::deck::plan::resolve;
    use crate::template::TemplateConfig;
    use std::io::Read;

    fn mars_plan() -> DeckPlan {
        let content = PresentationContent {
            title: "Mars".to_string(),
            slides: vec![SlideContent {
                title: "Atmosphere".to_string(),
                points: vec![
                    "Thin CO2 atmosphere".to_string(),
                    "Low pressure".to_string(),
                ],
            }],
        };
        let mut prompts = ImagePromptMap::new();
        prompts.insert(SlideKey::Title, "mars image");
        prompts.insert(SlideKey::Content(0), "atmosphere image");
        let assets = AssetCatalog::new("/nonexistent");
        let (plan, _) = resolve(
            &content,
            "default",
            &TemplateConfig::fallback_default(),
            &prompts,
            &assets,
        );
        plan
    }

    fn read_part(artifact: &DeckArtifact, name: &str) -> String {
        let cursor = Cursor::new(artifact.bytes().to_vec());
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn archive_contains_required_parts() {
        let artifact = build_deck(&mars_plan()).unwrap();
        assert!(!artifact.is_empty());
        assert_eq!(artifact.slide_count(), 2);

        let cursor = Cursor::new(artifact.bytes().to_vec());
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/app.xml",
            "docProps/core.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(archive.by_name(required).is_ok(), "missing part: {required}");
        }
        assert!(archive.by_name("ppt/slides/slide3.xml").is_err());
    }

    #[test]
    fn title_slide_carries_title_and_background() {
        let artifact = build_deck(&mars_plan()).unwrap();
        let slide1 = read_part(&artifact, "ppt/slides/slide1.xml");

        assert!(slide1.contains("<a:t>Mars</a:t>"));
        // Default light-gray title background.
        assert!(slide1.contains("F0F0F0"));
        // Title font: 44pt bold centered Calibri.
        assert!(slide1.contains("sz=\"4400\""));
        assert!(slide1.contains("b=\"1\""));
        assert!(slide1.contains("algn=\"ctr\""));
        assert!(slide1.contains("typeface=\"Calibri\""));
    }

    #[test]
    fn content_slide_has_bulleted_paragraphs_and_placeholder() {
        let artifact = build_deck(&mars_plan()).unwrap();
        let slide2 = read_part(&artifact, "ppt/slides/slide2.xml");

        assert!(slide2.contains("<a:t>• Thin CO2 atmosphere</a:t>"));
        assert!(slide2.contains("<a:t>• Low pressure</a:t>"));
        assert_eq!(slide2.matches("• ").count(), 2);

        // Placeholder: dashed border, fill tint, italic prompt caption.
        assert!(slide2.contains("Image Placeholder"));
        assert!(slide2.contains("prstDash val=\"dash\""));
        assert!(slide2.contains("F5F5F5"));
        assert!(slide2.contains("C8C8C8"));
        assert!(slide2.contains("<a:t>atmosphere image</a:t>"));
        assert!(slide2.contains("i=\"1\""));
        // Border width: 1.5pt = 19050 EMU.
        assert!(slide2.contains("w=\"19050\""));
    }

    #[test]
    fn slide_without_prompt_has_no_placeholder() {
        let mut plan = mars_plan();
        plan.content_slides[0].image = None;
        let artifact = build_deck(&plan).unwrap();
        let slide2 = read_part(&artifact, "ppt/slides/slide2.xml");
        assert!(!slide2.contains("Image Placeholder"));
    }

    #[test]
    fn empty_points_produce_no_body_textbox() {
        let mut plan = mars_plan();
        plan.content_slides[0].body = None;
        let artifact = build_deck(&plan).unwrap();
        let slide2 = read_part(&artifact, "ppt/slides/slide2.xml");
        assert!(!slide2.contains("name=\"Content\""));
        assert!(!slide2.contains("• "));
    }

    #[test]
    fn background_image_is_embedded_once_and_referenced() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(
            dir.path().join("bg.png"),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0],
        )
        .unwrap();

        let content = PresentationContent {
            title: "Mars".to_string(),
            slides: vec![
                SlideContent { title: "A".to_string(), points: vec![] },
                SlideContent { title: "B".to_string(), points: vec![] },
            ],
        };
        let mut template = TemplateConfig::fallback_default();
        template.styles.content_slide.background_image = Some("bg.png".to_string());
        let assets = AssetCatalog::new(dir.path());
        let (plan, _) = resolve(&content, "default", &template, &ImagePromptMap::new(), &assets);

        let artifact = build_deck(&plan).unwrap();
        let cursor = Cursor::new(artifact.bytes().to_vec());
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        assert!(archive.by_name("ppt/media/image1.png").is_ok());
        assert!(archive.by_name("ppt/media/image2.png").is_err());

        let slide2 = read_part(&artifact, "ppt/slides/slide2.xml");
        assert!(slide2.contains("r:embed=\"rId2\""));
        // Image backgrounds replace the solid background element.
        assert!(!slide2.contains("<p:bg>"));

        let rels = read_part(&artifact, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels.contains("../media/image1.png"));

        let types = read_part(&artifact, "[Content_Types].xml");
        assert!(types.contains("image/png"));
    }

    #[test]
    fn canvas_is_four_by_three() {
        let artifact = build_deck(&mars_plan()).unwrap();
        let presentation = read_part(&artifact, "ppt/presentation.xml");
        assert!(presentation.contains("cx=\"9144000\" cy=\"6858000\" type=\"screen4x3\""));
    }

    #[test]
    fn title_text_is_escaped() {
        let mut plan = mars_plan();
        plan.title_slide.title.text = "Research & <Development>".to_string();
        let artifact = build_deck(&plan).unwrap();
        let slide1 = read_part(&artifact, "ppt/slides/slide1.xml");
        assert!(slide1.contains("Research &amp; &lt;Development&gt;"));
    }

    #[test]
    fn geometry_converts_to_emu() {
        assert_eq!(emu_inches(1.0), 914_400);
        assert_eq!(emu_inches(2.5), 2_286_000);
        assert_eq!(emu_points(1.5), 19_050);
        assert_eq!(centipoints(44.0), 4_400);
        assert_eq!(centipoints(1.5), 150);
    }
}
