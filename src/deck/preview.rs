//! Preview synthesis.
//!
//! Produces the JSON mirror of a deck an external HTML renderer consumes in
//! place of opening the binary document. The preview is computed from the
//! same [`DeckPlan`] the deck builder consumed, never by inspecting the
//! archive, so the two outputs cannot disagree. Every field is always
//! present with its resolved value; nothing is omitted for templates that
//! left fields out.

use serde::{Deserialize, Serialize};

use crate::deck::plan::{
    ContentSlidePlan, DeckPlan, PlaceholderPlan, ResolvedBackground, ResolvedFont,
    ResolvedPlaceholderStyle, ResolvedSlideStyle, SlideKind,
};
use crate::template::{Alignment, BoxGeometry, Rgb};

/// Resolved background as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewBackground {
    /// Solid color fill.
    Solid {
        /// Fill color.
        color: Rgb,
    },
    /// Full-canvas background image.
    Image {
        /// Template-relative image path.
        path: String,
    },
}

/// Resolved style bundle for one slide kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSlideStyle {
    /// Background after the image-or-solid rule.
    pub background: PreviewBackground,
    /// Base title font with defaults applied.
    pub title_font: ResolvedFont,
    /// Base body font with defaults applied.
    pub body_font: ResolvedFont,
    /// Image placeholder geometry for this slide kind.
    pub image_position: BoxGeometry,
}

/// The resolved style sections of the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewStyles {
    /// Title slide styling.
    pub title_slide: PreviewSlideStyle,
    /// Content slide styling.
    pub content_slide: PreviewSlideStyle,
    /// Image placeholder styling.
    pub image_slide: ResolvedPlaceholderStyle,
}

/// Geometry plus styling of one drawn image placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewImageStyle {
    /// Placeholder box on the canvas, in inches.
    #[serde(flatten)]
    pub position: BoxGeometry,
    /// Fill and border styling.
    #[serde(flatten)]
    pub style: ResolvedPlaceholderStyle,
}

/// Styling of one rendered bullet point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyling {
    /// Bullet text, without the glyph.
    pub text: String,
    /// Indent level; always zero today.
    pub level: u8,
    /// Typeface name.
    pub font_name: String,
    /// Size in points.
    pub font_size: f32,
    /// Text color.
    pub color: Rgb,
    /// Paragraph alignment.
    pub alignment: Alignment,
}

/// One slide in the preview, positionally aligned with the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSlide {
    /// Slide kind, serialized as `"title"` or `"content"`.
    #[serde(rename = "type")]
    pub kind: SlideKind,
    /// Slide title text.
    pub title: String,
    /// Bullet texts; empty on title slides and pointless content slides.
    pub points: Vec<String>,
    /// Per-point styling, parallel to `points`.
    pub points_styling: Vec<PointStyling>,
    /// Whether an image placeholder was drawn on this slide.
    pub has_image: bool,
    /// The stored image prompt, when a placeholder was drawn.
    pub image_prompt: Option<String>,
    /// Placeholder geometry and styling, when a placeholder was drawn.
    pub image_style: Option<PreviewImageStyle>,
}

/// Structural JSON mirror of a rendered deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPreview {
    /// Deck title.
    pub title: String,
    /// Id of the template the deck was rendered with.
    pub template: String,
    /// Resolved style sections, defaults applied.
    pub styles: PreviewStyles,
    /// Slides in document order.
    pub slides: Vec<PreviewSlide>,
}

/// Build the preview mirror of `plan`.
#[must_use]
pub fn synthesize(plan: &DeckPlan) -> RenderedPreview {
    let mut slides = Vec::with_capacity(plan.slide_count());

    slides.push(PreviewSlide {
        kind: SlideKind::Title,
        title: plan.title_slide.title.text.clone(),
        points: Vec::new(),
        points_styling: Vec::new(),
        has_image: plan.title_slide.image.is_some(),
        image_prompt: plan.title_slide.image.as_ref().map(|p| p.prompt.clone()),
        image_style: plan.title_slide.image.as_ref().map(image_style),
    });

    for slide in &plan.content_slides {
        slides.push(content_slide(slide));
    }

    RenderedPreview {
        title: plan.title.clone(),
        template: plan.template_id.clone(),
        styles: PreviewStyles {
            title_slide: slide_style(&plan.styles.title_slide),
            content_slide: slide_style(&plan.styles.content_slide),
            image_slide: plan.styles.image_slide,
        },
        slides,
    }
}

fn content_slide(slide: &ContentSlidePlan) -> PreviewSlide {
    let (points, points_styling) = slide.body.as_ref().map_or_else(
        || (Vec::new(), Vec::new()),
        |body| {
            let styling = body
                .points
                .iter()
                .map(|point| PointStyling {
                    text: point.clone(),
                    level: 0,
                    font_name: body.font.name.clone(),
                    font_size: body.font.size,
                    color: body.font.color,
                    alignment: body.font.alignment,
                })
                .collect();
            (body.points.clone(), styling)
        },
    );

    PreviewSlide {
        kind: SlideKind::Content,
        title: slide.title.text.clone(),
        points,
        points_styling,
        has_image: slide.image.is_some(),
        image_prompt: slide.image.as_ref().map(|p| p.prompt.clone()),
        image_style: slide.image.as_ref().map(image_style),
    }
}

fn slide_style(style: &ResolvedSlideStyle) -> PreviewSlideStyle {
    PreviewSlideStyle {
        background: background(&style.background),
        title_font: style.title_font.clone(),
        body_font: style.body_font.clone(),
        image_position: style.image_position,
    }
}

fn background(resolved: &ResolvedBackground) -> PreviewBackground {
    match resolved {
        ResolvedBackground::Solid(color) => PreviewBackground::Solid { color: *color },
        ResolvedBackground::Image { source, .. } => {
            PreviewBackground::Image { path: source.clone() }
        }
    }
}

fn image_style(placeholder: &PlaceholderPlan) -> PreviewImageStyle {
    PreviewImageStyle {
        position: placeholder.frame,
        style: placeholder.style,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

    use super::*;
    use crate::content::{ImagePromptMap, PresentationContent, SlideContent, SlideKey};
    use crate::deck::assets::AssetCatalog;
    use crate::deck::plan::resolve;
    use crate::template::TemplateConfig;

    fn mars_preview() -> RenderedPreview {
        let content = PresentationContent {
            title: "Mars".to_string(),
            slides: vec![
                SlideContent {
                    title: "Atmosphere".to_string(),
                    points: vec![
                        "Thin CO2 atmosphere".to_string(),
                        "Low pressure".to_string(),
                    ],
                },
                SlideContent { title: "Moons".to_string(), points: vec![] },
            ],
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
        synthesize(&plan)
    }

    #[test]
    fn preview_mirrors_slide_count_and_order() {
        let preview = mars_preview();
        assert_eq!(preview.slides.len(), 3);
        assert_eq!(preview.slides[0].kind, SlideKind::Title);
        assert_eq!(preview.slides[0].title, "Mars");
        assert_eq!(preview.slides[1].title, "Atmosphere");
        assert_eq!(preview.slides[2].title, "Moons");
    }

    #[test]
    fn title_slide_has_empty_point_sequences() {
        let preview = mars_preview();
        let title = &preview.slides[0];
        assert!(title.points.is_empty());
        assert!(title.points_styling.is_empty());
        assert!(title.has_image);
        assert_eq!(title.image_prompt.as_deref(), Some("mars image"));
    }

    #[test]
    fn points_styling_is_parallel_to_points() {
        let preview = mars_preview();
        let slide = &preview.slides[1];
        assert_eq!(slide.points.len(), 2);
        assert_eq!(slide.points_styling.len(), 2);
        assert_eq!(slide.points_styling[0].text, "Thin CO2 atmosphere");
        assert_eq!(slide.points_styling[0].font_name, "Calibri");
        assert_eq!(slide.points_styling[0].font_size, 18.0);
        assert_eq!(slide.points_styling[0].color, Rgb::new(50, 50, 50));
        assert_eq!(slide.points_styling[0].level, 0);
    }

    #[test]
    fn pointless_slide_has_empty_sequences() {
        let preview = mars_preview();
        let slide = &preview.slides[2];
        assert!(slide.points.is_empty());
        assert!(slide.points_styling.is_empty());
        assert!(!slide.has_image);
        assert!(slide.image_prompt.is_none());
        assert!(slide.image_style.is_none());
    }

    #[test]
    fn styles_expose_resolved_defaults() {
        let preview = mars_preview();
        assert_eq!(
            preview.styles.title_slide.background,
            PreviewBackground::Solid { color: Rgb::new(240, 240, 240) }
        );
        assert_eq!(
            preview.styles.content_slide.background,
            PreviewBackground::Solid { color: Rgb::new(255, 255, 255) }
        );
        assert_eq!(preview.styles.title_slide.title_font.size, 44.0);
        assert_eq!(preview.styles.content_slide.title_font.size, 32.0);
        assert_eq!(preview.styles.image_slide.fill_color, Rgb::new(245, 245, 245));
    }

    #[test]
    fn preview_serializes_with_stable_field_names() {
        let preview = mars_preview();
        let json = serde_json::to_value(&preview).unwrap();

        assert_eq!(json["template"], "default");
        assert_eq!(json["slides"][0]["type"], "title");
        assert_eq!(json["slides"][1]["type"], "content");
        assert_eq!(json["slides"][1]["points_styling"][0]["alignment"], "left");
        assert_eq!(json["styles"]["title_slide"]["background"]["type"], "solid");
        // Placeholder geometry and styling are flattened together.
        let image_style = &json["slides"][0]["image_style"];
        assert_eq!(image_style["left"], 2.5);
        assert_eq!(image_style["border_style"], "dashed");
    }

    #[test]
    fn preview_round_trips_through_json() {
        let preview = mars_preview();
        let json = serde_json::to_string(&preview).unwrap();
        let back: RenderedPreview = serde_json::from_str(&json).unwrap();
        assert_eq!(back, preview);
    }
}
