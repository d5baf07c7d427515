//! Layout resolution.
//!
//! Merges presentation content, a template configuration, and the image
//! prompt map into a fully-resolved [`DeckPlan`]: every font, color, and
//! geometry value is concrete, with hard defaults from
//! [`crate::constants`] filling whatever the template omitted. The deck
//! builder and the preview synthesizer both consume this plan and nothing
//! else, which is what guarantees the binary document and the preview JSON
//! never disagree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{content_slide, fonts, overflow, title_slide};
use crate::content::{ImagePromptMap, PresentationContent, SlideContent, SlideKey};
use crate::deck::assets::{AssetCatalog, RasterAsset};
use crate::deck::Diagnostic;
use crate::template::{
    Alignment, BackgroundSpec, BorderStyle, BoxGeometry, FontSpec, Rgb, SlideStyle, TemplateConfig,
};

/// Which kind of slide a value applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    /// The single leading title slide.
    Title,
    /// A content slide.
    Content,
}

impl std::fmt::Display for SlideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Content => f.write_str("content"),
        }
    }
}

/// A font with every attribute resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFont {
    /// Typeface name.
    pub name: String,
    /// Size in points.
    pub size: f32,
    /// Text color.
    pub color: Rgb,
    /// Bold weight.
    pub bold: bool,
    /// Paragraph alignment.
    pub alignment: Alignment,
}

/// Placeholder styling with every attribute resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlaceholderStyle {
    /// Interior fill color.
    pub fill_color: Rgb,
    /// Border stroke color.
    pub border_color: Rgb,
    /// Border width in points.
    pub border_width: f32,
    /// Border stroke style.
    pub border_style: BorderStyle,
}

/// A slide background after the image-or-solid rule has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedBackground {
    /// Solid color fill.
    Solid(Rgb),
    /// Validated raster image, stretched to the full canvas.
    Image {
        /// Template-relative path, kept for the preview wire format.
        source: String,
        /// Loaded image data shared across slides.
        asset: Arc<RasterAsset>,
    },
}

/// One positioned text run (a slide title).
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlan {
    /// The text to draw.
    pub text: String,
    /// Box on the canvas, in inches.
    pub frame: BoxGeometry,
    /// Fully resolved font.
    pub font: ResolvedFont,
}

/// The bullet block of a content slide.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPlan {
    /// Box on the canvas, in inches; height grows with the point count.
    pub frame: BoxGeometry,
    /// Font applied to every bullet paragraph.
    pub font: ResolvedFont,
    /// Bullet texts, without the bullet glyph.
    pub points: Vec<String>,
    /// Paragraph spacing before and after each bullet, in points.
    pub spacing_pt: f32,
}

/// An image placeholder to draw on a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderPlan {
    /// The stored image prompt, rendered as caption text.
    pub prompt: String,
    /// Box on the canvas, in inches.
    pub frame: BoxGeometry,
    /// Fill and border styling.
    pub style: ResolvedPlaceholderStyle,
}

/// Resolved plan for the title slide.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleSlidePlan {
    /// Background fill or image.
    pub background: ResolvedBackground,
    /// Deck title run.
    pub title: TextPlan,
    /// Placeholder, present iff the prompt map has a `"title"` entry.
    pub image: Option<PlaceholderPlan>,
}

/// Resolved plan for one content slide.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSlidePlan {
    /// Background fill or image.
    pub background: ResolvedBackground,
    /// Slide title run.
    pub title: TextPlan,
    /// Bullet block; absent when the slide has no points.
    pub body: Option<BodyPlan>,
    /// Placeholder, present iff the prompt map has this slide's index.
    pub image: Option<PlaceholderPlan>,
}

/// Base (pre-shrink) style values for one slide kind, mirrored into the
/// preview's `styles` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlideStyle {
    /// Background after the image-or-solid rule.
    pub background: ResolvedBackground,
    /// Base title font.
    pub title_font: ResolvedFont,
    /// Base body font.
    pub body_font: ResolvedFont,
    /// Placeholder geometry for this slide kind.
    pub image_position: BoxGeometry,
}

/// The resolved style sections shared by both outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyles {
    /// Title slide styling.
    pub title_slide: ResolvedSlideStyle,
    /// Content slide styling.
    pub content_slide: ResolvedSlideStyle,
    /// Placeholder styling.
    pub image_slide: ResolvedPlaceholderStyle,
}

/// The fully resolved rendering plan for one deck.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckPlan {
    /// Deck title with the fallback applied.
    pub title: String,
    /// Id of the template the plan was resolved from.
    pub template_id: String,
    /// Resolved base styles, mirrored into the preview.
    pub styles: ResolvedStyles,
    /// The title slide.
    pub title_slide: TitleSlidePlan,
    /// Content slides, in input order.
    pub content_slides: Vec<ContentSlidePlan>,
}

impl DeckPlan {
    /// Total slide count: one title slide plus one per content entry.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        1 + self.content_slides.len()
    }
}

/// Per-kind hard defaults consulted when the template omits a field.
struct FontDefaults {
    size: f32,
    color: Rgb,
    bold: bool,
    alignment: Alignment,
}

const TITLE_SLIDE_TITLE: FontDefaults = FontDefaults {
    size: title_slide::TITLE_SIZE,
    color: Rgb::new(fonts::TITLE_COLOR.0, fonts::TITLE_COLOR.1, fonts::TITLE_COLOR.2),
    bold: true,
    alignment: Alignment::Center,
};

const CONTENT_SLIDE_TITLE: FontDefaults = FontDefaults {
    size: content_slide::TITLE_SIZE,
    color: Rgb::new(fonts::TITLE_COLOR.0, fonts::TITLE_COLOR.1, fonts::TITLE_COLOR.2),
    bold: true,
    alignment: Alignment::Left,
};

const BODY: FontDefaults = FontDefaults {
    size: content_slide::BODY_SIZE,
    color: Rgb::new(
        content_slide::BODY_COLOR.0,
        content_slide::BODY_COLOR.1,
        content_slide::BODY_COLOR.2,
    ),
    bold: false,
    alignment: Alignment::Left,
};

/// Resolve `content` against `template` into a complete deck plan.
///
/// Recoverable degradations (background fallback, title shrink) are
/// returned as diagnostics; this function itself cannot fail.
#[must_use]
pub fn resolve(
    content: &PresentationContent,
    template_id: &str,
    template: &TemplateConfig,
    prompts: &ImagePromptMap,
    assets: &AssetCatalog,
) -> (DeckPlan, Vec<Diagnostic>) {
    let mut resolver = Resolver {
        template,
        prompts,
        assets,
        diagnostics: Vec::new(),
    };

    let styles = resolver.resolve_styles();
    let title_plan = resolver.resolve_title_slide(content.display_title(), &styles);
    let content_plans = content
        .slides
        .iter()
        .enumerate()
        .map(|(index, slide)| resolver.resolve_content_slide(index, slide, &styles))
        .collect();

    let plan = DeckPlan {
        title: content.display_title().to_string(),
        template_id: template_id.to_string(),
        styles,
        title_slide: title_plan,
        content_slides: content_plans,
    };
    (plan, resolver.diagnostics)
}

struct Resolver<'a> {
    template: &'a TemplateConfig,
    prompts: &'a ImagePromptMap,
    assets: &'a AssetCatalog,
    diagnostics: Vec<Diagnostic>,
}

impl Resolver<'_> {
    /// Resolve the base style sections both outputs share.
    fn resolve_styles(&mut self) -> ResolvedStyles {
        let template = self.template;
        let title_style = &template.styles.title_slide;
        let content_style = &template.styles.content_slide;

        ResolvedStyles {
            title_slide: ResolvedSlideStyle {
                background: self.resolve_background(
                    SlideKind::Title,
                    title_style,
                    title_slide::BACKGROUND.into(),
                ),
                title_font: merge_font(title_style.title_font.as_ref(), &TITLE_SLIDE_TITLE),
                body_font: merge_font(title_style.body_font.as_ref(), &BODY),
                image_position: placeholder_frame(title_style, title_slide::IMAGE_BOX),
            },
            content_slide: ResolvedSlideStyle {
                background: self.resolve_background(
                    SlideKind::Content,
                    content_style,
                    content_slide::BACKGROUND.into(),
                ),
                title_font: merge_font(content_style.title_font.as_ref(), &CONTENT_SLIDE_TITLE),
                body_font: merge_font(content_style.body_font.as_ref(), &BODY),
                image_position: placeholder_frame(content_style, content_slide::IMAGE_BOX),
            },
            image_slide: self.resolve_placeholder_style(),
        }
    }

    /// Resolve the title slide plan.
    fn resolve_title_slide(&mut self, title: &str, styles: &ResolvedStyles) -> TitleSlidePlan {
        let font = self.shrink_title(SlideKey::Title, title, &styles.title_slide.title_font);
        TitleSlidePlan {
            background: styles.title_slide.background.clone(),
            title: TextPlan {
                text: title.to_string(),
                frame: title_slide::TITLE_BOX.into(),
                font,
            },
            image: self.resolve_placeholder(SlideKey::Title, styles.title_slide.image_position, &styles.image_slide),
        }
    }

    /// Resolve one content slide plan.
    fn resolve_content_slide(
        &mut self,
        index: usize,
        slide: &SlideContent,
        styles: &ResolvedStyles,
    ) -> ContentSlidePlan {
        let key = SlideKey::Content(index);
        let font = self.shrink_title(key, &slide.title, &styles.content_slide.title_font);

        let body = if slide.points.is_empty() {
            None
        } else {
            let (left, top, width) = content_slide::BODY_BOX;
            #[allow(clippy::cast_precision_loss)]
            let height = (content_slide::POINT_HEIGHT_IN * slide.points.len() as f64)
                .max(content_slide::MIN_BODY_HEIGHT_IN);
            Some(BodyPlan {
                frame: BoxGeometry::new(left, top, width, height),
                font: styles.content_slide.body_font.clone(),
                points: slide.points.clone(),
                spacing_pt: content_slide::POINT_SPACING_PT,
            })
        };

        ContentSlidePlan {
            background: styles.content_slide.background.clone(),
            title: TextPlan {
                text: slide.title.clone(),
                frame: content_slide::TITLE_BOX.into(),
                font,
            },
            body,
            image: self.resolve_placeholder(key, styles.content_slide.image_position, &styles.image_slide),
        }
    }

    /// Apply the background image-or-solid rule for one slide kind.
    fn resolve_background(
        &mut self,
        kind: SlideKind,
        style: &SlideStyle,
        default_color: Rgb,
    ) -> ResolvedBackground {
        if let Some(path) = &style.background_image {
            match self.assets.resolve_raster(path) {
                Ok(asset) => {
                    return ResolvedBackground::Image {
                        source: path.clone(),
                        asset: Arc::new(asset),
                    };
                }
                Err(issue) => {
                    tracing::warn!("Background image {path:?} for {kind} slides unusable ({issue}), using solid fill");
                    self.diagnostics.push(Diagnostic::BackgroundFallback {
                        kind,
                        path: path.clone(),
                        issue,
                    });
                }
            }
        }

        let color = style.background.map_or(default_color, BackgroundSpec::realized_color);
        ResolvedBackground::Solid(color)
    }

    /// Title font with the overflow shrink rule applied.
    fn shrink_title(&mut self, key: SlideKey, title: &str, base: &ResolvedFont) -> ResolvedFont {
        let mut font = base.clone();
        if title.chars().count() > overflow::MAX_TITLE_CHARS {
            let adjusted = (base.size - overflow::SHRINK_STEP).max(overflow::MIN_TITLE_SIZE);
            if (adjusted - base.size).abs() > f32::EPSILON {
                self.diagnostics.push(Diagnostic::TitleShrunk {
                    slide: key,
                    from: base.size,
                    to: adjusted,
                });
            }
            font.size = adjusted;
        }
        font
    }

    /// Placeholder plan for `key`, if the prompt map marks the slide.
    fn resolve_placeholder(
        &self,
        key: SlideKey,
        frame: BoxGeometry,
        style: &ResolvedPlaceholderStyle,
    ) -> Option<PlaceholderPlan> {
        self.prompts.get(key).map(|prompt| PlaceholderPlan {
            prompt: prompt.to_string(),
            frame,
            style: *style,
        })
    }

    /// Placeholder fill/border styling with defaults applied.
    fn resolve_placeholder_style(&self) -> ResolvedPlaceholderStyle {
        use crate::constants::placeholder;

        let spec = &self.template.styles.image_slide;
        ResolvedPlaceholderStyle {
            fill_color: spec.fill_color.unwrap_or_else(|| placeholder::FILL.into()),
            border_color: spec.border_color.unwrap_or_else(|| placeholder::BORDER.into()),
            border_width: spec.border_width.unwrap_or(placeholder::BORDER_WIDTH_PT),
            border_style: spec.border_style.unwrap_or_default(),
        }
    }
}

/// Placeholder frame for a slide kind: template override or default box.
fn placeholder_frame(style: &SlideStyle, default_box: (f64, f64, f64, f64)) -> BoxGeometry {
    style
        .image_position
        .map_or_else(|| default_box.into(), BoxGeometry::sanitized)
}

/// Merge a partial template font over the per-kind defaults.
fn merge_font(spec: Option<&FontSpec>, defaults: &FontDefaults) -> ResolvedFont {
    let spec = spec.cloned().unwrap_or_default();
    ResolvedFont {
        name: spec.name.unwrap_or_else(|| fonts::DEFAULT_NAME.to_string()),
        size: spec.size.unwrap_or(defaults.size),
        color: spec.color.unwrap_or(defaults.color),
        bold: spec.bold.unwrap_or(defaults.bold),
        alignment: spec.alignment.unwrap_or(defaults.alignment),
    }
}
