//! Template data model.
//!
//! A template is a named bundle of visual defaults (backgrounds, fonts,
//! image geometry) applied uniformly to a deck. Every style field is
//! optional on the template side; the layout resolver merges templates with
//! the hard defaults in [`crate::constants`] to produce fully-concrete
//! per-slide plans.

pub mod store;

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Create a color from components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `RRGGBB` hex form used in DrawingML attributes.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left-aligned text.
    #[default]
    Left,
    /// Centered text.
    Center,
    /// Right-aligned text.
    Right,
}

/// Border stroke style for image placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// Continuous stroke.
    Solid,
    /// Dashed stroke.
    #[default]
    Dashed,
}

/// Slide background specification.
///
/// Gradients are accepted for forward compatibility but render as a solid
/// fill of their start color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundSpec {
    /// Single-color fill.
    Solid {
        /// Fill color.
        color: Rgb,
    },
    /// Two-color gradient; only `start` is realized.
    Gradient {
        /// Gradient start color (the one actually rendered).
        start: Rgb,
        /// Gradient end color (recorded, not rendered).
        end: Rgb,
    },
}

impl BackgroundSpec {
    /// The solid color this background realizes.
    #[must_use]
    pub const fn realized_color(self) -> Rgb {
        match self {
            Self::Solid { color } => color,
            Self::Gradient { start, .. } => start,
        }
    }
}

/// Partial font specification as it appears in template JSON.
///
/// Absent fields take the per-slide-kind defaults at resolve time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontSpec {
    /// Typeface name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Size in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Bold weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Paragraph alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

/// A rectangle on the slide canvas, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    /// Distance from the left edge.
    pub left: f64,
    /// Distance from the top edge.
    pub top: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl BoxGeometry {
    /// Create a box from `(left, top, width, height)` inches.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Clamp every member to a finite, non-negative value.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clamp = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            left: clamp(self.left),
            top: clamp(self.top),
            width: clamp(self.width),
            height: clamp(self.height),
        }
    }
}

impl From<(f64, f64, f64, f64)> for BoxGeometry {
    fn from((left, top, width, height): (f64, f64, f64, f64)) -> Self {
        Self { left, top, width, height }
    }
}

/// Partial image placeholder styling as it appears in template JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImagePlaceholderStyle {
    /// Interior fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Rgb>,
    /// Border stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Rgb>,
    /// Border width in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    /// Border stroke style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
}

/// Per-slide-kind style bundle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlideStyle {
    /// Background fill; absent means the slide-kind default color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSpec>,
    /// Optional background image path, relative to the asset root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Title text styling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font: Option<FontSpec>,
    /// Body text styling (content slides).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_font: Option<FontSpec>,
    /// Image placeholder geometry override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_position: Option<BoxGeometry>,
}

/// The style sections of a template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateStyles {
    /// Styling for the title slide.
    #[serde(default)]
    pub title_slide: SlideStyle,
    /// Styling shared by all content slides.
    #[serde(default)]
    pub content_slide: SlideStyle,
    /// Styling for image placeholders on any slide.
    #[serde(default)]
    pub image_slide: ImagePlaceholderStyle,
}

/// A named, immutable template configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Human-readable template name.
    pub name: String,
    /// Short description shown in template pickers.
    #[serde(default)]
    pub description: String,
    /// Path to a preview thumbnail, relative to the asset root.
    #[serde(default)]
    pub preview_image: String,
    /// Style sections.
    #[serde(default)]
    pub styles: TemplateStyles,
}

impl TemplateConfig {
    /// Built-in template used when no `default.json` is on disk.
    ///
    /// All style fields are left empty so the resolver supplies the
    /// hard-coded defaults.
    #[must_use]
    pub fn fallback_default() -> Self {
        Self {
            name: "Default".to_string(),
            description: "Light backgrounds with dark Calibri text".to_string(),
            preview_image: String::new(),
            styles: TemplateStyles::default(),
        }
    }

    /// Whether the template carries the sections a well-formed template
    /// file is expected to have: a non-empty name plus backgrounds and
    /// title fonts for both slide kinds.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let has_slide_essentials = |style: &SlideStyle| {
            (style.background.is_some() || style.background_image.is_some())
                && style.title_font.is_some()
        };
        !self.name.is_empty()
            && has_slide_essentials(&self.styles.title_slide)
            && has_slide_essentials(&self.styles.content_slide)
    }
}
