//! Layout and styling constants.
//!
//! Single source of truth for every default the layout resolver applies when
//! a template omits a field. The deck builder and the preview synthesizer
//! both consume values resolved from here, which is what keeps the binary
//! document and the preview JSON in agreement.

/// Slide canvas dimensions and unit conversions.
pub mod canvas {
    /// Slide width in inches (4:3).
    pub const WIDTH_IN: f64 = 10.0;

    /// Slide height in inches (4:3).
    pub const HEIGHT_IN: f64 = 7.5;

    /// English Metric Units per inch (OOXML coordinate space).
    pub const EMU_PER_INCH: f64 = 914_400.0;

    /// English Metric Units per typographic point.
    pub const EMU_PER_POINT: f64 = 12_700.0;
}

/// Title slide layout defaults.
pub mod title_slide {
    /// Title text box: left, top, width, height in inches.
    pub const TITLE_BOX: (f64, f64, f64, f64) = (1.0, 2.0, 8.0, 1.5);

    /// Default title font size in points.
    pub const TITLE_SIZE: f32 = 44.0;

    /// Default background when the template gives none: light gray.
    pub const BACKGROUND: (u8, u8, u8) = (240, 240, 240);

    /// Default image placeholder: centered box in the lower half.
    pub const IMAGE_BOX: (f64, f64, f64, f64) = (2.5, 4.0, 5.0, 2.5);
}

/// Content slide layout defaults.
pub mod content_slide {
    /// Title text box: left, top, width, height in inches.
    pub const TITLE_BOX: (f64, f64, f64, f64) = (0.5, 0.5, 9.0, 0.8);

    /// Default title font size in points.
    pub const TITLE_SIZE: f32 = 32.0;

    /// Body text box origin and width in inches; height is computed.
    pub const BODY_BOX: (f64, f64, f64) = (0.7, 1.5, 8.5);

    /// Vertical inches allotted per bullet point.
    pub const POINT_HEIGHT_IN: f64 = 0.3;

    /// Minimum body box height in inches.
    pub const MIN_BODY_HEIGHT_IN: f64 = 1.0;

    /// Default body font size in points.
    pub const BODY_SIZE: f32 = 18.0;

    /// Default body text color.
    pub const BODY_COLOR: (u8, u8, u8) = (50, 50, 50);

    /// Paragraph spacing before and after each bullet, in points.
    pub const POINT_SPACING_PT: f32 = 6.0;

    /// Default background when the template gives none: white.
    pub const BACKGROUND: (u8, u8, u8) = (255, 255, 255);

    /// Default image placeholder: right-hand column box.
    pub const IMAGE_BOX: (f64, f64, f64, f64) = (6.2, 1.8, 3.3, 2.5);
}

/// Shared font defaults.
pub mod fonts {
    /// Fallback typeface for every text run.
    pub const DEFAULT_NAME: &str = "Calibri";

    /// Default title text color.
    pub const TITLE_COLOR: (u8, u8, u8) = (0, 0, 0);
}

/// Title overflow handling.
pub mod overflow {
    /// Titles longer than this many characters get a reduced font size.
    pub const MAX_TITLE_CHARS: usize = 40;

    /// Point-size decrement applied to overlong titles.
    pub const SHRINK_STEP: f32 = 8.0;

    /// Smallest title size the shrink rule may produce.
    pub const MIN_TITLE_SIZE: f32 = 20.0;
}

/// Image placeholder styling defaults.
pub mod placeholder {
    /// Fill tint: very light gray.
    pub const FILL: (u8, u8, u8) = (245, 245, 245);

    /// Border color: light gray.
    pub const BORDER: (u8, u8, u8) = (200, 200, 200);

    /// Border width in points.
    pub const BORDER_WIDTH_PT: f32 = 1.5;

    /// Icon glyph shown centered inside the placeholder.
    pub const ICON: &str = "🖼";

    /// Icon font size in points.
    pub const ICON_SIZE: f32 = 48.0;

    /// Spacing after the icon paragraph, in points.
    pub const ICON_SPACE_AFTER_PT: f32 = 10.0;

    /// Prompt caption font size in points.
    pub const PROMPT_SIZE: f32 = 14.0;

    /// Prompt caption text color.
    pub const PROMPT_COLOR: (u8, u8, u8) = (100, 100, 100);
}

/// Bullet formatting.
pub mod bullets {
    /// Glyph prefixed to every body paragraph.
    pub const GLYPH: &str = "• ";
}

/// Content generation bounds.
pub mod generation {
    /// Slide count used when the caller gives none.
    pub const DEFAULT_SLIDE_COUNT: usize = 3;

    /// Smallest accepted slide count.
    pub const MIN_SLIDE_COUNT: usize = 1;

    /// Largest accepted slide count.
    pub const MAX_SLIDE_COUNT: usize = 20;

    /// Title used when content arrives without one.
    pub const FALLBACK_TITLE: &str = "Presentation";
}
