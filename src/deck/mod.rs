//! Deck composition engine.
//!
//! The render pipeline is linear and stateless: resolve the layout plan,
//! build the binary document, synthesize the preview mirror, return both.
//! Each render call is atomic and independent; the only shared input is the
//! read-only template configuration.

pub mod assets;
pub mod plan;
pub mod pptx;
pub mod preview;

use std::path::Path;

use crate::content::{ImagePromptMap, PresentationContent, SlideKey};
use crate::deck::assets::{AssetCatalog, AssetIssue};
use crate::deck::plan::SlideKind;
use crate::deck::preview::RenderedPreview;
use crate::error::Result;
use crate::template::store::TemplateStore;
use crate::template::TemplateConfig;

/// A finished binary deck, held in memory until the caller persists it.
#[derive(Debug, Clone)]
pub struct DeckArtifact {
    bytes: Vec<u8>,
    slide_count: usize,
}

impl DeckArtifact {
    pub(crate) const fn new(bytes: Vec<u8>, slide_count: usize) -> Self {
        Self { bytes, slide_count }
    }

    /// Raw archive bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the artifact, returning the archive bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Archive size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the archive is empty (never true for a successful build).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of slides in the deck.
    #[must_use]
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Write the archive to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs_err::write(path.as_ref(), &self.bytes)?;
        Ok(())
    }
}

/// A recoverable degradation applied during a successful render.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A background image was unusable; a solid fill was used instead.
    BackgroundFallback {
        /// Which slide kind the background belongs to.
        kind: SlideKind,
        /// The template-relative path that failed.
        path: String,
        /// Why the asset was rejected.
        issue: AssetIssue,
    },
    /// An overlong title was rendered at a reduced font size.
    TitleShrunk {
        /// Which slide was affected.
        slide: SlideKey,
        /// Configured base size in points.
        from: f32,
        /// Size actually rendered.
        to: f32,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackgroundFallback { kind, path, issue } => write!(
                f,
                "background image {path:?} on {kind} slides unusable ({issue}); solid fill used"
            ),
            Self::TitleShrunk { slide, from, to } => {
                write!(f, "title on slide {slide} shrunk from {from}pt to {to}pt")
            }
        }
    }
}

/// The two parallel outputs of one render, plus its degradations.
#[derive(Debug)]
pub struct RenderOutcome {
    /// The binary deck document.
    pub artifact: DeckArtifact,
    /// The JSON mirror of the deck's layout.
    pub preview: RenderedPreview,
    /// Recoverable issues encountered while resolving the plan.
    pub diagnostics: Vec<Diagnostic>,
}

/// Render a deck using a template from `store`.
///
/// The template id is resolved with the `"default"` fallback rule; an
/// absent id with no default is fatal.
pub fn render(
    content: &PresentationContent,
    template_id: &str,
    store: &TemplateStore,
    prompts: &ImagePromptMap,
    assets: &AssetCatalog,
) -> Result<RenderOutcome> {
    let (resolved_id, template) = store.resolve(template_id)?;
    render_with_template(content, resolved_id, template, prompts, assets)
}

/// Render a deck against an already-resolved template configuration.
pub fn render_with_template(
    content: &PresentationContent,
    template_id: &str,
    template: &TemplateConfig,
    prompts: &ImagePromptMap,
    assets: &AssetCatalog,
) -> Result<RenderOutcome> {
    let (deck_plan, diagnostics) = plan::resolve(content, template_id, template, prompts, assets);

    let artifact = pptx::build_deck(&deck_plan)?;
    let preview = preview::synthesize(&deck_plan);

    tracing::debug!(
        "Rendered {} slides with template {template_id:?} ({} diagnostics)",
        deck_plan.slide_count(),
        diagnostics.len()
    );

    Ok(RenderOutcome { artifact, preview, diagnostics })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::content::SlideContent;

    fn store_with_default() -> TemplateStore {
        let mut store = TemplateStore::new();
        store.ensure_default();
        store
    }

    fn simple_content() -> PresentationContent {
        PresentationContent {
            title: "Mars".to_string(),
            slides: vec![SlideContent {
                title: "Atmosphere".to_string(),
                points: vec!["Thin CO2 atmosphere".to_string()],
            }],
        }
    }

    #[test]
    fn render_produces_matching_outputs() {
        let store = store_with_default();
        let assets = AssetCatalog::new("/nonexistent");
        let outcome = render(
            &simple_content(),
            "default",
            &store,
            &ImagePromptMap::new(),
            &assets,
        )
        .unwrap();

        assert_eq!(outcome.artifact.slide_count(), 2);
        assert_eq!(outcome.preview.slides.len(), 2);
        assert!(outcome.diagnostics.is_empty());
        assert!(!outcome.artifact.is_empty());
    }

    #[test]
    fn unknown_template_falls_back_to_default() {
        let store = store_with_default();
        let assets = AssetCatalog::new("/nonexistent");
        let outcome = render(
            &simple_content(),
            "no-such-template",
            &store,
            &ImagePromptMap::new(),
            &assets,
        )
        .unwrap();
        assert_eq!(outcome.preview.template, "default");
    }

    #[test]
    fn unknown_template_without_default_fails() {
        let store = TemplateStore::new();
        let assets = AssetCatalog::new("/nonexistent");
        let err = render(
            &simple_content(),
            "no-such-template",
            &store,
            &ImagePromptMap::new(),
            &assets,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::Error::TemplateNotFound { .. }));
    }

    #[test]
    fn background_fallback_is_reported_not_raised() {
        let mut store = store_with_default();
        let mut template = TemplateConfig::fallback_default();
        template.styles.title_slide.background_image = Some("gone.png".to_string());
        store.insert("broken-bg", template);

        let assets = AssetCatalog::new("/nonexistent");
        let outcome = render(
            &simple_content(),
            "broken-bg",
            &store,
            &ImagePromptMap::new(),
            &assets,
        )
        .unwrap();

        assert_eq!(outcome.diagnostics.len(), 1);
        let message = outcome.diagnostics[0].to_string();
        assert!(message.contains("gone.png"));
        assert!(message.contains("solid fill"));
    }

    #[test]
    fn artifact_write_to_persists_bytes() {
        let store = store_with_default();
        let assets = AssetCatalog::new("/nonexistent");
        let outcome = render(
            &simple_content(),
            "default",
            &store,
            &ImagePromptMap::new(),
            &assets,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        outcome.artifact.write_to(&path).unwrap();
        let written = fs_err::read(&path).unwrap();
        assert_eq!(written, outcome.artifact.bytes());
    }
}
