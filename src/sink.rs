//! Artifact persistence.
//!
//! Writes finished decks under a downloads directory with unique,
//! download-friendly filenames. Persistence is deliberately outside the
//! render pipeline: the pipeline returns an in-memory artifact and this
//! module is the one place that touches the download area.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::deck::DeckArtifact;
use crate::error::Result;

/// Persist `artifact` under `dir`, deriving the filename from `title`.
///
/// The directory is created on demand. Returns the path of the written
/// file, named `{slug}_{8-hex}.pptx`.
pub fn persist(artifact: &DeckArtifact, dir: impl AsRef<Path>, title: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs_err::create_dir_all(dir)?;

    let path = dir.join(deck_filename(title));
    artifact.write_to(&path)?;
    tracing::info!("Wrote {} slides to {}", artifact.slide_count(), path.display());
    Ok(path)
}

/// Unique download filename for a deck titled `title`.
#[must_use]
pub fn deck_filename(title: &str) -> String {
    let unique = Uuid::new_v4().simple().to_string();
    format!("{}_{}.pptx", slugify(title), &unique[..8])
}

/// Reduce a deck title to a filesystem-safe slug: whitespace becomes
/// underscores, path-hostile characters are dropped.
fn slugify(title: &str) -> String {
    let slug: String = title
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if slug.is_empty() {
        "presentation".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn slugs_replace_whitespace_and_drop_separators() {
        assert_eq!(slugify("The Red Planet"), "The_Red_Planet");
        assert_eq!(slugify("a/b\\c"), "abc");
        assert_eq!(slugify("  "), "presentation");
    }

    #[test]
    fn filenames_are_unique_per_call() {
        let first = deck_filename("Mars");
        let second = deck_filename("Mars");
        assert!(first.starts_with("Mars_"));
        assert!(first.ends_with(".pptx"));
        assert_ne!(first, second);
    }

    #[test]
    fn persist_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloads = dir.path().join("downloads");

        let store = {
            let mut store = crate::template::store::TemplateStore::new();
            store.ensure_default();
            store
        };
        let content = crate::content::PresentationContent {
            title: "Mars".to_string(),
            slides: vec![],
        };
        let assets = crate::deck::assets::AssetCatalog::new("/nonexistent");
        let outcome = crate::deck::render(
            &content,
            "default",
            &store,
            &crate::content::ImagePromptMap::new(),
            &assets,
        )
        .unwrap();

        let path = persist(&outcome.artifact, &downloads, "Mars").unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("Mars_"));
    }
}
