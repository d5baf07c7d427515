//! Filesystem access for template image assets.
//!
//! Background images referenced by templates are resolved against a static
//! asset root, read into memory, and sniffed against a fixed whitelist of
//! raster formats. Every failure mode is a typed [`AssetIssue`] the layout
//! resolver turns into a solid-color fallback, never an error.

use std::path::{Component, Path, PathBuf};

use image::ImageFormat;

/// Raster formats accepted for background images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG.
    Jpeg,
    /// Graphics Interchange Format.
    Gif,
    /// Windows bitmap.
    Bmp,
}

impl RasterFormat {
    /// Canonical file extension used for embedded media parts.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// MIME type declared in the package content types.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Why an asset could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetIssue {
    /// Path escapes the asset root or is absolute.
    OutsideRoot,
    /// File does not exist or could not be read.
    Unreadable(String),
    /// File contents are not one of the whitelisted raster formats.
    UnsupportedFormat,
}

impl std::fmt::Display for AssetIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutsideRoot => f.write_str("path escapes the asset root"),
            Self::Unreadable(reason) => write!(f, "unreadable: {reason}"),
            Self::UnsupportedFormat => f.write_str("not a supported raster format"),
        }
    }
}

/// A validated raster asset, ready to embed in a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterAsset {
    /// Path the asset was loaded from.
    pub path: PathBuf,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Sniffed format.
    pub format: RasterFormat,
}

/// Read-only view over the static asset root.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    root: PathBuf,
}

impl AssetCatalog {
    /// Create a catalog rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the catalog.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a template-relative path to a validated raster asset.
    pub fn resolve_raster(&self, relative: &str) -> Result<RasterAsset, AssetIssue> {
        let relative = Path::new(relative);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(AssetIssue::OutsideRoot);
        }

        let path = self.root.join(relative);
        let bytes = fs_err::read(&path).map_err(|e| AssetIssue::Unreadable(e.to_string()))?;

        let format = match image::guess_format(&bytes) {
            Ok(ImageFormat::Png) => RasterFormat::Png,
            Ok(ImageFormat::Jpeg) => RasterFormat::Jpeg,
            Ok(ImageFormat::Gif) => RasterFormat::Gif,
            Ok(ImageFormat::Bmp) => RasterFormat::Bmp,
            _ => return Err(AssetIssue::UnsupportedFormat),
        };

        Ok(RasterAsset { path, bytes, format })
    }
}
