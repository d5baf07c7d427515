//! Application error types.
//!
//! Provides unified error handling with actionable context for debugging.
//! Recoverable per-slide issues (missing background image, oversized title)
//! are not errors; they surface as [`crate::deck::Diagnostic`] values on a
//! successful render.

use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<std::path::PathBuf>,
    },

    /// Network error (connection, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },

    /// File or payload parsing error
    #[error("Parse error in {file:?}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<std::path::PathBuf>,
        /// Description of the parse failure.
        message: String,
    },

    /// Requested template is absent and no "default" fallback exists
    #[error("Template {requested:?} not found and no \"default\" template is available")]
    TemplateNotFound {
        /// The template id the caller asked for.
        requested: String,
    },

    /// Supplied presentation content is structurally invalid
    #[error("Invalid presentation content: {0}")]
    ContentShape(String),

    /// Unexpected failure while constructing the binary deck
    #[error("Deck build failed: {0}")]
    DeckBuild(#[from] crate::deck::pptx::BuildError),

    /// Generic message error (escape hatch)
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an IO error with path context
    #[allow(dead_code)]
    pub fn io(source: std::io::Error, path: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file context
    pub fn parse(message: impl Into<String>, file: impl Into<Option<std::path::PathBuf>>) -> Self {
        Self::Parse { file: file.into(), message: message.into() }
    }

    /// Create a content shape error
    pub fn content_shape(message: impl Into<String>) -> Self {
        Self::ContentShape(message.into())
    }

    /// Create a template lookup error
    pub fn template_not_found(requested: impl Into<String>) -> Self {
        Self::TemplateNotFound { requested: requested.into() }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Msg(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Msg(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn template_not_found_names_the_request() {
        let err = Error::template_not_found("midnight");
        assert!(err.to_string().contains("midnight"));
        assert!(err.to_string().contains("default"));
    }

    #[test]
    fn content_shape_carries_reason() {
        let err = Error::content_shape("missing field `slides`");
        match err {
            Error::ContentShape(msg) => assert!(msg.contains("slides")),
            _ => panic!("Expected ContentShape error"),
        }
    }
}
