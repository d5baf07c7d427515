//! Template configuration store.
//!
//! Loads template JSON files from a directory and serves read-only
//! configurations to the render pipeline. Malformed files are skipped with
//! a logged diagnostic so one bad template cannot take down the store.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::template::TemplateConfig;

/// Template id the store falls back to when a requested id is absent.
pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// In-memory store of named template configurations.
///
/// Loaded once at startup and only read afterwards, so it is safe to share
/// across concurrent renders behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<String, TemplateConfig>,
}

impl TemplateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file in `dir` as a template keyed by file stem.
    ///
    /// A missing directory yields an empty store; files that fail to parse
    /// are skipped and logged.
    #[must_use]
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut store = Self::new();

        let entries = match fs_err::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Templates directory not readable: {e}");
                return store;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match Self::load_file(&path) {
                Ok(template) => {
                    tracing::info!("Loaded template: {stem}");
                    store.templates.insert(stem.to_string(), template);
                }
                Err(e) => tracing::warn!("Skipping template {}: {e}", path.display()),
            }
        }

        tracing::info!("Total templates loaded: {}", store.templates.len());
        store
    }

    fn load_file(path: &Path) -> Result<TemplateConfig> {
        let data = fs_err::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::parse(e.to_string(), Some(path.to_path_buf())))
    }

    /// Insert or replace a template under `id`.
    pub fn insert(&mut self, id: impl Into<String>, template: TemplateConfig) {
        self.templates.insert(id.into(), template);
    }

    /// Seed the built-in default template if no `"default"` entry exists.
    pub fn ensure_default(&mut self) {
        self.templates
            .entry(DEFAULT_TEMPLATE_ID.to_string())
            .or_insert_with(TemplateConfig::fallback_default);
    }

    /// Look up a template by exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TemplateConfig> {
        self.templates.get(id)
    }

    /// All templates, keyed by id.
    #[must_use]
    pub const fn get_all(&self) -> &HashMap<String, TemplateConfig> {
        &self.templates
    }

    /// Resolve `id`, falling back to `"default"` when absent.
    ///
    /// Returns the resolved id alongside the configuration so callers can
    /// report which template was actually used.
    pub fn resolve<'a>(&'a self, id: &str) -> Result<(&'a str, &'a TemplateConfig)> {
        if let Some((key, template)) = self.templates.get_key_value(id) {
            return Ok((key.as_str(), template));
        }
        tracing::warn!("Template {id:?} not found, using {DEFAULT_TEMPLATE_ID:?}");
        self.templates
            .get_key_value(DEFAULT_TEMPLATE_ID)
            .map(|(key, template)| (key.as_str(), template))
            .ok_or_else(|| Error::template_not_found(id))
    }

    /// Whether the template under `id` carries all required sections.
    #[must_use]
    pub fn validate(&self, id: &str) -> bool {
        self.get(id).is_some_and(TemplateConfig::is_complete)
    }

    /// Number of loaded templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the store holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::io::Write;

    fn write_template(dir: &Path, name: &str, body: &str) {
        let mut file = fs_err::File::create(dir.join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn load_keys_templates_by_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "default.json", r#"{"name": "Default"}"#);
        write_template(dir.path(), "midnight.json", r#"{"name": "Midnight"}"#);
        write_template(dir.path(), "notes.txt", "not a template");

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("default").unwrap().name, "Default");
        assert_eq!(store.get("midnight").unwrap().name, "Midnight");
    }

    #[test]
    fn malformed_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "good.json", r#"{"name": "Good"}"#);
        write_template(dir.path(), "broken.json", "{ not json");

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 1);
        assert!(store.get("broken").is_none());
    }

    #[test]
    fn missing_directory_yields_empty_store() {
        let store = TemplateStore::load("/nonexistent/templates");
        assert!(store.is_empty());
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let mut store = TemplateStore::new();
        store.ensure_default();

        let (id, template) = store.resolve("no-such-template").unwrap();
        assert_eq!(id, DEFAULT_TEMPLATE_ID);
        assert_eq!(template.name, "Default");
    }

    #[test]
    fn resolve_without_default_is_fatal() {
        let store = TemplateStore::new();
        let err = store.resolve("midnight").unwrap_err();
        assert!(matches!(
            err,
            Error::TemplateNotFound { requested } if requested == "midnight"
        ));
    }

    #[test]
    fn ensure_default_does_not_clobber_loaded_default() {
        let mut store = TemplateStore::new();
        let mut custom = TemplateConfig::fallback_default();
        custom.name = "Custom Default".to_string();
        store.insert(DEFAULT_TEMPLATE_ID, custom);
        store.ensure_default();
        assert_eq!(store.get(DEFAULT_TEMPLATE_ID).unwrap().name, "Custom Default");
    }

    #[test]
    fn validate_requires_complete_sections() {
        let mut store = TemplateStore::new();
        store.ensure_default();
        // The built-in default has empty styles on purpose.
        assert!(!store.validate(DEFAULT_TEMPLATE_ID));
        assert!(!store.validate("missing"));
    }
}
