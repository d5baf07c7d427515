//! Presentation content model.
//!
//! Structured slide content as supplied by the content generator or by a
//! user editing a previously generated deck, plus the typed slide keys used
//! to attach image prompts to individual slides.

pub mod generator;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::generation;
use crate::error::{Error, Result};

/// Content for one content slide: a title plus bullet points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContent {
    /// Slide heading.
    pub title: String,
    /// Bullet points; may be empty, in which case no body textbox is built.
    pub points: Vec<String>,
}

/// Full content of a presentation: deck title plus ordered content slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationContent {
    /// Deck title, shown on the title slide.
    pub title: String,
    /// Ordered content slides; may be empty (title slide only).
    pub slides: Vec<SlideContent>,
}

impl PresentationContent {
    /// Deserialize caller-supplied content, mapping structural problems
    /// (missing `title`, `slides`, or per-slide `title`/`points`) to a
    /// [`Error::ContentShape`] before any building begins.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| Error::content_shape(e.to_string()))
    }

    /// Deck title with the documented fallback applied.
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            generation::FALLBACK_TITLE
        } else {
            &self.title
        }
    }
}

/// Key addressing one slide in an [`ImagePromptMap`]: the title slide or a
/// zero-based content slide index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlideKey {
    /// The title slide, serialized as `"title"`.
    Title,
    /// A content slide, serialized as its zero-based index string.
    Content(usize),
}

impl fmt::Display for SlideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Content(index) => write!(f, "{index}"),
        }
    }
}

impl FromStr for SlideKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "title" {
            return Ok(Self::Title);
        }
        s.parse::<usize>()
            .map(Self::Content)
            .map_err(|_| Error::content_shape(format!("invalid slide key {s:?}")))
    }
}

impl Serialize for SlideKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlideKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| {
            D::Error::invalid_value(
                serde::de::Unexpected::Str(&raw),
                &"\"title\" or a zero-based slide index",
            )
        })
    }
}

/// Mapping from slide key to the textual image prompt stored for that
/// slide. Slides without an entry get no image placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePromptMap(BTreeMap<SlideKey, String>);

impl ImagePromptMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive prompts for every slide of `content`: one for the title slide
    /// from the topic, one per content slide from the topic and slide title.
    #[must_use]
    pub fn for_content(topic: &str, content: &PresentationContent) -> Self {
        let mut map = Self::new();
        map.insert(SlideKey::Title, image_prompt_for(topic));
        for (index, slide) in content.slides.iter().enumerate() {
            let subject = format!("{topic} - {}", slide.title);
            map.insert(SlideKey::Content(index), image_prompt_for(&subject));
        }
        map
    }

    /// Store a prompt for `key`.
    pub fn insert(&mut self, key: SlideKey, prompt: impl Into<String>) {
        self.0.insert(key, prompt.into());
    }

    /// Prompt stored for `key`, if any.
    #[must_use]
    pub fn get(&self, key: SlideKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// Whether a prompt is stored for `key`.
    #[must_use]
    pub fn contains(&self, key: SlideKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Number of stored prompts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no prompts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The prompt text stored in place of a generated image.
#[must_use]
pub fn image_prompt_for(subject: &str) -> String {
    format!("Professional presentation image related to: {subject}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn sample_content() -> PresentationContent {
        PresentationContent {
            title: "Mars".to_string(),
            slides: vec![SlideContent {
                title: "Atmosphere".to_string(),
                points: vec!["Thin CO2 atmosphere".to_string()],
            }],
        }
    }

    #[test]
    fn from_json_accepts_well_formed_content() {
        let value = serde_json::json!({
            "title": "Mars",
            "slides": [{"title": "Atmosphere", "points": ["Thin CO2 atmosphere"]}]
        });
        let content = PresentationContent::from_json(&value).unwrap();
        assert_eq!(content, sample_content());
    }

    #[test]
    fn from_json_rejects_missing_slides() {
        let value = serde_json::json!({"title": "Mars"});
        let err = PresentationContent::from_json(&value).unwrap_err();
        assert!(matches!(err, Error::ContentShape(_)));
    }

    #[test]
    fn from_json_rejects_slide_without_points() {
        let value = serde_json::json!({
            "title": "Mars",
            "slides": [{"title": "Atmosphere"}]
        });
        assert!(PresentationContent::from_json(&value).is_err());
    }

    #[test]
    fn display_title_falls_back_when_blank() {
        let mut content = sample_content();
        content.title = "   ".to_string();
        assert_eq!(content.display_title(), "Presentation");
    }

    #[test]
    fn slide_keys_round_trip_as_strings() {
        assert_eq!(SlideKey::Title.to_string(), "title");
        assert_eq!(SlideKey::Content(3).to_string(), "3");
        assert_eq!("title".parse::<SlideKey>().unwrap(), SlideKey::Title);
        assert_eq!("0".parse::<SlideKey>().unwrap(), SlideKey::Content(0));
        assert!("second".parse::<SlideKey>().is_err());
    }

    #[test]
    fn prompt_map_serializes_with_string_keys() {
        let mut map = ImagePromptMap::new();
        map.insert(SlideKey::Title, "mars image");
        map.insert(SlideKey::Content(0), "atmosphere image");

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["title"], "mars image");
        assert_eq!(json["0"], "atmosphere image");

        let back: ImagePromptMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn prompts_derived_for_every_slide() {
        let content = sample_content();
        let map = ImagePromptMap::for_content("Mars", &content);

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get(SlideKey::Title).unwrap(),
            "Professional presentation image related to: Mars"
        );
        assert!(map.get(SlideKey::Content(0)).unwrap().contains("Mars - Atmosphere"));
    }
}
