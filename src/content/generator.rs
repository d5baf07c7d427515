//! Slide content generation via a local Ollama endpoint.
//!
//! The generator is the deck pipeline's content supplier: it asks a local
//! text-generation model for structured slide JSON and never lets a
//! generation failure reach the caller. Network errors, malformed JSON, and
//! structurally invalid responses all degrade to a deterministic
//! topic-derived fallback deck.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::constants::generation;
use crate::content::{PresentationContent, SlideContent};
use crate::error::{Error, Result};

/// Request timeout for the generation endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Relevant part of an Ollama `/api/generate` response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the local text-generation endpoint.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    endpoint: String,
    model: String,
    client: Client,
}

impl ContentGenerator {
    /// Create a generator from config.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.ollama_endpoint.clone(),
            model: config.ollama_model.clone(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Generate slide content for `topic`.
    ///
    /// `slide_count` is clamped to the accepted range. When `custom_text`
    /// is given, the model is asked to structure that text instead of
    /// writing new material. This call never fails: any error from the
    /// endpoint is logged and replaced by [`fallback_content`].
    pub async fn generate(
        &self,
        topic: &str,
        slide_count: usize,
        custom_text: Option<&str>,
    ) -> PresentationContent {
        let slide_count =
            slide_count.clamp(generation::MIN_SLIDE_COUNT, generation::MAX_SLIDE_COUNT);

        match self.request_content(topic, slide_count, custom_text).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Content generation failed, using fallback: {e}");
                fallback_content(topic)
            }
        }
    }

    /// One attempt against the endpoint, with parsing safeguards.
    async fn request_content(
        &self,
        topic: &str,
        slide_count: usize,
        custom_text: Option<&str>,
    ) -> Result<PresentationContent> {
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(topic, slide_count, custom_text),
            "stream": false,
            "format": "json",
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {} failed: {e}", self.endpoint)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "Generation endpoint returned {status}"
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| Error::parse(format!("Invalid JSON from endpoint: {e}"), None))?;

        let cleaned = strip_code_fences(&body.response);
        let value: serde_json::Value = serde_json::from_str(cleaned)
            .map_err(|e| Error::parse(format!("Model returned unparseable JSON: {e}"), None))?;

        PresentationContent::from_json(&value)
    }
}

/// Prompt sent to the model for structured slide JSON.
fn build_prompt(topic: &str, slide_count: usize, custom_text: Option<&str>) -> String {
    let task = custom_text.map_or_else(
        || format!("Generate a detailed JSON for a presentation about '{topic}' with {slide_count} slides."),
        |text| {
            format!(
                "Structure the following text into a JSON presentation about '{topic}' \
                 with {slide_count} slides:\n{text}\n"
            )
        },
    );

    format!(
        "{task}\n\
         Each slide should have the following:\n\
         - A detailed title\n\
         - At least 5 concise and informative bullet points per slide (if applicable)\n\
         - Provide some additional explanations or insights for each bullet point\n\
         - Ensure the content is rich, professional, and informative\n\
         \n\
         Format EXACTLY as this JSON structure:\n\
         {{\n\
             \"title\": \"Overall Presentation Title\",\n\
             \"slides\": [\n\
                 {{\n\
                     \"title\": \"Slide 1 Title\",\n\
                     \"points\": [\n\
                         \"Point 1: Detailed explanation or context\",\n\
                         \"Point 2: Detailed explanation or context\"\n\
                     ]\n\
                 }}\n\
             ]\n\
         }}\n\
         \n\
         Requirements:\n\
         - Use clear, professional language\n\
         - Ensure each slide has a meaningful title\n\
         - Create at least 5 detailed, informative bullet points per slide\n\
         - Provide explanations, context, or examples where relevant\n\
         - Avoid any markdown, code blocks, or extra formatting\n"
    )
}

/// Remove a surrounding markdown code fence, if the model added one.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(fence) {
            if let Some(inner) = rest.split("```").next() {
                return inner.trim();
            }
        }
    }
    trimmed
}

/// Deterministic three-slide deck derived from the topic, used whenever
/// generation fails.
#[must_use]
pub fn fallback_content(topic: &str) -> PresentationContent {
    PresentationContent {
        title: topic.to_string(),
        slides: vec![
            SlideContent {
                title: format!("Introduction to {topic}"),
                points: vec![
                    "Overview of the topic with more context and background".to_string(),
                    "Key points to discuss with additional details".to_string(),
                    "Importance and relevance with examples or data".to_string(),
                ],
            },
            SlideContent {
                title: "Main Concepts".to_string(),
                points: vec![
                    "First main concept with detailed examples".to_string(),
                    "Second main concept with further elaboration".to_string(),
                    "Third main concept with supporting data or case studies".to_string(),
                ],
            },
            SlideContent {
                title: "Conclusion".to_string(),
                points: vec![
                    "Summary of key takeaways with insights".to_string(),
                    "Future implications with potential applications".to_string(),
                    "Call to action with a proposed next step or idea".to_string(),
                ],
            },
        ],
    }
}
