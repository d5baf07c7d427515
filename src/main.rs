//! `DeckForge` - topic-to-slide-deck generator.
//!
//! Usage:
//!   `deckforge <topic> [--slides N] [--template ID] [--no-images] [--out DIR]`
//!   `deckforge --content <content.json> [--template ID] [--out DIR]`
//!
//! Generates slide content for the topic (or re-renders edited content from
//! a JSON file), composes a .pptx deck with the selected template, and
//! writes the deck plus its preview JSON under the downloads directory.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

use deckforge::config::Config;
use deckforge::constants::generation;
use deckforge::content::generator::ContentGenerator;
use deckforge::content::{ImagePromptMap, PresentationContent};
use deckforge::deck::assets::AssetCatalog;
use deckforge::deck::render;
use deckforge::sink;
use deckforge::template::store::TemplateStore;

struct CliArgs {
    topic: Option<String>,
    slides: usize,
    template: String,
    content_file: Option<PathBuf>,
    text_file: Option<PathBuf>,
    no_images: bool,
    out_dir: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <topic> [options]\n\
         \n\
         Options:\n\
         \x20 --slides N         Number of content slides (1-20, default 3)\n\
         \x20 --template ID      Template id (default \"default\")\n\
         \x20 --content FILE     Re-render edited content from a JSON file\n\
         \x20 --text FILE        Structure free-form text from FILE into slides\n\
         \x20 --no-images        Skip image placeholders\n\
         \x20 --out DIR          Output directory (default from config)"
    )
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut parsed = CliArgs {
        topic: None,
        slides: generation::DEFAULT_SLIDE_COUNT,
        template: "default".to_string(),
        content_file: None,
        text_file: None,
        no_images: false,
        out_dir: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--slides" => {
                let value = iter.next().ok_or("--slides requires a value")?;
                parsed.slides = value
                    .parse()
                    .map_err(|_| format!("invalid slide count {value:?}"))?;
            }
            "--template" => {
                parsed.template = iter.next().ok_or("--template requires a value")?.clone();
            }
            "--content" => {
                parsed.content_file =
                    Some(PathBuf::from(iter.next().ok_or("--content requires a value")?));
            }
            "--text" => {
                parsed.text_file =
                    Some(PathBuf::from(iter.next().ok_or("--text requires a value")?));
            }
            "--no-images" => parsed.no_images = true,
            "--out" => {
                parsed.out_dir = Some(PathBuf::from(iter.next().ok_or("--out requires a value")?));
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown option {other}"));
            }
            topic => {
                if parsed.topic.is_some() {
                    return Err("only one topic may be given".to_string());
                }
                parsed.topic = Some(topic.to_string());
            }
        }
    }

    if parsed.topic.is_none() && parsed.content_file.is_none() {
        return Err("a topic or --content file is required".to_string());
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map_or("deckforge", String::as_str);
    let args = match parse_args(&argv[1..]) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage(program));
            std::process::exit(1);
        }
    };

    let config = Config::load()?;

    let mut store = TemplateStore::load(&config.templates_dir);
    store.ensure_default();

    let content = match &args.content_file {
        Some(path) => {
            let raw = fs_err::read_to_string(path)
                .with_context(|| format!("reading content file {}", path.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&raw).context("parsing content file JSON")?;
            PresentationContent::from_json(&value)?
        }
        None => {
            let topic = args.topic.as_deref().unwrap_or_default();
            let custom_text = match &args.text_file {
                Some(path) => Some(
                    fs_err::read_to_string(path)
                        .with_context(|| format!("reading text file {}", path.display()))?,
                ),
                None => None,
            };
            let generator = ContentGenerator::new(&config);
            generator
                .generate(topic, args.slides, custom_text.as_deref())
                .await
        }
    };

    let prompts = if args.no_images {
        ImagePromptMap::new()
    } else {
        let topic = args.topic.as_deref().unwrap_or_else(|| content.display_title());
        ImagePromptMap::for_content(topic, &content)
    };

    let assets = AssetCatalog::new(&config.assets_dir);
    let outcome = render(&content, &args.template, &store, &prompts, &assets)?;

    for diagnostic in &outcome.diagnostics {
        eprintln!("note: {diagnostic}");
    }

    let out_dir = args.out_dir.unwrap_or_else(|| config.downloads_dir.clone());
    let deck_path = sink::persist(&outcome.artifact, &out_dir, content.display_title())?;

    let preview_path = deck_path.with_extension("json");
    fs_err::write(&preview_path, serde_json::to_vec_pretty(&outcome.preview)?)?;

    println!("Deck:    {}", deck_path.display());
    println!("Preview: {}", preview_path.display());
    println!(
        "Slides:  {} (template {:?})",
        outcome.artifact.slide_count(),
        outcome.preview.template
    );
    Ok(())
}
