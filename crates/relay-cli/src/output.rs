//! JSON output of translated recipes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use relay_core::slugify;
use serde::Serialize;

use crate::pipeline::RecipeRun;

const MAX_NAME_CHARS: usize = 30;

#[derive(Serialize)]
struct SavedTranslation<'a> {
    #[serde(flatten)]
    run: &'a RecipeRun,
    saved_at: DateTime<Utc>,
}

/// `translation_{slug}.json`, where the slug of the original title is cut to
/// 30 characters.
pub(crate) fn output_filename(title: &str) -> String {
    let slug = slugify(title);
    let short: String = slug.chars().take(MAX_NAME_CHARS).collect();
    let short = short.trim_end_matches('-');
    if short.is_empty() {
        "translation_untitled.json".to_string()
    } else {
        format!("translation_{short}.json")
    }
}

/// Write `run` as pretty JSON into `dir`, creating the directory if needed.
pub(crate) fn save_translation(dir: &Path, run: &RecipeRun) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let path = dir.join(output_filename(&run.original.title));
    let saved = SavedTranslation {
        run,
        saved_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&saved)?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), languages = run.translations.len(), "translation saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use relay_scraper::ScrapedContent;

    use super::*;
    use crate::pipeline::LanguageOutput;

    fn run(title: &str) -> RecipeRun {
        let mut translations = BTreeMap::new();
        translations.insert(
            "fr".to_string(),
            LanguageOutput {
                title: "Muffins au chocolat".to_string(),
                slug: "muffins-au-chocolat".to_string(),
                content: "<!-- wp:paragraph -->\n<p>Bonjour</p>\n<!-- /wp:paragraph -->".to_string(),
                word_count: 1,
                target_url: "https://jelorec.com/muffins-au-chocolat".to_string(),
                focus_keyword: "muffins chocolat".to_string(),
                seo_title: "Muffins au chocolat".to_string(),
                seo_description: String::new(),
                missing_fields: Vec::new(),
                published: None,
            },
        );
        RecipeRun {
            original: ScrapedContent {
                url: "https://allmuffins.com/chocolate-muffins/".to_string(),
                title: title.to_string(),
                content_html: "<div><p>Hello</p></div>".to_string(),
                meta_description: String::new(),
                featured_image_url: None,
                image_urls: Vec::new(),
                internal_links: Vec::new(),
                recipe_schema: None,
                word_count: 1,
            },
            translations,
        }
    }

    #[test]
    fn filename_uses_truncated_title_slug() {
        assert_eq!(
            output_filename("Chocolate Muffins"),
            "translation_chocolate-muffins.json"
        );
        assert_eq!(
            output_filename("The Very Best Double Chocolate Chip Muffins Ever"),
            "translation_the-very-best-double-chocolate.json"
        );
        assert_eq!(output_filename("!!!"), "translation_untitled.json");
    }

    #[test]
    fn save_writes_original_translations_and_timestamp() {
        let dir = std::env::temp_dir().join(format!("relay-cli-output-{}", std::process::id()));
        let path = save_translation(&dir, &run("Chocolate Muffins")).expect("save");
        assert_eq!(path, dir.join("translation_chocolate-muffins.json"));

        let raw = std::fs::read_to_string(&path).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["original"]["title"], "Chocolate Muffins");
        assert_eq!(value["translations"]["fr"]["slug"], "muffins-au-chocolat");
        assert!(value["translations"]["fr"].get("published").is_none());
        assert!(value["saved_at"].as_str().is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
