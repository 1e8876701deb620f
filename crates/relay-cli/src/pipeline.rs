//! Per-recipe pipeline: scrape, translate, adapt links, format, publish.
//!
//! Stages run strictly in sequence. A failed recipe in a batch is logged and
//! the loop moves on to the next one.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use relay_content::{format_for_wordpress, format_with_placeholders, LinkAdapter};
use relay_core::{AppConfig, LocaleTable};
use relay_publisher::{NewPost, PostStatus, PublishResult, SeoFields, WordPressClient};
use relay_scraper::{
    filter_recipe_records, RecipeRecord, RecipeScraper, ScrapedContent, SitemapClient,
};
use relay_translator::{estimate_cost, ResponseField, TranslationResult, TranslatorClient, TranslatorConfig};
use reqwest::Url;
use serde::Serialize;

use crate::output::save_translation;

/// Flags for one `translate` run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TranslateOptions {
    pub(crate) save: bool,
    pub(crate) publish: bool,
    pub(crate) status: PostStatus,
    pub(crate) placeholders: usize,
}

/// One translated, link-adapted and block-formatted version of a recipe.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LanguageOutput {
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) content: String,
    pub(crate) word_count: usize,
    pub(crate) target_url: String,
    pub(crate) focus_keyword: String,
    pub(crate) seo_title: String,
    pub(crate) seo_description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) missing_fields: Vec<ResponseField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) published: Option<PublishResult>,
}

/// A scraped recipe and its translations keyed by language code.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RecipeRun {
    pub(crate) original: ScrapedContent,
    pub(crate) translations: BTreeMap<String, LanguageOutput>,
}

pub(crate) struct Pipeline {
    locales: LocaleTable,
    scraper: RecipeScraper,
    translator: TranslatorClient,
    links: LinkAdapter,
    publisher: Option<WordPressClient>,
    output_dir: PathBuf,
}

impl Pipeline {
    /// Build every stage from config. The WordPress client is only built
    /// when `publish` is set, and then credentials are required.
    pub(crate) fn from_config(
        config: &AppConfig,
        locales: LocaleTable,
        publish: bool,
    ) -> anyhow::Result<Self> {
        let scraper = RecipeScraper::new(
            config.scraper_timeout_secs,
            &config.scraper_user_agent,
            &locales,
        )?;
        let translator_config = TranslatorConfig::from_app_config(config, &locales)
            .context("set OPENROUTER_API_KEY to translate")?;
        let translator = TranslatorClient::new(translator_config, &locales)?;
        let links = LinkAdapter::new(&locales);

        let publisher = if publish {
            let credentials = config.wordpress.as_ref().context(
                "publishing needs RELAY_WP_URL, RELAY_WP_USERNAME and RELAY_WP_APP_PASSWORD",
            )?;
            Some(WordPressClient::new(credentials, config.wordpress_timeout_secs)?)
        } else {
            None
        };

        Ok(Self {
            locales,
            scraper,
            translator,
            links,
            publisher,
            output_dir: config.output_dir.clone(),
        })
    }

    /// Translate one recipe, print a summary, and save it when asked.
    pub(crate) async fn run_translate(
        &self,
        url: &str,
        langs: &[String],
        options: &TranslateOptions,
    ) -> anyhow::Result<()> {
        if let Some(publisher) = &self.publisher {
            let status = publisher.test_connection().await;
            if !status.success {
                anyhow::bail!(
                    "WordPress connection failed: {}",
                    status.error.unwrap_or_default()
                );
            }
            tracing::info!(
                site = %publisher.site_url(),
                user = status.user.as_deref().unwrap_or_default(),
                "connected to WordPress"
            );
        }

        let run = self.translate_recipe(url, langs, options).await?;
        print_summary(&run);

        if options.save {
            let path = save_translation(&self.output_dir, &run)?;
            println!("saved to {}", path.display());
        }
        Ok(())
    }

    /// Translate the first `count` sitemap recipe articles, saving each result.
    pub(crate) async fn run_batch(
        &self,
        config: &AppConfig,
        count: usize,
        langs: &[String],
    ) -> anyhow::Result<()> {
        let sitemap = SitemapClient::new(config.sitemap_timeout_secs, &config.scraper_user_agent)?;
        let listed = sitemap.get_all_recipes(&config.sitemap_url, None).await;
        let recipes = select_batch(listed, count);
        if recipes.is_empty() {
            println!("no recipes found in {}", config.sitemap_url);
            return Ok(());
        }

        let options = TranslateOptions {
            save: true,
            publish: false,
            status: PostStatus::Draft,
            placeholders: 0,
        };
        let total = recipes.len();
        let mut failed = 0usize;

        for (idx, recipe) in recipes.iter().enumerate() {
            println!("recipe {}/{total}: {}", idx + 1, recipe.url);
            match self.translate_recipe(&recipe.url, langs, &options).await {
                Ok(run) => {
                    print_summary(&run);
                    if let Err(e) = save_translation(&self.output_dir, &run) {
                        tracing::error!(url = %recipe.url, error = %e, "failed to save translation");
                        failed += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(url = %recipe.url, error = %e, "recipe failed; continuing");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            tracing::warn!(failed, total, "some recipes failed during batch");
        }
        println!(
            "translated {} of {total} recipes into {} languages",
            total - failed,
            langs.len()
        );
        if failed == total {
            anyhow::bail!("all {total} recipes failed");
        }
        Ok(())
    }

    /// Run every stage for one recipe.
    ///
    /// # Errors
    ///
    /// Fails when the page cannot be scraped or a translation request fails.
    /// Publishing problems are recorded in the output, not returned.
    pub(crate) async fn translate_recipe(
        &self,
        url: &str,
        langs: &[String],
        options: &TranslateOptions,
    ) -> anyhow::Result<RecipeRun> {
        let original = self
            .scraper
            .scrape(url)
            .await
            .with_context(|| format!("failed to scrape {url}"))?;

        let estimate = estimate_cost(
            original.content_html.len(),
            u32::try_from(langs.len()).unwrap_or(u32::MAX),
        );
        tracing::info!(
            url = %url,
            title = %original.title,
            languages = langs.len(),
            estimated_cost_usd = estimate.estimated_cost_usd,
            "translating recipe"
        );

        let mut translations = BTreeMap::new();
        for lang in langs {
            let translated = self
                .translator
                .translate(&original.title, &original.content_html, lang)
                .await
                .with_context(|| format!("translation to {lang} failed"))?;
            let output = self.localize(&original, translated, options).await?;
            translations.insert(lang.clone(), output);
        }

        Ok(RecipeRun {
            original,
            translations,
        })
    }

    /// Adapt, format and optionally publish one translation.
    async fn localize(
        &self,
        original: &ScrapedContent,
        translated: TranslationResult,
        options: &TranslateOptions,
    ) -> anyhow::Result<LanguageOutput> {
        let lang = translated.target_lang.as_str();
        let domain = self
            .locales
            .domain_for(lang)
            .with_context(|| format!("no domain configured for {lang}"))?;

        let adapted = self
            .links
            .adapt_links(&translated.content_html, domain, lang);
        let content = if options.placeholders > 0 {
            format_with_placeholders(&adapted, options.placeholders)
        } else {
            format_for_wordpress(&adapted)
        };

        let published = match &self.publisher {
            Some(publisher) if options.publish => {
                self.publish(publisher, original, &translated, &content, domain, options.status)
                    .await
            }
            _ => None,
        };

        Ok(LanguageOutput {
            target_url: format!("https://{domain}/{}", translated.slug),
            title: translated.title,
            slug: translated.slug,
            content,
            word_count: translated.word_count,
            focus_keyword: translated.focus_keyword,
            seo_title: translated.seo_title,
            seo_description: translated.seo_description,
            missing_fields: translated.missing_fields,
            published,
        })
    }

    /// Create the post unless the site is another locale's or the slug is
    /// already taken. Skips return `None`.
    async fn publish(
        &self,
        publisher: &WordPressClient,
        original: &ScrapedContent,
        translated: &TranslationResult,
        content: &str,
        domain: &str,
        status: PostStatus,
    ) -> Option<PublishResult> {
        let lang = translated.target_lang.as_str();
        if !site_serves_domain(publisher.site_url(), domain) {
            tracing::warn!(
                lang = %lang,
                site = %publisher.site_url(),
                domain = %domain,
                "configured site does not serve this language; not publishing"
            );
            return None;
        }

        if let Some(existing) = publisher.get_post_by_slug(&translated.slug).await {
            tracing::warn!(
                lang = %lang,
                slug = %translated.slug,
                post_id = existing.id,
                "post with this slug already exists; not publishing"
            );
            return None;
        }

        let post = NewPost {
            title: translated.title.clone(),
            content: content.to_string(),
            slug: translated.slug.clone(),
            excerpt: translated.seo_description.clone(),
            featured_image_url: featured_image(original),
            content_images: original.image_urls.clone(),
            status,
            seo: SeoFields {
                focus_keyword: translated.focus_keyword.clone(),
                seo_title: translated.seo_title.clone(),
                seo_description: translated.seo_description.clone(),
            },
            ..NewPost::default()
        };
        Some(publisher.create_post(&post).await)
    }
}

/// Recipe articles from a sitemap listing, capped at `count`. Listings and
/// boilerplate pages are dropped before the cap is applied.
fn select_batch(records: Vec<RecipeRecord>, count: usize) -> Vec<RecipeRecord> {
    let mut recipes = filter_recipe_records(records);
    recipes.truncate(count);
    recipes
}

/// The page's featured image, or its first content image when it has none.
fn featured_image(original: &ScrapedContent) -> Option<String> {
    original
        .featured_image_url
        .clone()
        .or_else(|| original.image_urls.first().cloned())
}

/// The site's host equals `domain`, ignoring a leading `www.`.
fn site_serves_domain(site_url: &str, domain: &str) -> bool {
    Url::parse(site_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host.trim_start_matches("www.") == domain.trim_start_matches("www."))
}

fn print_summary(run: &RecipeRun) {
    println!(
        "{:<6} {:<50} {:>6}  {}",
        "source",
        run.original.title,
        run.original.word_count,
        run.original.url
    );
    for (lang, output) in &run.translations {
        println!(
            "{:<6} {:<50} {:>6}  {}",
            lang,
            output.title,
            output.word_count,
            output.target_url
        );
        if !output.missing_fields.is_empty() {
            let missing: Vec<String> = output.missing_fields.iter().map(ToString::to_string).collect();
            println!("       missing sections: {}", missing.join(", "));
        }
        if let Some(published) = &output.published {
            match (&published.post_url, &published.error) {
                (Some(url), _) if published.success => println!("       published: {url}"),
                (_, Some(error)) => println!("       publish failed: {error}"),
                _ => {}
            }
        }
    }
}
