//! Offline extraction of a [`ScrapedContent`] from a fetched page.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::clean::HtmlCleaner;
use super::schema::extract_recipe_schema;
use crate::types::ScrapedContent;

const UNTITLED: &str = "Untitled Recipe";

/// Content container candidates, in priority order.
const CONTENT_SELECTORS: [&str; 9] = [
    "div.entry-content, article.entry-content",
    "div.post-content, article.post-content",
    "div.article-content, article.article-content",
    "div.content-area, article.content-area",
    "div.single-content, article.single-content",
    "div#content, article#content",
    "div.wprm-recipe, article.wprm-recipe",
    "article",
    "main",
];

/// Image filename fragments that mark decoration rather than content.
const DECORATIVE_IMAGE_MARKERS: [&str; 5] = ["avatar", "icon", "logo", "emoji", "gravatar"];

const MAX_DECORATIVE_DIMENSION: u32 = 100;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

static CONTENT_CANDIDATES: LazyLock<Vec<Selector>> =
    LazyLock::new(|| CONTENT_SELECTORS.iter().copied().map(selector).collect());
static FALLBACK_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| selector("p, h2, h3, h4, ul, ol, table"));
static IMAGE_SCOPE: LazyLock<Selector> = LazyLock::new(|| selector("div.entry-content"));
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| selector("article"));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:image"]"#));
static TWITTER_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="twitter:image"]"#));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static FEATURED_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)featured|hero|post-thumbnail").expect("valid featured image regex")
});

/// Build a [`ScrapedContent`] from page HTML.
///
/// `source_domains` decides which links count as internal.
pub(crate) fn extract_page(
    url: &str,
    html: &str,
    source_domains: &[String],
    cleaner: &HtmlCleaner,
) -> ScrapedContent {
    let document = Html::parse_document(html);

    let content_html = extract_content_html(&document, cleaner);
    let word_count = count_words(&content_html);
    let json_ld_blocks: Vec<String> = document
        .select(&JSON_LD)
        .map(|script| script.text().collect())
        .collect();

    ScrapedContent {
        url: url.to_string(),
        title: extract_title(&document),
        meta_description: extract_meta_description(&document),
        featured_image_url: extract_featured_image(&document),
        image_urls: extract_images(&document),
        internal_links: extract_internal_links(&document, source_domains),
        recipe_schema: extract_recipe_schema(json_ld_blocks.iter().map(String::as_str)),
        content_html,
        word_count,
    }
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn extract_title(document: &Html) -> String {
    if let Some(h1) = document
        .select(&H1)
        .next()
        .map(collapsed_text)
        .filter(|t| !t.is_empty())
    {
        return h1;
    }

    document
        .select(&TITLE)
        .next()
        .map(collapsed_text)
        .and_then(|t| t.split('|').next().map(|s| s.trim().to_string()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Cleaned HTML of the first matching content container, or a `<div>` of
/// every paragraph, heading, list and table on the page.
pub(crate) fn extract_content_html(document: &Html, cleaner: &HtmlCleaner) -> String {
    for candidate in CONTENT_CANDIDATES.iter() {
        if let Some(container) = document.select(candidate).next() {
            return cleaner.clean_container(container);
        }
    }

    tracing::debug!("no content container matched; collecting block elements");
    cleaner.clean_into_wrapper(document.select(&FALLBACK_BLOCKS))
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

pub(crate) fn extract_meta_description(document: &Html) -> String {
    meta_content(document, &META_DESCRIPTION)
        .or_else(|| meta_content(document, &OG_DESCRIPTION))
        .unwrap_or_default()
}

pub(crate) fn extract_featured_image(document: &Html) -> Option<String> {
    if let Some(url) = meta_content(document, &OG_IMAGE) {
        return Some(url);
    }
    if let Some(url) = meta_content(document, &TWITTER_IMAGE) {
        return Some(url);
    }

    let featured = document.select(&IMG).find(|img| {
        img.value()
            .attr("class")
            .is_some_and(|class| FEATURED_CLASS.is_match(class))
    });
    if let Some(src) = featured.and_then(|img| non_empty_attr(img, "src")) {
        return Some(src);
    }

    document
        .select(&IMAGE_SCOPE)
        .next()
        .and_then(|content| content.select(&IMG).next())
        .and_then(|img| non_empty_attr(img, "src"))
}

fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Element images and links are collected from: the entry content, else the
/// article, else the whole page.
fn content_scope(document: &Html) -> ElementRef<'_> {
    document
        .select(&IMAGE_SCOPE)
        .next()
        .or_else(|| document.select(&ARTICLE).next())
        .unwrap_or_else(|| document.root_element())
}

pub(crate) fn extract_images(document: &Html) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for img in content_scope(document).select(&IMG) {
        let Some(src) = ["src", "data-src", "data-lazy-src"]
            .iter()
            .find_map(|attr| non_empty_attr(img, attr))
        else {
            continue;
        };

        let lowered = src.to_lowercase();
        if DECORATIVE_IMAGE_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            continue;
        }
        if is_tiny(img) {
            continue;
        }

        if seen.insert(src.clone()) {
            images.push(src);
        }
    }

    images
}

/// Both dimensions declared, numeric, and no larger than an icon.
fn is_tiny(img: ElementRef<'_>) -> bool {
    let dimension = |name: &str| {
        img.value()
            .attr(name)
            .and_then(|v| v.trim().parse::<u32>().ok())
    };
    match (dimension("width"), dimension("height")) {
        (Some(w), Some(h)) => w <= MAX_DECORATIVE_DIMENSION && h <= MAX_DECORATIVE_DIMENSION,
        _ => false,
    }
}

pub(crate) fn extract_internal_links(document: &Html, source_domains: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    content_scope(document)
        .select(&LINK)
        .filter_map(|a| non_empty_attr(a, "href"))
        .filter(|href| source_domains.iter().any(|d| href.contains(d.as_str())))
        .filter(|href| seen.insert(href.clone()))
        .collect()
}

fn count_words(content_html: &str) -> usize {
    let fragment = Html::parse_fragment(content_html);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .split_whitespace()
        .count()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
