//! Records produced by the sitemap and page scrapers.

use serde::{Deserialize, Serialize};

/// One `<url>` entry from a leaf sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub url: String,
    /// Raw `<lastmod>` text, passed through unparsed.
    pub last_modified: Option<String>,
}

/// Everything extracted from a single recipe page fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedContent {
    pub url: String,
    pub title: String,
    /// Cleaned HTML of the main content container.
    pub content_html: String,
    pub meta_description: String,
    pub featured_image_url: Option<String>,
    /// Content images, de-duplicated in document order.
    pub image_urls: Vec<String>,
    /// Links into one of the known source domains, de-duplicated.
    pub internal_links: Vec<String>,
    pub recipe_schema: Option<RecipeSchema>,
    /// Whitespace-delimited words in the cleaned content text.
    pub word_count: usize,
}

/// Subset of a schema.org `Recipe` node embedded as JSON-LD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeSchema {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub recipe_yield: Option<String>,
    pub ingredients: Vec<String>,
    /// Step texts, flattened out of `HowToStep` / `HowToSection` nodes.
    pub instructions: Vec<String>,
}
