//! Sitemap fetching: index expansion, leaf parsing, and recipe URL filtering.

mod parse;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::types::RecipeRecord;

use parse::{parse_sitemap, SitemapDocument};

/// Path fragments that mark listing and boilerplate pages rather than recipes.
const NON_RECIPE_PATTERNS: [&str; 8] = [
    "/category/",
    "/tag/",
    "/page/",
    "/author/",
    "/about",
    "/contact",
    "/privacy",
    "/sitemap",
];

/// Fetches sitemap documents and collects recipe URL records.
///
/// Never fails outward: individual fetch or parse failures are logged and
/// contribute nothing to the result.
pub struct SitemapClient {
    client: Client,
}

impl SitemapClient {
    /// Creates a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Collects recipe records from a sitemap index or a leaf sitemap.
    ///
    /// For an index, sub-sitemaps are fetched in listed order and fetching
    /// stops once `limit` records have been gathered; the result is then cut
    /// to exactly `limit`. `None` means no limit.
    ///
    /// Returns an empty list when the top-level sitemap cannot be fetched or
    /// parsed.
    pub async fn get_all_recipes(
        &self,
        sitemap_url: &str,
        limit: Option<usize>,
    ) -> Vec<RecipeRecord> {
        let document = match self.fetch_document(sitemap_url).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(url = %sitemap_url, error = %e, "failed to load sitemap");
                return Vec::new();
            }
        };

        let mut records = match document {
            SitemapDocument::UrlSet(records) => records,
            SitemapDocument::Index(sub_sitemaps) => {
                tracing::info!(
                    url = %sitemap_url,
                    count = sub_sitemaps.len(),
                    "found sub-sitemaps"
                );
                self.collect_from_index(&sub_sitemaps, limit).await
            }
        };

        if let Some(limit) = limit {
            records.truncate(limit);
        }
        records
    }

    async fn collect_from_index(
        &self,
        sub_sitemaps: &[String],
        limit: Option<usize>,
    ) -> Vec<RecipeRecord> {
        let mut records = Vec::new();

        for sub_url in sub_sitemaps {
            if limit.is_some_and(|limit| records.len() >= limit) {
                break;
            }

            match self.fetch_document(sub_url).await {
                Ok(SitemapDocument::UrlSet(entries)) => {
                    tracing::info!(url = %sub_url, count = entries.len(), "parsed sub-sitemap");
                    records.extend(entries);
                }
                Ok(SitemapDocument::Index(_)) => {
                    tracing::warn!(url = %sub_url, "nested sitemap index ignored");
                }
                Err(e) => {
                    tracing::warn!(url = %sub_url, error = %e, "skipping sub-sitemap");
                }
            }
        }

        records
    }

    async fn fetch_document(&self, url: &str) -> Result<SitemapDocument, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        parse_sitemap(&body).map_err(|source| ScraperError::Xml {
            url: url.to_owned(),
            source,
        })
    }
}

/// Whether a URL looks like a recipe article rather than a listing,
/// boilerplate page, or the site's home page.
#[must_use]
pub fn is_recipe_url(url: &str) -> bool {
    if NON_RECIPE_PATTERNS.iter().any(|pattern| url.contains(pattern)) {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => !parsed.path().trim_matches('/').is_empty(),
        Err(_) => false,
    }
}

/// Keep only records whose URL passes [`is_recipe_url`], preserving order.
#[must_use]
pub fn filter_recipe_records(records: Vec<RecipeRecord>) -> Vec<RecipeRecord> {
    records
        .into_iter()
        .filter(|record| is_recipe_url(&record.url))
        .collect()
}
