//! Recipe page scraping.

mod clean;
mod extract;
mod schema;

use std::time::Duration;

use relay_core::LocaleTable;
use reqwest::Client;

use crate::error::ScraperError;
use crate::types::ScrapedContent;

pub use clean::HtmlCleaner;

/// Fetches one recipe article and extracts its cleaned content.
pub struct RecipeScraper {
    client: Client,
    cleaner: HtmlCleaner,
    /// Hosts whose links count as internal.
    source_domains: Vec<String>,
}

impl RecipeScraper {
    /// Creates a scraper with the given timeout and browser-like `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        locales: &LocaleTable,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            cleaner: HtmlCleaner::new(),
            source_domains: locales.source_domains.clone(),
        })
    }

    /// Fetch and extract one article.
    ///
    /// Returns `None` when the page cannot be fetched; the failure is logged.
    pub async fn scrape(&self, url: &str) -> Option<ScrapedContent> {
        match self.fetch_html(url).await {
            Ok(html) => {
                let content = self.extract(url, &html);
                tracing::info!(
                    url = %url,
                    title = %content.title,
                    words = content.word_count,
                    images = content.image_urls.len(),
                    "scraped recipe page"
                );
                Some(content)
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "failed to scrape recipe page");
                None
            }
        }
    }

    /// Extract content from HTML that has already been fetched.
    #[must_use]
    pub fn extract(&self, url: &str, html: &str) -> ScrapedContent {
        extract::extract_page(url, html, &self.source_domains, &self.cleaner)
    }

    async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}
