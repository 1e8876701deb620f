//! Sitemap discovery and recipe page scraping.
//!
//! [`SitemapClient`] turns a sitemap (index or leaf) into ordered
//! [`RecipeRecord`]s; [`RecipeScraper`] fetches one article and extracts a
//! cleaned [`ScrapedContent`].

pub mod error;
pub mod page;
pub mod sitemap;
pub mod types;

pub use error::ScraperError;
pub use page::{HtmlCleaner, RecipeScraper};
pub use sitemap::{filter_recipe_records, is_recipe_url, SitemapClient};
pub use types::{RecipeRecord, RecipeSchema, ScrapedContent};
