//! Content transformations between translation and publishing.
//!
//! - [`LinkAdapter`] rewrites internal links to a target locale's domain and
//!   builds hreflang / language-switcher data.
//! - [`blocks`] converts flat HTML into CMS block markup.
//! - [`sections`] splits content at headings and interleaves image
//!   placeholders.

pub mod blocks;
pub mod links;
pub mod sections;

pub use blocks::{create_placeholder_image_block, format_for_wordpress, html_to_blocks};
pub use links::{LanguageLink, LinkAdapter, LinkReport};
pub use sections::{add_image_placeholders, format_with_placeholders, split_into_sections};
