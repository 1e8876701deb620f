//! Request and result types for the WordPress client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PublisherError;

/// WordPress post status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
    Pending,
    Private,
}

impl PostStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Pending => "pending",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = PublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "publish" => Ok(Self::Publish),
            "pending" => Ok(Self::Pending),
            "private" => Ok(Self::Private),
            other => Err(PublisherError::InvalidStatus(other.to_string())),
        }
    }
}

/// Rank Math SEO fields attached to a post as meta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoFields {
    pub focus_keyword: String,
    pub seo_title: String,
    pub seo_description: String,
}

impl SeoFields {
    /// Meta entries for the non-empty fields.
    #[must_use]
    pub fn to_meta(&self) -> Map<String, Value> {
        [
            ("rank_math_focus_keyword", &self.focus_keyword),
            ("rank_math_title", &self.seo_title),
            ("rank_math_description", &self.seo_description),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
        .collect()
    }
}

/// A post to create.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub excerpt: String,
    /// Downloaded and uploaded to the media library, then set as the
    /// featured image.
    pub featured_image_url: Option<String>,
    /// Image URLs in `content` to re-host on the target site.
    pub content_images: Vec<String>,
    pub categories: Vec<u64>,
    pub tags: Vec<u64>,
    pub status: PostStatus,
    pub meta: Map<String, Value>,
    pub seo: SeoFields,
}

impl NewPost {
    /// Caller meta with the SEO fields merged over it.
    #[must_use]
    pub fn merged_meta(&self) -> Map<String, Value> {
        let mut meta = self.meta.clone();
        meta.extend(self.seo.to_meta());
        meta
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub success: bool,
    pub user: Option<String>,
    pub site: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub success: bool,
    pub post_id: Option<u64>,
    pub post_url: Option<String>,
    pub edit_url: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl PublishResult {
    pub(crate) fn failed(error: &PublisherError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaResult {
    pub success: bool,
    pub media_id: Option<u64>,
    pub media_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermResult {
    pub success: bool,
    pub term_id: Option<u64>,
    pub error: Option<String>,
}

/// A category or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

/// The fields of a WordPress post this crate reads back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpPost {
    pub id: u64,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub status: String,
}
