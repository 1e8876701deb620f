//! Parsed translation output.

use serde::{Deserialize, Serialize};

/// One labelled section of the model's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseField {
    Title,
    Slug,
    FocusKeyword,
    SeoTitle,
    SeoDescription,
    Content,
}

impl ResponseField {
    /// Header line that introduces this section in the reply.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Title => "TRANSLATED_TITLE:",
            Self::Slug => "TRANSLATED_SLUG:",
            Self::FocusKeyword => "FOCUS_KEYWORD:",
            Self::SeoTitle => "SEO_TITLE:",
            Self::SeoDescription => "SEO_DESCRIPTION:",
            Self::Content => "TRANSLATED_CONTENT:",
        }
    }
}

impl std::fmt::Display for ResponseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header().trim_end_matches(':'))
    }
}

/// A translated recipe, ready for link adaptation and publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub title: String,
    /// Always a clean URL segment, regenerated locally.
    pub slug: String,
    pub content_html: String,
    pub word_count: usize,
    pub target_lang: String,
    pub focus_keyword: String,
    pub seo_title: String,
    pub seo_description: String,
    /// Sections absent from the reply; their values are defaults.
    #[serde(default)]
    pub missing_fields: Vec<ResponseField>,
}

impl TranslationResult {
    /// Every section was present in the reply.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}
