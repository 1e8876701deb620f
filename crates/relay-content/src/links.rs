//! Internal-link rewriting for translated content.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use relay_core::LocaleTable;
use reqwest::Url;
use serde::Serialize;

static ANY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("valid link regex"));

/// One entry of a language switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageLink {
    pub lang: String,
    pub url: String,
}

/// Links found in a body of content, split by whether they point at one of
/// the network's own sites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

impl LinkReport {
    #[must_use]
    pub fn total_links(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    #[must_use]
    pub fn internal_count(&self) -> usize {
        self.internal.len()
    }

    #[must_use]
    pub fn external_count(&self) -> usize {
        self.external.len()
    }
}

/// Rewrites absolute links on the source domains to a target locale's
/// domain, translating slug words through the per-language dictionaries.
#[derive(Debug, Clone)]
pub struct LinkAdapter {
    locales: LocaleTable,
    /// Matches `http(s)://[www.]<source domain>/<path>`, capturing the path.
    /// `None` when no source domains are configured.
    source_link: Option<Regex>,
}

impl LinkAdapter {
    #[must_use]
    pub fn new(locales: &LocaleTable) -> Self {
        let source_link = (!locales.source_domains.is_empty()).then(|| {
            let domains = locales
                .source_domains
                .iter()
                .map(|d| regex::escape(d))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r#"https?://(?:www\.)?(?:{domains})/([^"'\s<>]*)"#))
                .expect("escaped domain pattern is valid")
        });

        Self {
            locales: locales.clone(),
            source_link,
        }
    }

    /// Rewrite every source-domain URL in `content` to
    /// `https://{target_domain}/{translated path}`.
    ///
    /// All source domains are rewritten in a single pass, so a URL already
    /// pointing at the target is never translated twice.
    #[must_use]
    pub fn adapt_links(&self, content: &str, target_domain: &str, lang: &str) -> String {
        let Some(pattern) = &self.source_link else {
            return content.to_string();
        };

        pattern
            .replace_all(content, |caps: &Captures<'_>| {
                format!(
                    "https://{target_domain}/{}",
                    self.translate_slug(&caps[1], lang)
                )
            })
            .into_owned()
    }

    /// Translate each hyphen-separated word of each path segment.
    ///
    /// Lookup is case-insensitive; unknown words, and every word for a
    /// language without a dictionary, are kept as written.
    #[must_use]
    pub fn translate_slug(&self, slug: &str, lang: &str) -> String {
        let Some(dictionary) = self.locales.slug_dictionary(lang) else {
            return slug.to_string();
        };

        slug.split('/')
            .map(|segment| {
                segment
                    .split('-')
                    .map(|word| {
                        dictionary
                            .get(&word.to_lowercase())
                            .map_or(word, String::as_str)
                    })
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Distinct source-domain URLs in `content`, in first-seen order.
    #[must_use]
    pub fn extract_internal_links(&self, content: &str) -> Vec<String> {
        let Some(pattern) = &self.source_link else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        pattern
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    /// `<link rel="alternate">` tags for every language version of a page.
    ///
    /// The source language comes first with the untranslated slug, the other
    /// languages follow in table order, and an `x-default` entry pointing at
    /// the source site closes the list.
    #[must_use]
    pub fn generate_hreflang_tags(&self, base_slug: &str) -> Vec<String> {
        let source = &self.locales.source_language;
        let source_domain = self.locales.source_domain();

        let mut tags = vec![hreflang_tag(
            source,
            &format!("https://{source_domain}/{base_slug}"),
        )];
        for lang in &self.locales.languages {
            if &lang.code == source {
                continue;
            }
            let slug = self.translate_slug(base_slug, &lang.code);
            tags.push(hreflang_tag(
                &lang.code,
                &format!("https://{}/{slug}", lang.domain),
            ));
        }
        tags.push(hreflang_tag(
            "x-default",
            &format!("https://{source_domain}/{base_slug}"),
        ));
        tags
    }

    /// URLs of the same page in every configured language.
    ///
    /// The current language keeps `current_url` as given; the others get the
    /// current path, slug-translated, on their own domain.
    #[must_use]
    pub fn build_language_switcher(&self, current_url: &str, current_lang: &str) -> Vec<LanguageLink> {
        let path = Url::parse(current_url).map_or_else(
            |_| current_url.trim_start_matches('/').to_string(),
            |url| url.path().trim_start_matches('/').to_string(),
        );

        self.locales
            .languages
            .iter()
            .map(|lang| {
                let url = if lang.code == current_lang {
                    current_url.to_string()
                } else {
                    format!(
                        "https://{}/{}",
                        lang.domain,
                        self.translate_slug(&path, &lang.code)
                    )
                };
                LanguageLink {
                    lang: lang.code.clone(),
                    url,
                }
            })
            .collect()
    }

    /// Classify every absolute link in `content` as internal or external.
    #[must_use]
    pub fn validate_links(&self, content: &str) -> LinkReport {
        let mut report = LinkReport::default();
        for link in ANY_LINK.find_iter(content).map(|m| m.as_str()) {
            let internal = self
                .locales
                .internal_domains
                .iter()
                .any(|domain| link.contains(domain.as_str()));
            if internal {
                report.internal.push(link.to_string());
            } else {
                report.external.push(link.to_string());
            }
        }
        report
    }
}

fn hreflang_tag(lang: &str, href: &str) -> String {
    format!(r#"<link rel="alternate" hreflang="{lang}" href="{href}" />"#)
}
