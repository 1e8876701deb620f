//! Immutable locale tables: target languages, their domains, and the word
//! dictionaries used to translate URL slugs.
//!
//! The default table ships with the binary (`config/locales.yaml`) and is
//! parsed once per process. A different table can be loaded from disk with
//! [`load_locales`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_LOCALES_YAML: &str = include_str!("../../../config/locales.yaml");

/// One publishable language and the site that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Short language code (`fr`, `es`, ...).
    pub code: String,
    /// English display name used in prompts (`French`).
    pub name: String,
    /// Full locale identifier (`fr_FR`).
    pub locale: String,
    /// Bare domain of the site publishing this language (`jelorec.com`).
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleTable {
    /// Language the scraped articles are written in.
    pub source_language: String,
    /// Ordered language table. Order is preserved in hreflang output.
    pub languages: Vec<Language>,
    /// Domains whose absolute links are rewritten during link adaptation.
    pub source_domains: Vec<String>,
    /// Domains treated as internal when classifying links.
    pub internal_domains: Vec<String>,
    /// Per-language lowercase word → translated word.
    #[serde(default)]
    pub slug_dictionaries: BTreeMap<String, HashMap<String, String>>,
}

impl LocaleTable {
    /// Parse and validate a locale table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LocaleFileParse`] for malformed YAML and
    /// [`ConfigError::Validation`] for inconsistent tables.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let table: LocaleTable = serde_yaml::from_str(yaml)?;
        validate_locales(&table)?;
        Ok(table)
    }

    #[must_use]
    pub fn language(&self, code: &str) -> Option<&Language> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    #[must_use]
    pub fn is_supported(&self, code: &str) -> bool {
        self.language(code).is_some()
    }

    #[must_use]
    pub fn domain_for(&self, code: &str) -> Option<&str> {
        self.language(code).map(|lang| lang.domain.as_str())
    }

    /// Domain of the source-language site.
    #[must_use]
    pub fn source_domain(&self) -> &str {
        self.domain_for(&self.source_language).unwrap_or_default()
    }

    #[must_use]
    pub fn slug_dictionary(&self, code: &str) -> Option<&HashMap<String, String>> {
        self.slug_dictionaries.get(code)
    }

    #[must_use]
    pub fn language_codes(&self) -> Vec<&str> {
        self.languages.iter().map(|lang| lang.code.as_str()).collect()
    }
}

/// The built-in locale table, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded `config/locales.yaml` is invalid; the embedded table
/// is covered by the crate's tests.
#[must_use]
pub fn default_locales() -> &'static LocaleTable {
    static TABLE: OnceLock<LocaleTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        LocaleTable::from_yaml(DEFAULT_LOCALES_YAML).expect("embedded locales.yaml is valid")
    })
}

/// Load and validate a locale table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_locales(path: &Path) -> Result<LocaleTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocaleFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    LocaleTable::from_yaml(&content)
}

fn validate_locales(table: &LocaleTable) -> Result<(), ConfigError> {
    if table.languages.is_empty() {
        return Err(ConfigError::Validation(
            "at least one language must be configured".to_string(),
        ));
    }

    let mut seen_codes = HashSet::new();
    for lang in &table.languages {
        if lang.code.trim().is_empty() {
            return Err(ConfigError::Validation(
                "language code must be non-empty".to_string(),
            ));
        }
        if lang.domain.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "language '{}' has an empty domain",
                lang.code
            )));
        }
        if !seen_codes.insert(lang.code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate language code: '{}'",
                lang.code
            )));
        }
    }

    if !seen_codes.contains(table.source_language.as_str()) {
        return Err(ConfigError::Validation(format!(
            "source language '{}' is not in the language table",
            table.source_language
        )));
    }

    if let Some(domain) = table
        .source_domains
        .iter()
        .chain(&table.internal_domains)
        .find(|d| d.trim().is_empty() || d.contains('/'))
    {
        return Err(ConfigError::Validation(format!(
            "invalid domain entry '{domain}': expected a bare host name"
        )));
    }

    for code in table.slug_dictionaries.keys() {
        if !seen_codes.contains(code.as_str()) {
            return Err(ConfigError::Validation(format!(
                "slug dictionary for unknown language '{code}'"
            )));
        }
    }

    Ok(())
}
