//! Shared configuration, locale tables, and slug helpers for the recipe relay.

pub mod app_config;
pub mod config;
pub mod error;
pub mod locales;
pub mod slug;

pub use app_config::{AppConfig, Environment, WordPressCredentials};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use locales::{default_locales, load_locales, Language, LocaleTable};
pub use slug::slugify;
