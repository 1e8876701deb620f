use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment, WordPressCredentials};
use crate::ConfigError;

const DEFAULT_SITEMAP_URL: &str = "https://allmuffins.com/sitemap_index.xml";
const DEFAULT_LLM_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "anthropic/claude-sonnet-4";
const DEFAULT_SCRAPER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let env = parse_environment(&or_default("RELAY_ENV", "development"))?;
    let log_level = or_default("RELAY_LOG_LEVEL", "info");

    let sitemap_url = or_default("RELAY_SITEMAP_URL", DEFAULT_SITEMAP_URL);
    let sitemap_timeout_secs: u64 =
        parse_var("RELAY_SITEMAP_TIMEOUT_SECS", &or_default("RELAY_SITEMAP_TIMEOUT_SECS", "10"))?;
    let scraper_timeout_secs: u64 =
        parse_var("RELAY_SCRAPER_TIMEOUT_SECS", &or_default("RELAY_SCRAPER_TIMEOUT_SECS", "15"))?;
    let scraper_user_agent = or_default("RELAY_SCRAPER_USER_AGENT", DEFAULT_SCRAPER_USER_AGENT);

    let llm_api_key = optional("OPENROUTER_API_KEY");
    let llm_endpoint = or_default("RELAY_LLM_ENDPOINT", DEFAULT_LLM_ENDPOINT);
    let llm_model = or_default("RELAY_LLM_MODEL", DEFAULT_LLM_MODEL);
    let llm_max_tokens: u32 =
        parse_var("RELAY_LLM_MAX_TOKENS", &or_default("RELAY_LLM_MAX_TOKENS", "8000"))?;
    let llm_temperature: f32 =
        parse_var("RELAY_LLM_TEMPERATURE", &or_default("RELAY_LLM_TEMPERATURE", "0.2"))?;
    let llm_timeout_secs: u64 =
        parse_var("RELAY_LLM_TIMEOUT_SECS", &or_default("RELAY_LLM_TIMEOUT_SECS", "180"))?;

    let wordpress = parse_wordpress_credentials(
        optional("RELAY_WP_URL"),
        optional("RELAY_WP_USERNAME"),
        optional("RELAY_WP_APP_PASSWORD"),
    )?;
    let wordpress_timeout_secs: u64 =
        parse_var("RELAY_WP_TIMEOUT_SECS", &or_default("RELAY_WP_TIMEOUT_SECS", "120"))?;

    let locales_path = optional("RELAY_LOCALES_PATH").map(PathBuf::from);
    let output_dir = PathBuf::from(or_default("RELAY_OUTPUT_DIR", "."));

    Ok(AppConfig {
        env,
        log_level,
        sitemap_url,
        sitemap_timeout_secs,
        scraper_timeout_secs,
        scraper_user_agent,
        llm_api_key,
        llm_endpoint,
        llm_model,
        llm_max_tokens,
        llm_temperature,
        llm_timeout_secs,
        wordpress,
        wordpress_timeout_secs,
        locales_path,
        output_dir,
    })
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// WordPress credentials are all-or-nothing: none set disables publishing,
/// a partial set is a configuration mistake.
fn parse_wordpress_credentials(
    site_url: Option<String>,
    username: Option<String>,
    app_password: Option<String>,
) -> Result<Option<WordPressCredentials>, ConfigError> {
    match (site_url, username, app_password) {
        (None, None, None) => Ok(None),
        (Some(site_url), Some(username), Some(app_password)) => Ok(Some(WordPressCredentials {
            site_url,
            username,
            app_password,
        })),
        (site_url, username, _) => {
            let missing = if site_url.is_none() {
                "RELAY_WP_URL"
            } else if username.is_none() {
                "RELAY_WP_USERNAME"
            } else {
                "RELAY_WP_APP_PASSWORD"
            };
            Err(ConfigError::MissingEnvVar(missing.to_string()))
        }
    }
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RELAY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
