use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Basic-auth credentials for one WordPress site.
///
/// `app_password` is a WordPress application password, not the account
/// password.
#[derive(Clone)]
pub struct WordPressCredentials {
    pub site_url: String,
    pub username: String,
    pub app_password: String,
}

impl std::fmt::Debug for WordPressCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressCredentials")
            .field("site_url", &self.site_url)
            .field("username", &self.username)
            .field("app_password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub sitemap_url: String,
    pub sitemap_timeout_secs: u64,
    pub scraper_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub llm_api_key: Option<String>,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub llm_temperature: f32,
    pub llm_timeout_secs: u64,
    pub wordpress: Option<WordPressCredentials>,
    pub wordpress_timeout_secs: u64,
    pub locales_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("sitemap_url", &self.sitemap_url)
            .field("sitemap_timeout_secs", &self.sitemap_timeout_secs)
            .field("scraper_timeout_secs", &self.scraper_timeout_secs)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_endpoint", &self.llm_endpoint)
            .field("llm_model", &self.llm_model)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("wordpress", &self.wordpress)
            .field("wordpress_timeout_secs", &self.wordpress_timeout_secs)
            .field("locales_path", &self.locales_path)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
