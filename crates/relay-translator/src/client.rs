//! HTTP client for the chat-completion translation endpoint.

use std::time::Duration;

use relay_core::{AppConfig, Language, LocaleTable};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::TranslatorError;
use crate::parse::parse_translation_response;
use crate::prompt::build_translation_prompt;
use crate::types::TranslationResult;

const APP_TITLE: &str = "RecipeRelay Translator";

/// Longest slice of an error body kept in [`TranslatorError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Connection settings for the translation endpoint.
#[derive(Clone)]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Sent as `HTTP-Referer`.
    pub referer: String,
    /// Sent as `X-Title`.
    pub app_title: String,
}

impl std::fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}

impl TranslatorConfig {
    /// Derive translator settings from application config.
    ///
    /// The referer is the source-language site.
    ///
    /// # Errors
    ///
    /// Returns [`TranslatorError::MissingApiKey`] when no API key is configured.
    pub fn from_app_config(
        config: &AppConfig,
        locales: &LocaleTable,
    ) -> Result<Self, TranslatorError> {
        let api_key = config
            .llm_api_key
            .clone()
            .ok_or(TranslatorError::MissingApiKey)?;
        Ok(Self {
            endpoint: config.llm_endpoint.clone(),
            api_key,
            model: config.llm_model.clone(),
            max_tokens: config.llm_max_tokens,
            temperature: config.llm_temperature,
            timeout_secs: config.llm_timeout_secs,
            referer: format!("https://{}", locales.source_domain()),
            app_title: APP_TITLE.to_string(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Translates recipes through a chat-completion endpoint.
///
/// One request per call, no retries. Transport and status failures are
/// logged and returned to the caller.
pub struct TranslatorClient {
    client: Client,
    config: TranslatorConfig,
    source_language: String,
    languages: Vec<Language>,
}

impl TranslatorClient {
    /// # Errors
    ///
    /// Returns [`TranslatorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: TranslatorConfig, locales: &LocaleTable) -> Result<Self, TranslatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let source_language = locales
            .language(&locales.source_language)
            .map_or_else(|| locales.source_language.clone(), |l| l.name.clone());
        Ok(Self {
            client,
            config,
            source_language,
            languages: locales.languages.clone(),
        })
    }

    /// Translate a recipe's title and HTML content into `target_lang`.
    ///
    /// # Errors
    ///
    /// - [`TranslatorError::UnsupportedLanguage`] if `target_lang` is not in
    ///   the locale table (no request is made).
    /// - [`TranslatorError::Http`] on transport failure.
    /// - [`TranslatorError::UnexpectedStatus`] on a non-2xx reply.
    /// - [`TranslatorError::Deserialize`] / [`TranslatorError::MalformedResponse`]
    ///   when the reply body has no message content.
    pub async fn translate(
        &self,
        title: &str,
        content_html: &str,
        target_lang: &str,
    ) -> Result<TranslationResult, TranslatorError> {
        let target = self
            .languages
            .iter()
            .find(|lang| lang.code == target_lang)
            .ok_or_else(|| TranslatorError::UnsupportedLanguage(target_lang.to_string()))?;

        let prompt = build_translation_prompt(title, content_html, &self.source_language, target);

        let reply = match self.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(lang = %target_lang, error = %e, "translation request failed");
                return Err(e);
            }
        };

        let result = parse_translation_response(&reply, target_lang);
        if result.is_complete() {
            tracing::info!(
                lang = %target_lang,
                slug = %result.slug,
                words = result.word_count,
                "translation parsed"
            );
        } else {
            let missing: Vec<String> = result.missing_fields.iter().map(ToString::to_string).collect();
            tracing::warn!(
                lang = %target_lang,
                missing = %missing.join(", "),
                "translation reply is missing sections; defaults applied"
            );
        }
        Ok(result)
    }

    async fn complete(&self, prompt: &str) -> Result<String, TranslatorError> {
        let request = ChatRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranslatorError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| TranslatorError::MalformedResponse("reply has no message content".into()))
    }
}
