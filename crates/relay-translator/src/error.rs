use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation endpoint returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to decode translation response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("malformed translation response: {0}")]
    MalformedResponse(String),

    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),

    #[error("no API key configured for the translation endpoint")]
    MissingApiKey,
}
