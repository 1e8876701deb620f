use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read locale file {path}: {source}")]
    LocaleFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locale file: {0}")]
    LocaleFileParse(#[from] serde_yaml::Error),

    #[error("locale table validation failed: {0}")]
    Validation(String),
}
