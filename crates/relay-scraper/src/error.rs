use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("XML parse error in {url}: {source}")]
    Xml {
        url: String,
        #[source]
        source: quick_xml::Error,
    },
}
