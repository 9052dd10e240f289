use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("No element matches XPath: {xpath}")]
    ElementNotFound { xpath: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HarvestError {
    pub fn not_found(xpath: impl Into<String>) -> Self {
        HarvestError::ElementNotFound {
            xpath: xpath.into(),
        }
    }

    /// True when a lookup failed only because nothing matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HarvestError::ElementNotFound { .. })
    }
}

pub type HarvestResult<T> = Result<T, HarvestError>;
