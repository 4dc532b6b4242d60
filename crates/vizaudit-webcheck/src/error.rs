use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebcheckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid detection pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("pagespeed API error: {0}")]
    ApiError(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
