use thiserror::Error;

/// Errors returned by the places provider client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-OK status with a message.
    #[error("places API error: {0}")]
    ApiError(String),

    /// No place exists for the requested ID.
    #[error("place not found: {place_id}")]
    NotFound { place_id: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
