//! HTTP client for the places provider's REST API.
//!
//! Wraps `reqwest` with provider-specific error handling, API key management,
//! and typed response deserialization. Every endpoint checks the `"status"`
//! field in the JSON envelope; non-OK statuses surface as
//! [`PlacesError::ApiError`] except `ZERO_RESULTS`, which is an empty result,
//! and `NOT_FOUND`, which becomes [`PlacesError::NotFound`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{DetailsResponse, PlaceDetails, PlaceSummary, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Detail fields requested from the provider; everything the audit consumes.
const DETAILS_FIELDS: &str = "place_id,name,formatted_address,formatted_phone_number,website,\
rating,user_ratings_total,photos,price_level,business_status,types,opening_hours,url,geometry";

/// Client for the places provider REST API.
///
/// Manages the HTTP client, API key, base URL, and retry policy. Use
/// [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`] to
/// point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a new client pointed at the production places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vizaudit/0.1 (visibility-audit)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join treats it as a directory rather than replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PlacesError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Override the retry policy (defaults: 3 retries, 1 s base back-off).
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Searches for businesses matching a free-text query.
    ///
    /// When `location_bias` is set, results are biased towards that
    /// `(latitude, longitude)` within `radius_m` meters. `ZERO_RESULTS`
    /// returns an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the provider returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn text_search(
        &self,
        query: &str,
        location_bias: Option<(f64, f64)>,
        radius_m: Option<u32>,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        let mut params: Vec<(&str, String)> = vec![("query", query.to_owned())];
        if let Some((lat, lng)) = location_bias {
            params.push(("location", format!("{lat},{lng}")));
            params.push(("radius", radius_m.unwrap_or(30_000).to_string()));
        }

        let url = self.build_url("textsearch/json", &params)?;
        let body = self.request_json(&url).await?;

        let envelope: SearchResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("textsearch(query={query})"),
                source: e,
            })?;

        match envelope.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(envelope
                .results
                .into_iter()
                .map(crate::types::RawPlace::into_summary)
                .collect()),
            status => Err(api_error(status, envelope.error_message)),
        }
    }

    /// Fetches full details for a place by its provider ID.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NotFound`] if the provider has no such place.
    /// - [`PlacesError::ApiError`] if the provider returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let params = [
            ("place_id", place_id.to_owned()),
            ("fields", DETAILS_FIELDS.to_owned()),
        ];
        let url = self.build_url("details/json", &params)?;
        let body = self.request_json(&url).await?;

        let envelope: DetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;

        match envelope.status.as_str() {
            "OK" => envelope
                .result
                .map(|r| r.into_details(place_id))
                .ok_or_else(|| PlacesError::NotFound {
                    place_id: place_id.to_owned(),
                }),
            "NOT_FOUND" | "ZERO_RESULTS" | "INVALID_REQUEST" => Err(PlacesError::NotFound {
                place_id: place_id.to_owned(),
            }),
            status => Err(api_error(status, envelope.error_message)),
        }
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, appending the API key last.
    fn build_url<S: AsRef<str>>(
        &self,
        endpoint: &str,
        params: &[(&str, S)],
    ) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::ApiError(format!("invalid endpoint '{endpoint}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v.as_ref());
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request with retry, asserts a 2xx HTTP status, and parses
    /// the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let response = response.error_for_status()?;
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                    context: url.to_string(),
                    source: e,
                })
            }
        })
        .await
    }
}

fn api_error(status: &str, message: Option<String>) -> PlacesError {
    match message {
        Some(msg) => PlacesError::ApiError(format!("{status}: {msg}")),
        None => PlacesError::ApiError(status.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_endpoint_and_key() {
        let client = test_client("https://maps.example.com/api/place");
        let url = client
            .build_url("textsearch/json", &[("query", "bakery valletta")])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://maps.example.com/api/place/textsearch/json?query=bakery+valletta&key=test-key"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_slash_in_base() {
        let client = test_client("https://maps.example.com/api/place/");
        let url = client
            .build_url("details/json", &[("place_id", "abc123")])
            .expect("url");
        assert!(url
            .as_str()
            .starts_with("https://maps.example.com/api/place/details/json?place_id=abc123"));
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://maps.example.com/api/place");
        let url = client
            .build_url("textsearch/json", &[("query", "fish & chips")])
            .expect("url");
        assert!(
            url.as_str().contains("fish+%26+chips") || url.as_str().contains("fish%20%26%20chips"),
            "query param should be percent-encoded: {url}"
        );
    }
}
