//! Client for the hosted pagespeed API.
//!
//! Optional, API-key-gated deep analysis. When configured it supplies
//! lab-grade performance/SEO/accessibility/best-practice scores; otherwise
//! the quick checker's heuristics stand alone.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::WebcheckError;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Category scores from one pagespeed run, already scaled to 0–100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagespeedScores {
    pub performance: Option<u8>,
    pub seo: Option<u8>,
    pub accessibility: Option<u8>,
    pub best_practices: Option<u8>,
}

/// Client for the pagespeed REST endpoint.
pub struct PagespeedClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct PagespeedResponse {
    error: Option<ApiErrorBody>,
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    categories: Categories,
}

#[derive(Debug, Default, Deserialize)]
struct Categories {
    performance: Option<Category>,
    seo: Option<Category>,
    accessibility: Option<Category>,
    #[serde(rename = "best-practices")]
    best_practices: Option<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

impl PagespeedClient {
    /// Creates a client pointed at the production pagespeed endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`WebcheckError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Result<Self, WebcheckError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`WebcheckError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`WebcheckError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, WebcheckError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vizaudit/0.1 (visibility-audit)")
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| WebcheckError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            base_url,
        })
    }

    /// Runs a mobile-strategy pagespeed analysis for `url`.
    ///
    /// # Errors
    ///
    /// - [`WebcheckError::ApiError`] if the endpoint reports an error or the
    ///   payload has no lighthouse result.
    /// - [`WebcheckError::Http`] on network failure or non-2xx HTTP status.
    /// - [`WebcheckError::Deserialize`] if the body is not the expected JSON.
    pub async fn analyze(&self, url: &str) -> Result<PagespeedScores, WebcheckError> {
        let mut request_url = self.base_url.clone();
        {
            let mut pairs = request_url.query_pairs_mut();
            pairs.append_pair("url", url);
            for category in ["performance", "seo", "accessibility", "best-practices"] {
                pairs.append_pair("category", category);
            }
            pairs.append_pair("strategy", "mobile");
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }

        let response = self.client.get(request_url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let parsed: PagespeedResponse =
            serde_json::from_str(&body).map_err(|e| WebcheckError::Deserialize {
                context: format!("pagespeed({url})"),
                source: e,
            })?;

        if let Some(err) = parsed.error {
            return Err(WebcheckError::ApiError(
                err.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let Some(lighthouse) = parsed.lighthouse_result else {
            return Err(WebcheckError::ApiError("no lighthouse result".to_string()));
        };

        let categories = lighthouse.categories;
        Ok(PagespeedScores {
            performance: scale(categories.performance),
            seo: scale(categories.seo),
            accessibility: scale(categories.accessibility),
            best_practices: scale(categories.best_practices),
        })
    }
}

/// A 0.0–1.0 category score scaled to 0–100; absent categories stay absent.
fn scale(category: Option<Category>) -> Option<u8> {
    category.and_then(|c| c.score).map(|score| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let scaled = (score * 100.0).round().clamp(0.0, 100.0) as u8;
        scaled
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rounds_and_clamps() {
        assert_eq!(scale(Some(Category { score: Some(0.925) })), Some(93));
        assert_eq!(scale(Some(Category { score: Some(0.0) })), Some(0));
        assert_eq!(scale(Some(Category { score: Some(1.0) })), Some(100));
        assert_eq!(scale(Some(Category { score: None })), None);
        assert_eq!(scale(None), None);
    }
}
