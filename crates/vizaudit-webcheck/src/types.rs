use serde::Serialize;
use vizaudit_core::WebsiteProfile;

/// Everything a website check observed.
///
/// `error` is set when the check could not reach the site at all; the other
/// fields then hold their degraded defaults.
#[derive(Debug, Clone, Serialize)]
pub struct WebsiteAnalysis {
    pub url: String,
    pub accessible: bool,
    pub has_ssl: bool,
    pub load_time_ms: Option<u64>,
    pub speed_score: Option<u8>,
    pub seo_score: Option<u8>,
    pub accessibility_score: Option<u8>,
    pub best_practices_score: Option<u8>,
    pub has_meta_title: bool,
    pub has_meta_description: bool,
    pub has_og_tags: bool,
    pub has_schema_markup: bool,
    pub error: Option<String>,
}

impl WebsiteAnalysis {
    /// A degraded result for a site that could not be checked.
    #[must_use]
    pub fn unreachable(url: &str, has_ssl: bool, error: &str) -> Self {
        Self {
            url: url.to_owned(),
            accessible: false,
            has_ssl,
            load_time_ms: None,
            speed_score: None,
            seo_score: None,
            accessibility_score: None,
            best_practices_score: None,
            has_meta_title: false,
            has_meta_description: false,
            has_og_tags: false,
            has_schema_markup: false,
            error: Some(error.to_owned()),
        }
    }

    /// The scorer-facing view of this analysis.
    #[must_use]
    pub fn profile(&self) -> WebsiteProfile {
        WebsiteProfile {
            accessible: self.accessible,
            has_ssl: self.has_ssl,
            speed_score: self.speed_score,
            seo_score: self.seo_score,
        }
    }
}
