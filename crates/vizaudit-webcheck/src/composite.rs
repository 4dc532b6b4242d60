//! Checker that layers pagespeed lab scores over the quick probe.

use crate::checker::QuickChecker;
use crate::error::WebcheckError;
use crate::pagespeed::PagespeedClient;
use crate::types::WebsiteAnalysis;
use crate::WebsiteChecker;

/// The production checker: always runs the quick probe; when a pagespeed
/// client is configured and the site is reachable, its category scores
/// replace the probe's heuristics. A pagespeed failure falls back to the
/// heuristics instead of degrading the whole check.
pub struct AuditChecker {
    quick: QuickChecker,
    pagespeed: Option<PagespeedClient>,
}

impl AuditChecker {
    #[must_use]
    pub fn new(quick: QuickChecker, pagespeed: Option<PagespeedClient>) -> Self {
        Self { quick, pagespeed }
    }

    /// Build the checker from application config; the pagespeed layer is
    /// only attached when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`WebcheckError`] if an underlying HTTP client cannot be
    /// constructed.
    pub fn from_app_config(config: &vizaudit_core::AppConfig) -> Result<Self, WebcheckError> {
        let quick = QuickChecker::new(config.webcheck_timeout_secs, &config.webcheck_user_agent)?;
        let pagespeed = match &config.pagespeed_api_key {
            Some(key) => Some(PagespeedClient::new(
                Some(key),
                config.webcheck_timeout_secs,
            )?),
            None => None,
        };
        Ok(Self::new(quick, pagespeed))
    }
}

impl WebsiteChecker for AuditChecker {
    async fn check(&self, url: &str) -> WebsiteAnalysis {
        let mut analysis = self.quick.check(url).await;
        if !analysis.accessible {
            return analysis;
        }
        let Some(pagespeed) = &self.pagespeed else {
            return analysis;
        };

        match pagespeed.analyze(&analysis.url).await {
            Ok(scores) => {
                if scores.performance.is_some() {
                    analysis.speed_score = scores.performance;
                }
                if scores.seo.is_some() {
                    analysis.seo_score = scores.seo;
                }
                analysis.accessibility_score = scores.accessibility;
                analysis.best_practices_score = scores.best_practices;
            }
            Err(e) => {
                tracing::warn!(
                    url = %analysis.url,
                    error = %e,
                    "pagespeed analysis failed; keeping probe heuristics"
                );
            }
        }
        analysis
    }
}
