//! Quick website checker: one bounded page fetch, then heuristics.
//!
//! The speed score is banded by wall-clock load time and the SEO score is a
//! weighted sum of on-page signals (ssl, title, meta description, og tags,
//! schema markup). Any transport failure degrades to a not-accessible
//! analysis — the caller always gets something to score.

use std::time::{Duration, Instant};

use regex::Regex;

use crate::error::WebcheckError;
use crate::normalize::fetch_url;
use crate::types::WebsiteAnalysis;
use crate::WebsiteChecker;

/// HTTP-backed website checker with a fixed per-check timeout.
pub struct QuickChecker {
    client: reqwest::Client,
    patterns: SeoPatterns,
}

struct SeoPatterns {
    meta_title: Regex,
    meta_description: Regex,
    og_tags: Regex,
    schema_json_ld: Regex,
    schema_microdata: Regex,
}

impl SeoPatterns {
    fn new() -> Result<Self, WebcheckError> {
        Ok(Self {
            meta_title: Regex::new(r"(?i)<title[^>]*>.*?</title>")?,
            meta_description: Regex::new(r#"(?i)<meta[^>]*name=["']description["'][^>]*>"#)?,
            og_tags: Regex::new(r#"(?i)<meta[^>]*property=["']og:"#)?,
            schema_json_ld: Regex::new(r"(?i)application/ld\+json")?,
            schema_microdata: Regex::new(r#"(?i)itemtype=["']https?://schema\.org"#)?,
        })
    }
}

impl QuickChecker {
    /// Creates a checker with the given per-check timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`WebcheckError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`WebcheckError::Pattern`] if a detection
    /// pattern fails to compile.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, WebcheckError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            patterns: SeoPatterns::new()?,
        })
    }

    fn analyze_html(&self, analysis: &mut WebsiteAnalysis, html: &str) {
        analysis.has_meta_title = self.patterns.meta_title.is_match(html);
        analysis.has_meta_description = self.patterns.meta_description.is_match(html);
        analysis.has_og_tags = self.patterns.og_tags.is_match(html);
        analysis.has_schema_markup = self.patterns.schema_json_ld.is_match(html)
            || self.patterns.schema_microdata.is_match(html);

        let mut seo: u8 = 0;
        if analysis.has_ssl {
            seo += 20;
        }
        if analysis.has_meta_title {
            seo += 25;
        }
        if analysis.has_meta_description {
            seo += 25;
        }
        if analysis.has_og_tags {
            seo += 15;
        }
        if analysis.has_schema_markup {
            seo += 15;
        }
        analysis.seo_score = Some(seo);
        analysis.speed_score = analysis.load_time_ms.map(speed_band);
    }
}

/// Speed score banded by observed load time.
fn speed_band(load_time_ms: u64) -> u8 {
    if load_time_ms < 1_000 {
        90
    } else if load_time_ms < 2_000 {
        75
    } else if load_time_ms < 3_000 {
        60
    } else if load_time_ms < 5_000 {
        40
    } else {
        20
    }
}

impl WebsiteChecker for QuickChecker {
    async fn check(&self, url: &str) -> WebsiteAnalysis {
        let url = fetch_url(url);
        // When the probe never completes, report ssl per the requested scheme.
        let scheme_ssl = url.to_ascii_lowercase().starts_with("https://");

        let started = Instant::now();
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(%url, error = %e, "website check failed to connect");
                return WebsiteAnalysis::unreachable(&url, scheme_ssl, "check failed");
            }
        };

        let load_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        // Redirects are followed; judge SSL by where we ended up.
        let has_ssl = response.url().scheme() == "https";
        let accessible = response.status().is_success();

        let mut analysis = WebsiteAnalysis {
            url: url.clone(),
            accessible,
            has_ssl,
            load_time_ms: Some(load_time_ms),
            speed_score: None,
            seo_score: None,
            accessibility_score: None,
            best_practices_score: None,
            has_meta_title: false,
            has_meta_description: false,
            has_og_tags: false,
            has_schema_markup: false,
            error: None,
        };

        if !accessible {
            return analysis;
        }

        let html = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(%url, error = %e, "website check failed to read body");
                return WebsiteAnalysis::unreachable(&url, scheme_ssl, "check failed");
            }
        };

        self.analyze_html(&mut analysis, &html);
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> QuickChecker {
        QuickChecker::new(10, "test-agent").expect("checker construction should not fail")
    }

    fn blank_analysis(has_ssl: bool, load_time_ms: u64) -> WebsiteAnalysis {
        WebsiteAnalysis {
            url: "https://example.com".to_string(),
            accessible: true,
            has_ssl,
            load_time_ms: Some(load_time_ms),
            speed_score: None,
            seo_score: None,
            accessibility_score: None,
            best_practices_score: None,
            has_meta_title: false,
            has_meta_description: false,
            has_og_tags: false,
            has_schema_markup: false,
            error: None,
        }
    }

    #[test]
    fn speed_bands_are_pinned() {
        assert_eq!(speed_band(500), 90);
        assert_eq!(speed_band(999), 90);
        assert_eq!(speed_band(1_000), 75);
        assert_eq!(speed_band(2_500), 60);
        assert_eq!(speed_band(4_999), 40);
        assert_eq!(speed_band(5_000), 20);
    }

    #[test]
    fn full_markup_scores_one_hundred_seo() {
        let html = r#"<html><head>
            <title>Harbour Bakery</title>
            <meta name="description" content="Fresh bread daily">
            <meta property="og:title" content="Harbour Bakery">
            <script type="application/ld+json">{}</script>
        </head><body></body></html>"#;

        let c = checker();
        let mut analysis = blank_analysis(true, 800);
        c.analyze_html(&mut analysis, html);

        assert!(analysis.has_meta_title);
        assert!(analysis.has_meta_description);
        assert!(analysis.has_og_tags);
        assert!(analysis.has_schema_markup);
        assert_eq!(analysis.seo_score, Some(100));
        assert_eq!(analysis.speed_score, Some(90));
    }

    #[test]
    fn bare_page_scores_only_ssl() {
        let c = checker();
        let mut analysis = blank_analysis(true, 2_500);
        c.analyze_html(&mut analysis, "<html><body>hello</body></html>");

        assert_eq!(analysis.seo_score, Some(20));
        assert_eq!(analysis.speed_score, Some(60));
    }

    #[test]
    fn microdata_counts_as_schema_markup() {
        let c = checker();
        let mut analysis = blank_analysis(false, 100);
        c.analyze_html(
            &mut analysis,
            r#"<div itemscope itemtype="http://schema.org/Bakery"></div>"#,
        );
        assert!(analysis.has_schema_markup);
        // no ssl: schema 15 only
        assert_eq!(analysis.seo_score, Some(15));
    }

    #[test]
    fn detection_is_case_insensitive() {
        let c = checker();
        let mut analysis = blank_analysis(false, 100);
        c.analyze_html(
            &mut analysis,
            r#"<TITLE>Shop</TITLE><META NAME="DESCRIPTION" CONTENT="x">"#,
        );
        assert!(analysis.has_meta_title);
        assert!(analysis.has_meta_description);
    }
}
