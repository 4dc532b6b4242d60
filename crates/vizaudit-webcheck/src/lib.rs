//! Website-performance checking and its result cache.
//!
//! A check probes the site within a fixed timeout, derives speed and on-page
//! SEO scores, and degrades to a not-accessible profile instead of failing.
//! [`cache::get_or_compute`] fronts the checker with a 7-day, URL-keyed
//! result cache.

pub mod cache;
mod checker;
mod composite;
mod error;
mod normalize;
mod pagespeed;
mod types;

pub use cache::{get_or_compute, CachedWebsite};
pub use checker::QuickChecker;
pub use composite::AuditChecker;
pub use error::WebcheckError;
pub use normalize::{fetch_url, normalize_url};
pub use pagespeed::{PagespeedClient, PagespeedScores};
pub use types::WebsiteAnalysis;

/// A website-performance checker.
///
/// `check` never fails: transport errors, timeouts, and non-2xx responses all
/// degrade to a not-accessible [`WebsiteAnalysis`] so a visibility score can
/// still be computed.
#[allow(async_fn_in_trait)]
pub trait WebsiteChecker {
    async fn check(&self, url: &str) -> WebsiteAnalysis;
}
