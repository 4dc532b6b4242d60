//! Social-presence signals for the audit pipeline.
//!
//! The shipped [`EstimatedSocialSource`] derives deterministic pseudo-metrics
//! from the business identity; it stands in for real platform APIs and is
//! labeled as such everywhere its output surfaces. Real providers implement
//! the same [`SocialSource`] trait and drop in without touching callers.

mod ads;
mod analyzer;
mod estimator;

use thiserror::Error;
use vizaudit_core::{Platform, PlatformProfile};

pub use ads::{ad_library_url, estimate_ad_presence, AdPresence};
pub use analyzer::analyze_social_presence;
pub use estimator::{directory_presence_digit, EstimatedSocialSource};

/// Errors from a social data provider.
///
/// The estimator never fails; real providers surface network and API
/// problems here.
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("social provider error: {0}")]
    Provider(String),
}

/// A source of per-platform social presence data.
///
/// Implementations must be interchangeable: callers only see
/// [`PlatformProfile`] values and must not depend on whether the numbers are
/// estimated or fetched from a real platform API.
#[allow(async_fn_in_trait)]
pub trait SocialSource {
    /// Fetch (or derive) the profile for one platform.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError`] when the provider cannot produce a profile at
    /// all; a business simply not being present on the platform is a
    /// successful `found = false` profile, not an error.
    async fn profile(
        &self,
        platform: Platform,
        business_name: &str,
        website: Option<&str>,
    ) -> Result<PlatformProfile, SocialError>;
}
