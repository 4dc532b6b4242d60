use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod directories;
pub mod keywords;
pub mod scoring;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use directories::{load_directories, DirectoriesFile, DirectoryProbe, DirectorySpec};
pub use scoring::{listings_score, social_score, visibility_score};

/// Social platform a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Facebook => write!(f, "facebook"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

/// Per-business facts from the places provider, as consumed by the scorer.
///
/// A snapshot fetched fresh per audit; persistence of the underlying business
/// record lives in the db crate, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesProfile {
    pub rating: Option<f64>,
    pub review_count: u32,
    pub photos_count: u32,
    pub has_website: bool,
}

/// Per-platform social presence metrics, estimated or real.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub found: bool,
    pub profile_url: Option<String>,
    pub followers: Option<u32>,
    pub posts_count: Option<u32>,
    pub posts_last_30_days: Option<u32>,
    pub engagement_rate: Option<f64>,
    pub last_post_date: Option<NaiveDate>,
    pub has_active_ads: bool,
    pub ad_count: u32,
    pub verified: bool,
}

impl PlatformProfile {
    /// An empty not-found profile for the given platform.
    #[must_use]
    pub fn not_found(platform: Platform) -> Self {
        Self {
            platform,
            found: false,
            profile_url: None,
            followers: None,
            posts_count: None,
            posts_last_30_days: None,
            engagement_rate: None,
            last_post_date: None,
            has_active_ads: false,
            ad_count: 0,
            verified: false,
        }
    }
}

/// Combined two-platform social presence with its derived 0–100 score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialSnapshot {
    pub facebook: PlatformProfile,
    pub instagram: PlatformProfile,
    pub combined_followers: u32,
    pub combined_engagement: Option<f64>,
    pub social_score: u8,
    pub is_active: bool,
    pub ads_running: bool,
}

impl SocialSnapshot {
    /// Combine per-platform profiles into a snapshot.
    ///
    /// `now` anchors the activity check: the business counts as active when
    /// either platform posted within the last 7 days.
    #[must_use]
    pub fn from_platforms(
        facebook: PlatformProfile,
        instagram: PlatformProfile,
        now: DateTime<Utc>,
    ) -> Self {
        let combined_followers =
            facebook.followers.unwrap_or(0) + instagram.followers.unwrap_or(0);

        let combined_engagement = match (facebook.engagement_rate, instagram.engagement_rate) {
            (Some(f), Some(i)) => Some((f + i) / 2.0),
            (Some(f), None) => Some(f),
            (None, Some(i)) => Some(i),
            (None, None) => None,
        };

        let week_ago = now.date_naive() - chrono::Days::new(7);
        let is_active = [&facebook, &instagram]
            .iter()
            .any(|p| p.last_post_date.is_some_and(|d| d > week_ago));

        let ads_running = facebook.has_active_ads || instagram.has_active_ads;
        let social_score = scoring::social_score(&facebook, &instagram);

        Self {
            facebook,
            instagram,
            combined_followers,
            combined_engagement,
            social_score,
            is_active,
            ads_running,
        }
    }
}

/// Website performance facts, either freshly checked or served from cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteProfile {
    pub accessible: bool,
    pub has_ssl: bool,
    pub speed_score: Option<u8>,
    pub seo_score: Option<u8>,
}

impl WebsiteProfile {
    /// A degraded not-accessible profile; `has_ssl` comes from the URL scheme.
    #[must_use]
    pub fn unreachable(has_ssl: bool) -> Self {
        Self {
            accessible: false,
            has_ssl,
            speed_score: None,
            seo_score: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read directories file {path}: {source}")]
    DirectoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse directories file: {0}")]
    DirectoriesFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
