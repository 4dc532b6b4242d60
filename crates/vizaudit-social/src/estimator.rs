//! Deterministic social-presence estimator.
//!
//! Derives pseudo-metrics from a sha-256 digest of the business identity, so
//! the same business always produces the same profile across runs and
//! processes. Placeholder for real platform APIs behind [`SocialSource`].

use chrono::{DateTime, Days, Utc};
use sha2::{Digest, Sha256};
use vizaudit_core::{Platform, PlatformProfile};

use crate::{SocialError, SocialSource};

/// Estimates social presence from the business identity alone.
pub struct EstimatedSocialSource;

impl SocialSource for EstimatedSocialSource {
    async fn profile(
        &self,
        platform: Platform,
        business_name: &str,
        website: Option<&str>,
    ) -> Result<PlatformProfile, SocialError> {
        Ok(estimate_profile(platform, business_name, website, Utc::now()))
    }
}

/// First 8 digest bytes of `input`, folded big-endian into a `u64` seed.
fn digest_seed(input: &str) -> u64 {
    let digest = Sha256::digest(input.as_bytes());
    digest
        .iter()
        .take(8)
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// URL-path slug for a profile link: lowercase, whitespace removed.
fn handle_slug(business_name: &str) -> String {
    business_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Derive a full platform profile for the business at `now`.
///
/// Found-rate, follower range, posting cadence, and engagement differ per
/// platform, mirroring how presence skews in practice (slightly more
/// businesses maintain a Facebook page; Instagram followings run smaller
/// with higher engagement).
#[must_use]
pub(crate) fn estimate_profile(
    platform: Platform,
    business_name: &str,
    website: Option<&str>,
    now: DateTime<Utc>,
) -> PlatformProfile {
    let identity = format!("{business_name}{}", website.unwrap_or(""));
    match platform {
        Platform::Facebook => {
            let seed = digest_seed(&identity);
            if seed % 10 <= 2 {
                return PlatformProfile::not_found(platform);
            }
            let has_ads = seed % 10 > 6;
            let days_ago = seed % 15;
            PlatformProfile {
                platform,
                found: true,
                profile_url: Some(format!(
                    "https://facebook.com/{}",
                    handle_slug(business_name)
                )),
                followers: Some(u32::try_from(seed % 10_000).unwrap_or(0) + 100),
                posts_count: Some(u32::try_from(seed % 500).unwrap_or(0) + 50),
                posts_last_30_days: Some(u32::try_from(seed % 20).unwrap_or(0) + 1),
                engagement_rate: Some(
                    (f64::from(u32::try_from(seed % 50).unwrap_or(0)) + 10.0) / 10.0,
                ),
                last_post_date: now.date_naive().checked_sub_days(Days::new(days_ago)),
                has_active_ads: has_ads,
                ad_count: if has_ads {
                    u32::try_from(seed % 5).unwrap_or(0) + 1
                } else {
                    0
                },
                verified: seed % 20 == 0,
            }
        }
        Platform::Instagram => {
            let seed = digest_seed(&format!("{identity}instagram"));
            if seed % 10 <= 3 {
                return PlatformProfile::not_found(platform);
            }
            let has_ads = seed % 10 > 7;
            let days_ago = seed % 10;
            PlatformProfile {
                platform,
                found: true,
                profile_url: Some(format!(
                    "https://instagram.com/{}",
                    handle_slug(business_name)
                )),
                followers: Some(u32::try_from(seed % 8_000).unwrap_or(0) + 50),
                posts_count: Some(u32::try_from(seed % 300).unwrap_or(0) + 20),
                posts_last_30_days: Some(u32::try_from(seed % 15).unwrap_or(0) + 1),
                engagement_rate: Some(
                    (f64::from(u32::try_from(seed % 80).unwrap_or(0)) + 20.0) / 10.0,
                ),
                last_post_date: now.date_naive().checked_sub_days(Days::new(days_ago)),
                has_active_ads: has_ads,
                ad_count: if has_ads {
                    u32::try_from(seed % 3).unwrap_or(0) + 1
                } else {
                    0
                },
                verified: seed % 25 == 0,
            }
        }
    }
}

/// Stable 0–9 digit deciding whether a business appears in a listing
/// directory; compared against the roster's `found_threshold`.
#[must_use]
pub fn directory_presence_digit(business_name: &str, directory: &str) -> u8 {
    u8::try_from(digest_seed(&format!("{business_name}|{directory}")) % 10).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn same_identity_estimates_identically() {
        let a = estimate_profile(Platform::Facebook, "Harbour Bakery", None, at());
        let b = estimate_profile(Platform::Facebook, "Harbour Bakery", None, at());
        assert_eq!(a.found, b.found);
        assert_eq!(a.followers, b.followers);
        assert_eq!(a.posts_last_30_days, b.posts_last_30_days);
        assert_eq!(a.engagement_rate, b.engagement_rate);
        assert_eq!(a.has_active_ads, b.has_active_ads);
    }

    #[test]
    fn website_changes_the_estimate() {
        let bare = estimate_profile(Platform::Facebook, "Harbour Bakery", None, at());
        let with_site = estimate_profile(
            Platform::Facebook,
            "Harbour Bakery",
            Some("https://harbourbakery.example"),
            at(),
        );
        // Different identity, different seed; at minimum the derived numbers
        // cannot all coincide when both profiles are found.
        if bare.found && with_site.found {
            assert!(
                bare.followers != with_site.followers
                    || bare.posts_count != with_site.posts_count
                    || bare.engagement_rate != with_site.engagement_rate
            );
        }
    }

    #[test]
    fn found_profile_has_populated_metrics() {
        // Scan a handful of names; every found profile must carry metrics.
        for name in ["Alpha", "Bravo Cafe", "Charlie & Sons", "Delta Gym", "Echo Spa"] {
            for platform in [Platform::Facebook, Platform::Instagram] {
                let p = estimate_profile(platform, name, None, at());
                if p.found {
                    assert!(p.followers.is_some());
                    assert!(p.posts_last_30_days.is_some());
                    assert!(p.engagement_rate.is_some());
                    assert!(p.profile_url.is_some());
                    assert!(p.last_post_date.is_some());
                } else {
                    assert!(p.followers.is_none());
                    assert!(p.profile_url.is_none());
                }
            }
        }
    }

    #[test]
    fn follower_estimates_stay_in_range() {
        for name in ["One", "Two", "Three", "Four", "Five", "Six", "Seven"] {
            let fb = estimate_profile(Platform::Facebook, name, None, at());
            if let Some(f) = fb.followers {
                assert!((100..10_100).contains(&f), "fb followers out of range: {f}");
            }
            let ig = estimate_profile(Platform::Instagram, name, None, at());
            if let Some(f) = ig.followers {
                assert!((50..8_050).contains(&f), "ig followers out of range: {f}");
            }
        }
    }

    #[test]
    fn engagement_estimates_stay_in_range() {
        for name in ["One", "Two", "Three", "Four", "Five"] {
            let fb = estimate_profile(Platform::Facebook, name, None, at());
            if let Some(e) = fb.engagement_rate {
                assert!((1.0..=5.9).contains(&e), "fb engagement out of range: {e}");
            }
            let ig = estimate_profile(Platform::Instagram, name, None, at());
            if let Some(e) = ig.engagement_rate {
                assert!((2.0..=9.9).contains(&e), "ig engagement out of range: {e}");
            }
        }
    }

    #[test]
    fn profile_url_uses_a_lowercase_slug() {
        let p = estimate_profile(Platform::Facebook, "Harbour Bakery", None, at());
        if let Some(url) = p.profile_url {
            assert_eq!(url, "https://facebook.com/harbourbakery");
        }
    }

    #[test]
    fn directory_digit_is_stable_and_bounded() {
        let a = directory_presence_digit("Harbour Bakery", "Yelp");
        let b = directory_presence_digit("Harbour Bakery", "Yelp");
        assert_eq!(a, b);
        assert!(a < 10);
        // Different directory, independent digit stream.
        let c = directory_presence_digit("Harbour Bakery", "Bing Places");
        assert!(c < 10);
    }
}
