//! Combine per-platform profiles into a single social snapshot.

use chrono::Utc;
use vizaudit_core::{Platform, SocialSnapshot};

use crate::{SocialError, SocialSource};

/// Fetch both platform profiles from `source` and fold them into a
/// [`SocialSnapshot`] (combined followers/engagement, derived social score,
/// activity and ads flags).
///
/// # Errors
///
/// Returns [`SocialError`] if the source cannot produce a profile for either
/// platform.
pub async fn analyze_social_presence<S: SocialSource>(
    source: &S,
    business_name: &str,
    website: Option<&str>,
) -> Result<SocialSnapshot, SocialError> {
    let facebook = source
        .profile(Platform::Facebook, business_name, website)
        .await?;
    let instagram = source
        .profile(Platform::Instagram, business_name, website)
        .await?;

    let snapshot = SocialSnapshot::from_platforms(facebook, instagram, Utc::now());
    tracing::debug!(
        business = business_name,
        social_score = snapshot.social_score,
        combined_followers = snapshot.combined_followers,
        "social presence analyzed"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EstimatedSocialSource;
    use chrono::{Days, TimeZone};
    use vizaudit_core::PlatformProfile;

    #[tokio::test]
    async fn estimator_snapshot_is_deterministic() {
        let source = EstimatedSocialSource;
        let a = analyze_social_presence(&source, "Harbour Bakery", None)
            .await
            .expect("estimator never fails");
        let b = analyze_social_presence(&source, "Harbour Bakery", None)
            .await
            .expect("estimator never fails");

        assert_eq!(a.social_score, b.social_score);
        assert_eq!(a.combined_followers, b.combined_followers);
        assert_eq!(a.ads_running, b.ads_running);
    }

    #[tokio::test]
    async fn snapshot_score_stays_in_range() {
        let source = EstimatedSocialSource;
        for name in ["Alpha", "Bravo Cafe", "Charlie & Sons", "Delta Gym"] {
            let snapshot = analyze_social_presence(&source, name, None)
                .await
                .expect("estimator never fails");
            assert!(snapshot.social_score <= 100);
        }
    }

    #[test]
    fn combined_engagement_averages_present_values() {
        let now = chrono::Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let mut fb = PlatformProfile::not_found(vizaudit_core::Platform::Facebook);
        fb.found = true;
        fb.engagement_rate = Some(2.0);
        let mut ig = PlatformProfile::not_found(vizaudit_core::Platform::Instagram);
        ig.found = true;
        ig.engagement_rate = Some(4.0);

        let snapshot = SocialSnapshot::from_platforms(fb, ig, now);
        assert_eq!(snapshot.combined_engagement, Some(3.0));
    }

    #[test]
    fn recent_post_marks_the_business_active() {
        let now = chrono::Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let mut fb = PlatformProfile::not_found(vizaudit_core::Platform::Facebook);
        fb.found = true;
        fb.last_post_date = now.date_naive().checked_sub_days(Days::new(2));
        let ig = PlatformProfile::not_found(vizaudit_core::Platform::Instagram);

        let snapshot = SocialSnapshot::from_platforms(fb.clone(), ig.clone(), now);
        assert!(snapshot.is_active);

        fb.last_post_date = now.date_naive().checked_sub_days(Days::new(12));
        let stale = SocialSnapshot::from_platforms(fb, ig, now);
        assert!(!stale.is_active);
    }
}
