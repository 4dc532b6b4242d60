//! Composite visibility scoring.
//!
//! Maps a `(places, social, website)` signal triple to a single 0–100 score.
//! Sub-scores are computed in `f64` and summed without intermediate rounding;
//! only the final total is rounded (ties up) and clamped to `[0, 100]`.

use crate::{PlacesProfile, PlatformProfile, SocialSnapshot, WebsiteProfile};

/// Points contributed by the star rating: `(rating / 5) * 15`.
#[must_use]
pub fn rating_points(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r > 0.0 => (r / 5.0) * 15.0,
        _ => 0.0,
    }
}

/// Banded review-count points, capped at 10.
#[must_use]
pub fn review_points(review_count: u32) -> f64 {
    if review_count > 100 {
        10.0
    } else if review_count > 50 {
        8.0
    } else if review_count > 20 {
        6.0
    } else if review_count > 5 {
        4.0
    } else if review_count > 0 {
        2.0
    } else {
        0.0
    }
}

/// Logarithmic review-count points: `min(20, log10(n + 1) * 7.5)`.
///
/// Alternative weighting that rewards large review bases up to 20 points.
/// Not used by [`visibility_score`]; kept for callers that want the heavier
/// review emphasis.
#[must_use]
pub fn review_points_log(review_count: u32) -> f64 {
    if review_count == 0 {
        return 0.0;
    }
    ((f64::from(review_count) + 1.0).log10() * 7.5).min(20.0)
}

/// Banded photo-count points, capped at 5.
#[must_use]
pub fn photo_points(photos_count: u32) -> f64 {
    if photos_count > 20 {
        5.0
    } else if photos_count > 10 {
        4.0
    } else if photos_count > 5 {
        3.0
    } else if photos_count > 0 {
        1.0
    } else {
        0.0
    }
}

/// Derived 0–100 social score from the two platform profiles.
///
/// Four independently saturating components: presence (15 per found
/// platform), combined follower tier (max 25), combined 30-day posting tier
/// (max 25), combined engagement tier (max 20).
#[must_use]
pub fn social_score(facebook: &PlatformProfile, instagram: &PlatformProfile) -> u8 {
    let mut score: u32 = 0;

    if facebook.found {
        score += 15;
    }
    if instagram.found {
        score += 15;
    }

    let followers = facebook.followers.unwrap_or(0) + instagram.followers.unwrap_or(0);
    score += if followers > 10_000 {
        25
    } else if followers > 5_000 {
        20
    } else if followers > 1_000 {
        15
    } else if followers > 500 {
        10
    } else if followers > 0 {
        5
    } else {
        0
    };

    let posts = facebook.posts_last_30_days.unwrap_or(0) + instagram.posts_last_30_days.unwrap_or(0);
    score += if posts >= 20 {
        25
    } else if posts >= 12 {
        20
    } else if posts >= 8 {
        15
    } else if posts >= 4 {
        10
    } else if posts > 0 {
        5
    } else {
        0
    };

    let engagement = match (facebook.engagement_rate, instagram.engagement_rate) {
        (Some(f), Some(i)) => Some((f + i) / 2.0),
        (Some(f), None) => Some(f),
        (None, Some(i)) => Some(i),
        (None, None) => None,
    };
    if let Some(e) = engagement {
        score += if e > 5.0 {
            20
        } else if e > 3.0 {
            15
        } else if e > 2.0 {
            10
        } else if e > 1.0 {
            5
        } else {
            0
        };
    }

    // Components cap at 30 + 25 + 25 + 20 = 100.
    u8::try_from(score).unwrap_or(100)
}

/// Share of directories where the business was found, as a 0–100 score.
///
/// Returns 0 when no directories were checked.
#[must_use]
pub fn listings_score(found: usize, checked: usize) -> u8 {
    if checked == 0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let score = ((found as f64 / checked as f64) * 100.0).round() as u8;
    score
}

/// Composite visibility score in `[0, 100]`.
///
/// Absent inputs contribute zero. Website sub-bonuses (ssl, speed, seo) are
/// only added when the site is accessible. Never errors: degraded or null
/// collaborator data lowers the score instead of failing the audit.
#[must_use]
pub fn visibility_score(
    places: Option<&PlacesProfile>,
    social: &SocialSnapshot,
    website: Option<&WebsiteProfile>,
) -> u8 {
    let mut total = 0.0_f64;

    // Places presence: 35 points ceiling.
    if let Some(p) = places {
        total += rating_points(p.rating);
        total += review_points(p.review_count);
        total += photo_points(p.photos_count);
        if p.has_website {
            total += 5.0;
        }
    }

    // Social presence: 40 points ceiling.
    total += f64::from(social.social_score) * 0.4;

    // Website health: 25 points ceiling, gated on accessibility.
    if let Some(w) = website {
        if w.accessible {
            total += 10.0;
            if w.has_ssl {
                total += 5.0;
            }
            if let Some(speed) = w.speed_score {
                total += (f64::from(speed) / 100.0) * 5.0;
            }
            if let Some(seo) = w.seo_score {
                total += (f64::from(seo) / 100.0) * 5.0;
            }
        }
    }

    // The only place truncation is allowed: round the summed total (ties
    // away from zero, i.e. half-up for our non-negative totals), then clamp.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = total.round().clamp(0.0, 100.0) as u8;
    rounded
}
