//! `audit` command: resolve a business, gather all three signals, print the
//! score breakdown, and optionally compare against nearby competitors.

use anyhow::{bail, Context};
use futures::StreamExt;
use sqlx::PgPool;

use vizaudit_core::{keywords, scoring, AppConfig, SocialSnapshot, WebsiteProfile};
use vizaudit_places::{PlaceDetails, PlacesClient};
use vizaudit_social::{analyze_social_presence, EstimatedSocialSource};
use vizaudit_webcheck::AuditChecker;

/// Concurrent competitor checks; low on purpose to stay friendly with the
/// provider's rate limits.
const COMPETITOR_CONCURRENCY: usize = 2;

pub async fn run(
    config: &AppConfig,
    pool: &PgPool,
    query: &str,
    location: Option<&str>,
    skip_cache: bool,
    competitors: usize,
) -> anyhow::Result<()> {
    let Some(api_key) = &config.places_api_key else {
        bail!("PLACES_API_KEY is required for the audit command");
    };
    let places = PlacesClient::new(api_key, config.places_timeout_secs)?
        .with_retry_policy(config.places_max_retries, config.places_retry_backoff_base_ms);
    let checker = AuditChecker::from_app_config(config)?;

    let search_query = match location {
        Some(loc) => format!("{query} {loc}"),
        None => query.to_owned(),
    };
    let candidates = places
        .text_search(&search_query, None, None)
        .await
        .context("business search failed")?;
    let Some(candidate) = candidates.into_iter().next() else {
        bail!("no business found for \"{search_query}\"");
    };

    println!("Auditing: {} — {}", candidate.name, candidate.address);

    let details = places
        .place_details(&candidate.place_id)
        .await
        .context("place details failed")?;

    let (social, website, score) =
        score_business(config, pool, &checker, &details, skip_cache).await?;

    print_breakdown(&details, &social, website.as_ref(), score);

    if competitors > 0 {
        compare_with_competitors(config, pool, &places, &checker, &details, competitors).await?;
    }

    Ok(())
}

/// Gather social + website signals for a resolved place and score it.
async fn score_business(
    config: &AppConfig,
    pool: &PgPool,
    checker: &AuditChecker,
    details: &PlaceDetails,
    skip_cache: bool,
) -> anyhow::Result<(SocialSnapshot, Option<WebsiteProfile>, u8)> {
    let social = analyze_social_presence(
        &EstimatedSocialSource,
        &details.name,
        details.website.as_deref(),
    )
    .await
    .context("social analysis failed")?;

    let website = match &details.website {
        Some(url) => {
            let checked = vizaudit_webcheck::get_or_compute(
                pool,
                url,
                skip_cache,
                config.cache_freshness_days,
                checker,
            )
            .await
            .context("website check failed")?;
            Some(checked.profile)
        }
        None => None,
    };

    let places_profile = details.places_profile();
    let score = scoring::visibility_score(Some(&places_profile), &social, website.as_ref());
    Ok((social, website, score))
}

fn print_breakdown(
    details: &PlaceDetails,
    social: &SocialSnapshot,
    website: Option<&WebsiteProfile>,
    score: u8,
) {
    println!();
    println!("Places signals");
    match details.rating {
        Some(rating) => println!("  rating          {rating:.1} ({} reviews)", details.review_count),
        None => println!("  rating          none ({} reviews)", details.review_count),
    }
    println!("  photos          {}", details.photos_count);
    println!(
        "  website listed  {}",
        if details.website.is_some() { "yes" } else { "no" }
    );

    println!("Social signals (estimated)");
    println!("  social score    {}/100", social.social_score);
    println!("  followers       {}", social.combined_followers);
    match social.combined_engagement {
        Some(e) => println!("  engagement      {e:.1}%"),
        None => println!("  engagement      n/a"),
    }
    println!("  running ads     {}", if social.ads_running { "yes" } else { "no" });

    println!("Website");
    match website {
        Some(w) if w.accessible => {
            println!("  accessible      yes (ssl: {})", if w.has_ssl { "yes" } else { "no" });
            match w.speed_score {
                Some(s) => println!("  speed score     {s}/100"),
                None => println!("  speed score     n/a"),
            }
            match w.seo_score {
                Some(s) => println!("  seo score       {s}/100"),
                None => println!("  seo score       n/a"),
            }
        }
        Some(_) => println!("  accessible      no"),
        None => println!("  none listed"),
    }

    println!();
    println!("Visibility score: {score}/100");
}

async fn compare_with_competitors(
    config: &AppConfig,
    pool: &PgPool,
    places: &PlacesClient,
    checker: &AuditChecker,
    details: &PlaceDetails,
    limit: usize,
) -> anyhow::Result<()> {
    let categories = keywords::extract_from_categories(&details.types);
    let name_keywords = keywords::extract_from_name(&details.name);
    let combined = keywords::combine_keywords(categories, name_keywords, Vec::new());
    let query = keywords::build_competitor_query(&combined);

    println!();
    println!("Searching competitors: \"{query}\"");

    let location_bias = details.latitude.zip(details.longitude);
    let candidates = places
        .text_search(&query, location_bias, None)
        .await
        .context("competitor search failed")?;

    let own_name = details.name.to_lowercase();
    let rivals: Vec<_> = candidates
        .into_iter()
        .filter(|c| c.place_id != details.place_id && c.name.to_lowercase() != own_name)
        .take(limit)
        .collect();

    if rivals.is_empty() {
        println!("No competitors found.");
        return Ok(());
    }

    let mut scored: Vec<(String, u8)> = futures::stream::iter(rivals)
        .map(|rival| async move {
            let details = places.place_details(&rival.place_id).await.ok()?;
            let result = score_business(config, pool, checker, &details, false).await.ok()?;
            Some((rival.name, result.2))
        })
        .buffer_unordered(COMPETITOR_CONCURRENCY)
        .filter_map(|r| async move { r })
        .collect()
        .await;

    scored.sort_by(|a, b| b.1.cmp(&a.1));

    println!();
    println!("Competitors");
    for (name, score) in &scored {
        println!("  {score:>3}/100  {name}");
    }
    let sum: u32 = scored.iter().map(|(_, s)| u32::from(*s)).sum();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let avg = (f64::from(sum) / scored.len() as f64).round() as u8;
    println!("  average: {avg}/100");

    Ok(())
}
