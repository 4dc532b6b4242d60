//! `website` command: one cached website-performance check.

use sqlx::PgPool;

use vizaudit_core::AppConfig;
use vizaudit_webcheck::AuditChecker;

pub async fn run(
    config: &AppConfig,
    pool: &PgPool,
    url: &str,
    skip_cache: bool,
) -> anyhow::Result<()> {
    let checker = AuditChecker::from_app_config(config)?;

    let result = vizaudit_webcheck::get_or_compute(
        pool,
        url,
        skip_cache,
        config.cache_freshness_days,
        &checker,
    )
    .await?;

    println!("{}", result.url);
    println!(
        "  source      {}",
        if result.cached { "cache" } else { "fresh check" }
    );
    println!(
        "  accessible  {}",
        if result.profile.accessible { "yes" } else { "no" }
    );
    println!(
        "  ssl         {}",
        if result.profile.has_ssl { "yes" } else { "no" }
    );
    match result.profile.speed_score {
        Some(s) => println!("  speed       {s}/100"),
        None => println!("  speed       n/a"),
    }
    match result.profile.seo_score {
        Some(s) => println!("  seo         {s}/100"),
        None => println!("  seo         n/a"),
    }

    Ok(())
}
