mod audit;
mod website;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vizaudit-cli")]
#[command(about = "Business visibility audits from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a business and print its visibility score breakdown.
    Audit {
        /// Free-text search, e.g. "harbour bakery"
        query: String,
        /// Narrow the search to a location, e.g. "valletta"
        #[arg(long)]
        location: Option<String>,
        /// Re-check the website even when a fresh cache row exists
        #[arg(long)]
        skip_cache: bool,
        /// Also score up to N nearby competitors
        #[arg(long, default_value_t = 0)]
        competitors: usize,
    },
    /// Run the cached website-performance check for one URL.
    Website {
        url: String,
        /// Re-check even when a fresh cache row exists
        #[arg(long)]
        skip_cache: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = vizaudit_core::load_app_config()?;
    let pool_config = vizaudit_db::PoolConfig::from_app_config(&config);
    let pool = vizaudit_db::connect_pool(&config.database_url, pool_config).await?;
    vizaudit_db::run_migrations(&pool).await?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Audit {
            query,
            location,
            skip_cache,
            competitors,
        } => {
            audit::run(
                &config,
                &pool,
                &query,
                location.as_deref(),
                skip_cache,
                competitors,
            )
            .await
        }
        Commands::Website { url, skip_cache } => {
            website::run(&config, &pool, &url, skip_cache).await
        }
    }
}
