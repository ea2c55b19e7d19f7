//! `offers` command handlers.
//!
//! `lookup` runs the same cache-or-fetch flow as the HTTP API; `show` only
//! reads what is already stored.

use clap::Subcommand;
use offerdb_core::{resolve_offers, AppConfig, LookupRequest, OfferRecord};
use offerdb_db::PgOfferStore;
use offerdb_scraper::{OfferScraper, ScraperConfig};
use sqlx::PgPool;

#[derive(Debug, Subcommand)]
pub enum OffersCommands {
    /// Resolve offers for a restaurant, scraping when the cache is stale
    Lookup {
        /// Restaurant name (matched case-insensitively as a substring)
        #[arg(long)]
        name: String,
        /// City passed to the scraper
        #[arg(long)]
        city: String,
        /// Latitude to store with the restaurant
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        /// Longitude to store with the restaurant
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,
    },
    /// Print the stored record for a name without scraping
    Show {
        /// Restaurant name (matched case-insensitively as a substring)
        #[arg(long)]
        name: String,
        /// List every matching record instead of the first
        #[arg(long)]
        all: bool,
        /// Maximum number of records listed with --all
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

pub(crate) async fn run(
    pool: &PgPool,
    config: &AppConfig,
    command: OffersCommands,
) -> anyhow::Result<()> {
    match command {
        OffersCommands::Lookup {
            name,
            city,
            lat,
            lng,
        } => run_lookup(pool, config, &name, &city, lat.as_deref(), lng.as_deref()).await,
        OffersCommands::Show { name, all, limit } => run_show(pool, &name, all, limit).await,
    }
}

async fn run_lookup(
    pool: &PgPool,
    config: &AppConfig,
    name: &str,
    city: &str,
    lat: Option<&str>,
    lng: Option<&str>,
) -> anyhow::Result<()> {
    let request = LookupRequest::validate(Some(name), Some(city), lat, lng)?;
    let store = PgOfferStore::new(pool.clone());
    let scraper = OfferScraper::new(ScraperConfig::from_app_config(config));

    let outcome = resolve_offers(&store, &scraper, &request, config.cache_ttl()).await?;

    tracing::info!(cache = ?outcome.cache, "lookup complete");
    println!("{}", serde_json::to_string_pretty(&outcome.record)?);
    Ok(())
}

async fn run_show(pool: &PgPool, name: &str, all: bool, limit: i64) -> anyhow::Result<()> {
    let records: Vec<OfferRecord> = if all {
        offerdb_db::list_restaurants_by_fuzzy_name(pool, name, limit.clamp(1, 500))
            .await?
            .into_iter()
            .map(OfferRecord::from)
            .collect()
    } else {
        offerdb_db::find_restaurant_by_fuzzy_name(pool, name)
            .await?
            .into_iter()
            .map(OfferRecord::from)
            .collect()
    };

    if records.is_empty() {
        println!("no stored offers match {name:?}");
        return Ok(());
    }

    for record in &records {
        println!("{}", serde_json::to_string_pretty(record)?);
    }
    Ok(())
}
