pub mod app_config;
pub mod config;
pub mod freshness;
pub mod lookup;
pub mod offers;
pub mod reconcile;
pub mod store;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use freshness::{is_fresh, CACHE_TTL};
pub use lookup::{resolve_offers, CacheStatus, LookupError, LookupOutcome, LookupRequest};
pub use offers::{fold_name, Location, Offer, OfferRecord, ScrapedOffer};
pub use reconcile::{merge, record_external_id};
pub use store::{FetchError, OfferFetcher, OfferStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
