//! Offer fetching through an external scraper program.
//!
//! The scraper is invoked as `<program> <args...> <name> <city>` and must
//! print a single JSON document on stdout: either an offer
//! (`provider`, `discount`, `deep_link`, optional `external_id`) or an
//! object with an `error` message when it found nothing.

pub mod client;
pub mod error;
pub mod parse;

pub use client::{OfferScraper, ScraperConfig};
pub use error::ScraperError;
pub use parse::parse_scraper_output;
