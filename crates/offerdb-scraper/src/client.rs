//! Subprocess runner for the external offer scraper.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use offerdb_core::{AppConfig, FetchError, OfferFetcher, ScrapedOffer};
use tokio::process::Command;

use crate::error::ScraperError;
use crate::parse::parse_scraper_output;

/// Longest stderr excerpt carried in an error.
const MAX_STDERR_CHARS: usize = 2_000;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub program: OsString,
    /// Arguments placed before the restaurant name and city.
    pub args: Vec<OsString>,
    pub timeout: Duration,
}

impl ScraperConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            program: OsString::from(&config.scraper_program),
            args: vec![config.scraper_script.clone().into_os_string()],
            timeout: Duration::from_secs(config.scraper_timeout_secs),
        }
    }
}

/// Runs the scraper program once per fetch.
///
/// The child is killed when the timeout elapses or when the returned future
/// is dropped, so an abandoned request never leaves a scraper running.
#[derive(Debug, Clone)]
pub struct OfferScraper {
    config: ScraperConfig,
}

impl OfferScraper {
    #[must_use]
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Scrapes the current offer for `name` in `city`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Spawn`] if the program cannot be started.
    /// - [`ScraperError::Timeout`] if it runs longer than the configured timeout.
    /// - [`ScraperError::Exit`] on a non-zero exit, carrying stderr.
    /// - [`ScraperError::Application`] / [`ScraperError::Parse`] from the output.
    pub async fn scrape(&self, name: &str, city: &str) -> Result<ScrapedOffer, ScraperError> {
        let program = self.config.program.to_string_lossy().into_owned();

        let child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(name)
            .arg(city)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ScraperError::Spawn {
                program: program.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScraperError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            })?
            .map_err(|source| ScraperError::Spawn { program, source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(MAX_STDERR_CHARS).collect();
            tracing::warn!(
                restaurant = name,
                city,
                status = %output.status,
                "scraper returned non-zero exit"
            );
            return Err(ScraperError::Exit {
                status: output.status.to_string(),
                stderr,
            });
        }

        parse_scraper_output(&output.stdout)
    }
}

impl OfferFetcher for OfferScraper {
    async fn fetch(&self, name: &str, city: &str) -> Result<ScrapedOffer, FetchError> {
        self.scrape(name, city).await.map_err(FetchError::from)
    }
}
