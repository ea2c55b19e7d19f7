use offerdb_core::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("failed to run scraper {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scraper exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("scraper timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The scraper ran but reported an application-level error.
    #[error("{0}")]
    Application(String),

    #[error("scraper output is not a valid offer: {source}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ScraperError> for FetchError {
    fn from(err: ScraperError) -> Self {
        match err {
            ScraperError::Application(message) => FetchError::Application(message),
            ScraperError::Parse { raw, .. } => FetchError::Parse { raw },
            other @ (ScraperError::Spawn { .. }
            | ScraperError::Exit { .. }
            | ScraperError::Timeout { .. }) => FetchError::Process(other.to_string()),
        }
    }
}
