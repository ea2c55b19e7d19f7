//! Interpretation of the scraper's stdout.

use offerdb_core::ScrapedOffer;
use serde_json::Value;

use crate::error::ScraperError;

/// Parses one scraper run's stdout into an offer.
///
/// An object with a set `error` field is an application-level "nothing found"
/// and becomes [`ScraperError::Application`]. `null`, `false`, `0` and `""`
/// count as unset. Anything else must deserialize as a [`ScrapedOffer`].
///
/// # Errors
///
/// Returns [`ScraperError::Application`] for a reported error and
/// [`ScraperError::Parse`] when stdout is not a valid offer document.
pub fn parse_scraper_output(stdout: &[u8]) -> Result<ScrapedOffer, ScraperError> {
    let raw = String::from_utf8_lossy(stdout);
    let trimmed = raw.trim();

    let value: Value = serde_json::from_str(trimmed).map_err(|source| ScraperError::Parse {
        raw: trimmed.to_string(),
        source,
    })?;

    if let Some(error) = value.get("error").filter(|e| is_set(e)) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(ScraperError::Application(message));
    }

    serde_json::from_value::<ScrapedOffer>(value).map_err(|source| ScraperError::Parse {
        raw: trimmed.to_string(),
        source,
    })
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
