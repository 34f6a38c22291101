//! Quote provider.
//!
//! A [`QuoteSource`] performs exactly one fetch attempt. [`fetch_quote`]
//! drives the retry budget: every attempt either yields an acceptable
//! [`Quote`] or a [`FetchError`] describing why it was discarded, and the
//! loop keeps going until the budget is spent. Exhaustion is reported as
//! `None`; the caller renders without a quote.

use serde::Deserialize;
use thiserror::Error;

/// Default quote endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://stoic.tekloon.net/stoic-quote";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// The attribution line drawn under the quote.
    pub fn attribution(&self) -> String {
        format!("- {}", self.author)
    }
}

/// Why a single attempt produced no usable quote.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed body: {0}")]
    Malformed(String),

    #[error("empty quote")]
    Empty,

    #[error("quote too long ({len} > {max} chars)")]
    TooLong { len: usize, max: usize },
}

/// Retry policy for [`fetch_quote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotePolicy {
    pub max_retries: u32,
    pub max_length: usize,
}

impl Default for QuotePolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            max_length: 80,
        }
    }
}

/// One fetch attempt against some quote backend.
pub trait QuoteSource: Send + Sync {
    fn fetch(&self) -> Result<Quote, FetchError>;
}

/// Wire shape: `{ "data": { "quote": "...", "author": "..." } }`
#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    data: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(default)]
    quote: String,
    #[serde(default)]
    author: String,
}

/// Parse a quote endpoint response body.
pub fn parse_body(body: &str) -> Result<Quote, FetchError> {
    let envelope: QuoteEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    Ok(Quote {
        text: envelope.data.quote,
        author: envelope.data.author,
    })
}

/// Run one attempt and apply the acceptance rules.
pub fn attempt(source: &dyn QuoteSource, max_length: usize) -> Result<Quote, FetchError> {
    let quote = source.fetch()?;
    if quote.text.is_empty() {
        return Err(FetchError::Empty);
    }
    let len = quote.text.chars().count();
    if len > max_length {
        return Err(FetchError::TooLong {
            len,
            max: max_length,
        });
    }
    Ok(quote)
}

/// Fetch a quote within the retry budget, or `None` if every attempt failed.
pub fn fetch_quote(source: &dyn QuoteSource, policy: QuotePolicy) -> Option<Quote> {
    for n in 1..=policy.max_retries {
        match attempt(source, policy.max_length) {
            Ok(quote) => {
                log::debug!("quote accepted on attempt {}", n);
                return Some(quote);
            }
            Err(e) => log::debug!("quote attempt {}/{} discarded: {}", n, policy.max_retries, e),
        }
    }
    if policy.max_retries > 0 {
        log::warn!(
            "no quote within {} attempts; rendering without one",
            policy.max_retries
        );
    }
    None
}

/// Source that never has a quote. Used when quotes are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoQuoteSource;

impl QuoteSource for NoQuoteSource {
    fn fetch(&self) -> Result<Quote, FetchError> {
        Err(FetchError::Empty)
    }
}

/// Source that always returns the same quote.
#[derive(Debug, Clone)]
pub struct StaticQuoteSource {
    quote: Quote,
}

impl StaticQuoteSource {
    pub fn new(quote: Quote) -> Self {
        Self { quote }
    }
}

impl QuoteSource for StaticQuoteSource {
    fn fetch(&self) -> Result<Quote, FetchError> {
        Ok(self.quote.clone())
    }
}

#[cfg(feature = "network")]
pub use http::HttpQuoteSource;

#[cfg(feature = "network")]
mod http {
    use super::{parse_body, FetchError, Quote, QuoteSource};
    use crate::{Error, Result};
    use reqwest::blocking::Client;
    use std::time::Duration;

    /// Fetches quotes over HTTP with a per-attempt timeout.
    pub struct HttpQuoteSource {
        client: Client,
        endpoint: String,
    }

    impl HttpQuoteSource {
        pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
            Ok(Self {
                client,
                endpoint: endpoint.into(),
            })
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    impl QuoteSource for HttpQuoteSource {
        fn fetch(&self) -> std::result::Result<Quote, FetchError> {
            let resp = self.client.get(&self.endpoint).send().map_err(classify)?;
            let status = resp.status();
            if status != reqwest::StatusCode::OK {
                return Err(FetchError::Status(status.as_u16()));
            }
            let body = resp.text().map_err(classify)?;
            parse_body(&body)
        }
    }

    fn classify(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed script of attempt outcomes, then reports `Empty`.
    struct ScriptedSource {
        script: Mutex<Vec<Result<Quote, FetchError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedSource {
        fn new(mut script: Vec<Result<Quote, FetchError>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl QuoteSource for ScriptedSource {
        fn fetch(&self) -> Result<Quote, FetchError> {
            *self.calls.lock().unwrap() += 1;
            self.script.lock().unwrap().pop().unwrap_or(Err(FetchError::Empty))
        }
    }

    #[test]
    fn parse_body_reads_nested_fields() {
        let q = parse_body(r#"{"data":{"quote":"Be brief.","author":"Seneca"}}"#).unwrap();
        assert_eq!(q, Quote::new("Be brief.", "Seneca"));
        assert_eq!(q.attribution(), "- Seneca");
    }

    #[test]
    fn parse_body_rejects_missing_data() {
        let err = parse_body(r#"{"quote":"x"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn missing_quote_field_counts_as_empty() {
        let source = StaticQuoteSource::new(parse_body(r#"{"data":{"author":"A"}}"#).unwrap());
        assert_eq!(attempt(&source, 80), Err(FetchError::Empty));
    }

    #[test]
    fn whitespace_quote_is_accepted() {
        let source = StaticQuoteSource::new(Quote::new("   ", "A"));
        assert_eq!(attempt(&source, 80), Ok(Quote::new("   ", "A")));
    }

    #[test]
    fn retries_past_failures_and_long_quotes() {
        let long = "x".repeat(81);
        let source = ScriptedSource::new(vec![
            Err(FetchError::Timeout),
            Ok(Quote::new(long, "Verbose")),
            Err(FetchError::Status(503)),
            Ok(Quote::new("Short one.", "Epictetus")),
        ]);
        let q = fetch_quote(&source, QuotePolicy::default()).unwrap();
        assert_eq!(q.author, "Epictetus");
        assert_eq!(source.calls(), 4);
    }

    #[test]
    fn exhaustion_returns_none_after_budget() {
        let source = ScriptedSource::new(vec![]);
        let policy = QuotePolicy {
            max_retries: 3,
            max_length: 80,
        };
        assert!(fetch_quote(&source, policy).is_none());
        assert_eq!(source.calls(), 3);
    }

    #[test]
    fn length_bound_is_inclusive_and_counts_chars() {
        let exact = "é".repeat(80);
        let source = StaticQuoteSource::new(Quote::new(exact, "A"));
        assert!(attempt(&source, 80).is_ok());
        assert_eq!(
            attempt(&source, 79),
            Err(FetchError::TooLong { len: 80, max: 79 })
        );
    }

    #[test]
    fn no_quote_source_never_yields() {
        assert!(fetch_quote(&NoQuoteSource, QuotePolicy::default()).is_none());
    }
}
