use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://api.quotable.io/random";

static QUOTES_DIR: Dir = include_dir!("src/quotes");

/// Errors that can occur while obtaining a quote
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("quote service answered with status {0}")]
    Status(u16),

    #[error("malformed quote document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("quote is empty")]
    EmptyQuote,

    #[error("quote list {0} not found")]
    MissingList(String),
}

/// Immutable, non-empty text the player has to type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    text: String,
    chars: Vec<char>,
}

impl Quote {
    pub fn new(text: impl Into<String>) -> Result<Self, FetchError> {
        let text = text.into();
        if text.is_empty() {
            return Err(FetchError::EmptyQuote);
        }
        let chars = text.chars().collect();
        Ok(Self { text, chars })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    /// Length in characters, not bytes
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Source of quotes. Implementations block until the quote is available,
/// so callers are expected to run them off the UI loop.
pub trait QuoteProvider: Send + Sync {
    fn fetch_quote(&self) -> Result<Quote, FetchError>;
}

#[derive(Deserialize)]
struct QuoteDocument {
    content: String,
}

/// Parse a quote service response body, ignoring everything but `content`
pub fn parse_quote(body: &str) -> Result<Quote, FetchError> {
    let doc: QuoteDocument = serde_json::from_str(body)?;
    Quote::new(doc.content)
}

/// Fetches a random quote from a remote JSON endpoint
#[derive(Debug, Clone)]
pub struct HttpQuoteProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpQuoteProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QuoteProvider for HttpQuoteProvider {
    fn fetch_quote(&self) -> Result<Quote, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "requesting quote");
        let response = self.client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text()?;
        parse_quote(&body)
    }
}

#[derive(Deserialize)]
struct QuoteBook {
    #[allow(dead_code)]
    name: String,
    quotes: Vec<String>,
}

/// Picks a random quote from the list compiled into the binary
#[derive(Debug, Clone)]
pub struct BuiltinQuoteProvider {
    quotes: Vec<String>,
}

impl BuiltinQuoteProvider {
    pub fn new() -> Result<Self, FetchError> {
        let file_name = "builtin.json";
        let file = QUOTES_DIR
            .get_file(file_name)
            .ok_or_else(|| FetchError::MissingList(file_name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| FetchError::MissingList(file_name.to_string()))?;
        let book: QuoteBook = serde_json::from_str(contents)?;
        let quotes: Vec<String> = book.quotes.into_iter().filter(|q| !q.is_empty()).collect();
        if quotes.is_empty() {
            return Err(FetchError::EmptyQuote);
        }
        Ok(Self { quotes })
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }
}

impl QuoteProvider for BuiltinQuoteProvider {
    fn fetch_quote(&self) -> Result<Quote, FetchError> {
        let text = self
            .quotes
            .choose(&mut rand::thread_rng())
            .ok_or(FetchError::EmptyQuote)?;
        Quote::new(text.clone())
    }
}

/// Always hands out the same quote (custom prompt)
#[derive(Debug, Clone)]
pub struct FixedQuoteProvider {
    quote: Quote,
}

impl FixedQuoteProvider {
    pub fn new(text: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self {
            quote: Quote::new(text)?,
        })
    }
}

impl QuoteProvider for FixedQuoteProvider {
    fn fetch_quote(&self) -> Result<Quote, FetchError> {
        Ok(self.quote.clone())
    }
}
