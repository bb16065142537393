//! Error types for the feed.
//!
//! [`FetchError`] is what the API boundary hands back instead of a partially
//! shaped response; its `Display` text is what the dashboard shows in its
//! error banner, so every variant names the symbol it failed on.
use crate::symbols::Symbol;
use reqwest::StatusCode;
use thiserror::Error;

/// A single request to the market-data API that didn't yield usable data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never got a response (DNS, TLS, connection reset, ...).
    #[error("Failed to fetch {symbol}: {source}")]
    Transport {
        symbol: Symbol,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Failed to fetch {symbol}: HTTP {status}")]
    Status { symbol: Symbol, status: StatusCode },

    /// The body was not the JSON shape we expect.
    #[error("Failed to read {symbol}: {source}")]
    Parse {
        symbol: Symbol,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed response without a price; the API's way of saying "unknown symbol".
    #[error("No data for {symbol}")]
    NoData { symbol: Symbol },

    /// A priced quote that is missing one of the required fields.
    #[error("Incomplete quote for {symbol}: missing `{field}`")]
    Incomplete { symbol: Symbol, field: &'static str },
}

impl FetchError {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Transport { symbol, .. }
            | Self::Status { symbol, .. }
            | Self::Parse { symbol, .. }
            | Self::NoData { symbol }
            | Self::Incomplete { symbol, .. } => symbol,
        }
    }
}

/// Problems building a market-data client from [`Config`](crate::config::Config).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No API token: set FINNHUB_TOKEN or pass --token")]
    MissingToken,

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("API base URL cannot carry a path: {0}")]
    NotABase(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_symbol() {
        let bad = Symbol::new("bad").unwrap();
        let err = FetchError::Status {
            symbol: bad.clone(),
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), "Failed to fetch BAD: HTTP 404 Not Found");
        assert_eq!(err.symbol(), &bad);

        let err = FetchError::NoData { symbol: bad };
        assert_eq!(err.to_string(), "No data for BAD");
    }
}
