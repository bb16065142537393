use crate::api::{HttpClient, MarketData};
use crate::config::Config;
use crate::error::{ConfigError, FetchError};
use crate::schema::{NewsItem, NewsWindow, Quote, QuoteResponse};
use crate::symbols::Symbol;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, trace};
use url::Url;

/// [`MarketData`] backed by the Finnhub REST API (or anything that speaks its
/// `/quote` & `/company-news` shapes).
pub struct Finnhub {
    http_client: HttpClient,
    base_url: Url,
    token: String,
}

impl Finnhub {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        Self::with_client(builder.build()?, &config.base_url, config.token()?)
    }

    pub fn with_client(
        http_client: HttpClient,
        base_url: &str,
        token: &str,
    ) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::NotABase(base_url.to_string()));
        }
        Ok(Self {
            http_client,
            base_url,
            token: token.to_string(),
        })
    }

    /// `{base}/{endpoint}?{params}&token={token}`
    pub fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint);
        }
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("token", &self.token);
        url
    }

    async fn get(&self, symbol: &Symbol, url: Url) -> Result<(StatusCode, Vec<u8>), FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            symbol: symbol.clone(),
            // the url carries the token
            source: source.without_url(),
        };

        let response = self.http_client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl MarketData for Finnhub {
    async fn quote(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let url = self.url("quote", &[("symbol", symbol.as_str())]);

        trace!("[{symbol}] fetching quote");
        let (status, body) = self.get(symbol, url).await.map_err(|e| {
            debug!("[{symbol}] quote request failed: {e}");
            e
        })?;

        let quote = parse_quote(symbol, status, &body)?;
        debug!("[{symbol}] quote fetched: {:.2}", quote.price);
        Ok(quote)
    }

    async fn company_news(
        &self,
        symbol: &Symbol,
        window: &NewsWindow,
    ) -> Result<Vec<NewsItem>, FetchError> {
        let (from, to) = window.query_dates();
        let url = self.url(
            "company-news",
            &[("symbol", symbol.as_str()), ("from", &from), ("to", &to)],
        );

        trace!("[{symbol}] fetching company news {from}..{to}");
        let (status, body) = self.get(symbol, url).await?;

        let news = parse_news(symbol, status, &body)?;
        debug!("[{symbol}] {} news items fetched", news.len());
        Ok(news)
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Validate a raw `/quote` response.
pub fn parse_quote(symbol: &Symbol, status: StatusCode, body: &[u8]) -> Result<Quote, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            symbol: symbol.clone(),
            status,
        });
    }

    let raw = serde_json::from_slice::<QuoteResponse>(body).map_err(|source| FetchError::Parse {
        symbol: symbol.clone(),
        source,
    })?;
    raw.validate(symbol)
}

/// Validate a raw `/company-news` response.
pub fn parse_news(
    symbol: &Symbol,
    status: StatusCode,
    body: &[u8],
) -> Result<Vec<NewsItem>, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Status {
            symbol: symbol.clone(),
            status,
        });
    }

    serde_json::from_slice(body).map_err(|source| FetchError::Parse {
        symbol: symbol.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finnhub(base: &str) -> Finnhub {
        Finnhub::with_client(HttpClient::new(), base, "t0k3n").unwrap()
    }

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    #[test]
    fn quote_url_carries_symbol_and_token() {
        let url = finnhub("https://finnhub.io/api/v1").url("quote", &[("symbol", "AAPL")]);
        assert_eq!(
            url.as_str(),
            "https://finnhub.io/api/v1/quote?symbol=AAPL&token=t0k3n"
        );
    }

    #[test]
    fn trailing_slash_base_is_tolerated() {
        let url = finnhub("http://localhost:8080/v1/").url(
            "company-news",
            &[("symbol", "MSFT"), ("from", "2024-01-01"), ("to", "2024-01-07")],
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/company-news?symbol=MSFT&from=2024-01-01&to=2024-01-07&token=t0k3n"
        );
    }

    #[test]
    fn symbols_are_query_encoded() {
        let url = finnhub("https://finnhub.io/api/v1").url("quote", &[("symbol", "BRK B&X")]);
        assert_eq!(url.query(), Some("symbol=BRK+B%26X&token=t0k3n"));
    }

    #[test]
    fn rejects_non_base_url() {
        let err = Finnhub::with_client(HttpClient::new(), "mailto:me@example.com", "t");
        assert!(matches!(err, Err(ConfigError::NotABase(_))));
    }

    #[test]
    fn new_requires_token() {
        let err = Finnhub::new(&Config::default());
        assert!(matches!(err, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn quote_status_error() {
        let err = parse_quote(&sym("BAD"), StatusCode::NOT_FOUND, b"").unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
    }

    #[test]
    fn quote_malformed_body() {
        let err = parse_quote(&sym("AAPL"), StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[test]
    fn quote_sentinel_is_no_data() {
        let body = br#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0}"#;
        let err = parse_quote(&sym("ZZZZ"), StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::NoData { .. }));
    }

    #[test]
    fn quote_ok() {
        let body = br#"{"c":410.5,"d":-2.5,"dp":-0.6,"h":415,"l":409,"o":413,"pc":413}"#;
        let quote = parse_quote(&sym("msft"), StatusCode::OK, body).unwrap();
        assert_eq!(quote.symbol.as_str(), "MSFT");
        assert_eq!(quote.change, -2.5);
        assert_eq!(quote.low, Some(409.0));
    }

    #[test]
    fn news_ok_and_errors() {
        let body = br#"[{"headline":"h","summary":"s","url":"u","source":"AP"}]"#;
        let news = parse_news(&sym("AAPL"), StatusCode::OK, body).unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].source(), Some("AP"));

        let empty = parse_news(&sym("AAPL"), StatusCode::OK, b"[]").unwrap();
        assert!(empty.is_empty());

        let err = parse_news(&sym("AAPL"), StatusCode::TOO_MANY_REQUESTS, b"").unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));

        let err = parse_news(&sym("AAPL"), StatusCode::OK, br#"{"error":"x"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }
}
