//! Batch quote fetching & per-symbol news fetching.
//!
//! Neither function touches the [`Session`](crate::session::Session): they take
//! a request stamped by the session, do the network work, and hand back a
//! result carrying the same stamp. The session decides on completion whether
//! the result is still current, so a slow response can't overwrite the state
//! of a newer request.
use crate::api::MarketData;
use crate::error::FetchError;
use crate::schema::{NewsItem, NewsWindow, QuoteSnapshot};
use crate::symbols::Symbol;
use futures::future::join_all;
use tracing::{debug, error, warn};

/// Monotonic stamp identifying one issued request.
pub type Generation = u64;

#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub generation: Generation,
    pub symbols: Vec<Symbol>,
}

#[derive(Debug)]
pub struct QuoteBatch {
    pub generation: Generation,
    pub result: Result<QuoteSnapshot, FetchError>,
}

#[derive(Debug, Clone)]
pub struct NewsRequest {
    pub generation: Generation,
    pub symbol: Symbol,
    pub window: NewsWindow,
}

#[derive(Debug)]
pub struct NewsBatch {
    pub generation: Generation,
    pub symbol: Symbol,
    pub result: Result<Vec<NewsItem>, FetchError>,
}

/// Fetch every symbol of `request` concurrently and fold the answers into one
/// snapshot.
///
/// All requests are issued up front and all of them are awaited; if any one
/// failed, the batch as a whole fails with the first failure in request order.
pub async fn fetch_quotes(source: &dyn MarketData, request: QuoteRequest) -> QuoteBatch {
    let time = std::time::Instant::now();
    let QuoteRequest {
        generation,
        symbols,
    } = request;

    let results = join_all(symbols.iter().map(|symbol| source.quote(symbol))).await;

    let mut snapshot = QuoteSnapshot::new();
    let mut failure = None;
    for result in results {
        match result {
            Ok(quote) => {
                snapshot.insert(quote.symbol.clone(), quote);
            }
            Err(e) => {
                error!("{e}");
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }
    }

    let result = match failure {
        Some(e) => {
            warn!(
                "quote batch #{generation} dropped: {} of {} symbols succeeded",
                snapshot.len(),
                symbols.len()
            );
            Err(e)
        }
        None => {
            debug!(
                "quote batch #{generation}: {} quotes. Elapsed time: {} ms",
                snapshot.len(),
                time.elapsed().as_millis()
            );
            Ok(snapshot)
        }
    };

    QuoteBatch { generation, result }
}

/// Fetch company news for the one symbol in `request`.
pub async fn fetch_news(source: &dyn MarketData, request: NewsRequest) -> NewsBatch {
    let NewsRequest {
        generation,
        symbol,
        window,
    } = request;
    let result = source.company_news(&symbol, &window).await;
    NewsBatch {
        generation,
        symbol,
        result,
    }
}
