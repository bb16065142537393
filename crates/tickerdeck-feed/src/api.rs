use crate::error::FetchError;
use crate::schema::{NewsItem, NewsWindow, Quote};
use crate::symbols::Symbol;
use async_trait::async_trait;

pub type HttpClient = reqwest::Client;

/// A source of quotes & company news.
///
/// Implementations validate at the boundary: callers only ever receive a
/// complete [`Quote`] / [`NewsItem`] list or a typed [`FetchError`].
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Latest quote for a single symbol.
    async fn quote(&self, symbol: &Symbol) -> Result<Quote, FetchError>;

    /// Company news for `symbol` published within `window`.
    async fn company_news(
        &self,
        symbol: &Symbol,
        window: &NewsWindow,
    ) -> Result<Vec<NewsItem>, FetchError>;
}
