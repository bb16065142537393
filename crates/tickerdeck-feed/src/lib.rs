//! Quote & news feed behind the tickerdeck dashboard.
//!
//! The crate owns everything that isn't drawing: parsing the symbol list,
//! fetching quotes and company news from a Finnhub-shaped API, and holding the
//! session state the dashboard is rendered from.
//! ```rust,ignore
//! let market = Finnhub::new(&Config::from_env())?;
//! let mut session = Session::new(window);
//! session.set_symbols("aapl, msft");
//! session.refresh(&market).await;
//! for quote in session.rows() {
//!     println!("{} {:.2}", quote.symbol, quote.price);
//! }
//! ```
pub mod api;
pub mod config;
pub mod error;
pub mod finnhub;
pub mod orchestrator;
pub mod schema;
pub mod selection;
pub mod session;
pub mod symbols;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    pub use crate::api::{HttpClient, MarketData};
    pub use crate::config::Config;
    pub use crate::error::{ConfigError, FetchError};
    pub use crate::finnhub::Finnhub;
    pub use crate::orchestrator::{fetch_news, fetch_quotes, Generation, NewsBatch, QuoteBatch};
    pub use crate::schema::{NewsItem, NewsWindow, Quote, QuoteSnapshot};
    pub use crate::selection::Selection;
    pub use crate::session::{NewsFeed, RefreshOutcome, Session};
    pub use crate::symbols::{parse_symbols, Symbol};
    pub use crate::view::{SortDirection, SortKey, Theme, ViewState};
}
