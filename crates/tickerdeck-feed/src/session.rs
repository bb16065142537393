//! The dashboard's state, owned by one controller.
//!
//! Every mutation goes through a `&mut Session` method, either in answer to a
//! user action (symbols, search, sort, row click) or to a finished request.
//! Requests are split in two halves so the caller can run the network part
//! wherever it likes:
//! ```rust,ignore
//! let request = session.begin_refresh();          // stamps generation, loading on
//! let batch = fetch_quotes(&market, request).await;
//! session.complete_refresh(batch);                // commits only if still current
//! ```
use crate::api::MarketData;
use crate::orchestrator::{
    fetch_news, fetch_quotes, Generation, NewsBatch, NewsRequest, QuoteBatch, QuoteRequest,
};
use crate::schema::{NewsItem, NewsWindow, Quote, QuoteSnapshot};
use crate::selection::Selection;
use crate::symbols::{parse_symbols, Symbol};
use crate::view::{project, SortKey, ViewState};
use tracing::{debug, trace, warn};

/// Shown when a batch ends without a specific error to report.
pub const FALLBACK_ERROR: &str = "Failed to fetch quotes";

/// News for one symbol. An empty `items` is the panel's empty state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsFeed {
    pub symbol: Option<Symbol>,
    pub items: Vec<NewsItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced with this many quotes.
    Committed(usize),
    /// Snapshot kept; the error message is set.
    Failed,
    /// An older batch finished after a newer one was issued; ignored.
    Stale,
}

#[derive(Debug)]
pub struct Session {
    symbols: Vec<Symbol>,
    snapshot: QuoteSnapshot,
    news: NewsFeed,
    view: ViewState,
    selection: Selection,
    loading: bool,
    error: Option<String>,
    news_window: NewsWindow,
    quote_generation: Generation,
    news_generation: Generation,
}

impl Session {
    pub fn new(news_window: NewsWindow) -> Self {
        Self {
            symbols: Vec::new(),
            snapshot: QuoteSnapshot::new(),
            news: NewsFeed::default(),
            view: ViewState::default(),
            selection: Selection::default(),
            loading: false,
            error: None,
            news_window,
            quote_generation: 0,
            news_generation: 0,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // symbols & selection

    /// Replace the symbol list from free text. A non-empty list selects its
    /// first symbol. Quotes are not refetched until [`begin_refresh`].
    ///
    /// Auto-selection loads no news; the news panel is emptied and any news
    /// request still in flight for the old selection goes stale.
    ///
    /// [`begin_refresh`]: Session::begin_refresh
    pub fn set_symbols(&mut self, input: &str) -> &[Symbol] {
        self.symbols = parse_symbols(input);
        trace!("symbol list set: {:?}", self.symbols);
        if self.selection.on_symbols_changed(&self.symbols) {
            debug!("auto-selected {:?}", self.selection.symbol());
            self.news_generation += 1;
            self.news = NewsFeed::default();
        }
        &self.symbols
    }

    /// Row click: select `symbol` and stamp the news request for it.
    pub fn select(&mut self, symbol: Symbol) -> NewsRequest {
        self.selection.on_row_click(symbol.clone());
        self.news_generation += 1;
        NewsRequest {
            generation: self.news_generation,
            symbol,
            window: self.news_window,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // quotes

    /// Stamp a new quote batch for the current symbol list and raise the
    /// loading flag.
    pub fn begin_refresh(&mut self) -> QuoteRequest {
        self.quote_generation += 1;
        self.loading = true;
        self.error = None;
        QuoteRequest {
            generation: self.quote_generation,
            symbols: self.symbols.clone(),
        }
    }

    /// Commit a finished batch, if it's still the latest one issued.
    pub fn complete_refresh(&mut self, batch: QuoteBatch) -> RefreshOutcome {
        if batch.generation != self.quote_generation {
            debug!(
                "ignoring stale quote batch #{} (current #{})",
                batch.generation, self.quote_generation
            );
            return RefreshOutcome::Stale;
        }

        self.loading = false;
        match batch.result {
            Ok(snapshot) => {
                let count = snapshot.len();
                self.snapshot = snapshot;
                self.error = None;
                RefreshOutcome::Committed(count)
            }
            Err(e) => {
                debug!("quote refresh failed: {e}");
                self.error = Some(e.to_string());
                RefreshOutcome::Failed
            }
        }
    }

    /// Close out a batch that never produced a result (its task died).
    pub fn abandon_refresh(&mut self, generation: Generation) -> RefreshOutcome {
        if generation != self.quote_generation {
            return RefreshOutcome::Stale;
        }
        self.loading = false;
        self.error = Some(FALLBACK_ERROR.to_string());
        RefreshOutcome::Failed
    }

    pub async fn refresh(&mut self, source: &dyn MarketData) -> RefreshOutcome {
        let request = self.begin_refresh();
        let batch = fetch_quotes(source, request).await;
        self.complete_refresh(batch)
    }

    // ---------------------------------------------------------------------------------------------
    // news

    /// Replace the news list with a finished fetch, if it belongs to the
    /// latest selection. Failures are logged and leave an empty list; they
    /// never reach the error banner.
    pub fn complete_news(&mut self, batch: NewsBatch) -> bool {
        if batch.generation != self.news_generation {
            debug!(
                "[{}] ignoring stale news #{} (current #{})",
                batch.symbol, batch.generation, self.news_generation
            );
            return false;
        }

        let items = match batch.result {
            Ok(items) => items,
            Err(e) => {
                warn!("[{}] news unavailable: {e}", batch.symbol);
                Vec::new()
            }
        };
        self.news = NewsFeed {
            symbol: Some(batch.symbol),
            items,
        };
        true
    }

    pub async fn select_and_load(&mut self, source: &dyn MarketData, symbol: Symbol) -> bool {
        let request = self.select(symbol);
        let batch = fetch_news(source, request).await;
        self.complete_news(batch)
    }

    // ---------------------------------------------------------------------------------------------
    // view controls

    pub fn set_search(&mut self, text: &str) {
        self.view.search_text = text.to_string();
    }

    pub fn click_header(&mut self, key: SortKey) {
        self.view.click_header(key);
    }

    pub fn toggle_theme(&mut self) {
        self.view.theme = self.view.theme.toggle();
    }

    pub fn set_news_window(&mut self, window: NewsWindow) {
        self.news_window = window;
    }

    // ---------------------------------------------------------------------------------------------
    // reads

    /// The table, as currently filtered & sorted.
    pub fn rows(&self) -> Vec<&Quote> {
        project(&self.snapshot, &self.view)
    }

    /// Quote behind the chart.
    pub fn selected_quote(&self) -> Option<&Quote> {
        self.selection.symbol().and_then(|s| self.snapshot.get(s))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn snapshot(&self) -> &QuoteSnapshot {
        &self.snapshot
    }

    pub fn news(&self) -> &NewsFeed {
        &self.news
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
