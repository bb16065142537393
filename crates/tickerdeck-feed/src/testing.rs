//! In-memory [`MarketData`] for unit tests.
use crate::api::MarketData;
use crate::error::FetchError;
use crate::schema::{NewsItem, NewsWindow, Quote};
use crate::symbols::{parse_symbols, Symbol};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde_json::Map;
use std::collections::HashMap;
use std::sync::Mutex;

enum Canned<T> {
    Ok(T),
    Status(StatusCode),
    NoData,
}

#[derive(Default)]
pub struct StubMarket {
    quotes: HashMap<Symbol, Canned<Quote>>,
    news: HashMap<Symbol, Canned<Vec<NewsItem>>>,
    quote_calls: Mutex<Vec<Symbol>>,
    news_calls: Mutex<Vec<Symbol>>,
}

impl StubMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, symbol: &str, price: f64, change: f64) -> Self {
        self.quotes.insert(sym(symbol), Canned::Ok(quote(symbol, price, change)));
        self
    }

    pub fn with_status(mut self, symbol: &str, status: StatusCode) -> Self {
        self.quotes.insert(sym(symbol), Canned::Status(status));
        self
    }

    pub fn with_no_data(mut self, symbol: &str) -> Self {
        self.quotes.insert(sym(symbol), Canned::NoData);
        self
    }

    pub fn with_news(mut self, symbol: &str, headlines: &[&str]) -> Self {
        let items = headlines.iter().map(|h| news_item(h)).collect();
        self.news.insert(sym(symbol), Canned::Ok(items));
        self
    }

    pub fn with_news_status(mut self, symbol: &str, status: StatusCode) -> Self {
        self.news.insert(sym(symbol), Canned::Status(status));
        self
    }

    pub fn quote_calls(&self) -> Vec<Symbol> {
        self.quote_calls.lock().unwrap().clone()
    }

    pub fn news_calls(&self) -> Vec<Symbol> {
        self.news_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketData for StubMarket {
    async fn quote(&self, symbol: &Symbol) -> Result<Quote, FetchError> {
        self.quote_calls.lock().unwrap().push(symbol.clone());
        match self.quotes.get(symbol) {
            Some(Canned::Ok(quote)) => Ok(quote.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                symbol: symbol.clone(),
                status: *status,
            }),
            Some(Canned::NoData) | None => Err(FetchError::NoData {
                symbol: symbol.clone(),
            }),
        }
    }

    async fn company_news(
        &self,
        symbol: &Symbol,
        _window: &NewsWindow,
    ) -> Result<Vec<NewsItem>, FetchError> {
        self.news_calls.lock().unwrap().push(symbol.clone());
        match self.news.get(symbol) {
            Some(Canned::Ok(items)) => Ok(items.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                symbol: symbol.clone(),
                status: *status,
            }),
            Some(Canned::NoData) | None => Ok(vec![]),
        }
    }
}

pub fn sym(s: &str) -> Symbol {
    Symbol::new(s).unwrap()
}

pub fn syms(s: &str) -> Vec<Symbol> {
    parse_symbols(s)
}

pub fn quote(symbol: &str, price: f64, change: f64) -> Quote {
    Quote {
        symbol: sym(symbol),
        price,
        change,
        change_pct: change / (price - change) * 100.0,
        high: Some(price + 1.0),
        low: Some(price - 1.0),
        open: Some(price - change),
        prev_close: Some(price - change),
    }
}

pub fn news_item(headline: &str) -> NewsItem {
    NewsItem {
        headline: headline.to_string(),
        summary: format!("{headline} summary"),
        url: format!("https://example.com/{}", headline.replace(' ', "-")),
        extra: Map::new(),
    }
}

pub fn window() -> NewsWindow {
    NewsWindow::trailing(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(), 7)
}
