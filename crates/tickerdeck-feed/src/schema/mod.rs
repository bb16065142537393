pub mod news;
pub mod quote;

pub use news::{NewsItem, NewsWindow};
pub use quote::{Quote, QuoteResponse, QuoteSnapshot};
