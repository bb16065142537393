use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One `/company-news` article.
///
/// Only the three fields the dashboard draws are typed; whatever else the
/// source sends (`datetime`, `source`, `image`, ...) rides along in `extra`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub headline: String,
    pub summary: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewsItem {
    /// Publisher name, when the source supplied one.
    pub fn source(&self) -> Option<&str> {
        self.extra.get("source").and_then(Value::as_str)
    }
}

/// Inclusive date range news is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl NewsWindow {
    /// The `days` days leading up to and including `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let span = u64::from(days.saturating_sub(1));
        Self {
            from: today.checked_sub_days(Days::new(span)).unwrap_or(today),
            to: today,
        }
    }

    /// `(from, to)` as the `YYYY-MM-DD` strings the API expects.
    pub fn query_dates(&self) -> (String, String) {
        (
            self.from.format("%Y-%m-%d").to_string(),
            self.to.format("%Y-%m-%d").to_string(),
        )
    }
}
