use crate::error::ConfigError;
use crate::schema::NewsWindow;
use chrono::NaiveDate;
use dotenv::var;

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_SYMBOLS: &str = "AAPL,MSFT,GOOGL,AMZN";
pub const DEFAULT_NEWS_DAYS: u32 = 7;

/// Settings for talking to the market-data API.
///
/// Read from the environment (and `.env`) with [`Config::from_env`]; the CLI
/// overwrites individual fields afterwards.
#[derive(Clone)]
pub struct Config {
    pub token: Option<String>,
    pub base_url: String,
    pub user_agent: Option<String>,
    pub symbols: String,
    pub news_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            symbols: DEFAULT_SYMBOLS.to_string(),
            news_days: DEFAULT_NEWS_DAYS,
        }
    }
}

impl Config {
    /// `FINNHUB_TOKEN`, `FINNHUB_URL`, `USER_AGENT`, `TICKERDECK_SYMBOLS`,
    /// `TICKERDECK_NEWS_DAYS`; anything unset keeps its default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token: var("FINNHUB_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            base_url: var("FINNHUB_URL").unwrap_or(defaults.base_url),
            user_agent: var("USER_AGENT").ok(),
            symbols: var("TICKERDECK_SYMBOLS").unwrap_or(defaults.symbols),
            news_days: var("TICKERDECK_NEWS_DAYS")
                .ok()
                .and_then(|days| days.parse().ok())
                .unwrap_or(defaults.news_days),
        }
    }

    pub fn token(&self) -> Result<&str, ConfigError> {
        self.token.as_deref().ok_or(ConfigError::MissingToken)
    }

    pub fn news_window(&self, today: NaiveDate) -> NewsWindow {
        NewsWindow::trailing(today, self.news_days)
    }
}

// the token must never end up in a log line
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("symbols", &self.symbols)
            .field("news_days", &self.news_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_an_error() {
        let config = Config::default();
        assert!(matches!(config.token(), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn debug_redacts_token() {
        let config = Config {
            token: Some("sekret".to_string()),
            ..Default::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("sekret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn news_window_uses_configured_days() {
        let config = Config {
            news_days: 3,
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let window = config.news_window(today);
        assert_eq!(window.from, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(window.to, today);
    }
}
