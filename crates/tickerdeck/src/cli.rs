use clap::{Parser, Subcommand, ValueEnum};
use tickerdeck_feed::view::{SortKey, Theme};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sets the level of tracing
    #[arg(long, value_enum, ignore_case = true, default_value = "warn")]
    pub trace: TraceLevel,

    /// Finnhub API token [default: $FINNHUB_TOKEN]
    #[arg(long)]
    pub token: Option<String>,

    /// Comma-separated symbols to watch [default: $TICKERDECK_SYMBOLS]
    #[arg(long)]
    pub symbols: Option<String>,

    /// Days of company news to request, ending today
    #[arg(long)]
    pub news_days: Option<u32>,

    /// Colour theme
    #[arg(long, value_enum, default_value = "dark")]
    pub theme: ThemeArg,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive dashboard (the default).
    Watch,

    /// Fetch quotes once and print the table.
    Quotes {
        /// Column to sort by
        #[arg(long, value_enum, default_value = "symbol")]
        sort: Column,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Only show symbols containing this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Fetch company news for one symbol and print it.
    News { symbol: String },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Column {
    Symbol,
    Price,
    Change,
    ChangePct,
    High,
    Low,
}

impl From<Column> for SortKey {
    fn from(column: Column) -> Self {
        match column {
            Column::Symbol => SortKey::Symbol,
            Column::Price => SortKey::Price,
            Column::Change => SortKey::Change,
            Column::ChangePct => SortKey::ChangePct,
            Column::High => SortKey::High,
            Column::Low => SortKey::Low,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["tickerdeck"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.trace, TraceLevel::WARN);
        assert_eq!(cli.theme, ThemeArg::Dark);
    }

    #[test]
    fn quotes_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "tickerdeck",
            "--symbols",
            "aapl,msft",
            "quotes",
            "--sort",
            "change-pct",
            "--desc",
        ])
        .unwrap();

        assert_eq!(cli.symbols.as_deref(), Some("aapl,msft"));
        match cli.command {
            Some(Commands::Quotes { sort, desc, search }) => {
                assert_eq!(SortKey::from(sort), SortKey::ChangePct);
                assert!(desc);
                assert!(search.is_none());
            }
            other => panic!("expected quotes, got {other:?}"),
        }
    }

    #[test]
    fn news_requires_symbol() {
        assert!(Cli::try_parse_from(["tickerdeck", "news"]).is_err());
        let cli = Cli::try_parse_from(["tickerdeck", "news", "nvda"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::News { symbol }) if symbol == "nvda"));
    }
}
