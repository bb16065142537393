use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, TraceLevel};
use dotenv::dotenv;
use std::sync::Arc;
use tickerdeck_feed::prelude::*;
use tracing::{debug, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod ui;
mod watch;

fn preprocess(trace_level: Level) {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::TRACE => Level::TRACE,
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level);
    // not the whole `cli`: it may hold the token
    trace!("Command line input recorded: {:?}", cli.command);

    // environment first, command line on top
    let mut config = Config::from_env();
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    if let Some(symbols) = cli.symbols {
        config.symbols = symbols;
    }
    if let Some(days) = cli.news_days {
        config.news_days = days;
    }
    debug!("{config:?}");

    let market: Arc<dyn MarketData> = Arc::new(Finnhub::new(&config)?);
    let today = chrono::Local::now().date_naive();

    let mut session = Session::new(config.news_window(today));
    session.set_symbols(&config.symbols);
    if session.view().theme != Theme::from(cli.theme) {
        session.toggle_theme();
    }

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> tickerdeck [COMMAND]"
    match cli.command.unwrap_or(Commands::Watch) {
        // "> tickerdeck watch"
        Commands::Watch => watch::run(market, session).await?,

        // "> tickerdeck quotes [--sort COLUMN] [--desc] [--search TEXT]"
        Commands::Quotes { sort, desc, search } => {
            let key = SortKey::from(sort);
            session.click_header(key);
            if (session.view().sort_direction == SortDirection::Descending) != desc {
                session.click_header(key);
            }
            if let Some(text) = search {
                session.set_search(&text);
            }

            let pb = ui::spinner("Fetching quotes");
            let outcome = session.refresh(market.as_ref()).await;
            pb.finish_and_clear();
            debug!("quote refresh: {outcome:?}");

            if let Some(error) = session.error() {
                eprintln!("{error}");
            }
            print!("{}", ui::table(&session));
        }

        // "> tickerdeck news SYMBOL"
        Commands::News { symbol } => {
            let symbol = Symbol::new(&symbol)
                .ok_or_else(|| anyhow::anyhow!("symbol must not be empty"))?;
            let theme = session.view().theme;
            session.select_and_load(market.as_ref(), symbol).await;
            print!("{}", ui::news(session.news(), theme));
        }
    }

    Ok(())
}
