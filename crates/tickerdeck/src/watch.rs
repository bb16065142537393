//! Interactive mode.
//!
//! One task owns the [`Session`]; requests run on spawned tasks and report
//! back over a channel, so typing stays responsive while quotes load.
use crate::ui;
use anyhow::Result;
use indicatif::ProgressBar;
use std::sync::Arc;
use tickerdeck_feed::orchestrator::{NewsRequest, QuoteRequest};
use tickerdeck_feed::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info};

const HELP: &str = "\
commands:
  symbols <A,B,..>   replace the symbol list (then `refresh`)
  refresh            fetch quotes for every symbol
  search <text>      filter rows by symbol; no text clears
  sort <column>      symbol | price | change | pct | high | low (again to flip)
  select <SYM|#>     select a symbol or row number and load its news
  theme              toggle dark / light
  show               redraw
  help               this text
  quit";

#[derive(Debug)]
enum Event {
    Quotes(QuoteBatch),
    QuotesAbandoned(Generation),
    News(NewsBatch),
}

#[derive(Debug, PartialEq)]
enum Command {
    Symbols(String),
    Refresh,
    Search(String),
    Sort(SortKey),
    Select(String),
    Theme,
    Show,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_ascii_lowercase().as_str() {
            "symbols" | "s" => Command::Symbols(rest.to_string()),
            "refresh" | "r" => Command::Refresh,
            "search" | "/" => Command::Search(rest.to_string()),
            "sort" => Command::Sort(rest.parse()?),
            "select" | "sel" => {
                if rest.is_empty() {
                    return Err("select what?".to_string());
                }
                Command::Select(rest.to_string())
            }
            "theme" => Command::Theme,
            "show" | "ls" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command `{other}`; try `help`")),
        };
        Ok(Some(command))
    }
}

pub async fn run(market: Arc<dyn MarketData>, mut session: Session) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut spinner: Option<ProgressBar> = None;

    // first load happens without being asked
    spawn_refresh(&market, session.begin_refresh(), &tx);
    sync_spinner(&session, &mut spinner);
    draw(&session, &spinner);
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        if let Err(msg) = apply(command, &mut session, &market, &tx) {
                            println!("{msg}");
                            continue;
                        }
                    }
                    Ok(None) => continue,
                    Err(msg) => {
                        println!("{msg}");
                        continue;
                    }
                }
            }

            Some(event) = rx.recv() => match event {
                Event::Quotes(batch) => {
                    let generation = batch.generation;
                    let outcome = session.complete_refresh(batch);
                    info!("quote batch #{generation}: {outcome:?}");
                    if outcome == RefreshOutcome::Stale {
                        continue;
                    }
                }
                Event::QuotesAbandoned(generation) => {
                    session.abandon_refresh(generation);
                }
                Event::News(batch) => {
                    if !session.complete_news(batch) {
                        continue;
                    }
                }
            },
        }

        sync_spinner(&session, &mut spinner);
        draw(&session, &spinner);
    }

    if let Some(pb) = spinner.take() {
        pb.finish_and_clear();
    }
    Ok(())
}

/// Apply one user command. `Err` is a message for the user; the session is
/// unchanged in that case.
fn apply(
    command: Command,
    session: &mut Session,
    market: &Arc<dyn MarketData>,
    tx: &UnboundedSender<Event>,
) -> Result<(), String> {
    match command {
        Command::Symbols(list) => {
            let symbols = session.set_symbols(&list);
            info!("watching {} symbols", symbols.len());
        }
        Command::Refresh => spawn_refresh(market, session.begin_refresh(), tx),
        Command::Search(text) => session.set_search(&text),
        Command::Sort(key) => session.click_header(key),
        Command::Select(target) => {
            let symbol = resolve_row(session, &target)?;
            spawn_news(market, session.select(symbol), tx);
        }
        Command::Theme => session.toggle_theme(),
        Command::Help => println!("{HELP}"),
        Command::Show | Command::Quit => {}
    }
    Ok(())
}

/// `target` is either a 1-based row number of the current table or a symbol.
fn resolve_row(session: &Session, target: &str) -> Result<Symbol, String> {
    if let Ok(row) = target.parse::<usize>() {
        return session
            .rows()
            .get(row.wrapping_sub(1))
            .map(|quote| quote.symbol.clone())
            .ok_or_else(|| format!("no row {row}"));
    }
    Symbol::new(target).ok_or_else(|| "select what?".to_string())
}

fn spawn_refresh(market: &Arc<dyn MarketData>, request: QuoteRequest, tx: &UnboundedSender<Event>) {
    let market = market.clone();
    let tx = tx.clone();
    let generation = request.generation;
    tokio::spawn(async move {
        let fetch = tokio::spawn(async move { fetch_quotes(market.as_ref(), request).await });
        let event = match fetch.await {
            Ok(batch) => Event::Quotes(batch),
            Err(e) => {
                error!("quote batch #{generation} died: {e}");
                Event::QuotesAbandoned(generation)
            }
        };
        if tx.send(event).is_err() {
            debug!("dashboard closed before quote batch #{generation} landed");
        }
    });
}

fn spawn_news(market: &Arc<dyn MarketData>, request: NewsRequest, tx: &UnboundedSender<Event>) {
    let market = market.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let batch = fetch_news(market.as_ref(), request).await;
        if tx.send(Event::News(batch)).is_err() {
            debug!("dashboard closed before news landed");
        }
    });
}

fn draw(session: &Session, spinner: &Option<ProgressBar>) {
    let screen = ui::dashboard(session);
    match spinner {
        Some(pb) => pb.suspend(|| println!("{screen}")),
        None => println!("{screen}"),
    }
}

fn sync_spinner(session: &Session, spinner: &mut Option<ProgressBar>) {
    match (session.loading(), spinner.is_some()) {
        (true, false) => *spinner = Some(ui::spinner("Fetching quotes")),
        (false, true) => {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
        }
        _ => {}
    }
}
