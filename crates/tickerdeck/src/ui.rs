use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;
use tickerdeck_feed::prelude::*;

const CHART_WIDTH: usize = 40;
const NEWS_LIMIT: usize = 8;

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Dashboard
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Error banner, quote table, chart & news panel, top to bottom.
pub fn dashboard(session: &Session) -> String {
    let mut out = String::new();
    if let Some(error) = session.error() {
        let _ = writeln!(out, "{}\n", error.red().bold());
    }
    out.push_str(&table(session));
    out.push('\n');
    let theme = session.view().theme;
    match (session.selected_quote(), session.selection().symbol()) {
        (Some(quote), _) => out.push_str(&chart(quote, theme)),
        (None, Some(symbol)) => {
            let _ = writeln!(out, "{}", header(&format!("No quote for {symbol}"), theme));
        }
        (None, None) => {
            let _ = writeln!(out, "{}", header("No symbol selected", theme));
        }
    }
    out.push('\n');
    out.push_str(&news(session.news(), session.view().theme));
    out
}

/// The quote table, with the selected row marked and the active column
/// showing its sort direction.
pub fn table(session: &Session) -> String {
    let view = session.view();
    let selected = session.selection().symbol();
    let mut out = String::new();

    let title = |key: SortKey| {
        if key == view.sort_key {
            let arrow = match view.sort_direction {
                SortDirection::Ascending => '^',
                SortDirection::Descending => 'v',
            };
            format!("{} {arrow}", key.label())
        } else {
            key.label().to_string()
        }
    };
    let heading = format!(
        "   {:>3}  {:<8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "#",
        title(SortKey::Symbol),
        title(SortKey::Price),
        title(SortKey::Change),
        title(SortKey::ChangePct),
        title(SortKey::High),
        title(SortKey::Low),
    );
    let _ = writeln!(out, "{}", header(&heading, view.theme));

    let rows = session.rows();
    if rows.is_empty() {
        let msg = if session.loading() {
            "Loading quotes ..."
        } else if session.snapshot().is_empty() {
            "No quotes"
        } else {
            "No symbols match the search"
        };
        let _ = writeln!(out, "   {}", msg.dimmed());
        return out;
    }

    for (i, quote) in rows.iter().enumerate() {
        let marker = if Some(&quote.symbol) == selected { '>' } else { ' ' };
        let change = signed(quote.change, &format!("{:>+10.2}", quote.change));
        let change_pct = signed(quote.change, &format!("{:>+9.2}%", quote.change_pct));
        let _ = writeln!(
            out,
            " {marker} {:>3}  {:<8} {:>10.2} {change} {change_pct} {:>10} {:>10}",
            i + 1,
            quote.symbol.as_str(),
            quote.price,
            optional(quote.high),
            optional(quote.low),
        );
    }
    out
}

/// Horizontal bars of the selected quote's open / high / low / price /
/// previous close, scaled between the smallest and largest of them.
pub fn chart(quote: &Quote, theme: Theme) -> String {
    let points: Vec<(&str, f64)> = [
        ("Open", quote.open),
        ("High", quote.high),
        ("Low", quote.low),
        ("Price", Some(quote.price)),
        ("Prev close", quote.prev_close),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect();

    let min = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    let mut out = String::new();
    let _ = writeln!(out, "{}", header(&format!("{} chart", quote.symbol), theme));
    for (label, value) in points {
        let bar = "#".repeat(bar_len(value, min, max, CHART_WIDTH));
        let bar = if label == "Price" {
            signed(quote.change, &bar)
        } else {
            bar.normal()
        };
        let _ = writeln!(out, "   {label:<10} {bar:<width$} {value:.2}", width = CHART_WIDTH);
    }
    out
}

/// The news panel, or its empty state.
pub fn news(feed: &NewsFeed, theme: Theme) -> String {
    let mut out = String::new();
    let Some(symbol) = &feed.symbol else {
        let _ = writeln!(out, "{}", "Select a symbol to load its news".dimmed());
        return out;
    };

    let _ = writeln!(out, "{}", header(&format!("{symbol} news"), theme));
    if feed.items.is_empty() {
        let _ = writeln!(out, "   {}", format!("No news for {symbol}").dimmed());
        return out;
    }

    for item in feed.items.iter().take(NEWS_LIMIT) {
        match item.source() {
            Some(source) => {
                let _ = writeln!(out, " * {} ({})", item.headline.bold(), source);
            }
            None => {
                let _ = writeln!(out, " * {}", item.headline.bold());
            }
        }
        if !item.summary.is_empty() {
            let _ = writeln!(out, "   {}", truncate(&item.summary, 100));
        }
        let _ = writeln!(out, "   {}", item.url.dimmed());
    }
    if feed.items.len() > NEWS_LIMIT {
        let _ = writeln!(out, "   ... {} more", feed.items.len() - NEWS_LIMIT);
    }
    out
}

// -------------------------------------------------------------------------------------------------

fn header(text: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Dark => text.bright_cyan().bold(),
        Theme::Light => text.blue().bold(),
    }
}

fn signed(change: f64, text: &str) -> ColoredString {
    if change > 0.0 {
        text.green()
    } else if change < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn bar_len(value: f64, min: f64, max: f64, width: usize) -> usize {
    if max <= min {
        return width;
    }
    let scaled = (value - min) / (max - min) * (width - 1) as f64;
    1 + scaled.round() as usize
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
