//! Search / sort controls and the table projection derived from them.
use crate::schema::{Quote, QuoteSnapshot};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Symbol,
    Price,
    ChangePct,
    Change,
    High,
    Low,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Symbol => "Symbol",
            SortKey::Price => "Price",
            SortKey::ChangePct => "Change %",
            SortKey::Change => "Change",
            SortKey::High => "High",
            SortKey::Low => "Low",
        }
    }

    fn number(self, quote: &Quote) -> Option<f64> {
        match self {
            SortKey::Symbol => None,
            SortKey::Price => Some(quote.price),
            SortKey::ChangePct => Some(quote.change_pct),
            SortKey::Change => Some(quote.change),
            SortKey::High => quote.high,
            SortKey::Low => quote.low,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symbol" | "sym" => Ok(SortKey::Symbol),
            "price" => Ok(SortKey::Price),
            "change_pct" | "changepct" | "pct" | "%" => Ok(SortKey::ChangePct),
            "change" => Ok(SortKey::Change),
            "high" => Ok(SortKey::High),
            "low" => Ok(SortKey::Low),
            other => Err(format!("unknown column `{other}`")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Cosmetic only; nothing in the feed reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// User-controlled table state. Starts out sorted by symbol, ascending, with
/// no search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub search_text: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub theme: Theme,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_key: SortKey::Symbol,
            sort_direction: SortDirection::Ascending,
            theme: Theme::Dark,
        }
    }
}

impl ViewState {
    /// A click on a column header: the active column flips direction, any
    /// other column becomes active in ascending order.
    pub fn click_header(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.toggle();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Ascending;
        }
    }
}

/// Table comparator.
///
/// Equal or absent values fall back to ascending symbol order, and the sort
/// direction is deliberately not applied to that fallback.
pub fn compare(a: &Quote, b: &Quote, key: SortKey, direction: SortDirection) -> Ordering {
    let by_symbol = a.symbol.cmp(&b.symbol);

    let ordering = match key {
        SortKey::Symbol => by_symbol,
        _ => match (key.number(a), key.number(b)) {
            (Some(x), Some(y)) => (x - y).partial_cmp(&0.0).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    };

    match ordering {
        Ordering::Equal => by_symbol,
        ordering => direction.apply(ordering),
    }
}

/// Rows of the quote table: `snapshot` filtered by the search text and sorted
/// by the active column. Deterministic for the same inputs.
pub fn project<'a>(snapshot: &'a QuoteSnapshot, view: &ViewState) -> Vec<&'a Quote> {
    let needle = view.search_text.to_uppercase();
    let rows: Vec<&Quote> = snapshot
        .values()
        .filter(|quote| quote.symbol.as_str().contains(needle.as_str()))
        .collect();

    merge_sort_by(&rows, &mut |a: &&Quote, b: &&Quote| {
        compare(a, b, view.sort_key, view.sort_direction)
    })
}

// `slice::sort_by` may panic when the comparator isn't a total order, which
// `compare` isn't once absent values are mixed with present ones. A plain
// stable merge sort never inspects consistency.
fn merge_sort_by<T, F>(items: &[T], compare: &mut F) -> Vec<T>
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let (left, right) = items.split_at(items.len() / 2);
    let left = merge_sort_by(left, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(items.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if compare(&right[j], &left[i]) == Ordering::Less {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}
