use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// A ticker symbol, e.g. `AAPL`.
///
/// Always trimmed, uppercased and non-empty; every way in, deserializing
/// included, goes through [`Symbol::new`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = &'static str;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Symbol::new(&raw).ok_or("symbol must not be blank")
    }
}

// lets a `BTreeMap<Symbol, _>` be queried with a plain `&str`
impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Normalise comma-separated ticker input into an ordered symbol list.
///
/// Blank tokens are dropped and repeats keep their first position, so
/// `" aapl, ,msft, AAPL"` becomes `["AAPL", "MSFT"]`. Empty input is an empty
/// list, never an error.
pub fn parse_symbols(input: &str) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .filter_map(Symbol::new)
        .filter(|symbol| seen.insert(symbol.clone()))
        .collect()
}
