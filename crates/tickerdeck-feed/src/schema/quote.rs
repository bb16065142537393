use crate::error::FetchError;
use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Output: Quote
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Point-in-time price of one symbol. Every number is finite; the optional
/// ones are simply absent when the API has nothing for them.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: Symbol,
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
    pub prev_close: Option<f64>,
}

/// Every quote of one successful batch, keyed by symbol.
pub type QuoteSnapshot = BTreeMap<Symbol, Quote>;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Input: Finnhub `/quote`
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Raw `/quote` body, e.g.
/// ```json
/// { "c": 189.84, "d": 1.21, "dp": 0.6415, "h": 190.32, "l": 188.19, "o": 188.42, "pc": 188.63, "t": 1700000000 }
/// ```
#[derive(Deserialize, Debug, Default)]
pub struct QuoteResponse {
    #[serde(rename = "c")]
    pub current: Option<f64>,
    #[serde(rename = "d")]
    pub change: Option<f64>,
    #[serde(rename = "dp")]
    pub change_pct: Option<f64>,
    #[serde(rename = "h")]
    pub high: Option<f64>,
    #[serde(rename = "l")]
    pub low: Option<f64>,
    #[serde(rename = "o")]
    pub open: Option<f64>,
    #[serde(rename = "pc")]
    pub prev_close: Option<f64>,
}

impl QuoteResponse {
    /// Turn the raw body into a [`Quote`].
    ///
    /// A zero or missing `c` is the API's "no data" answer and is an error,
    /// never a zero-priced quote.
    pub fn validate(self, symbol: &Symbol) -> Result<Quote, FetchError> {
        let price = finite(self.current)
            .filter(|price| *price != 0.0)
            .ok_or_else(|| FetchError::NoData {
                symbol: symbol.clone(),
            })?;

        let required = |value: Option<f64>, field: &'static str| {
            finite(value).ok_or_else(|| FetchError::Incomplete {
                symbol: symbol.clone(),
                field,
            })
        };

        Ok(Quote {
            symbol: symbol.clone(),
            price,
            change: required(self.change, "d")?,
            change_pct: required(self.change_pct, "dp")?,
            high: finite(self.high),
            low: finite(self.low),
            open: finite(self.open),
            prev_close: finite(self.prev_close),
        })
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Symbol {
        Symbol::new("AAPL").unwrap()
    }

    #[test]
    fn full_body_validates() {
        let raw: QuoteResponse = serde_json::from_str(
            r#"{"c":189.84,"d":1.21,"dp":0.6415,"h":190.32,"l":188.19,"o":188.42,"pc":188.63,"t":1700000000}"#,
        )
        .unwrap();
        let quote = raw.validate(&aapl()).unwrap();

        assert_eq!(quote.symbol, aapl());
        assert_eq!(quote.price, 189.84);
        assert_eq!(quote.change, 1.21);
        assert_eq!(quote.change_pct, 0.6415);
        assert_eq!(quote.high, Some(190.32));
        assert_eq!(quote.prev_close, Some(188.63));
    }

    #[test]
    fn zero_price_is_no_data() {
        // what Finnhub sends back for an unknown ticker
        let raw: QuoteResponse = serde_json::from_str(
            r#"{"c":0,"d":null,"dp":null,"h":0,"l":0,"o":0,"pc":0,"t":0}"#,
        )
        .unwrap();
        assert!(matches!(
            raw.validate(&aapl()),
            Err(FetchError::NoData { .. })
        ));
    }

    #[test]
    fn missing_price_is_no_data() {
        let raw: QuoteResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            raw.validate(&aapl()),
            Err(FetchError::NoData { .. })
        ));
    }

    #[test]
    fn missing_change_is_incomplete() {
        let raw = QuoteResponse {
            current: Some(10.0),
            change_pct: Some(1.0),
            ..Default::default()
        };
        match raw.validate(&aapl()) {
            Err(FetchError::Incomplete { field, .. }) => assert_eq!(field, "d"),
            other => panic!("expected Incomplete, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_optionals_are_absent() {
        let raw = QuoteResponse {
            current: Some(10.0),
            change: Some(0.5),
            change_pct: Some(5.0),
            high: Some(f64::INFINITY),
            low: Some(f64::NAN),
            ..Default::default()
        };
        let quote = raw.validate(&aapl()).unwrap();
        assert_eq!(quote.high, None);
        assert_eq!(quote.low, None);
        assert_eq!(quote.open, None);
    }
}
