use crate::symbols::Symbol;

/// Which symbol drives the chart & the news panel.
///
/// There is no transition back to `NoSelection`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(Symbol),
}

impl Selection {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Selection::NoSelection => None,
            Selection::Selected(symbol) => Some(symbol),
        }
    }

    /// A new symbol list always selects its first entry, replacing whatever
    /// was picked by hand. An empty list leaves the selection alone.
    pub fn on_symbols_changed(&mut self, symbols: &[Symbol]) -> bool {
        match symbols.first() {
            Some(first) => {
                *self = Selection::Selected(first.clone());
                true
            }
            None => false,
        }
    }

    pub fn on_row_click(&mut self, symbol: Symbol) {
        *self = Selection::Selected(symbol);
    }
}
