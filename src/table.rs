//! Quote table component.
//!
//! Holds the displayed rows and at most one selected symbol. Selection
//! changes are announced to subscribers; the table does not know who they
//! are.

use std::fmt;

use crate::model::{find_record, parse_snapshot, Snapshot, StockRecord};

/// Notification that the selected symbol changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Newly selected symbol.
    pub symbol: String,
}

/// Subscriber callback.
pub type SelectionHandler = Box<dyn FnMut(&SelectionChanged)>;

/// Table rows plus single-selection state.
pub struct TableComponent {
    rows: Snapshot,
    selected: Option<String>,
    listeners: Vec<SelectionHandler>,
    scroll: usize,
}

impl fmt::Debug for TableComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableComponent")
            .field("rows", &self.rows.len())
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TableComponent {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            selected: None,
            listeners: Vec::new(),
            scroll: 0,
        }
    }

    /// Displayed rows.
    pub fn rows(&self) -> &[StockRecord] {
        &self.rows
    }

    /// Selected symbol.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Row index of the selection.
    pub fn selected_index(&self) -> Option<usize> {
        let symbol = self.selected.as_deref()?;
        self.rows.iter().position(|r| r.symbol == symbol)
    }

    /// First visible row.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Subscribe to selection changes.
    pub fn on_selection_changed(&mut self, handler: SelectionHandler) {
        self.listeners.push(handler);
    }

    /// Replace rows, keeping the selection if its symbol survives and
    /// otherwise selecting the first row.
    pub fn render(&mut self, snapshot: Snapshot) {
        self.rows = snapshot;
        let survives = self
            .selected
            .as_deref()
            .is_some_and(|s| find_record(&self.rows, s).is_some());
        if survives {
            return;
        }

        match self.rows.first().map(|r| r.symbol.clone()) {
            Some(first) => self.set_selected(first),
            None => self.selected = None,
        }
    }

    /// Accept a serialized snapshot. Malformed text is logged and the
    /// current rows stay. Returns true if the rows were replaced.
    pub fn set_data_attribute(&mut self, text: &str) -> bool {
        match parse_snapshot(text) {
            Ok(snapshot) => {
                self.render(snapshot);
                true
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to parse table data");
                false
            },
        }
    }

    /// Select a displayed symbol. Re-selecting the current symbol, or an
    /// unknown one, does nothing. Returns true if a notification went out.
    pub fn select(&mut self, symbol: &str) -> bool {
        if self.selected.as_deref() == Some(symbol) {
            return false;
        }
        if find_record(&self.rows, symbol).is_none() {
            tracing::debug!(symbol, "ignoring selection of unknown symbol");
            return false;
        }
        self.set_selected(symbol.to_string());
        true
    }

    /// Select the row at `index`, as a click on it would.
    pub fn select_row(&mut self, index: usize) -> bool {
        match self.rows.get(index).map(|r| r.symbol.clone()) {
            Some(symbol) => self.select(&symbol),
            None => false,
        }
    }

    /// Select the row below the current one.
    pub fn select_next(&mut self) -> bool {
        let next = self.selected_index().map_or(0, |i| i + 1);
        self.select_row(next.min(self.rows.len().saturating_sub(1)))
    }

    /// Select the row above the current one.
    pub fn select_previous(&mut self) -> bool {
        let prev = self.selected_index().map_or(0, |i| i.saturating_sub(1));
        self.select_row(prev)
    }

    /// Select the first row.
    pub fn select_first(&mut self) -> bool {
        self.select_row(0)
    }

    /// Select the last row.
    pub fn select_last(&mut self) -> bool {
        self.select_row(self.rows.len().saturating_sub(1))
    }

    /// Adjust scroll to keep the selection visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        let cursor = self.selected_index().unwrap_or(0);

        if cursor < self.scroll {
            self.scroll = cursor;
        }
        if cursor >= self.scroll + viewport_height {
            self.scroll = cursor.saturating_sub(viewport_height - 1);
        }
        let max_scroll = self.rows.len().saturating_sub(viewport_height);
        self.scroll = self.scroll.min(max_scroll);
    }

    fn set_selected(&mut self, symbol: String) {
        tracing::debug!(symbol = %symbol, "stock selected");
        let event = SelectionChanged {
            symbol: symbol.clone(),
        };
        self.selected = Some(symbol);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl Default for TableComponent {
    fn default() -> Self {
        Self::new()
    }
}
