//! Bounded per-symbol price history.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::model::StockRecord;

/// Ring buffer of recent prices for every symbol seen.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    capacity: usize,
    series: HashMap<String, VecDeque<f64>>,
}

impl PriceHistory {
    /// Keep at most `capacity` prices per symbol (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: HashMap::new(),
        }
    }

    /// Per-symbol capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append each record's price. Only the first row of a duplicated
    /// symbol counts.
    pub fn record(&mut self, snapshot: &[StockRecord]) {
        let mut seen = HashSet::new();
        for rec in snapshot {
            if !seen.insert(rec.symbol.as_str()) {
                continue;
            }
            let series = self.series.entry(rec.symbol.clone()).or_default();
            if series.len() == self.capacity {
                series.pop_front();
            }
            series.push_back(rec.price);
        }
    }

    /// Prices for `symbol`, oldest first.
    pub fn samples(&self, symbol: &str) -> Vec<f64> {
        self.series
            .get(symbol)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of prices kept for `symbol`.
    pub fn len(&self, symbol: &str) -> usize {
        self.series.get(symbol).map_or(0, VecDeque::len)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
