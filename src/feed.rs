//! Quote sources.
//!
//! The coordinator only sees [`QuoteSource`]: something that returns a
//! whole snapshot or fails. Two sources ship with the viewer: a seeded
//! mock that random-walks a fixed list of tickers, and a JSON file that is
//! re-read on every fetch.

use std::path::PathBuf;

use crate::error::{Result, TickerError};
use crate::model::{parse_snapshot, Snapshot, StockRecord};

/// Tickers the mock feed quotes.
pub const DEFAULT_LISTINGS: [(&str, &str); 4] = [
    ("NVDA", "NVIDIA"),
    ("AAPL", "Apple"),
    ("MSFT", "Microsoft"),
    ("AMZN", "Amazon"),
];

/// Something that produces snapshots.
pub trait QuoteSource: std::fmt::Debug {
    /// Produce the next full snapshot.
    fn fetch(&mut self) -> Result<Snapshot>;
}

/// Seeded random-walk quotes.
#[derive(Debug, Clone)]
pub struct MockFeed {
    listings: Vec<(String, String)>,
    prices: Vec<Option<f64>>,
    rng: XorShift,
}

impl MockFeed {
    /// Quote [`DEFAULT_LISTINGS`].
    pub fn new(seed: u64) -> Self {
        Self::with_listings(
            DEFAULT_LISTINGS
                .iter()
                .map(|(s, n)| (s.to_string(), n.to_string()))
                .collect(),
            seed,
        )
    }

    /// Quote the given `(symbol, name)` pairs.
    pub fn with_listings(listings: Vec<(String, String)>, seed: u64) -> Self {
        let prices = vec![None; listings.len()];
        Self {
            listings,
            prices,
            rng: XorShift::new(seed),
        }
    }
}

impl QuoteSource for MockFeed {
    fn fetch(&mut self) -> Result<Snapshot> {
        let mut snapshot = Vec::with_capacity(self.listings.len());
        for ((symbol, name), last) in self.listings.iter().zip(self.prices.iter_mut()) {
            // change in [-5, 5) percent; opening price in [100, 1100)
            let change = self.rng.next_f64() * 10.0 - 5.0;
            let price = match *last {
                Some(prev) => prev * (1.0 + change / 100.0),
                None => self.rng.next_f64() * 1000.0 + 100.0,
            };
            *last = Some(price);
            snapshot.push(StockRecord::new(symbol.as_str(), name.as_str(), price, change));
        }
        Ok(snapshot)
    }
}

/// Snapshot read from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    /// Read snapshots from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl QuoteSource for JsonFileFeed {
    fn fetch(&mut self) -> Result<Snapshot> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| TickerError::file_open(self.path.clone(), e))?;
        parse_snapshot(&text)
    }
}

/// xorshift64* generator; deterministic for a given seed.
#[derive(Debug, Clone)]
struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // zero is a fixed point of xorshift
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
