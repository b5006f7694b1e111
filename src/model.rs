//! Quote records and snapshots.
//!
//! A snapshot is one complete, ordered replacement set of records. Display
//! order is insertion order; symbols are assumed unique but not checked.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of quote data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Ticker symbol, the row key.
    pub symbol: String,
    /// Company name.
    pub name: String,
    /// Last price.
    pub price: f64,
    /// Percent change.
    pub change: f64,
}

impl StockRecord {
    /// Create a new record.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: f64, change: f64) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
            change,
        }
    }
}

/// An ordered set of records.
pub type Snapshot = Vec<StockRecord>;

/// Decode a snapshot from its serialized text form (a JSON array).
pub fn parse_snapshot(text: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a snapshot to its serialized text form.
pub fn serialize_snapshot(snapshot: &[StockRecord]) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Find the first record with the given symbol.
pub fn find_record<'a>(snapshot: &'a [StockRecord], symbol: &str) -> Option<&'a StockRecord> {
    snapshot.iter().find(|r| r.symbol == symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TickerError;

    #[test]
    fn parses_source_field_names() {
        let text = r#"[{"symbol":"AAPL","name":"Apple","price":150.0,"change":1.2}]"#;
        let snapshot = parse_snapshot(text).unwrap();
        assert_eq!(snapshot, vec![StockRecord::new("AAPL", "Apple", 150.0, 1.2)]);
    }

    #[test]
    fn malformed_text_is_an_error() {
        let err = parse_snapshot("[{\"symbol\":").unwrap_err();
        assert!(matches!(err, TickerError::MalformedSnapshot(_)));
    }

    #[test]
    fn serialized_text_decodes_to_the_same_rows() {
        let snapshot = vec![
            StockRecord::new("NVDA", "NVIDIA", 900.5, -0.4),
            StockRecord::new("MSFT", "Microsoft", 310.0, 0.2),
        ];
        let text = serialize_snapshot(&snapshot).unwrap();
        assert_eq!(parse_snapshot(&text).unwrap(), snapshot);
    }

    #[test]
    fn duplicate_symbols_resolve_to_first_row() {
        let snapshot = vec![
            StockRecord::new("AAPL", "Apple", 1.0, 0.0),
            StockRecord::new("AAPL", "Apple again", 2.0, 0.0),
        ];
        assert_eq!(find_record(&snapshot, "AAPL").unwrap().price, 1.0);
        assert!(find_record(&snapshot, "MSFT").is_none());
    }
}
