//! Plain-text snapshot table for headless output.

use unicode_width::UnicodeWidthStr;

use crate::model::StockRecord;
use crate::ui::formatters::{format_change, format_price};

const HEADERS: [&str; 4] = ["Symbol", "Company", "Price", "Change"];

/// Render `snapshot` as an aligned text table, one row per record.
pub fn plain_table(snapshot: &[StockRecord]) -> String {
    let rows: Vec<[String; 4]> = snapshot
        .iter()
        .map(|r| {
            [
                r.symbol.clone(),
                r.name.clone(),
                format_price(r.price),
                format_change(r.change),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(UnicodeWidthStr::width);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let pad = " ".repeat(width - cell.width());
        if i > 0 {
            line.push_str("  ");
        }
        // numbers right-aligned, text left-aligned
        if i >= 2 {
            line.push_str(&pad);
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.push_str(&pad);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns() {
        let table = plain_table(&[
            StockRecord::new("AAPL", "Apple", 150.0, 1.2),
            StockRecord::new("MSFT", "Microsoft", 1300.0, -0.5),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Symbol  Company        Price  Change");
        assert_eq!(lines[1], "AAPL    Apple        $150.00  +1.20%");
        assert_eq!(lines[2], "MSFT    Microsoft  $1,300.00  -0.50%");
    }

    #[test]
    fn empty_snapshot_prints_header_only() {
        assert_eq!(plain_table(&[]).lines().count(), 1);
    }
}
