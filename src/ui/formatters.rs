//! Shared formatting utilities for UI components.

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a price as dollars with cents, e.g. `$1,234.50`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "—".to_string();
    }
    let cents = (price.abs() * 100.0).round() as u64;
    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, format_number(cents / 100), cents % 100)
}

/// Format a percent change with an explicit sign, e.g. `+1.20%`.
pub fn format_change(change: f64) -> String {
    if !change.is_finite() {
        return "—".to_string();
    }
    format!("{:+.2}%", change)
}
