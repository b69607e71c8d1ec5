//! Brazilian currency parsing and formatting.
//!
//! Parsing accepts anything a masked form field can produce ("R$ 1.234,56",
//! "1234,56", "1500") and coerces failures to zero. Formatting renders the
//! pt-BR shape: `R$` prefix, dot thousands grouping, comma decimals.

/// Parse a BRL-formatted string into a decimal amount.
///
/// Everything but digits and the decimal comma is stripped, so thousands
/// dots and the `R$` prefix fall away; the comma becomes the decimal point.
/// Unreadable input (including more than one comma) coerces to `0.0`.
pub fn parse_brl(value: &str) -> f64 {
    if value.trim().is_empty() {
        return 0.0;
    }
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    cleaned.replace(',', ".").parse().unwrap_or(0.0)
}

/// Format a decimal amount as BRL, rounding to whole cents.
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}
