//! Quantity formatting for history descriptions.

/// Format an amount with its unit, dropping a redundant fractional part.
///
/// `format_quantity(2.0, "pcs")` gives `"2 pcs"`, `format_quantity(0.25, "kg")`
/// gives `"0.25 kg"`. An empty unit yields just the number.
pub fn format_quantity(amount: f64, unit: &str) -> String {
    let number = format_amount(amount);
    let unit = unit.trim();
    if unit.is_empty() {
        number
    } else {
        format!("{} {}", number, unit)
    }
}

/// Render a quantity with at most two decimals and no trailing zeros.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        return format!("{}", amount as i64);
    }
    let fixed = format!("{:.2}", amount);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
