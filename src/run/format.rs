use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Two decimal places with thousand separators, e.g. `1234567.8` → `"1,234,567.80"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let formatted = format!("{:.2}", val.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let grouped: Vec<&str> = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect();
    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{}.{dec_part}", grouped.join(","))
}

/// Shorten to at most `max` characters, the last one being "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let kept: String = s.chars().take(max - 1).collect();
    format!("{kept}…")
}

/// Fixed-width spending meter. Spending over budget fills the whole bar.
pub(crate) fn usage_bar(actual: Decimal, budget: Decimal, width: usize) -> String {
    let filled = if budget <= Decimal::ZERO {
        if actual > Decimal::ZERO {
            width
        } else {
            0
        }
    } else {
        let ratio = (actual / budget).min(Decimal::ONE).max(Decimal::ZERO);
        let cells = (ratio * Decimal::from(width as u64)).round();
        cells.to_usize().unwrap_or(width).min(width)
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
