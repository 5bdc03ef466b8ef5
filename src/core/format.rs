//! Pure presentation formatters.
//!
//! These functions are stateless; styling (color, bold) lives in `cli::ui`
//! so the formatters stay usable in plain log output and tests.

/// Formats a monetary amount with a thousands-separated integer part and
/// two decimals. Known currency codes render with their symbol prefixed,
/// anything else gets the code appended.
pub fn currency(amount: f64, code: &str) -> String {
    let symbol = match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    };

    let negative = amount < 0.0;
    let grouped = group_thousands(amount.abs());
    let sign = if negative { "-" } else { "" };

    match symbol {
        Some(s) => format!("{sign}{s}{grouped}"),
        None => format!("{sign}{grouped} {code}"),
    }
}

/// Formats a percentage with an explicit sign and two decimals.
pub fn percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Compacts large magnitudes into K/M/B notation with one decimal.
/// Values under a thousand are printed as-is without decimals.
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1e9 {
        format!("{sign}{:.1}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}{:.1}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{sign}{:.1}K", abs / 1e3)
    } else {
        format!("{sign}{abs:.0}")
    }
}

fn group_thousands(amount: f64) -> String {
    let formatted = format!("{amount:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    format!("{grouped}.{dec_part}")
}
