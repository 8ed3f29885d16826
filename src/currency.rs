//! Currency conversion and money formatting.
//!
//! Both functions are pure. A missing rate path is `None`, never an error:
//! callers fall back to the unconverted amount so no account ever drops
//! out of a total.

use crate::model::ExchangeRateTable;
use tracing::debug;

/// Currencies with no minor unit.
const ZERO_DECIMAL: &[&str] = &["JPY", "KRW", "VND", "CLP", "ISK"];

/// Currencies with a thousandth minor unit.
const THREE_DECIMAL: &[&str] = &["BHD", "KWD", "OMR", "JOD", "IQD", "TND"];

/// Convert `amount` from one currency to another using the cycle's rate
/// table. Same-currency conversion is the identity regardless of case.
/// When no direct rate exists the inverse pair is tried before giving up.
pub fn convert(amount: f64, from: &str, to: &str, rates: &ExchangeRateTable) -> Option<f64> {
    if from.eq_ignore_ascii_case(to) {
        return Some(amount);
    }
    if let Some(rate) = rates.rate(from, to) {
        return Some(amount * rate);
    }
    if let Some(inverse) = rates.rate(to, from) {
        if inverse != 0.0 {
            debug!(%from, %to, rate = 1.0 / inverse, "Using inverse rate");
            return Some(amount / inverse);
        }
    }
    debug!(%from, %to, "No rate path between currencies");
    None
}

/// Canonical number of decimal places for a currency code.
pub fn decimal_places(currency: &str) -> usize {
    let code = currency.to_ascii_uppercase();
    if ZERO_DECIMAL.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL.contains(&code.as_str()) {
        3
    } else {
        2
    }
}

fn symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// Render an amount in a currency's canonical precision with thousands
/// grouping. Negative amounts carry a leading minus; positive amounts
/// never carry an explicit plus.
pub fn format_money(amount: f64, currency: &str) -> String {
    let places = decimal_places(currency);
    let magnitude = group_thousands(&format!("{:.places$}", amount.abs()));
    let sign = if amount < 0.0 { "-" } else { "" };
    match symbol(currency) {
        Some(sym) => format!("{sign}{sym}{magnitude}"),
        None => format!("{sign}{magnitude} {}", currency.to_ascii_uppercase()),
    }
}

fn group_thousands(formatted: &str) -> String {
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted, None),
    };
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match fraction {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
