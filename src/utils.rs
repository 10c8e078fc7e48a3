use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Maximum characters of a product description shown on a card
pub const DESCRIPTION_MAX_CHARS: usize = 140;

/// Narrow no-break space, the fr-FR digit group separator
const GROUP_SEPARATOR: char = '\u{202F}';

/// No-break space between amount and currency symbol
const SYMBOL_SEPARATOR: char = '\u{00A0}';

/// Format a decimal amount as fr-FR currency, e.g. `1 234,50 €`
///
/// The amount is rounded to the currency's minor unit with ties away from
/// zero. Amounts that do not parse as a decimal are returned with their
/// currency code appended unchanged.
pub fn format_price(amount: &str, currency_code: &str) -> String {
    let code = currency_code.trim().to_ascii_uppercase();
    let Ok(value) = Decimal::from_str(amount.trim()) else {
        return format!("{}{}{}", amount.trim(), SYMBOL_SEPARATOR, code);
    };

    let digits = fraction_digits(&code);
    let mut rounded =
        value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(digits);

    let fixed = rounded.abs().to_string();
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut formatted = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        formatted.push('-');
    }
    formatted.push_str(&group_digits(integer));
    if let Some(fraction) = fraction {
        formatted.push(',');
        formatted.push_str(fraction);
    }
    formatted.push(SYMBOL_SEPARATOR);
    formatted.push_str(currency_symbol(&code));
    formatted
}

/// Insert the group separator every three digits from the right
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * GROUP_SEPARATOR.len_utf8());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(c);
    }
    grouped
}

/// fr-FR display symbol of a currency, falling back to the ISO code
fn currency_symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "USD" => "$US",
        "GBP" => "£GB",
        "CAD" => "$CA",
        "AUD" => "$AU",
        "NZD" => "$NZ",
        "HKD" => "$HK",
        "SGD" => "$SG",
        "XOF" => "F\u{202F}CFA",
        "XPF" => "FCFP",
        other => other,
    }
}

/// Minor unit digits of a currency
fn fraction_digits(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "XOF" | "XPF" => 0,
        _ => 2,
    }
}

/// Collapse whitespace and cut `text` to `max_chars`, ending with an ellipsis when shortened
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_chars {
        return normalized;
    }

    let mut truncated: String = normalized.chars().take(max_chars).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push('…');
    truncated
}
