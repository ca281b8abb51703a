use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::Transaction;

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,56`
pub fn format_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    if cents < 0 {
        format!("-R$ {}", group_cents(cents.unsigned_abs()))
    } else {
        format!("R$ {}", group_cents(cents as u64))
    }
}

/// Render a cent count with pt-BR separators: `123456` -> `1.234,56`
fn group_cents(cents: u64) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("{},{:02}", grouped, cents % 100)
}

/// Mask raw amount input the way a currency field does while typing: every
/// digit shifts in from the right as cents. `"12345"` -> `"123,45"`.
/// Input without digits gives an empty string.
pub fn format_amount_input(text: &str) -> String {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return if text.chars().any(|c| c.is_ascii_digit()) {
            "0,00".to_string()
        } else {
            String::new()
        };
    }
    // u64 holds 19 digits; longer input is clamped to the leading digits
    let digits = &digits[..digits.len().min(18)];
    digits.parse::<u64>().map(group_cents).unwrap_or_default()
}

/// Parse a pt-BR amount (`.` thousands, `,` decimals): `"1.234,56"` -> `1234.56`.
///
/// Without a comma, a final `.` followed by one or two digits is read as the
/// decimal point, so `"100.50"` is `100.5` while `"1.234"` stays `1234`.
pub fn parse_amount_input(text: &str) -> Option<f64> {
    let text = text.trim().trim_start_matches("R$").trim();
    let normalized = match text.rfind('.') {
        Some(dot) if !text.contains(',') && (1..=2).contains(&(text.len() - dot - 1)) => {
            format!("{}.{}", text[..dot].replace('.', ""), &text[dot + 1..])
        }
        _ => text.replace('.', "").replace(',', "."),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a timestamp as `dd/mm/yyyy`, returning the input unchanged if it
/// can't be parsed
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        dt.format("%d/%m/%Y").to_string()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") {
        dt.format("%d/%m/%Y").to_string()
    } else if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        d.format("%d/%m/%Y").to_string()
    } else {
        date.to_string()
    }
}

/// First word of a full name, for greetings
pub fn first_name(name: Option<&str>) -> String {
    name.and_then(|n| n.split_whitespace().next())
        .unwrap_or("User")
        .to_string()
}

/// Amount with its direction sign, e.g. `+ R$ 100,50`
pub fn signed_amount(tx: &Transaction) -> String {
    format!("{} {}", tx.kind.sign(), format_brl(tx.amount_value().abs()))
}
