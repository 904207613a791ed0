//! Display formatting. Pure string helpers so they can be tested without a UI.

/// Shown wherever a mean or range is undefined because the view is empty.
pub const NO_DATA: &str = "no data";

/// `$1,234` style, rounded to whole currency units.
pub fn currency(value: f64) -> String {
    with_sign(value, |abs| format!("${}", group_thousands(&format!("{abs:.0}"))))
}

/// `$1,234.56` style.
pub fn currency_cents(value: f64) -> String {
    with_sign(value, |abs| {
        let text = format!("{abs:.2}");
        let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!("${}.{frac}", group_thousands(int))
    })
}

/// Fixed decimals, or [`NO_DATA`].
pub fn optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => NO_DATA.to_string(),
    }
}

pub fn optional_currency(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), currency)
}

pub fn optional_currency_cents(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), currency_cents)
}

/// Signed delta such as `+2.5` or `-1.0`.
pub fn delta(value: f64, decimals: usize) -> String {
    format!("{value:+.decimals$}")
}

fn with_sign(value: f64, body: impl FnOnce(f64) -> String) -> String {
    let text = body(value.abs());
    // Anything that rounds to zero prints without a sign.
    if value < 0.0 && text.chars().any(|c| matches!(c, '1'..='9')) {
        format!("-{text}")
    } else {
        text
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
