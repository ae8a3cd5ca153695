//! Human-readable formatting used in generated summaries and reports.
//!
//! Non-finite values render as labels ("∞", "never") instead of numbers.

pub const INFINITY_LABEL: &str = "∞";
pub const NEVER_LABEL: &str = "never";

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency value with thousands separators and cents ("$1,234.50")
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    let cents_total = (value.abs() * 100.0).round() as u64;
    let dollars = cents_total / 100;
    let cents = cents_total % 100;

    if value < 0.0 && cents_total > 0 {
        format!("-${}.{:02}", group_thousands(dollars), cents)
    } else {
        format!("${}.{:02}", group_thousands(dollars), cents)
    }
}

/// Format a currency value rounded to whole dollars ("$1,235")
pub fn format_currency_short(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    let dollars = value.abs().round() as u64;
    if value < 0.0 && dollars > 0 {
        format!("-${}", group_thousands(dollars))
    } else {
        format!("${}", group_thousands(dollars))
    }
}

/// Format a count with thousands separators and no decimals ("2,000")
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    let whole = value.abs().round_ties_even() as u64;
    if value < 0.0 && whole > 0 {
        format!("-{}", group_thousands(whole))
    } else {
        group_thousands(whole)
    }
}

/// Format a fraction as a percentage ("0.085" -> "8.5%")
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// Format a ratio as a multiple ("11.80x"), or "∞" when unbounded
pub fn format_ratio(ratio: f64, decimals: usize) -> String {
    if !ratio.is_finite() {
        return non_finite(ratio);
    }
    format!("{:.*}x", decimals, ratio)
}

/// Format a month count ("1.1 months"), or "never" when unbounded
pub fn format_months(months: f64) -> String {
    if months.is_nan() || months == f64::INFINITY {
        return NEVER_LABEL.to_string();
    }
    format!("{months:.1} months")
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else if value > 0.0 {
        INFINITY_LABEL.to_string()
    } else {
        format!("-{INFINITY_LABEL}")
    }
}
