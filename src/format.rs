use serde_json::Value;

/// A price as it arrives from the backend or a form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceInput<'a> {
    Number(f64),
    Text(&'a str),
}

impl From<f64> for PriceInput<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PriceInput<'_> {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u64> for PriceInput<'_> {
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl<'a> From<&'a str> for PriceInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for PriceInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a Value> for PriceInput<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Number(number) => Self::Number(number.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => Self::Text(text),
            _ => Self::Number(f64::NAN),
        }
    }
}

/// Format a price with `,` thousands separators and at most three decimals.
///
/// Commas in text input are ignored, blank text counts as zero, and anything
/// that is not a finite number renders as `"0"`.
pub fn format_price<'a>(value: impl Into<PriceInput<'a>>) -> String {
    let number = match value.into() {
        PriceInput::Number(number) => number,
        PriceInput::Text(text) => {
            let cleaned = text.replace(',', "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                0.0
            } else {
                cleaned.parse().unwrap_or(f64::NAN)
            }
        }
    };

    if !number.is_finite() {
        return "0".to_string();
    }

    let fixed = round_to_thousandths(number.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = group_thousands(whole);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    if number < 0.0 && out != "0" {
        out.insert(0, '-');
    }
    out
}

/// Three-decimal rendering with exact ties rounded away from zero.
///
/// A finite `f64` lands exactly halfway between two thousandths only when it
/// is an odd number of sixteenths, so those are rounded up by hand and every
/// other value goes through the correctly rounded formatter.
fn round_to_thousandths(value: f64) -> String {
    let sixteenths = value * 16.0;
    if sixteenths < 2f64.powi(53) && sixteenths.fract() == 0.0 && sixteenths % 2.0 == 1.0 {
        let thousandths = (sixteenths as u128 * 125 + 1) / 2;
        return format!("{}.{:03}", thousandths / 1000, thousandths % 1000);
    }
    format!("{value:.3}")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_price(1_234_567_i64), "1,234,567");
        assert_eq!(format_price(999_u64), "999");
        assert_eq!(format_price(1000.0), "1,000");
        assert_eq!(format_price(0.0), "0");
    }

    #[test]
    fn keeps_up_to_three_decimals() {
        assert_eq!(format_price(1234.5), "1,234.5");
        assert_eq!(format_price(1234.5678), "1,234.568");
        assert_eq!(format_price(-2500.25), "-2,500.25");
        assert_eq!(format_price(-0.0001), "0");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(format_price(0.0625), "0.063");
        assert_eq!(format_price(2.0625), "2.063");
        assert_eq!(format_price(1234.1875), "1,234.188");
        assert_eq!(format_price(-2.0625), "-2.063");
        assert_eq!(format_price("0.3125"), "0.313");
        assert_eq!(format_price(0.5), "0.5");
        assert_eq!(format_price(1.0005), "1");
    }

    #[test]
    fn text_input_ignores_commas() {
        assert_eq!(format_price("1,200,000"), "1,200,000");
        assert_eq!(format_price(" 45000.5 "), "45,000.5");
        assert_eq!(format_price(""), "0");
    }

    #[test]
    fn non_numeric_input_renders_zero() {
        assert_eq!(format_price("free"), "0");
        assert_eq!(format_price(f64::NAN), "0");
        assert_eq!(format_price(f64::INFINITY), "0");
        assert_eq!(format_price(&json!(null)), "0");
    }

    #[test]
    fn json_values_are_accepted() {
        assert_eq!(format_price(&json!(2_500_000)), "2,500,000");
        assert_eq!(format_price(&json!("12,500")), "12,500");
    }
}
