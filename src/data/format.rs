/// Display string for values that cannot be shown.
pub const PLACEHOLDER: &str = "—";

/// Anything that can be read as a currency amount.
///
/// Returns `None` when the value cannot be interpreted as a number.
pub trait Amount {
    fn as_amount(&self) -> Option<f64>;
}

impl Amount for f64 {
    fn as_amount(&self) -> Option<f64> {
        Some(*self)
    }
}

impl Amount for i64 {
    fn as_amount(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl Amount for u64 {
    fn as_amount(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl Amount for str {
    fn as_amount(&self) -> Option<f64> {
        self.trim().parse().ok()
    }
}

impl Amount for String {
    fn as_amount(&self) -> Option<f64> {
        self.as_str().as_amount()
    }
}

impl<T: Amount> Amount for Option<T> {
    fn as_amount(&self) -> Option<f64> {
        self.as_ref().and_then(|v| v.as_amount())
    }
}

/// Abbreviated currency string: `$1.2B`, `$3.0M`, `$2.5K`, `$500`.
///
/// Non-numeric and non-finite input yields [`PLACEHOLDER`].
pub fn format_currency<T: Amount + ?Sized>(value: &T) -> String {
    let Some(x) = value.as_amount().filter(|x| x.is_finite()) else {
        return PLACEHOLDER.to_string();
    };
    if x >= 1e9 {
        format!("${:.1}B", x / 1e9)
    } else if x >= 1e6 {
        format!("${:.1}M", x / 1e6)
    } else if x >= 1e3 {
        format!("${:.1}K", x / 1e3)
    } else {
        format!("${}", group_thousands(&format!("{x:.0}")))
    }
}

/// Insert `,` separators into a plain integer literal such as `-12345`.
fn group_thousands(digits: &str) -> String {
    let (sign, body) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(body.len() + body.len() / 3);
    for (i, ch) in body.chars().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations() {
        assert_eq!(format_currency(&500.0), "$500");
        assert_eq!(format_currency(&2_500.0), "$2.5K");
        assert_eq!(format_currency(&3_000_000.0), "$3.0M");
        assert_eq!(format_currency(&1_200_000_000.0), "$1.2B");
    }

    #[test]
    fn integers_and_text_are_accepted() {
        assert_eq!(format_currency(&2_500_i64), "$2.5K");
        assert_eq!(format_currency("3000000"), "$3.0M");
        assert_eq!(format_currency(&Some(750.0)), "$750");
    }

    #[test]
    fn uninterpretable_input_gives_placeholder() {
        assert_eq!(format_currency("abc"), PLACEHOLDER);
        assert_eq!(format_currency(&f64::NAN), PLACEHOLDER);
        assert_eq!(format_currency(&None::<f64>), PLACEHOLDER);
    }

    #[test]
    fn small_values_are_comma_grouped() {
        assert_eq!(format_currency(&0.4), "$0");
        assert_eq!(format_currency(&999.0), "$999");
        assert_eq!(format_currency(&-5_000.0), "$-5,000");
        assert_eq!(format_currency(&-1_234_567.0), "$-1,234,567");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("-100"), "-100");
    }
}
