//! Currency display helpers.

/// Currency symbol prefixed to every rendered amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Render an amount the way notifications and dashboards show it.
///
/// Whole amounts print without a fractional part.
///
/// # Examples
/// ```
/// use backend::domain::money::format_amount;
///
/// assert_eq!(format_amount(1500.0), "₹1500");
/// assert_eq!(format_amount(99.5), "₹99.5");
/// ```
pub fn format_amount(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount}")
}

/// Round to two decimal places for percentage reporting.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "₹0")]
    #[case(250.0, "₹250")]
    #[case(1234.56, "₹1234.56")]
    fn formats_amounts(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[rstest]
    #[case(66.666_666, 66.67)]
    #[case(12.344, 12.34)]
    #[case(100.0, 100.0)]
    fn rounds_to_two_places(#[case] value: f64, #[case] expected: f64) {
        assert!((round_to_cents(value) - expected).abs() < f64::EPSILON * 100.0);
    }
}
