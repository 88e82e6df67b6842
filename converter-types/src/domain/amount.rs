//! Currency-formatted display of a converted value.

use std::fmt;

use currency_catalog::Currency;

/// A converted value paired with the currency it is expressed in.
///
/// `Display` renders the currency symbol, a comma-grouped integer part and as
/// many fraction digits as the currency uses (`€88.20`, `¥12,345`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormattedAmount {
    value: f64,
    currency: Currency,
}

impl FormattedAmount {
    pub fn new(value: f64, currency: Currency) -> Self {
        Self { value, currency }
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

impl fmt::Display for FormattedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = usize::from(self.currency.minor_digits());
        // Decimal formatting is exact at any magnitude; integer minor units would saturate.
        let rounded = format!("{:.*}", digits, self.value.abs());
        let (major, minor) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
        let is_zero = rounded.bytes().all(|b| b == b'0' || b == b'.');
        let sign = if self.value < 0.0 && !is_zero { "-" } else { "" };

        write!(
            f,
            "{}{}{}",
            sign,
            self.currency.symbol(),
            group_thousands(major)
        )?;
        if !minor.is_empty() {
            write!(f, ".{}", minor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_digit_currency() {
        let amount = FormattedAmount::new(88.2, Currency::EUR);
        assert_eq!(amount.to_string(), "€88.20");
    }

    #[test]
    fn test_grouping() {
        let amount = FormattedAmount::new(1_234_567.891, Currency::USD);
        assert_eq!(amount.to_string(), "$1,234,567.89");
    }

    #[test]
    fn test_zero_digit_currency_rounds() {
        let amount = FormattedAmount::new(12_345.6, Currency::JPY);
        assert_eq!(amount.to_string(), "¥12,346");
    }

    #[test]
    fn test_negative_value() {
        let amount = FormattedAmount::new(-1234.5, Currency::USD);
        assert_eq!(amount.to_string(), "-$1,234.50");
    }

    #[test]
    fn test_negative_rounding_to_zero_drops_sign() {
        let amount = FormattedAmount::new(-0.001, Currency::GBP);
        assert_eq!(amount.to_string(), "£0.00");
    }

    #[test]
    fn test_huge_values_are_not_truncated() {
        assert_eq!(
            FormattedAmount::new(1e20, Currency::EUR).to_string(),
            "€100,000,000,000,000,000,000.00"
        );
        assert_eq!(
            FormattedAmount::new(-2.5e18, Currency::JPY).to_string(),
            "-¥2,500,000,000,000,000,000"
        );
    }

    #[test]
    fn test_small_values() {
        assert_eq!(FormattedAmount::new(0.5, Currency::ILS).to_string(), "₪0.50");
        assert_eq!(FormattedAmount::new(999.0, Currency::CAD).to_string(), "CA$999.00");
    }
}
