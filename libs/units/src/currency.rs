//! Currency amount arithmetic
//!
//! Rates come from the exchange-rate gateway; this module only applies
//! them and formats amounts for display.

use crate::record::{ConversionEntry, ConversionKind};

/// Apply an exchange rate to an amount
pub fn apply_rate(amount: f64, rate: f64) -> f64 {
    amount * rate
}

/// Round a value to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an amount for display with 2 decimal places
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Build the history entry for a currency conversion
///
/// Returns `None` for non-positive amounts, which are not worth recording.
pub fn conversion_entry(
    from: &str,
    to: &str,
    amount: f64,
    rate: f64,
) -> Option<ConversionEntry> {
    if amount <= 0.0 {
        return None;
    }

    Some(ConversionEntry {
        kind: ConversionKind::Currency,
        from_unit: from.to_string(),
        to_unit: to.to_string(),
        from_value: amount,
        to_value: apply_rate(amount, rate),
        exchange_rate: Some(rate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_the_rate() {
        assert!((apply_rate(100.0, 0.85) - 85.0).abs() < 1e-9);
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(85.5551), 85.56);
        assert_eq!(format_amount(85.5551), "85.56");
    }

    #[test]
    fn entry_captures_the_rate_used() {
        let entry = conversion_entry("USD", "EUR", 100.0, 0.85).unwrap();
        assert_eq!(entry.kind, ConversionKind::Currency);
        assert_eq!(entry.from_unit, "USD");
        assert_eq!(entry.to_unit, "EUR");
        assert_eq!(entry.exchange_rate, Some(0.85));
        assert!((entry.to_value - 85.0).abs() < 1e-9);
    }

    #[test]
    fn zero_amounts_are_not_recorded() {
        assert!(conversion_entry("USD", "EUR", 0.0, 0.85).is_none());
    }
}
