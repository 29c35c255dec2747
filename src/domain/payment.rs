//! Payment value types shared by the gateway adapter and the payment service.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::MINOR_UNITS_PER_MAJOR;

/// Auto-submitting form the client posts to the hosted payment page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentForm {
    pub url: String,
    /// Always "POST"
    pub method: String,
    pub form_data: BTreeMap<String, String>,
}

/// Outcome of a successful gateway callback.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentConfirmation {
    pub transaction_id: String,
    /// Amount in major currency units
    pub amount: f64,
}

/// Gateway amount field: minor units zero-padded to 12 digits.
pub fn format_gateway_amount(minor_units: i64) -> String {
    format!("{:012}", minor_units)
}

/// Parse a gateway amount field into minor units.
pub fn parse_gateway_amount(field: &str) -> Option<i64> {
    field.trim().parse::<i64>().ok()
}

/// Parse a gateway amount field back into major units.
pub fn gateway_amount_to_major(field: &str) -> Option<f64> {
    parse_gateway_amount(field).map(|minor| minor as f64 / MINOR_UNITS_PER_MAJOR as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_padding() {
        assert_eq!(format_gateway_amount(10_000), "000000010000");
        assert_eq!(format_gateway_amount(1_000_000), "000001000000");
        assert_eq!(format_gateway_amount(1), "000000000001");
    }

    #[test]
    fn test_amount_back_to_major_units() {
        assert_eq!(gateway_amount_to_major("000000010000"), Some(100.0));
        assert_eq!(gateway_amount_to_major("000001000000"), Some(10_000.0));
        assert_eq!(gateway_amount_to_major("abc"), None);
    }

    #[test]
    fn test_amount_in_minor_units() {
        assert_eq!(parse_gateway_amount("000002500000"), Some(2_500_000));
        assert_eq!(parse_gateway_amount(""), None);
    }
}
