//! Order Data

use serde::{Deserialize, Serialize};

/// Delivery address captured on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("addressLine1", &self.address_line1),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Checkout Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckout {
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            address_line1: "12 High Street".to_string(),
            address_line2: None,
            city: "Leeds".to_string(),
            state: "West Yorkshire".to_string(),
            postal_code: "LS1 1AA".to_string(),
            country: "GB".to_string(),
        }
    }

    #[test]
    fn complete_address_has_no_missing_fields() {
        assert!(address().missing_fields().is_empty());
    }

    #[test]
    fn blank_fields_are_reported() {
        let mut address = address();
        address.city = "  ".to_string();
        address.postal_code = String::new();

        assert_eq!(address.missing_fields(), vec!["city", "postalCode"]);
    }

    #[test]
    fn serializes_camel_case() -> TestResult {
        let value = serde_json::to_value(address())?;

        assert_eq!(value["addressLine1"], "12 High Street");
        assert_eq!(value["postalCode"], "LS1 1AA");
        assert!(value.get("addressLine2").is_none());

        Ok(())
    }
}
