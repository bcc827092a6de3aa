// Validation utilities module
// Provides custom validation functions for domain-specific rules

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a discount type is one of the accepted values
/// Valid values: "fixed", "percentage" (case-insensitive)
pub fn validate_discount_type(discount_type: &str) -> Result<(), ValidationError> {
    let valid_types = ["fixed", "percentage"];
    if valid_types.contains(&discount_type.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_discount_type"))
    }
}

/// Validates that an order-type restriction is one of the accepted values
/// Valid values: "both", "dine_in", "takeaway" (case-insensitive)
pub fn validate_order_type_restriction(restriction: &str) -> Result<(), ValidationError> {
    let valid = ["both", "dine_in", "takeaway"];
    if valid.contains(&restriction.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_order_type_restriction"))
    }
}

/// Validates that a price is non-negative
pub fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        Err(ValidationError::new("price_must_not_be_negative"))
    } else {
        Ok(())
    }
}

/// Validates that a percentage discount value stays within 0-100
/// Fixed discounts only need to be non-negative; callers check the type first.
pub fn validate_percentage_value(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::from(100) {
        Err(ValidationError::new("percentage_out_of_range"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_discount_type_accepts_known_values() {
        assert!(validate_discount_type("fixed").is_ok());
        assert!(validate_discount_type("percentage").is_ok());
        assert!(validate_discount_type("Percentage").is_ok());
    }

    #[test]
    fn test_discount_type_rejects_unknown_values() {
        assert!(validate_discount_type("bogo").is_err());
        assert!(validate_discount_type("").is_err());
    }

    #[test]
    fn test_order_type_restriction_values() {
        assert!(validate_order_type_restriction("both").is_ok());
        assert!(validate_order_type_restriction("dine_in").is_ok());
        assert!(validate_order_type_restriction("takeaway").is_ok());
        assert!(validate_order_type_restriction("delivery").is_err());
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_non_negative_price(&dec!(0)).is_ok());
        assert!(validate_non_negative_price(&dec!(450.50)).is_ok());
        assert!(validate_non_negative_price(&dec!(-1)).is_err());
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(validate_percentage_value(&dec!(0)).is_ok());
        assert!(validate_percentage_value(&dec!(100)).is_ok());
        assert!(validate_percentage_value(&dec!(100.01)).is_err());
        assert!(validate_percentage_value(&dec!(-5)).is_err());
    }
}
