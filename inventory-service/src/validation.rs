//! Field constraints for item bodies
//!
//! Every rule is checked; violations are collected in field order
//! (name, description, quantity, price) rather than stopping at the first.

use rust_decimal::Decimal;

use crate::error::FieldViolation;
use crate::models::ItemDto;

/// Longest accepted description, in characters
pub const MAX_DESCRIPTION_LEN: usize = 255;

pub(crate) const NOT_BLANK: &str = "must not be blank";
pub(crate) const NOT_NULL: &str = "must not be null";
pub(crate) const NON_NEGATIVE: &str = "must be greater than or equal to 0";
pub(crate) const NON_NEGATIVE_DECIMAL: &str = "must be greater than or equal to 0.0";

/// Check an incoming item body against its field constraints
pub fn validate_item(dto: &ItemDto) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    match dto.name.as_deref() {
        Some(name) if !name.trim().is_empty() => {}
        _ => violations.push(FieldViolation::new("name", NOT_BLANK)),
    }

    if let Some(description) = &dto.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            violations.push(FieldViolation::new(
                "description",
                format!("size must be between 0 and {}", MAX_DESCRIPTION_LEN),
            ));
        }
    }

    match dto.quantity {
        None => violations.push(FieldViolation::new("quantity", NOT_NULL)),
        Some(q) if q < 0 => violations.push(FieldViolation::new("quantity", NON_NEGATIVE)),
        Some(_) => {}
    }

    match dto.price {
        None => violations.push(FieldViolation::new("price", NOT_NULL)),
        Some(p) if p < Decimal::ZERO => {
            violations.push(FieldViolation::new("price", NON_NEGATIVE_DECIMAL))
        }
        Some(_) => {}
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ItemDto {
        ItemDto {
            id: None,
            name: Some("Widget".into()),
            description: Some("A widget".into()),
            quantity: Some(0),
            price: Some(Decimal::ZERO),
        }
    }

    #[test]
    fn test_valid_item_passes() {
        assert!(validate_item(&valid()).is_empty());

        let mut no_description = valid();
        no_description.description = None;
        assert!(validate_item(&no_description).is_empty());
    }

    #[test]
    fn test_blank_name() {
        for name in [None, Some(""), Some("   ")] {
            let mut dto = valid();
            dto.name = name.map(String::from);
            let v = validate_item(&dto);
            assert_eq!(v, vec![FieldViolation::new("name", "must not be blank")]);
        }
    }

    #[test]
    fn test_description_length_counts_characters() {
        let mut dto = valid();
        dto.description = Some("é".repeat(255));
        assert!(validate_item(&dto).is_empty());

        dto.description = Some("a".repeat(256));
        assert_eq!(
            validate_item(&dto)[0].to_string(),
            "description: size must be between 0 and 255"
        );
    }

    #[test]
    fn test_collects_every_violation() {
        let dto = ItemDto {
            id: None,
            name: Some("".into()),
            description: None,
            quantity: Some(-1),
            price: Some(Decimal::new(-1, 2)),
        };
        let rendered: Vec<String> = validate_item(&dto).iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "name: must not be blank",
                "quantity: must be greater than or equal to 0",
                "price: must be greater than or equal to 0.0",
            ]
        );
    }

    #[test]
    fn test_missing_numbers() {
        let mut dto = valid();
        dto.quantity = None;
        dto.price = None;
        let rendered: Vec<String> = validate_item(&dto).iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["quantity: must not be null", "price: must not be null"]
        );
    }
}
