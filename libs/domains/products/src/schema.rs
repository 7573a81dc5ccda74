use axum_helpers::validation::{FieldRule, Schema, ValidationGate};

/// Rules for a product body. Every field is required; extra fields are
/// rejected.
pub const PRODUCT_FIELDS: [FieldRule; 4] = [
    FieldRule::string("name").required().non_empty(),
    FieldRule::number("price").required().positive(),
    FieldRule::string("category").required().non_empty(),
    FieldRule::integer("stock").required().positive(),
];

pub fn product_schema() -> Schema {
    Schema::new(PRODUCT_FIELDS)
}

/// Gate placed in front of the create and update routes
pub fn product_gate() -> ValidationGate {
    ValidationGate::new(product_schema())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_helpers::validation::ViolationKind;
    use serde_json::json;

    #[test]
    fn test_accepts_complete_product() {
        let body = json!({ "name": "Desk lamp", "price": 24.9, "category": "home", "stock": 12 });
        assert!(product_schema().validate(&body).is_ok());
    }

    #[test]
    fn test_rejects_unknown_property() {
        let body = json!({
            "name": "Desk lamp", "price": 24.9, "category": "home", "stock": 12,
            "unknown": "should not be this property"
        });
        let violations = product_schema().validate(&body).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Unknown);
    }

    #[test]
    fn test_rejects_all_empty_body() {
        let body = json!({ "name": "", "price": 0, "category": "", "stock": 0 });
        let violations = product_schema().validate(&body).unwrap_err();
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn test_rejects_negative_stock() {
        let body = json!({ "name": "Desk lamp", "price": 24.9, "category": "home", "stock": -100 });
        let violations = product_schema().validate(&body).unwrap_err();
        assert_eq!(violations[0].field, "stock");
        assert_eq!(violations[0].kind, ViolationKind::NotPositive);
    }

    #[test]
    fn test_gate_forwards_exactly_once() {
        let mut outcomes = Vec::new();
        product_gate().forward(&json!({ "name": "Desk lamp" }), |err| outcomes.push(err));
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_some());
    }
}
