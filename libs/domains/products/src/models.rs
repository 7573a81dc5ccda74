use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Product entity as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Storage-assigned identifier, 24 hex characters
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,
    pub name: String,
    /// Unit price, strictly positive
    pub price: f64,
    pub category: String,
    /// Units on hand, strictly positive
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProductCreateRequest {
    #[schema(example = "Desk lamp")]
    pub name: String,
    #[schema(example = 24.9)]
    pub price: f64,
    #[schema(example = "home")]
    pub category: String,
    #[schema(example = 12)]
    pub stock: i64,
}

/// DTO for updating a product. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let result = serde_json::from_value::<ProductCreateRequest>(json!({
            "name": "Lamp", "price": 1.0, "category": "home", "stock": 1, "color": "red"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_defaults_to_empty() {
        let patch: ProductUpdateRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(patch, ProductUpdateRequest::default());

        let patch: ProductUpdateRequest = serde_json::from_value(json!({ "stock": 4 })).unwrap();
        assert_eq!(patch.stock, Some(4));
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_update_request_skips_absent_fields_when_serialized() {
        let patch = ProductUpdateRequest {
            price: Some(2.0),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "price": 2.0 }));
    }
}
