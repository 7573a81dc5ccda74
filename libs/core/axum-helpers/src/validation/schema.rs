//! Declarative request-body schemas.
//!
//! A [`Schema`] is plain data: one [`FieldRule`] per allowed field plus a flag
//! controlling whether fields outside that set are tolerated. Evaluating it
//! yields every [`Violation`] found, not just the first.

use serde::Serialize;
use serde_json::{Map, Value};

/// JSON type a field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    /// Any JSON number, integral or not
    Number,
    /// A JSON number with no fractional part that fits in an `i64`
    Integer,
    Boolean,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Integer => value.is_i64(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The body could not be parsed as JSON
    MalformedBody,
    /// The body parsed, but is not a JSON object
    NotAnObject,
    Required,
    InvalidType,
    NotPositive,
    Empty,
    /// Field is not declared by the schema
    Unknown,
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Constraints for a single named field.
///
/// Built with `const` combinators so schemas can live in statics:
///
/// ```rust
/// use axum_helpers::validation::FieldRule;
///
/// const PRICE: FieldRule = FieldRule::number("price").required().positive();
/// assert!(PRICE.required && PRICE.positive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Absent and `null` values are rejected
    pub required: bool,
    /// Numbers must be strictly greater than zero
    pub positive: bool,
    /// Strings must contain at least one non-whitespace character
    pub non_empty: bool,
}

impl FieldRule {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            positive: false,
            non_empty: false,
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn positive(self) -> Self {
        Self {
            positive: true,
            ..self
        }
    }

    pub const fn non_empty(self) -> Self {
        Self {
            non_empty: true,
            ..self
        }
    }

    /// Check one value, pushing at most one violation.
    fn check(&self, value: Option<&Value>, violations: &mut Vec<Violation>) {
        let value = match value {
            None | Some(Value::Null) if self.required => {
                violations.push(Violation::new(
                    self.name,
                    ViolationKind::Required,
                    format!("\"{}\" is required", self.name),
                ));
                return;
            }
            None => return,
            Some(value) => value,
        };

        if !self.field_type.matches(value) {
            violations.push(Violation::new(
                self.name,
                ViolationKind::InvalidType,
                format!("\"{}\" must be a {}", self.name, self.field_type.as_str()),
            ));
            return;
        }

        if self.positive && !is_positive(value) {
            violations.push(Violation::new(
                self.name,
                ViolationKind::NotPositive,
                format!("\"{}\" must be a positive number", self.name),
            ));
            return;
        }

        if self.non_empty && value.as_str().is_some_and(|s| s.trim().is_empty()) {
            violations.push(Violation::new(
                self.name,
                ViolationKind::Empty,
                format!("\"{}\" is not allowed to be empty", self.name),
            ));
        }
    }
}

fn is_positive(value: &Value) -> bool {
    if let Some(n) = value.as_i64() {
        n > 0
    } else if let Some(n) = value.as_u64() {
        n > 0
    } else {
        value.as_f64().is_some_and(|n| n > 0.0)
    }
}

/// A closed set of field rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldRule>,
    allow_unknown: bool,
}

impl Schema {
    /// Unknown fields are rejected unless [`Schema::allow_unknown`] is set.
    pub fn new(fields: impl IntoIterator<Item = FieldRule>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            allow_unknown: false,
        }
    }

    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Evaluate `body`, returning every violation in schema order followed by
    /// unknown fields.
    pub fn validate(&self, body: &Value) -> Result<(), Vec<Violation>> {
        let Some(object) = body.as_object() else {
            return Err(vec![Violation::new(
                "body",
                ViolationKind::NotAnObject,
                "request body must be a JSON object",
            )]);
        };

        let violations = self.violations(object);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn violations(&self, object: &Map<String, Value>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.fields {
            rule.check(object.get(rule.name), &mut violations);
        }

        if !self.allow_unknown {
            for key in object.keys() {
                if self.field(key).is_none() {
                    violations.push(Violation::new(
                        key.as_str(),
                        ViolationKind::Unknown,
                        format!("\"{}\" is not allowed", key),
                    ));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_like() -> Schema {
        Schema::new([
            FieldRule::string("name").required().non_empty(),
            FieldRule::number("price").required().positive(),
            FieldRule::string("category").required().non_empty(),
            FieldRule::integer("stock").required().positive(),
        ])
    }

    fn kinds(result: Result<(), Vec<Violation>>) -> Vec<(String, ViolationKind)> {
        result
            .unwrap_err()
            .into_iter()
            .map(|v| (v.field, v.kind))
            .collect()
    }

    #[test]
    fn test_valid_body_passes() {
        let body = json!({ "name": "Lamp", "price": 19.5, "category": "home", "stock": 3 });
        assert!(product_like().validate(&body).is_ok());
    }

    #[test]
    fn test_missing_and_null_required_fields() {
        let body = json!({ "name": "Lamp", "price": null, "stock": 3 });
        assert_eq!(
            kinds(product_like().validate(&body)),
            vec![
                ("price".to_string(), ViolationKind::Required),
                ("category".to_string(), ViolationKind::Required),
            ]
        );
    }

    #[test]
    fn test_wrong_types() {
        let body = json!({ "name": 7, "price": "10", "category": "home", "stock": 1.5 });
        assert_eq!(
            kinds(product_like().validate(&body)),
            vec![
                ("name".to_string(), ViolationKind::InvalidType),
                ("price".to_string(), ViolationKind::InvalidType),
                ("stock".to_string(), ViolationKind::InvalidType),
            ]
        );
    }

    #[test]
    fn test_zero_and_negative_numbers_are_not_positive() {
        let body = json!({ "name": "Lamp", "price": 0, "category": "home", "stock": -100 });
        assert_eq!(
            kinds(product_like().validate(&body)),
            vec![
                ("price".to_string(), ViolationKind::NotPositive),
                ("stock".to_string(), ViolationKind::NotPositive),
            ]
        );
    }

    #[test]
    fn test_blank_strings_are_empty() {
        let body = json!({ "name": "", "price": 1, "category": "   ", "stock": 1 });
        assert_eq!(
            kinds(product_like().validate(&body)),
            vec![
                ("name".to_string(), ViolationKind::Empty),
                ("category".to_string(), ViolationKind::Empty),
            ]
        );
    }

    #[test]
    fn test_unknown_fields_rejected_by_default() {
        let body = json!({
            "name": "Lamp", "price": 1, "category": "home", "stock": 1,
            "unknown": "should not be this property"
        });
        assert_eq!(
            kinds(product_like().validate(&body)),
            vec![("unknown".to_string(), ViolationKind::Unknown)]
        );
    }

    #[test]
    fn test_unknown_fields_tolerated_when_allowed() {
        let body = json!({ "name": "Lamp", "price": 1, "category": "home", "stock": 1, "x": 1 });
        assert!(product_like().allow_unknown(true).validate(&body).is_ok());
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let schema = Schema::new([FieldRule::boolean("featured")]);
        assert!(schema.validate(&json!({})).is_ok());
        assert_eq!(
            kinds(schema.validate(&json!({ "featured": "yes" }))),
            vec![("featured".to_string(), ViolationKind::InvalidType)]
        );
    }

    #[test]
    fn test_non_object_body() {
        for body in [json!([1, 2]), json!("text"), json!(null), json!(4)] {
            assert_eq!(
                kinds(product_like().validate(&body)),
                vec![("body".to_string(), ViolationKind::NotAnObject)]
            );
        }
    }

    #[test]
    fn test_integer_outside_i64_range_is_invalid_type() {
        let schema = Schema::new([FieldRule::integer("stock").required().positive()]);
        assert!(schema.validate(&json!({ "stock": i64::MAX })).is_ok());

        for stock in [json!(i64::MAX as u64 + 1), json!(u64::MAX)] {
            assert_eq!(
                kinds(schema.validate(&json!({ "stock": stock }))),
                vec![("stock".to_string(), ViolationKind::InvalidType)]
            );
        }
    }

    #[test]
    fn test_large_unsigned_number_is_positive() {
        let schema = Schema::new([FieldRule::number("count").required().positive()]);
        assert!(schema.validate(&json!({ "count": u64::MAX })).is_ok());
    }
}
