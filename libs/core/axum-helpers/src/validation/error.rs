use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use super::schema::{Violation, ViolationKind};
use crate::errors::AppError;

/// A request body that failed its schema.
///
/// Carries every violation found so clients can fix all fields in one round
/// trip. Renders as a 400 `VALIDATION_ERROR` through [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Invalid input: {}", summarize(.violations))]
pub struct InvalidInputError {
    violations: Vec<Violation>,
}

impl InvalidInputError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// The body could not be read or parsed as JSON at all.
    pub fn malformed(details: impl Into<String>) -> Self {
        Self::new(vec![Violation::new(
            "body",
            ViolationKind::MalformedBody,
            details,
        )])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl From<Vec<Violation>> for InvalidInputError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::new(violations)
    }
}

impl IntoResponse for InvalidInputError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
