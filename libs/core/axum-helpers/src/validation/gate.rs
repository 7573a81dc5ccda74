use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use super::{error::InvalidInputError, schema::Schema};

/// Upper bound on buffered request bodies.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Checks request bodies against a [`Schema`] and hands the outcome to a
/// continuation.
///
/// The continuation is an `FnOnce`, so it runs exactly once per check: with
/// `None` when the body is acceptable, or with the [`InvalidInputError`]
/// describing every violation.
#[derive(Debug, Clone)]
pub struct ValidationGate {
    schema: Arc<Schema>,
}

impl ValidationGate {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    pub fn check(&self, body: &Value) -> Result<(), InvalidInputError> {
        self.schema.validate(body).map_err(InvalidInputError::new)
    }

    /// Parse raw bytes as JSON, then [`check`](Self::check) them.
    pub fn check_json(&self, raw: &[u8]) -> Result<(), InvalidInputError> {
        let body: Value = serde_json::from_slice(raw)
            .map_err(|e| InvalidInputError::malformed(format!("invalid JSON body: {e}")))?;
        self.check(&body)
    }

    pub fn forward<F, T>(&self, body: &Value, next: F) -> T
    where
        F: FnOnce(Option<InvalidInputError>) -> T,
    {
        next(self.check(body).err())
    }

    pub fn forward_json<F, T>(&self, raw: &[u8], next: F) -> T
    where
        F: FnOnce(Option<InvalidInputError>) -> T,
    {
        next(self.check_json(raw).err())
    }
}

/// Middleware running a [`ValidationGate`] in front of a handler.
///
/// Accepted bodies are passed through byte for byte; rejected ones never
/// reach the handler and render as a 400 `VALIDATION_ERROR`.
///
/// ```ignore
/// use axum::{handler::Handler, middleware, routing::post, Router};
///
/// let gate = ValidationGate::new(schema);
/// let app = Router::new().route(
///     "/products",
///     post(create.layer(middleware::from_fn_with_state(gate, validate_body))),
/// );
/// ```
pub async fn validate_body(
    State(gate): State<ValidationGate>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return InvalidInputError::malformed(format!("failed to read body: {e}"))
                .into_response();
        }
    };

    let forwarded = bytes.clone();
    gate.forward_json(&bytes, move |rejection| async move {
        match rejection {
            None => {
                next.run(Request::from_parts(parts, Body::from(forwarded)))
                    .await
            }
            Some(err) => {
                tracing::warn!(
                    method = %parts.method,
                    uri = %parts.uri,
                    violations = err.violations().len(),
                    "request body rejected"
                );
                err.into_response()
            }
        }
    })
    .await
}
