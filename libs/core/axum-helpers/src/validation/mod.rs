//! Schema-driven request body validation.
//!
//! [`Schema`] describes the accepted shape of a JSON body, [`ValidationGate`]
//! evaluates it and forwards the outcome, and [`validate_body`] wires the gate
//! into an axum route as middleware.

mod error;
mod gate;
mod schema;

pub use error::InvalidInputError;
pub use gate::{MAX_BODY_BYTES, ValidationGate, validate_body};
pub use schema::{FieldRule, FieldType, Schema, Violation, ViolationKind};
