//! Query-string extractor with automatic validation using the validator crate.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Query extractor with automatic validation.
///
/// Deserializes the query string into `T` and runs its `Validate` impl.
/// Rejections render through [`AppError`], so a malformed query is a
/// `BAD_REQUEST` and a failed rule is a `VALIDATION_ERROR` with field details.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedQuery;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Paging {
///     #[validate(range(min = 1))]
///     page: u64,
/// }
///
/// async fn list(ValidatedQuery(paging): ValidatedQuery<Paging>) -> String {
///     format!("page {}", paging.page)
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}
