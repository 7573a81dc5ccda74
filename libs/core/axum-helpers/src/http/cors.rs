use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Comma-separated list of origins allowed to call the API.
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Parse a comma-separated origin list, ignoring blank entries.
///
/// # Errors
/// Fails when an entry is not a valid header value or when no origin remains.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {CORS_ALLOWED_ORIGIN} value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{CORS_ALLOWED_ORIGIN} cannot be empty"),
        ));
    }

    Ok(origins)
}

/// Creates a CORS layer with common settings for API services.
///
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Accept
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Build the CORS layer from [`CORS_ALLOWED_ORIGIN`].
///
/// # Errors
/// The variable is required; a missing, empty or invalid value is an error.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let raw = std::env::var(CORS_ALLOWED_ORIGIN).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{CORS_ALLOWED_ORIGIN} environment variable is required. \
                 Example: {CORS_ALLOWED_ORIGIN}=http://localhost:3000,https://example.com"
            ),
        )
    })?;

    let origins = parse_allowed_origins(&raw)?;
    info!("CORS configured with allowed origins: {}", raw);

    Ok(create_cors_layer(origins))
}
