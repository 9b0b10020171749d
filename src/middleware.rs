//! # Middleware Components
//!
//! Cross-cutting request/response processing: CORS and request validation.
//!
//! ## Middleware Types
//!
//! - **CORS Middleware**: Handles cross-origin request support
//! - **Validation Middleware**: Rejects oversized bodies and decodes JSON payloads
//!
//! ## Usage Examples
//!
//! ```rust,ignore
//! // Handle CORS preflight
//! if req.method() == Method::Options {
//!     return CorsMiddleware::handle_preflight();
//! }
//!
//! // Decode a bounded JSON body
//! let body: ThumbnailRequest = ValidationMiddleware::json_body(&mut req, &config).await?;
//! ```

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::utils::cors_headers;
use serde::de::DeserializeOwned;
use worker::{Request, Response, Result};

/// Middleware for handling Cross-Origin Resource Sharing (CORS) requests.
pub struct CorsMiddleware;

impl CorsMiddleware {
    /// Applies CORS headers to an existing response.
    pub fn apply_headers(response: Response) -> Response {
        response.with_headers(cors_headers())
    }

    /// Handles CORS preflight requests (OPTIONS method).
    ///
    /// Browsers send a preflight before the JSON `POST` and `DELETE` calls
    /// made by the editor, because of the `Content-Type: application/json` header.
    pub fn handle_preflight() -> Result<Response> {
        Ok(Response::empty()?.with_headers(cors_headers()))
    }
}

/// Middleware for validating request parameters and bodies.
pub struct ValidationMiddleware;

impl ValidationMiddleware {
    /// Validates that a declared body size is within the configured ceiling.
    ///
    /// # Arguments
    ///
    /// * `size` - The `Content-Length` of the request, if declared
    /// * `max_size` - The maximum allowed body size in bytes
    ///
    /// # Errors
    ///
    /// - `PayloadTooLarge`: If the declared size exceeds the limit
    ///
    /// A missing length is allowed; the storage validator still enforces the
    /// decoded size once the body is read.
    pub fn validate_body_size(size: Option<u64>, max_size: u64) -> AppResult<()> {
        match size {
            Some(size) if size > max_size => Err(AppError::PayloadTooLarge(format!(
                "Request body of {} bytes exceeds {} byte limit",
                size, max_size
            ))),
            _ => Ok(()),
        }
    }

    /// Parses a `Content-Length` header value.
    pub fn parse_content_length(value: Option<&str>) -> AppResult<Option<u64>> {
        value
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|_| AppError::BadRequest("Invalid Content-Length header".to_string()))
            })
            .transpose()
    }

    /// Checks the declared body size, then decodes the JSON body.
    pub async fn json_body<T: DeserializeOwned>(req: &mut Request, config: &Config) -> AppResult<T> {
        let declared = req.headers().get("Content-Length")?;
        let size = Self::parse_content_length(declared.as_deref())?;
        Self::validate_body_size(size, config.max_request_body_size())?;

        req.json::<T>()
            .await
            .map_err(|_| AppError::BadRequest("Invalid JSON in request body".to_string()))
    }
}
