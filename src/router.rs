//! # Request Routing and Dispatch
//!
//! Pattern-based routing on HTTP method and path.
//!
//! ## Supported Routes
//!
//! - `GET /health` - Health check endpoint
//! - `POST /api/storage/upload` - Validate and store a base64 image
//! - `DELETE /api/storage/upload` - Delete a stored image
//! - `POST /api/thumbnails` - Normalize a thumbnail field
//! - `GET /api/editor/sensors` - Drag activation constraints for the editor
//! - `OPTIONS *` - CORS preflight requests

use std::sync::Arc;
use worker::*;

use crate::handlers::{self, editor, storage, AppState};
use crate::logging::Logger;
use crate::middleware::CorsMiddleware;

/// Handles incoming HTTP requests and routes them to appropriate handlers.
///
/// # Request Flow
///
/// 1. **CORS Preflight**: Handles OPTIONS requests for cross-origin support
/// 2. **Path Extraction**: Extracts URL path and HTTP method from request
/// 3. **Handler Dispatch**: Delegates to the matching handler
/// 4. **Error Handling**: Handler errors become JSON error responses with CORS headers
///
/// ```text
/// POST /api/thumbnails
/// ↓
/// handle_request()
/// ↓
/// storage::thumbnail() → ThumbnailProcessor → ServerBase64StorageProvider
/// ```
pub async fn handle_request(req: Request, state: Arc<AppState>, logger: Logger) -> Result<Response> {
    // Handle CORS preflight requests early to avoid unnecessary processing
    if req.method() == Method::Options {
        return CorsMiddleware::handle_preflight();
    }

    let url = req.url()?;
    let path = url.path().to_string();
    let method = req.method();

    logger.info(
        "Routing request",
        crate::log_data!("method" => method.to_string(), "path" => &path),
    );

    match (method, path.as_str()) {
        (Method::Get, "/health") => handlers::respond(&logger, handlers::handle_health_check(&state)).await,
        (Method::Post, "/api/storage/upload") => {
            handlers::respond(&logger, storage::upload(req, &state, &logger)).await
        }
        (Method::Delete, "/api/storage/upload") => {
            handlers::respond(&logger, storage::delete(req, &state, &logger)).await
        }
        (Method::Post, "/api/thumbnails") => {
            handlers::respond(&logger, storage::thumbnail(req, &state, &logger)).await
        }
        (Method::Get, "/api/editor/sensors") => handlers::respond(&logger, editor::sensors(&state)).await,
        _ => handlers::respond(&logger, handlers::handle_not_found(&path)).await,
    }
}
