//! # Storage Handlers
//!
//! - **Upload**: Validate a base64 image and return its URL
//! - **Delete**: Remove a stored image, when the provider supports it
//! - **Thumbnail**: Normalize the thumbnail field of a template or user page

use worker::*;

use super::AppState;
use crate::errors::{AppError, AppResult};
use crate::logging::Logger;
use crate::middleware::ValidationMiddleware;
use crate::models::{DeleteRequest, ThumbnailRequest, ThumbnailResponse, UploadRequest};

/// `POST /api/storage/upload`
pub async fn upload(mut req: Request, state: &AppState, logger: &Logger) -> AppResult<Response> {
    let body: UploadRequest = ValidationMiddleware::json_body(&mut req, &state.config).await?;

    let result = state
        .storage
        .upload(body.file.into(), body.options.as_ref())
        .await?;

    logger.info(
        "Upload accepted",
        crate::log_data!(
            "provider" => state.storage.provider().name(),
            "size" => result.metadata.as_ref().and_then(|m| m.get("size")).cloned()
        ),
    );
    Ok(Response::from_json(&result)?)
}

/// `DELETE /api/storage/upload`
pub async fn delete(mut req: Request, state: &AppState, logger: &Logger) -> AppResult<Response> {
    let body: DeleteRequest = ValidationMiddleware::json_body(&mut req, &state.config).await?;

    state.storage.delete(&body.url).await?;

    logger.info("Upload deleted", None);
    Ok(Response::empty()?.with_status(204))
}

/// `POST /api/thumbnails`
pub async fn thumbnail(mut req: Request, state: &AppState, logger: &Logger) -> AppResult<Response> {
    let body: ThumbnailRequest = ValidationMiddleware::json_body(&mut req, &state.config).await?;

    let thumbnail = normalize_thumbnail(state, body.thumbnail.as_deref()).await?;

    logger.info(
        "Thumbnail processed",
        crate::log_data!(
            "cleared" => thumbnail.is_none(),
            "inline" => thumbnail.as_deref().is_some_and(|t| !t.starts_with("http"))
        ),
    );
    Ok(Response::from_json(&ThumbnailResponse { thumbnail })?)
}

/// Every storage rejection becomes a 400 prefixed with `Invalid thumbnail:`.
async fn normalize_thumbnail(state: &AppState, thumbnail: Option<&str>) -> AppResult<Option<String>> {
    state
        .thumbnails
        .process(thumbnail)
        .await
        .map_err(AppError::InvalidThumbnail)
}
