//! # Handlers Module
//!
//! HTTP request handlers for the storage service. All handlers share the
//! [`AppState`] built at start-up and report failures through [`AppError`].

use worker::*;

use crate::config::Config;
use crate::dnd::ActivationResolver;
use crate::errors::{AppError, AppResult};
use crate::logging::Logger;
use crate::middleware::CorsMiddleware;
use crate::storage::{ServerBase64StorageProvider, StorageContext, StorageProvider, ThumbnailProcessor};
use crate::utils::cors_headers;

pub mod editor;
pub mod storage;

/// Services shared by every request, built once from the configuration.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub storage: StorageContext,
    pub thumbnails: ThumbnailProcessor,
    pub sensors: ActivationResolver,
}

impl AppState {
    /// Wires the server-side base64 provider into the storage context and the
    /// thumbnail policy. Sensor constraints are validated here.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let storage = StorageContext::new(StorageProvider::read_only(
            ServerBase64StorageProvider::new(config.max_upload_size),
        ));
        let thumbnails = ThumbnailProcessor::new(storage.clone(), config.base64_detection_min_len);
        let sensors = ActivationResolver::new(config.sensors)?;

        Ok(Self {
            config,
            storage,
            thumbnails,
            sensors,
        })
    }
}

/// Runs a handler and renders its outcome with CORS headers, logging failures.
pub async fn respond<F>(logger: &Logger, handler: F) -> Result<Response>
where
    F: std::future::Future<Output = AppResult<Response>>,
{
    match handler.await {
        Ok(response) => Ok(CorsMiddleware::apply_headers(response)),
        Err(app_error) => {
            let status = app_error.status_code();
            let data = crate::log_data!("status" => status, "error" => app_error.to_string());
            if status >= 500 {
                logger.error("Request failed", data);
            } else {
                logger.warn("Request rejected", data);
            }
            match app_error.to_response() {
                Ok(response) => Ok(CorsMiddleware::apply_headers(response)),
                Err(_) => Response::error("Internal Server Error", 500)
                    .map(|r| r.with_headers(cors_headers())),
            }
        }
    }
}

/// Provides a health check endpoint for monitoring and load balancer probes.
pub async fn handle_health_check(state: &AppState) -> AppResult<Response> {
    Ok(Response::from_json(&serde_json::json!({
        "status": "healthy",
        "service": "gieoduyen-storage",
        "provider": state.storage.provider().name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))?)
}

/// Handles requests to unmatched routes with a 404 Not Found response.
pub async fn handle_not_found(path: &str) -> AppResult<Response> {
    Err(AppError::NotFound(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;

    #[test]
    fn state_uses_configured_limits() {
        let config = Config {
            max_upload_size: 1024,
            ..Config::default()
        };
        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.storage.provider().name(), "base64");
        assert!(!state.storage.provider().supports_delete());
        assert_eq!(state.sensors.config(), &state.config.sensors);
    }

    #[test]
    fn invalid_sensors_fail_state_construction() {
        let mut config = Config::default();
        config.sensors.other.delay = Some(crate::dnd::DelayConstraint {
            value: f64::NAN,
            tolerance: crate::dnd::Distance::Scalar(10.0),
        });
        let err = AppState::from_config(config).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidConstraint { sensor: "other", .. })
        ));
    }
}
