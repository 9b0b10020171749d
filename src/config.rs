//! # Configuration Management
//!
//! Configuration is stored in Cloudflare KV storage and loaded once per isolate,
//! with defaults for every setting.
//!
//! ## Configuration Sources
//!
//! 1. **KV Storage**: Primary configuration source stored under the "config" key
//! 2. **Defaults**: Fallback values when the key is absent or a field is missing
//!
//! ## Configuration Options
//!
//! - `maxUploadSize`: Maximum decoded upload size in bytes (default: 10 MiB)
//! - `base64DetectionMinLen`: Minimum length of a bare base64 thumbnail (default: 100)
//! - `sensors`: Drag activation constraints for the editor canvas
//!
//! ## Example
//!
//! ```json
//! {
//!   "maxUploadSize": 10485760,
//!   "base64DetectionMinLen": 100,
//!   "sensors": {
//!     "touch": { "delay": { "value": 200, "tolerance": 10 } },
//!     "other": { "delay": { "value": 200, "tolerance": 10 }, "distance": { "value": 5 } }
//!   }
//! }
//! ```

use crate::constants::{
    CONFIG_KV_KEY, DEFAULT_BASE64_DETECTION_MIN_LEN, DEFAULT_MAX_UPLOAD_SIZE, REQUEST_BODY_SLACK,
};
use crate::dnd::SensorConfig;
use crate::errors::{AppError, ConfigError};
use crate::logging::Logger;
use serde::{Deserialize, Serialize};
use worker::kv::KvStore;

/// Configuration structure for the storage service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Maximum decoded size accepted by the server-side base64 validator.
    pub max_upload_size: u64,

    /// Bare strings shorter than this are never treated as base64 thumbnails.
    pub base64_detection_min_len: usize,

    /// Activation constraints served to the editor canvas.
    pub sensors: SensorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            base64_detection_min_len: DEFAULT_BASE64_DETECTION_MIN_LEN,
            sensors: SensorConfig::default(),
        }
    }
}

impl Config {
    /// Parses a configuration document and validates it.
    ///
    /// Missing fields take their defaults. Malformed sensor constraints are
    /// rejected here so that no request is ever served with them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.sensors.validate()?;
        Ok(config)
    }

    /// Largest request body worth reading: the base64 expansion of the upload
    /// ceiling plus room for the JSON envelope. Saturates at `u64::MAX`.
    pub fn max_request_body_size(&self) -> u64 {
        self.max_upload_size
            .div_ceil(3)
            .saturating_mul(4)
            .saturating_add(REQUEST_BODY_SLACK)
    }

    /// Loads configuration from KV storage with fallback to defaults.
    ///
    /// # Errors
    ///
    /// - KV access failures are propagated
    /// - An invalid document fails the load instead of falling back
    pub async fn load(kv: &KvStore, logger: &Logger) -> Result<Self, AppError> {
        match kv.get(CONFIG_KV_KEY).text().await.map_err(worker::Error::from)? {
            Some(raw) => {
                let config = Self::from_json(&raw).inspect_err(|e| {
                    logger.error(
                        "Invalid configuration in KV storage",
                        crate::log_data!("error" => e.to_string()),
                    )
                })?;
                logger.info("Configuration loaded from KV storage", None);
                Ok(config)
            }
            None => {
                logger.info("Config not found in KV, using default", None);
                Ok(Self::default())
            }
        }
    }
}
