//! # Application Constants
//!
//! Application-wide constants for the storage service and the editor sensors.
//!
//! ## Binding Names
//!
//! Constants for Cloudflare Worker bindings that must match wrangler.toml configuration.
//!
//! ## Size Limits
//!
//! The decoded upload ceiling and the heuristics used to recognise base64 input.
//!
//! ## Sensor Defaults
//!
//! Default activation constraints handed to the editor canvas.

/// Standard KV configuration binding name
pub const STORAGE_CONFIG_KV_NAME: &str = "STORAGE_CONFIG";

/// Key under which the configuration document is stored in KV
pub const CONFIG_KV_KEY: &str = "config";

/// Provider identifier reported in upload metadata
pub const BASE64_PROVIDER_NAME: &str = "base64";

/// Maximum decoded upload size on the server path (10 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Minimum length for a bare string to be treated as base64 by the thumbnail policy
pub const DEFAULT_BASE64_DETECTION_MIN_LEN: usize = 100;

/// Extra room allowed on top of the base64 expansion of the upload ceiling
/// for the JSON envelope and the data URL prefix.
pub const REQUEST_BODY_SLACK: u64 = 64 * 1024;

/// Hold duration before a touch or generic pointer activates a drag (ms)
pub const DEFAULT_DELAY_MS: f64 = 200.0;

/// Movement tolerated during the hold delay (px)
pub const DEFAULT_DELAY_TOLERANCE_PX: f64 = 10.0;

/// Movement that activates a drag for generic pointers (px)
pub const DEFAULT_DISTANCE_PX: f64 = 5.0;

/// CORS header for allowed origins
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// CORS header for allowed methods
pub const CORS_ALLOW_METHODS: &str = "GET, POST, DELETE, OPTIONS";

/// CORS header for allowed headers
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";
