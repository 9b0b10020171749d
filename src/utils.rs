//! # Utility Functions
//!
//! Request identifiers and CORS headers shared by the handlers.

use crate::constants::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};
use chrono::Utc;
use uuid::Uuid;
use worker::Headers;

/// Generates a unique identifier for a request.
///
/// The format is `{timestamp}-{uuid}`, where the timestamp is UTC milliseconds
/// since the epoch, so identifiers sort by creation time in the logs.
///
/// # Example
///
/// ```rust,ignore
/// let request_id = generate_request_id();
/// // Returns: "1641987000000-550e8400-e29b-41d4-a716-446655440000"
/// ```
pub fn generate_request_id() -> String {
    let uuid_part = Uuid::new_v4().to_string();
    let timestamp = Utc::now().timestamp_millis();
    format!("{}-{}", timestamp, uuid_part)
}

/// Creates HTTP headers for Cross-Origin Resource Sharing (CORS) support.
///
/// # CORS Configuration
///
/// - **Access-Control-Allow-Origin**: `*` (allows all origins)
/// - **Access-Control-Allow-Methods**: `GET, POST, DELETE, OPTIONS`
/// - **Access-Control-Allow-Headers**: `Content-Type`
///
/// # Security Note
///
/// The editor and the admin pages are served from other origins, hence `*`.
/// Restrict this to the page builder's domain in production.
pub fn cors_headers() -> Headers {
    let headers = Headers::new();
    // Note: These values are known to be valid
    let _ = headers.set("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN);
    let _ = headers.set("Access-Control-Allow-Methods", CORS_ALLOW_METHODS);
    let _ = headers.set("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_timestamped_and_unique() {
        let first = generate_request_id();
        let second = generate_request_id();
        assert_ne!(first, second);

        let (timestamp, uuid) = first.split_once('-').unwrap();
        assert!(timestamp.parse::<i64>().is_ok());
        assert!(Uuid::parse_str(uuid).is_ok());
    }
}
