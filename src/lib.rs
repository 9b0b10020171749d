//! # Gieoduyen Storage - Cloudflare Workers
//!
//! Storage and editor services for the invitation page builder, built with Rust
//! and Cloudflare Workers. Admins design page templates and end users publish
//! invitation pages from them; this service validates the images those pages
//! carry and hands the editor its drag activation settings.
//!
//! ## Architecture
//!
//! - **Storage**: Pluggable providers turning images into URLs, a strict
//!   server-side base64 validator and the thumbnail policy
//! - **Dnd**: Pointer activation constraint resolution for the editor canvas
//! - **Router**: Routes incoming requests to appropriate handlers
//! - **Middleware**: Handles CORS and request validation
//! - **Handlers**: JSON endpoints over the storage and dnd modules
//! - **Config**: Limits and sensor constraints loaded from KV storage
//!
//! `storage` and `dnd` never touch the Workers runtime and can be used as a
//! plain library.
//!
//! ## Example Usage
//!
//! ```text
//! GET    /health               - Health check
//! POST   /api/storage/upload   - Validate and store a base64 image
//! DELETE /api/storage/upload   - Delete a stored image
//! POST   /api/thumbnails       - Normalize a thumbnail field
//! GET    /api/editor/sensors   - Drag activation constraints
//! ```

use std::sync::{Arc, OnceLock};
use worker::*;

pub mod config;
pub mod constants;
pub mod dnd;
pub mod errors;
mod handlers;
pub mod logging;
mod middleware;
pub mod models;
mod router;
pub mod storage;
mod utils;

use config::Config;
use constants::STORAGE_CONFIG_KV_NAME;
use handlers::AppState;
use logging::Logger;

static STATE_CACHE: OnceLock<Arc<AppState>> = OnceLock::new();

/// Main entry point for the Cloudflare Worker.
///
/// 1. Sets up panic handling for better debugging
/// 2. Loads configuration from KV storage with fallback to defaults
/// 3. Delegates request routing to the router module
///
/// Configuration and the services built from it are cached for the lifetime
/// of the isolate. A configuration that fails validation is never cached, so
/// every request fails until it is fixed.
#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    // Set up panic hook for better error reporting in development
    console_error_panic_hook::set_once();

    let logger = Logger::new(utils::generate_request_id());
    let state = load_state(&env, &logger).await?;

    router::handle_request(req, state, logger).await
}

async fn load_state(env: &Env, logger: &Logger) -> Result<Arc<AppState>> {
    if let Some(state) = STATE_CACHE.get() {
        return Ok(state.clone());
    }

    let kv = env.kv(STORAGE_CONFIG_KV_NAME)?;
    let config = Config::load(&kv, logger).await?;
    let state = Arc::new(AppState::from_config(config)?);
    let _ = STATE_CACHE.set(state.clone());
    Ok(state)
}
