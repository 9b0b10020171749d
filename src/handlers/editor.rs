use worker::*;

use super::AppState;
use crate::errors::AppResult;

/// `GET /api/editor/sensors`
///
/// Serves the validated activation constraints so the editor canvas sets up
/// its drag sensors from the same configuration as the server.
pub async fn sensors(state: &AppState) -> AppResult<Response> {
    Ok(Response::from_json(state.sensors.config())?)
}
