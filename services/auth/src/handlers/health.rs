use axum::{extract::State, http::StatusCode};

use carehub_core::health::readiness_status;

use crate::state::AppState;

/// `GET /readyz` — ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let ready = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            false
        }
    };
    readiness_status(ready)
}
