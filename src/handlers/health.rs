use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthInfo {
    fn with_status(status: HealthStatus) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Simple up/down probe.
pub async fn health_check() -> Json<HealthInfo> {
    Json(HealthInfo::with_status(HealthStatus::Up))
}

/// Readiness probe: the service is ready once the database answers.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthInfo>) {
    match crate::db::ping(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthInfo::with_status(HealthStatus::Up)),
        ),
        Err(e) => {
            error!(error = %e, "Readiness check failed: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthInfo::with_status(HealthStatus::Down)),
            )
        }
    }
}
