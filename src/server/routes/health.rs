use axum::response::Json;

use super::HealthStatus;

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        message: "API is running".to_string(),
    })
}
