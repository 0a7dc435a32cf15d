use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `healthy` when both collections answer, `degraded` otherwise.
    pub status: String,
    pub service: String,
    pub version: String,
    /// Active storage backend: `mongodb` or `memory`.
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let reachable = match state.planets.ping().await {
        Ok(()) => state.users.ping().await,
        Err(e) => Err(e),
    };

    let mut response = HealthResponse {
        status: "healthy".to_string(),
        service: "planetary-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.backend.to_string(),
        error: None,
        timestamp: chrono::Utc::now().timestamp(),
    };

    match reachable {
        Ok(()) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("❌ Health check: {} store unreachable: {}", state.backend, e);
            response.status = "degraded".to_string();
            response.error = Some(e.to_string());
            HttpResponse::ServiceUnavailable().json(response)
        }
    }
}
