//! Health endpoint.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub engine_status: String,
}

/// GET /api/health
///
/// Never hard-fails: an unreachable engine degrades the sub-status
/// instead of failing the probe.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let engine_status = match app_state.engine.health().await {
        Ok(_) => "ok".to_string(),
        Err(_) => "unavailable".to_string(),
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        service: "mogul-gateway".to_string(),
        engine_status,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
