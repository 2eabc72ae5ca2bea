//! Tournament simulation route.

use actix_web::{web, HttpResponse};

use crate::engine::dto::SimulateRequest;
use crate::error::AppError;
use crate::services::SessionService;
use crate::state::AppState;

/// POST /api/simulate
async fn simulate(
    app_state: web::Data<AppState>,
    body: web::Json<SimulateRequest>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::from_state(&app_state);
    let resp = service.run_batch_simulation(&body).await?;
    Ok(HttpResponse::Ok().json(resp))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/simulate", web::post().to(simulate));
}
