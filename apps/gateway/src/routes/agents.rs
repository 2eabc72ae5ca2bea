//! Agent catalog passthrough.

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/agents
///
/// The catalog is owned by the engine; this layer never inspects agent
/// internals, it only relays the document.
async fn list_agents(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = app_state.engine.agents().await?;
    Ok(HttpResponse::Ok().json(catalog))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/agents", web::get().to(list_agents));
}
