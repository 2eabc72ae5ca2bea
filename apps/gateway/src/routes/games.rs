//! Session lifecycle and turn routes.

use actix_web::{web, HttpResponse};

use crate::engine::dto::{FastForwardRequest, NewGameRequest};
use crate::error::AppError;
use crate::services::SessionService;
use crate::state::AppState;

/// POST /api/game/new
async fn new_game(
    app_state: web::Data<AppState>,
    body: web::Json<NewGameRequest>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::from_state(&app_state);
    let resp = service.create_session(&body).await?;
    Ok(HttpResponse::Ok().json(resp))
}

/// GET /api/game/{id}/state
async fn get_state(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::from_state(&app_state);
    let resp = service.get_state(&path).await?;
    Ok(HttpResponse::Ok().json(resp))
}

/// POST /api/game/{id}/turn
async fn play_turn(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::from_state(&app_state);
    let resp = service.advance_one_turn(&path).await?;
    Ok(HttpResponse::Ok().json(resp))
}

/// POST /api/game/{id}/fast-forward
async fn fast_forward(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<FastForwardRequest>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::from_state(&app_state);
    let resp = service.advance_batch(&path, body.turns).await?;
    Ok(HttpResponse::Ok().json(resp))
}

/// POST /api/game/{id}/play
async fn play_to_completion(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::from_state(&app_state);
    let resp = service.advance_to_completion(&path).await?;
    Ok(HttpResponse::Ok().json(resp))
}

/// DELETE /api/game/{id}
async fn delete_game(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = SessionService::from_state(&app_state);
    let resp = service.delete_session(&path).await?;
    Ok(HttpResponse::Ok().json(resp))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/game/new").route(web::post().to(new_game)));
    cfg.service(web::resource("/game/{id}/state").route(web::get().to(get_state)));
    cfg.service(web::resource("/game/{id}/turn").route(web::post().to(play_turn)));
    cfg.service(web::resource("/game/{id}/fast-forward").route(web::post().to(fast_forward)));
    cfg.service(web::resource("/game/{id}/play").route(web::post().to(play_to_completion)));
    cfg.service(web::resource("/game/{id}").route(web::delete().to(delete_game)));
}
