//! Mirrored history and tournament listings.
//!
//! These are the only read paths into the secondary store. They degrade
//! to an empty list plus a diagnostic marker when the store is missing
//! or unreachable; they never answer 5xx on its behalf.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;
use crate::history::{GameRecord, HistoryRecorder, TournamentRecord};
use crate::state::AppState;

const RECENT_GAMES_LIMIT: usize = 50;
const RECENT_TOURNAMENTS_LIMIT: usize = 20;

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryListResponse {
    pub games: Vec<GameRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TournamentListResponse {
    pub tournaments: Vec<TournamentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/history
async fn list_history(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let resp = match &app_state.history {
        None => HistoryListResponse {
            games: Vec::new(),
            error: Some("history store is not configured".to_string()),
        },
        Some(store) => match store.list_recent(RECENT_GAMES_LIMIT, false).await {
            Ok(games) => HistoryListResponse { games, error: None },
            Err(err) => {
                warn!(error = %err, "history listing degraded");
                HistoryListResponse {
                    games: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        },
    };
    Ok(HttpResponse::Ok().json(resp))
}

/// GET /api/history/{id}
///
/// Full mirrored record, heavy field included. A missing record and a
/// disabled store both read as absence.
async fn get_history_record(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let game_id = path.into_inner();

    let record = match &app_state.history {
        None => None,
        Some(store) => store.get(&game_id).await.unwrap_or_else(|err| {
            warn!(game_id = %game_id, error = %err, "history record lookup degraded");
            None
        }),
    };

    match record {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Err(AppError::not_found(
            "RECORD_NOT_FOUND",
            format!("No mirrored record for game {game_id}"),
        )),
    }
}

/// GET /api/tournaments
async fn list_tournaments(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let resp = match &app_state.history {
        None => TournamentListResponse {
            tournaments: Vec::new(),
            error: Some("history store is not configured".to_string()),
        },
        Some(store) => match store.list_recent_tournaments(RECENT_TOURNAMENTS_LIMIT).await {
            Ok(tournaments) => TournamentListResponse {
                tournaments,
                error: None,
            },
            Err(err) => {
                warn!(error = %err, "tournament listing degraded");
                TournamentListResponse {
                    tournaments: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        },
    };
    Ok(HttpResponse::Ok().json(resp))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/history", web::get().to(list_history));
    cfg.service(web::resource("/history/{id}").route(web::get().to(get_history_record)));
    cfg.route("/tournaments", web::get().to(list_tournaments));
}
