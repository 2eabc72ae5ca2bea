//! Static board catalog.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::board::{generate_board, BoardTile, DISTRICTS, GAMBLE_INDICES};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub board: Vec<BoardTile>,
    pub colors: Vec<String>,
    pub gamble_indices: Vec<usize>,
}

/// GET /api/board
///
/// Served from the topology mapper; no engine round trip.
async fn board_catalog() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(BoardResponse {
        board: generate_board(),
        colors: DISTRICTS.iter().map(|(c, _, _)| c.to_string()).collect(),
        gamble_indices: GAMBLE_INDICES.to_vec(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/board", web::get().to(board_catalog));
}
