//! Shared test support: a deterministic in-process mock engine and an
//! app builder wiring the gateway routes the way `main.rs` does.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

use async_trait::async_trait;

use gateway::engine::EngineClient;
use gateway::error::AppError;
use gateway::history::records::CompletionUpdate;
use gateway::history::{GameRecord, HistoryRecorder, TournamentRecord};
use gateway::state::AppState;

#[derive(Debug, Clone)]
pub struct MockGame {
    pub positions: [u8; 2],
    pub cash: [i64; 2],
    pub current_player: u8,
    pub turn_count: u32,
    pub max_turns: u32,
    pub game_over: bool,
    pub winner: Option<u8>,
    pub last_dice_roll: u8,
}

impl MockGame {
    fn new(starting_cash: i64, max_turns: u32) -> Self {
        Self {
            positions: [0, 0],
            cash: [starting_cash, starting_cash],
            current_player: 0,
            turn_count: 0,
            max_turns,
            game_over: false,
            winner: None,
            last_dice_roll: 0,
        }
    }

    fn snapshot(&self) -> Value {
        json!({
            "positions": self.positions,
            "cash": self.cash,
            "currentPlayer": self.current_player,
            "turnCount": self.turn_count,
            "gameOver": self.game_over,
            "winner": self.winner,
            "lastDiceRoll": self.last_dice_roll,
            "lastAction": "",
        })
    }

    /// Deterministic single-turn advance: dice cycle 2..=12, one-based
    /// turn numbering, termination at max_turns with player 0 winning.
    fn advance(&mut self) -> Value {
        let player = self.current_player;
        let dice = ((self.turn_count % 11) + 2) as u8;
        let new_pos = (self.positions[player as usize] + dice) % 40;

        self.positions[player as usize] = new_pos;
        self.last_dice_roll = dice;
        self.current_player = 1 - player;
        self.turn_count += 1;

        if self.turn_count >= self.max_turns {
            self.game_over = true;
            self.winner = Some(0);
        }

        json!({
            "turn": self.turn_count,
            "player": player,
            "diceRoll": dice,
            "newPosition": new_pos,
            "action": "SKIP",
        })
    }
}

#[derive(Default)]
pub struct MockEngine {
    games: Mutex<HashMap<String, MockGame>>,
    next_id: AtomicU32,
}

impl MockEngine {
    fn not_found() -> HttpResponse {
        HttpResponse::NotFound().json(json!({"error": "Game not found"}))
    }
}

async fn engine_health() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "healthy", "service": "mock-engine"}))
}

async fn engine_agents() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "agents": [
            {"id": "expectiminimax", "name": "Expectiminimax"},
            {"id": "mcts", "name": "Monte Carlo Tree Search"},
        ]
    }))
}

async fn engine_new_game(
    state: web::Data<MockEngine>,
    body: web::Json<Value>,
) -> HttpResponse {
    let agent1 = body["agent1"]["type"].as_str().unwrap_or("expectiminimax");
    let agent2 = body["agent2"]["type"].as_str().unwrap_or("mcts");
    for kind in [agent1, agent2] {
        if !["expectiminimax", "minimax", "mcts", "hybrid_mcts"].contains(&kind) {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("Unknown agent type: {kind}")}));
        }
    }

    let starting_cash = body["startingCash"].as_i64().unwrap_or(1500);
    let max_turns = body["maxTurns"].as_u64().unwrap_or(200) as u32;

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let game_id = format!("game_{}", 10000 + id);
    let game = MockGame::new(starting_cash, max_turns);
    let snapshot = game.snapshot();
    state.games.lock().unwrap().insert(game_id.clone(), game);

    HttpResponse::Ok().json(json!({
        "gameId": game_id,
        "state": snapshot,
        "agents": [
            {"id": 0, "type": agent1, "name": agent1.to_uppercase()},
            {"id": 1, "type": agent2, "name": agent2.to_uppercase()},
        ]
    }))
}

async fn engine_state(state: web::Data<MockEngine>, path: web::Path<String>) -> HttpResponse {
    let games = state.games.lock().unwrap();
    match games.get(path.as_str()) {
        Some(game) => HttpResponse::Ok().json(json!({
            "gameId": path.as_str(),
            "state": game.snapshot(),
        })),
        None => MockEngine::not_found(),
    }
}

async fn engine_turn(state: web::Data<MockEngine>, path: web::Path<String>) -> HttpResponse {
    let mut games = state.games.lock().unwrap();
    match games.get_mut(path.as_str()) {
        // A finished session answers 200 with the terminal state and
        // no turnInfo; nothing is played.
        Some(game) if game.game_over => HttpResponse::Ok().json(json!({
            "gameId": path.as_str(),
            "state": game.snapshot(),
            "gameOver": true,
            "winner": game.winner,
            "message": "Game is already over",
        })),
        Some(game) => {
            let turn_info = game.advance();
            HttpResponse::Ok().json(json!({
                "gameId": path.as_str(),
                "state": game.snapshot(),
                "turnInfo": turn_info,
                "gameOver": game.game_over,
                "winner": game.winner,
            }))
        }
        None => MockEngine::not_found(),
    }
}

async fn engine_fast_forward(
    state: web::Data<MockEngine>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let turns = body["turns"].as_u64().unwrap_or(10).min(50) as u32;
    let mut games = state.games.lock().unwrap();
    match games.get_mut(path.as_str()) {
        Some(game) => {
            let mut played = 0;
            for _ in 0..turns {
                if game.game_over {
                    break;
                }
                game.advance();
                played += 1;
            }
            HttpResponse::Ok().json(json!({
                "gameId": path.as_str(),
                "state": game.snapshot(),
                "turnsPlayed": played,
                "gameOver": game.game_over,
                "winner": game.winner,
            }))
        }
        None => MockEngine::not_found(),
    }
}

async fn engine_play(state: web::Data<MockEngine>, path: web::Path<String>) -> HttpResponse {
    let mut games = state.games.lock().unwrap();
    match games.get_mut(path.as_str()) {
        Some(game) => {
            let mut history = Vec::new();
            while !game.game_over {
                history.push(game.advance());
            }
            HttpResponse::Ok().json(json!({
                "gameId": path.as_str(),
                "state": game.snapshot(),
                "history": history,
                "winner": game.winner,
                "totalTurns": game.turn_count,
            }))
        }
        None => MockEngine::not_found(),
    }
}

async fn engine_delete(state: web::Data<MockEngine>, path: web::Path<String>) -> HttpResponse {
    let mut games = state.games.lock().unwrap();
    match games.remove(path.as_str()) {
        Some(_) => HttpResponse::Ok().json(json!({"message": "Game deleted"})),
        None => MockEngine::not_found(),
    }
}

async fn engine_simulate(body: web::Json<Value>) -> HttpResponse {
    let num_games = body["numGames"].as_u64().unwrap_or(10).min(100) as u32;
    let wins1 = num_games / 2;
    let wins2 = num_games - wins1;
    HttpResponse::Ok().json(json!({
        "agent1": {"type": "expectiminimax", "name": "Expectiminimax", "wins": wins1,
                   "winRate": wins1 as f64 / num_games as f64},
        "agent2": {"type": "mcts", "name": "MCTS", "wins": wins2,
                   "winRate": wins2 as f64 / num_games as f64},
        "totalGames": num_games,
    }))
}

/// Spawn the mock engine on an ephemeral port; returns its base URL.
pub async fn spawn_mock_engine() -> String {
    let data = web::Data::new(MockEngine::default());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/health", web::get().to(engine_health))
            .route("/agents", web::get().to(engine_agents))
            .route("/game/new", web::post().to(engine_new_game))
            .route("/game/{id}/state", web::get().to(engine_state))
            .route("/game/{id}/turn", web::post().to(engine_turn))
            .route("/game/{id}/fast-forward", web::post().to(engine_fast_forward))
            .route("/game/{id}/play", web::post().to(engine_play))
            .route("/game/{id}", web::delete().to(engine_delete))
            .route("/simulate", web::post().to(engine_simulate))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock engine");

    let port = server.addrs()[0].port();
    actix_web::rt::spawn(server.run());
    format!("http://127.0.0.1:{port}")
}

/// Gateway state wired against the given engine, history disabled.
pub fn gateway_state(engine_url: &str) -> web::Data<AppState> {
    web::Data::new(AppState::without_history(EngineClient::new(
        engine_url.to_string(),
    )))
}

/// History recorder whose every operation fails, standing in for a
/// configured-but-unreachable secondary store.
pub struct FailingHistory;

#[async_trait]
impl HistoryRecorder for FailingHistory {
    async fn record_created(&self, _record: &GameRecord) -> Result<(), AppError> {
        Err(AppError::history_unavailable("store offline".into()))
    }

    async fn record_completed(
        &self,
        _game_id: &str,
        _update: CompletionUpdate,
    ) -> Result<(), AppError> {
        Err(AppError::history_unavailable("store offline".into()))
    }

    async fn record_deleted(&self, _game_id: &str) -> Result<(), AppError> {
        Err(AppError::history_unavailable("store offline".into()))
    }

    async fn get(&self, _game_id: &str) -> Result<Option<GameRecord>, AppError> {
        Err(AppError::history_unavailable("store offline".into()))
    }

    async fn list_recent(
        &self,
        _limit: usize,
        _include_history: bool,
    ) -> Result<Vec<GameRecord>, AppError> {
        Err(AppError::history_unavailable("store offline".into()))
    }

    async fn record_tournament(&self, _record: &TournamentRecord) -> Result<(), AppError> {
        Err(AppError::history_unavailable("store offline".into()))
    }

    async fn list_recent_tournaments(
        &self,
        _limit: usize,
    ) -> Result<Vec<TournamentRecord>, AppError> {
        Err(AppError::history_unavailable("store offline".into()))
    }
}

/// Gateway state with a history store that is present but failing.
pub fn gateway_state_failing_history(engine_url: &str) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        EngineClient::new(engine_url.to_string()),
        FailingHistory,
    ))
}

/// Base URL of a port that nothing listens on.
pub fn unreachable_engine_url() -> String {
    // Bind-then-drop to find a port that is very likely closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("probe port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
