//! Wire schemas shared by the engine boundary, the gateway surface and
//! the observer client.
//!
//! The engine's responses are validated against these explicit shapes
//! at the gateway boundary so malformed upstream payloads fail fast
//! instead of propagating undefined structure downstream. Fields the
//! orchestration layer does not reason about (board contents,
//! per-player stats, last action strings) are preserved verbatim in a
//! flattened `extra` map; the snapshot stays authoritative and opaque.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authoritative session state as returned by the engine.
///
/// The gateway never derives or mutates any of this; it only inspects
/// the termination fields to drive mirroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub positions: Vec<u8>,
    pub cash: Vec<i64>,
    pub current_player: u8,
    pub turn_count: u32,
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<u8>,
    #[serde(default)]
    pub last_dice_roll: u8,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One completed turn, as reported by the engine for single-turn
/// advances and full playouts. Batch fast-forwards do not return these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnInfo {
    pub turn: u32,
    pub player: u8,
    #[serde(default)]
    pub dice_roll: Option<u8>,
    #[serde(default)]
    pub new_position: Option<u8>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub fare_paid: Option<i64>,
    #[serde(default)]
    pub gamble_effect: Option<Value>,
    #[serde(default)]
    pub landed_on: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Agent descriptor sent to the engine. The `type` id and config are
/// opaque here; an unknown id comes back as an engine rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: Option<Value>,
}

/// Agent identity echoed back by the engine at session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub id: u8,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Request bodies accepted by the gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    pub agent1: AgentSpec,
    pub agent2: AgentSpec,
    #[serde(default = "default_starting_cash")]
    pub starting_cash: i64,
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

fn default_starting_cash() -> i64 {
    1500
}

fn default_max_turns() -> u32 {
    200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastForwardRequest {
    #[serde(default = "default_fast_forward_turns")]
    pub turns: u32,
}

fn default_fast_forward_turns() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub agent1: AgentSpec,
    pub agent2: AgentSpec,
    #[serde(default = "default_num_games")]
    pub num_games: u32,
}

fn default_num_games() -> u32 {
    10
}

// ---------------------------------------------------------------------------
// Responses (engine shapes, re-served by the gateway under /api)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResponse {
    pub game_id: String,
    pub state: StateSnapshot,
    pub agents: Vec<AgentSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub game_id: String,
    pub state: StateSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub game_id: String,
    pub state: StateSnapshot,
    /// Absent when the session was already over: the engine answers
    /// with 200 and the terminal state but plays no turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_info: Option<TurnInfo>,
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastForwardResponse {
    pub game_id: String,
    pub state: StateSnapshot,
    pub turns_played: u32,
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResponse {
    pub game_id: String,
    pub state: StateSnapshot,
    pub history: Vec<TurnInfo>,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub winner: Option<u8>,
    pub total_turns: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSide {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub name: String,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub agent1: TournamentSide,
    pub agent2: TournamentSide,
    pub total_games: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_preserves_unknown_fields() {
        let raw = serde_json::json!({
            "positions": [3, 7],
            "cash": [1420, 1510],
            "currentPlayer": 1,
            "turnCount": 4,
            "gameOver": false,
            "winner": null,
            "lastDiceRoll": 9,
            "board": [{"index": 0, "type": "property"}],
            "lastAction": "BUY"
        });

        let snap: StateSnapshot = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(snap.turn_count, 4);
        assert_eq!(snap.cash, vec![1420, 1510]);
        assert!(snap.extra.contains_key("board"));
        assert_eq!(snap.extra["lastAction"], "BUY");

        // Round-trips without dropping the opaque fields.
        let back = serde_json::to_value(&snap).unwrap();
        assert_eq!(back["board"], raw["board"]);
        assert_eq!(back["currentPlayer"], 1);
    }

    #[test]
    fn malformed_snapshot_fails_to_parse() {
        let raw = serde_json::json!({"positions": "nope"});
        assert!(serde_json::from_value::<StateSnapshot>(raw).is_err());
    }

    #[test]
    fn turn_response_without_turn_info_is_valid() {
        // Shape the engine answers with when the session is already over.
        let raw = serde_json::json!({
            "gameId": "game_7",
            "state": {
                "positions": [12, 30],
                "cash": [900, 2100],
                "currentPlayer": 0,
                "turnCount": 200,
                "gameOver": true,
                "winner": 1
            },
            "gameOver": true,
            "winner": 1,
            "message": "Game is already over"
        });

        let resp: TurnResponse = serde_json::from_value(raw).unwrap();
        assert!(resp.turn_info.is_none());
        assert!(resp.game_over);
        assert_eq!(resp.winner, Some(1));

        // Re-serialized without fabricating a turnInfo field.
        let back = serde_json::to_value(&resp).unwrap();
        assert!(back.get("turnInfo").is_none());
    }

    #[test]
    fn new_game_request_applies_defaults() {
        let req: NewGameRequest = serde_json::from_value(serde_json::json!({
            "agent1": {"type": "expectiminimax"},
            "agent2": {"type": "mcts", "config": {"simulations": 200}}
        }))
        .unwrap();
        assert_eq!(req.starting_cash, 1500);
        assert_eq!(req.max_turns, 200);
        assert_eq!(req.agent2.kind, "mcts");
    }
}
