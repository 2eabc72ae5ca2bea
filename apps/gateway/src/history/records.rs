//! Mirrored record shapes.
//!
//! These are diagnostic copies of session and tournament outcomes.
//! They may lag or be absent entirely; gameplay never depends on them.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::engine::dto::{AgentSummary, TurnInfo};

/// Mirrored copy of one session, keyed by its engine-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: String,
    pub agents: Vec<AgentSummary>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub winner: Option<u8>,
    #[serde(default)]
    pub total_turns: Option<u32>,
    #[serde(default)]
    pub final_cash: Option<Vec<i64>>,
    /// Full turn log; the heavy field, omitted from list views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<TurnInfo>>,
}

impl GameRecord {
    pub fn created(game_id: String, agents: Vec<AgentSummary>) -> Self {
        Self {
            game_id,
            agents,
            created_at: OffsetDateTime::now_utc(),
            completed_at: None,
            winner: None,
            total_turns: None,
            final_cash: None,
            history: None,
        }
    }
}

/// Final stats applied to a mirrored record when a session terminates.
#[derive(Debug, Clone)]
pub struct CompletionUpdate {
    pub winner: Option<u8>,
    pub total_turns: u32,
    pub final_cash: Vec<i64>,
    /// `Some` only for run-to-completion, which replaces the log wholesale.
    pub history: Option<Vec<TurnInfo>>,
}

/// Write-once summary of a batch of completed sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRecord {
    pub agent1: TournamentEntry,
    pub agent2: TournamentEntry,
    pub total_games: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentEntry {
    pub name: String,
    pub wins: u32,
    pub win_rate: f64,
}
