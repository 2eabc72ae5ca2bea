//! Session lifecycle orchestration.
//!
//! Each operation forwards to the engine, returns its normalized
//! result, and mirrors outcomes into the history store as a
//! best-effort side effect. The `mirror` combinator is the only path
//! through which the store is written from here, which keeps the core
//! invariant structural: a history failure can be logged but can never
//! replace, alter or delay the primary response.

use std::future::Future;

use tracing::{info, warn};

use crate::engine::dto::{
    DeleteResponse, FastForwardResponse, NewGameRequest, NewGameResponse, PlayResponse,
    SimulateRequest, SimulateResponse, StateResponse, TurnResponse,
};
use crate::engine::EngineClient;
use crate::error::AppError;
use crate::history::records::{CompletionUpdate, TournamentEntry, TournamentRecord};
use crate::history::{GameRecord, HistoryRecorder};
use crate::state::AppState;

/// Observe and discard a mirroring outcome.
pub async fn mirror<F>(op: &'static str, fut: F)
where
    F: Future<Output = Result<(), AppError>>,
{
    if let Err(err) = fut.await {
        warn!(op, error = %err, "history mirror failed; primary response unaffected");
    }
}

pub struct SessionService<'a> {
    engine: &'a EngineClient,
    history: Option<&'a dyn HistoryRecorder>,
}

impl<'a> SessionService<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            engine: &state.engine,
            history: state.history.as_deref(),
        }
    }

    /// Create a session on the engine and mirror a new history record.
    pub async fn create_session(&self, req: &NewGameRequest) -> Result<NewGameResponse, AppError> {
        let resp = self.engine.new_game(req).await?;
        info!(game_id = %resp.game_id, "session created");

        if let Some(store) = self.history {
            let record = GameRecord::created(resp.game_id.clone(), resp.agents.clone());
            mirror("record_created", store.record_created(&record)).await;
        }
        Ok(resp)
    }

    pub async fn get_state(&self, game_id: &str) -> Result<StateResponse, AppError> {
        self.engine.state(game_id).await
    }

    /// Advance exactly one turn. A terminal response mirrors final stats.
    ///
    /// When the session was already over the engine plays nothing and
    /// omits `turnInfo`; that response is relayed as-is and nothing is
    /// re-mirrored.
    pub async fn advance_one_turn(&self, game_id: &str) -> Result<TurnResponse, AppError> {
        let resp = self.engine.turn(game_id).await?;

        if resp.game_over && resp.turn_info.is_some() {
            info!(game_id, winner = ?resp.winner, "session completed");
            if let Some(store) = self.history {
                let update = CompletionUpdate {
                    winner: resp.winner,
                    total_turns: resp.state.turn_count,
                    final_cash: resp.state.cash.clone(),
                    history: None,
                };
                mirror("record_completed", store.record_completed(game_id, update)).await;
            }
        }
        Ok(resp)
    }

    /// Advance up to `turns` turns in one engine round trip.
    ///
    /// The engine does not return per-turn detail for batches, so there
    /// is nothing to mirror here beyond what a later terminal single
    /// turn or playout records.
    pub async fn advance_batch(
        &self,
        game_id: &str,
        turns: u32,
    ) -> Result<FastForwardResponse, AppError> {
        self.engine.fast_forward(game_id, turns).await
    }

    /// Run the session to its terminal condition and mirror the full log.
    pub async fn advance_to_completion(&self, game_id: &str) -> Result<PlayResponse, AppError> {
        let mut resp = self.engine.play(game_id).await?;
        // A playout is terminal by definition even when the engine omits
        // the flag from this response shape.
        resp.game_over = true;
        info!(game_id, winner = ?resp.winner, total_turns = resp.total_turns, "session played out");

        if let Some(store) = self.history {
            let update = CompletionUpdate {
                winner: resp.winner,
                total_turns: resp.total_turns,
                final_cash: resp.state.cash.clone(),
                history: Some(resp.history.clone()),
            };
            mirror("record_completed", store.record_completed(game_id, update)).await;
        }
        Ok(resp)
    }

    /// Delete the session on the engine, then drop the mirrored record.
    ///
    /// The mirror delete runs whenever the engine did not report the
    /// session as unknown, including when the engine call itself failed.
    pub async fn delete_session(&self, game_id: &str) -> Result<DeleteResponse, AppError> {
        let result = self.engine.delete(game_id).await;

        if !matches!(result, Err(AppError::NotFound { .. })) {
            if let Some(store) = self.history {
                mirror("record_deleted", store.record_deleted(game_id)).await;
            }
        }
        result
    }

    /// Run a simulation tournament and mirror its summary.
    pub async fn run_batch_simulation(
        &self,
        req: &SimulateRequest,
    ) -> Result<SimulateResponse, AppError> {
        let resp = self.engine.simulate(req).await?;

        if let Some(store) = self.history {
            let record = TournamentRecord {
                agent1: TournamentEntry {
                    name: resp.agent1.name.clone(),
                    wins: resp.agent1.wins,
                    win_rate: resp.agent1.win_rate,
                },
                agent2: TournamentEntry {
                    name: resp.agent2.name.clone(),
                    wins: resp.agent2.wins,
                    win_rate: resp.agent2.win_rate,
                },
                total_games: resp.total_games,
                created_at: time::OffsetDateTime::now_utc(),
            };
            mirror("record_tournament", store.record_tournament(&record)).await;
        }
        Ok(resp)
    }
}
