//! Redis-backed history store facade.
//!
//! Every operation is a single best-effort round trip: no retries, no
//! queuing. A dropped write is simply lost, which is an accepted
//! property of optional history. Callers decide what a failure means;
//! state-changing gateway operations route every call through the
//! `mirror` combinator, which logs and discards the outcome.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use time::OffsetDateTime;
use tracing::info;

use crate::error::AppError;
use crate::history::records::{CompletionUpdate, GameRecord, TournamentRecord};
use crate::history::HistoryRecorder;

const GAMES_INDEX: &str = "mogul:games";
const TOURNAMENTS_KEY: &str = "mogul:tournaments";

/// How many game ids the recency index retains.
const GAMES_RETENTION: isize = 200;
/// How many tournament records are retained.
const TOURNAMENTS_RETENTION: isize = 100;

fn game_key(game_id: &str) -> String {
    format!("mogul:game:{game_id}")
}

#[derive(Clone)]
pub struct HistoryStore {
    conn: ConnectionManager,
}

impl HistoryStore {
    /// Connect to the backing store. A failure here means the gateway
    /// runs with history disabled; it is never fatal to gameplay.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|e| AppError::config(format!("invalid REDIS_URL: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::history_unavailable(format!("redis connect failed: {e}")))?;
        info!(redis_url, "history store connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl HistoryRecorder for HistoryStore {
    /// Mirror a freshly created session.
    async fn record_created(&self, record: &GameRecord) -> Result<(), AppError> {
        let payload = encode(record)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set(game_key(&record.game_id), payload).await?;
        let _: () = conn.lpush(GAMES_INDEX, &record.game_id).await?;
        let _: () = conn.ltrim(GAMES_INDEX, 0, GAMES_RETENTION - 1).await?;
        Ok(())
    }

    /// Apply final stats to a mirrored record.
    ///
    /// If the created-record write was lost earlier, a minimal record is
    /// written in its place; mirrored copies are allowed to lag.
    async fn record_completed(
        &self,
        game_id: &str,
        update: CompletionUpdate,
    ) -> Result<(), AppError> {
        let mut record = match self.get(game_id).await? {
            Some(existing) => existing,
            None => GameRecord::created(game_id.to_string(), Vec::new()),
        };

        record.completed_at = Some(OffsetDateTime::now_utc());
        record.winner = update.winner;
        record.total_turns = Some(update.total_turns);
        record.final_cash = Some(update.final_cash);
        if update.history.is_some() {
            record.history = update.history;
        }

        let payload = encode(&record)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set(game_key(game_id), payload).await?;
        Ok(())
    }

    /// Drop the mirrored record for a deleted session.
    async fn record_deleted(&self, game_id: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(game_key(game_id)).await?;
        let _: () = conn.lrem(GAMES_INDEX, 0, game_id).await?;
        Ok(())
    }

    async fn get(&self, game_id: &str) -> Result<Option<GameRecord>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(game_key(game_id)).await?;
        match raw {
            Some(json) => Ok(Some(decode(&json)?)),
            None => Ok(None),
        }
    }

    /// Most recent session records, newest first.
    ///
    /// The heavy `history` field is stripped unless explicitly requested.
    async fn list_recent(
        &self,
        limit: usize,
        include_history: bool,
    ) -> Result<Vec<GameRecord>, AppError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.lrange(GAMES_INDEX, 0, limit as isize - 1).await?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            // A record may have expired out from under its index entry.
            if let Some(mut record) = self.get(&id).await? {
                if !include_history {
                    record.history = None;
                }
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Persist a tournament summary. Write-once, newest first.
    async fn record_tournament(&self, record: &TournamentRecord) -> Result<(), AppError> {
        let payload = encode(record)?;
        let mut conn = self.conn.clone();
        let _: () = conn.lpush(TOURNAMENTS_KEY, payload).await?;
        let _: () = conn
            .ltrim(TOURNAMENTS_KEY, 0, TOURNAMENTS_RETENTION - 1)
            .await?;
        Ok(())
    }

    async fn list_recent_tournaments(
        &self,
        limit: usize,
    ) -> Result<Vec<TournamentRecord>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = conn.lrange(TOURNAMENTS_KEY, 0, limit as isize - 1).await?;
        raw.iter().map(|json| decode(json)).collect()
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::internal(format!("failed to encode history record: {e}")))
}

fn decode<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, AppError> {
    serde_json::from_str(json)
        .map_err(|e| AppError::internal(format!("corrupt history record: {e}")))
}
