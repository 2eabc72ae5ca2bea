//! Best-effort history mirroring into an optional secondary store.

use async_trait::async_trait;

use crate::error::AppError;

pub mod records;
pub mod store;

pub use records::{GameRecord, TournamentRecord};
pub use store::HistoryStore;

use records::CompletionUpdate;

/// The mirroring operations the gateway performs against its
/// secondary store. The Redis-backed [`HistoryStore`] is the only
/// production implementation; the seam exists so orchestration can be
/// exercised against a failing or scripted store.
#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    async fn record_created(&self, record: &GameRecord) -> Result<(), AppError>;
    async fn record_completed(
        &self,
        game_id: &str,
        update: CompletionUpdate,
    ) -> Result<(), AppError>;
    async fn record_deleted(&self, game_id: &str) -> Result<(), AppError>;
    async fn get(&self, game_id: &str) -> Result<Option<GameRecord>, AppError>;
    async fn list_recent(
        &self,
        limit: usize,
        include_history: bool,
    ) -> Result<Vec<GameRecord>, AppError>;
    async fn record_tournament(&self, record: &TournamentRecord) -> Result<(), AppError>;
    async fn list_recent_tournaments(
        &self,
        limit: usize,
    ) -> Result<Vec<TournamentRecord>, AppError>;
}
