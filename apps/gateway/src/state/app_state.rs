use std::sync::Arc;

use crate::engine::EngineClient;
use crate::history::HistoryRecorder;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Client for the external rules/AI engine
    pub engine: EngineClient,
    /// History recorder (absent when no secondary store is configured)
    pub history: Option<Arc<dyn HistoryRecorder>>,
}

impl AppState {
    /// Create a new AppState with the given engine client and history recorder
    pub fn new<H>(engine: EngineClient, history: H) -> Self
    where
        H: HistoryRecorder + 'static,
    {
        Self {
            engine,
            history: Some(Arc::new(history)),
        }
    }

    /// Create a new AppState without a history store (store disabled or unreachable)
    pub fn without_history(engine: EngineClient) -> Self {
        Self {
            engine,
            history: None,
        }
    }
}
