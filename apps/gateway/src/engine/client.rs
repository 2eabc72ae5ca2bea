//! HTTP client for the external rules/AI engine.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::dto::{
    DeleteResponse, FastForwardRequest, FastForwardResponse, NewGameRequest, NewGameResponse,
    PlayResponse, SimulateRequest, SimulateResponse, StateResponse, TurnResponse,
};
use crate::error::AppError;

/// Client for the engine's JSON-over-HTTP surface.
///
/// The engine serves the same paths as the gateway minus the `/api`
/// prefix. Transport failures become `EngineUnavailable`, an engine 404
/// becomes `NotFound`, and every other non-success (or malformed
/// success payload) becomes `EngineRejected` with the engine's own
/// message when one is present.
#[derive(Debug, Clone)]
pub struct EngineClient {
    base_url: String,
    client: reqwest::Client,
}

impl EngineClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the engine's health endpoint. Callers decide how to degrade.
    pub async fn health(&self) -> Result<Value, AppError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await;
        Self::decode(resp).await
    }

    /// Passthrough of the engine's agent catalog.
    pub async fn agents(&self) -> Result<Value, AppError> {
        let resp = self
            .client
            .get(format!("{}/agents", self.base_url))
            .send()
            .await;
        Self::decode(resp).await
    }

    pub async fn new_game(&self, req: &NewGameRequest) -> Result<NewGameResponse, AppError> {
        debug!(agent1 = %req.agent1.kind, agent2 = %req.agent2.kind, "creating engine session");
        let resp = self
            .client
            .post(format!("{}/game/new", self.base_url))
            .json(req)
            .send()
            .await;
        Self::decode(resp).await
    }

    pub async fn state(&self, game_id: &str) -> Result<StateResponse, AppError> {
        let resp = self
            .client
            .get(format!("{}/game/{}/state", self.base_url, game_id))
            .send()
            .await;
        Self::decode(resp).await
    }

    pub async fn turn(&self, game_id: &str) -> Result<TurnResponse, AppError> {
        let resp = self
            .client
            .post(format!("{}/game/{}/turn", self.base_url, game_id))
            .send()
            .await;
        Self::decode(resp).await
    }

    pub async fn fast_forward(
        &self,
        game_id: &str,
        turns: u32,
    ) -> Result<FastForwardResponse, AppError> {
        let resp = self
            .client
            .post(format!("{}/game/{}/fast-forward", self.base_url, game_id))
            .json(&FastForwardRequest { turns })
            .send()
            .await;
        Self::decode(resp).await
    }

    pub async fn play(&self, game_id: &str) -> Result<PlayResponse, AppError> {
        let resp = self
            .client
            .post(format!("{}/game/{}/play", self.base_url, game_id))
            .send()
            .await;
        Self::decode(resp).await
    }

    pub async fn delete(&self, game_id: &str) -> Result<DeleteResponse, AppError> {
        let resp = self
            .client
            .delete(format!("{}/game/{}", self.base_url, game_id))
            .send()
            .await;
        Self::decode(resp).await
    }

    pub async fn simulate(&self, req: &SimulateRequest) -> Result<SimulateResponse, AppError> {
        let resp = self
            .client
            .post(format!("{}/simulate", self.base_url))
            .json(req)
            .send()
            .await;
        Self::decode(resp).await
    }

    /// Normalize one engine round trip into the gateway's error taxonomy.
    async fn decode<T: DeserializeOwned>(
        resp: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, AppError> {
        let resp = resp.map_err(|e| AppError::engine_unavailable(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| AppError::engine_unavailable(e.to_string()))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found(
                "GAME_NOT_FOUND",
                engine_message(&body).unwrap_or_else(|| "Game not found".to_string()),
            ));
        }

        if !status.is_success() {
            let detail = engine_message(&body)
                .unwrap_or_else(|| format!("engine responded with status {status}"));
            warn!(status = %status, detail = %detail, "engine rejected request");
            return Err(AppError::engine_rejected(detail));
        }

        serde_json::from_slice(&body).map_err(|e| {
            AppError::engine_rejected(format!("engine returned a malformed payload: {e}"))
        })
    }
}

/// Extract the engine's `{"error": "..."}` message, if the body carries one.
fn engine_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_message_reads_error_field() {
        let body = br#"{"error": "Unknown agent type: foo"}"#;
        assert_eq!(
            engine_message(body),
            Some("Unknown agent type: foo".to_string())
        );
    }

    #[test]
    fn engine_message_is_none_for_other_bodies() {
        assert_eq!(engine_message(b"not json"), None);
        assert_eq!(engine_message(br#"{"message": "hi"}"#), None);
    }
}
