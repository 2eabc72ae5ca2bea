//! Gateway client and the trait seam the controller drives through.
//!
//! The controller never talks HTTP directly; it calls a [`SessionApi`],
//! so tests can substitute fakes with scripted or slowed responses.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use gateway::engine::dto::{
    AgentSpec, DeleteResponse, FastForwardResponse, NewGameRequest, NewGameResponse, PlayResponse,
    StateResponse, TurnResponse,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: the gateway itself could not be reached.
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
    /// The gateway answered with a problem document.
    #[error("{code}: {detail}")]
    Rejected { code: String, detail: String },
    /// A 2xx body that does not match the expected shape.
    #[error("malformed gateway payload: {0}")]
    Malformed(String),
}

impl ApiError {
    /// True for the gateway's not-found code, which the controller
    /// treats differently from transient failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Rejected { code, .. } if code == "GAME_NOT_FOUND")
    }
}

/// The gateway operations a playback session needs.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn create_game(&self, req: &NewGameRequest) -> Result<NewGameResponse, ApiError>;
    async fn get_state(&self, game_id: &str) -> Result<StateResponse, ApiError>;
    async fn step(&self, game_id: &str) -> Result<TurnResponse, ApiError>;
    async fn fast_forward(&self, game_id: &str, turns: u32)
        -> Result<FastForwardResponse, ApiError>;
    async fn play_out(&self, game_id: &str) -> Result<PlayResponse, ApiError>;
    async fn delete_game(&self, game_id: &str) -> Result<DeleteResponse, ApiError>;
}

/// Reqwest-backed [`SessionApi`] against a running gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
}

/// Subset of the gateway's problem document we report on.
#[derive(Debug, Deserialize)]
struct ProblemBody {
    code: Option<String>,
    detail: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|err| ApiError::Unreachable(err.to_string()))?;

        if !status.is_success() {
            let problem: Option<ProblemBody> = serde_json::from_slice(&body).ok();
            let (code, detail) = match problem {
                Some(p) => (
                    p.code.unwrap_or_else(|| default_code(status)),
                    p.detail.unwrap_or_else(|| status.to_string()),
                ),
                None => (default_code(status), status.to_string()),
            };
            return Err(ApiError::Rejected { code, detail });
        }

        serde_json::from_slice(&body).map_err(|err| ApiError::Malformed(err.to_string()))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        req.send()
            .await
            .map_err(|err| ApiError::Unreachable(err.to_string()))
    }
}

fn default_code(status: StatusCode) -> String {
    if status == StatusCode::NOT_FOUND {
        "GAME_NOT_FOUND".to_string()
    } else {
        "GATEWAY_ERROR".to_string()
    }
}

#[async_trait]
impl SessionApi for GatewayClient {
    async fn create_game(&self, req: &NewGameRequest) -> Result<NewGameResponse, ApiError> {
        let resp = self
            .send(self.http.post(self.url("/game/new")).json(req))
            .await?;
        Self::decode(resp).await
    }

    async fn get_state(&self, game_id: &str) -> Result<StateResponse, ApiError> {
        let resp = self
            .send(self.http.get(self.url(&format!("/game/{game_id}/state"))))
            .await?;
        Self::decode(resp).await
    }

    async fn step(&self, game_id: &str) -> Result<TurnResponse, ApiError> {
        let resp = self
            .send(self.http.post(self.url(&format!("/game/{game_id}/turn"))))
            .await?;
        Self::decode(resp).await
    }

    async fn fast_forward(
        &self,
        game_id: &str,
        turns: u32,
    ) -> Result<FastForwardResponse, ApiError> {
        let resp = self
            .send(
                self.http
                    .post(self.url(&format!("/game/{game_id}/fast-forward")))
                    .json(&serde_json::json!({ "turns": turns })),
            )
            .await?;
        Self::decode(resp).await
    }

    async fn play_out(&self, game_id: &str) -> Result<PlayResponse, ApiError> {
        let resp = self
            .send(self.http.post(self.url(&format!("/game/{game_id}/play"))))
            .await?;
        Self::decode(resp).await
    }

    async fn delete_game(&self, game_id: &str) -> Result<DeleteResponse, ApiError> {
        let resp = self
            .send(self.http.delete(self.url(&format!("/game/{game_id}"))))
            .await?;
        Self::decode(resp).await
    }
}

/// Convenience for CLI arguments: a `kind` plus optional JSON config.
pub fn agent_spec(kind: &str, config_json: Option<&str>) -> Result<AgentSpec, ApiError> {
    let config = match config_json {
        None => None,
        Some(raw) => Some(
            serde_json::from_str(raw)
                .map_err(|err| ApiError::Malformed(format!("agent config: {err}")))?,
        ),
    };
    Ok(AgentSpec {
        kind: kind.to_string(),
        config,
    })
}
